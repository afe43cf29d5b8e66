//! Request handlers.

pub mod auth;
pub mod info;
pub mod meals;
pub mod participation;
pub mod users;
