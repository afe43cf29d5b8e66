//! Business-flow services composing core operations.

pub mod auth;
