//! Field validation rules for request payloads.
//!
//! The rules mirror the registration contract: an email of the form
//! `f.lastname@domain.tld`, a password of at least 8 characters with an
//! uppercase letter and a digit, and a Dutch-style phone number.

/// `f.lastname@domain.tld`: one letter, a dot, at least two alphanumerics,
/// then a letters-only domain with a 2–3 letter TLD.
pub fn valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((initial, name)) = local.split_once('.') else {
        return false;
    };
    if initial.len() != 1 || !initial.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    if name.len() < 2 || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }
    let Some((host, tld)) = domain.split_once('.') else {
        return false;
    };
    host.len() >= 2
        && host.chars().all(|c| c.is_ascii_alphabetic())
        && (2..=3).contains(&tld.len())
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// At least 8 characters, with at least one uppercase letter and one digit.
pub fn valid_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Either `06` plus an optional separator and 8 digits, or 10–11 bare digits.
pub fn valid_phone(phone: &str) -> bool {
    if let Some(rest) = phone.strip_prefix("06") {
        let digits = rest.strip_prefix(['-', ' ']).unwrap_or(rest);
        if digits.len() == 8 && digits.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }
    }
    (10..=11).contains(&phone.len()) && phone.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_wellformed_email() {
        assert!(valid_email("j.doe@server.com"));
        assert!(valid_email("a.bc2@host.nl"));
    }

    #[test]
    fn rejects_malformed_email() {
        assert!(!valid_email("jdoe@server.com")); // no initial
        assert!(!valid_email("j.d@server.com")); // name too short
        assert!(!valid_email("j.doe@server")); // no tld
        assert!(!valid_email("j.doe@server.comm")); // tld too long
        assert!(!valid_email("j.doe@s.com")); // host too short
        assert!(!valid_email("j.doe"));
    }

    #[test]
    fn password_rules() {
        assert!(valid_password("Secret123"));
        assert!(!valid_password("Sh0rt"));
        assert!(!valid_password("alllowercase1"));
        assert!(!valid_password("NoDigitsHere"));
    }

    #[test]
    fn phone_rules() {
        assert!(valid_phone("0612345678"));
        assert!(valid_phone("06-12345678"));
        assert!(valid_phone("06 12345678"));
        assert!(valid_phone("0101234567"));
        assert!(!valid_phone("06-1234567")); // too short
        assert!(!valid_phone("phone12345"));
    }
}
