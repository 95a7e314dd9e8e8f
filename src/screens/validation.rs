//! Synchronous credential validation.
//!
//! These predicates run before any network call; a failure only flips the
//! screen-local `is_error` flag and never reaches the envelope path.

/// Accept addresses with one `@`, a dotted domain and no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Accept passwords of at least 8 characters containing a letter and a digit.
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}
