use std::fmt;

use crate::validation::{is_valid_password, MIN_PASSWORD_LEN};

/// A newly chosen password that satisfies the strength rules.
///
/// Passwords submitted at login are never parsed into this type: they are
/// only compared against the stored hash.
#[derive(PartialEq)]
pub struct Password(String);

impl Password {
    pub fn parse(password: String) -> Result<Password, String> {
        match is_valid_password(&password) {
            true => Ok(Password(password)),
            false => Err(format!(
                "Password is not valid, must be at least {} characters long, contain at least one uppercase letter and one special character.",
                MIN_PASSWORD_LEN
            )),
        }
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}
