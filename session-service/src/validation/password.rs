use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 8;

static UPPER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").expect("pattern compiles"));
static SPECIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").expect("pattern compiles"));

/// True if pw is ≥8 chars, has at least one uppercase and one special char.
/// Only applied when a password is chosen (signup, reset), never on login.
pub fn is_valid_password(pw: &str) -> bool {
    pw.chars().count() >= MIN_PASSWORD_LEN && UPPER_RE.is_match(pw) && SPECIAL_RE.is_match(pw)
}
