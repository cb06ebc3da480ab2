use serde::{Deserialize, Serialize};

/// Claims of a refresh credential. Carries no email: it is never used to
/// render anything, only to mint the next pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}
