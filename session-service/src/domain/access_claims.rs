use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,   // Account ID
    pub email: String, // Account email, for display only
    pub iss: String,   // Issuer
    pub aud: String,   // Audience
    pub exp: usize,    // Expiration time
    pub iat: usize,    // Issued at time
    pub jti: String,   // JWT ID
}
