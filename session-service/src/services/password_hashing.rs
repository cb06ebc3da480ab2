use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordHashingError {
    #[error("password hashing failed")]
    Hashing,
    #[error("stored password hash is malformed")]
    MalformedHash,
    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

fn hasher() -> Result<Argon2<'static>, PasswordHashingError> {
    let params = Params::new(15000, 2, 1, None).map_err(|_| PasswordHashingError::Hashing)?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Argon2id PHC string for `password`. Runs on the blocking pool.
pub async fn hash_password(password: &str) -> Result<String, PasswordHashingError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| PasswordHashingError::Hashing)
    })
    .await?
}

/// Parameters are read back from the PHC string, so older hashes keep verifying.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordHashingError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash).map_err(|_| PasswordHashingError::MalformedHash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await?
}
