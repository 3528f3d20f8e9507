//! bcrypt hashing, run off the async executor.
use anyhow::Context;

pub const HASH_COST: u32 = 10;

pub async fn hash_password(password: &str) -> anyhow::Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, HASH_COST))
        .await
        .context("password hashing task failed")?
        .context("hashing password")
}

/// Compares a raw password with a stored hash. A malformed hash never matches.
pub async fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("password verification task failed")?;
    match verified {
        Ok(matches) => Ok(matches),
        Err(err) => {
            tracing::warn!(error = %err, "stored password hash is unreadable");
            Ok(false)
        }
    }
}
