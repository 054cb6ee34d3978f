use bcrypt::{DEFAULT_COST, hash, verify};

use crate::utils::AppError;

pub async fn create_password_hash(password: String) -> Result<String, AppError> {
    let hashed_password = tokio::task::spawn_blocking(move || hash(password, DEFAULT_COST)).await??;

    Ok(hashed_password)
}

/// `false` for a wrong password or an unreadable hash.
pub async fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hashed = hashed.to_owned();

    let matches = tokio::task::spawn_blocking(move || verify(password, &hashed))
        .await?
        .unwrap_or_else(|e| {
            tracing::warn!("failed to verify password hash: {e}");
            false
        });

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn verifies_matching_password() {
        let hashed = hash("hunter22", 4).unwrap();
        assert!(verify_password("hunter22", &hashed).await.unwrap());
        assert!(!verify_password("hunter23", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_does_not_match() {
        assert!(!verify_password("hunter22", "not-a-hash").await.unwrap());
    }
}
