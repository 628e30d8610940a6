use rand::Rng;
use sha2::{Digest, Sha256};

use crate::errors::AppError;

/// Default credential lifetime: one day.
pub const DEFAULT_TTL_SECS: i64 = 24 * 60 * 60;

/// Issues and verifies stateless bearer tokens of the form
/// `<persona_id>.<expiry_unix>.<hex tag>` where the tag is
/// SHA-256 over the payload followed by the server secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl TokenSigner {
    pub fn new(secret: Vec<u8>) -> Self {
        TokenSigner { secret }
    }

    /// Load the signing secret from the TOKEN_SECRET env var, falling back
    /// to a random per-process secret (tokens then die with the process).
    pub fn from_env() -> Self {
        match std::env::var("TOKEN_SECRET") {
            Ok(val) if val.len() >= 32 => {
                log::info!("Using TOKEN_SECRET from environment");
                TokenSigner::new(val.into_bytes())
            }
            Ok(val) => {
                log::warn!(
                    "TOKEN_SECRET too short ({} bytes, need 32+), generating random secret",
                    val.len()
                );
                TokenSigner::new(random_secret())
            }
            Err(_) => {
                log::warn!("No TOKEN_SECRET set, generating random secret (tokens lost on restart)");
                TokenSigner::new(random_secret())
            }
        }
    }

    pub fn issue(&self, persona_id: i64, ttl_secs: i64) -> String {
        let expiry = chrono::Utc::now().timestamp() + ttl_secs;
        let payload = format!("{persona_id}.{expiry}");
        let tag = self.tag(&payload);
        format!("{payload}.{tag}")
    }

    /// Verify signature and expiry; returns the encoded persona id.
    pub fn verify(&self, token: &str) -> Result<i64, AppError> {
        let invalid = || AppError::Auth("Token inválido".to_string());

        let mut parts = token.splitn(3, '.');
        let (id_part, exp_part, tag_part) = match (parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(b), Some(c)) => (a, b, c),
            _ => return Err(invalid()),
        };

        let persona_id: i64 = id_part.parse().map_err(|_| invalid())?;
        let expiry: i64 = exp_part.parse().map_err(|_| invalid())?;

        let expected = self.tag(&format!("{id_part}.{exp_part}"));
        if !constant_time_eq(&expected, tag_part) {
            return Err(invalid());
        }
        if chrono::Utc::now().timestamp() > expiry {
            return Err(AppError::Auth("Token expirado".to_string()));
        }
        Ok(persona_id)
    }

    fn tag(&self, payload: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(payload.as_bytes());
        hasher.update(&self.secret);
        hex::encode(hasher.finalize())
    }
}

fn random_secret() -> Vec<u8> {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    bytes.to_vec()
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
