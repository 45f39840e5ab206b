use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::config;

pub const INDUSTRIES_CACHE_KEY: &str = "industries:all";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Compression error: {0}")]
    Compression(#[from] std::io::Error),
}

static CONNECTION: OnceCell<ConnectionManager> = OnceCell::const_new();

/// Shared Redis handle. `ConnectionManager` multiplexes and reconnects, so
/// cloning it per request is the intended usage.
pub struct Cache {
    conn: ConnectionManager,
}

impl Cache {
    pub async fn handle() -> Result<Self, CacheError> {
        let conn = CONNECTION
            .get_or_try_init(|| async {
                let url = &config::config().cache.url;
                let client = redis::Client::open(url.as_str())?;
                let manager = client.get_connection_manager().await?;
                info!("Connected to Redis at {}", url);
                Ok::<_, redis::RedisError>(manager)
            })
            .await?
            .clone();
        Ok(Self { conn })
    }

    /// Read a gzip-compressed JSON value. Undecodable entries are treated as
    /// a miss so a bad cache write can never take the endpoint down.
    pub async fn get_json<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>, CacheError> {
        let raw: Option<Vec<u8>> = self.conn.get(key).await?;
        let Some(bytes) = raw else {
            return Ok(None);
        };

        match decompress_json(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Discarding undecodable cache entry for {}: {}", key, e);
                Ok(None)
            }
        }
    }

    /// Write a value as gzip-compressed JSON with a TTL
    pub async fn put_json<T: Serialize>(
        &mut self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> Result<(), CacheError> {
        let bytes = compress_json(value)?;
        let _: () = self.conn.set_ex(key, bytes, ttl_secs).await?;
        Ok(())
    }

    pub async fn delete(&mut self, key: &str) -> Result<(), CacheError> {
        let _: () = self.conn.del(key).await?;
        Ok(())
    }

    /// Fetch the recorded login-failure timestamps for an email
    pub async fn login_attempts(&mut self, email: &str) -> Result<Vec<i64>, CacheError> {
        let raw: Option<String> = self.conn.get(login_attempts_key(email)).await?;
        match raw {
            Some(json) => Ok(serde_json::from_str(&json).unwrap_or_default()),
            None => Ok(Vec::new()),
        }
    }

    /// Persist the failure timestamps with a millisecond expiry equal to the
    /// throttle window
    pub async fn store_login_attempts(
        &mut self,
        email: &str,
        attempts: &[i64],
        window_ms: i64,
    ) -> Result<(), CacheError> {
        let json = serde_json::to_string(attempts)?;
        let _: () = self
            .conn
            .pset_ex(login_attempts_key(email), json, window_ms.max(1) as u64)
            .await?;
        Ok(())
    }

    pub async fn clear_login_attempts(&mut self, email: &str) -> Result<(), CacheError> {
        let _: () = self.conn.del(login_attempts_key(email)).await?;
        Ok(())
    }
}

fn login_attempts_key(email: &str) -> String {
    format!("login_attempts:{}", email)
}

fn compress_json<T: Serialize>(value: &T) -> Result<Vec<u8>, CacheError> {
    let json = serde_json::to_vec(value)?;
    let mut encoder = GzEncoder::new(Vec::with_capacity(json.len() / 2), Compression::default());
    encoder.write_all(&json)?;
    Ok(encoder.finish()?)
}

fn decompress_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CacheError> {
    let mut json = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut json)?;
    Ok(serde_json::from_slice(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compression_roundtrip() {
        let value = json!({
            "industries": [{"id": "a", "name": "Food", "sub_industries": []}]
        });
        let bytes = compress_json(&value).unwrap();
        let back: serde_json::Value = decompress_json(&bytes).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn compression_shrinks_repetitive_payloads() {
        let rows: Vec<_> = (0..200)
            .map(|i| json!({"id": i, "name": "Bakery and confectionery"}))
            .collect();
        let json_len = serde_json::to_vec(&rows).unwrap().len();
        let compressed = compress_json(&rows).unwrap();
        assert!(compressed.len() < json_len / 2);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let res: Result<serde_json::Value, _> = decompress_json(b"not gzip at all");
        assert!(res.is_err());
    }

    #[test]
    fn attempts_key_is_email_scoped() {
        assert_eq!(login_attempts_key("a@b.c"), "login_attempts:a@b.c");
    }
}
