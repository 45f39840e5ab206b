use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub integrations: IntegrationsConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub url: String,
    /// TTL for the cached industries tree, in seconds
    pub ttl_secs: u64,
    /// Sliding window for login throttling, in milliseconds
    pub login_window_ms: i64,
    pub login_max_attempts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_upload_files: usize,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    pub bcrypt_cost: u32,
    pub otp_ttl_minutes: i64,
}

/// Credentials and endpoints for the third-party services the platform
/// integrates with. Empty strings mean "not configured"; the owning client
/// reports a configuration error when actually used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationsConfig {
    pub imgbb_key: String,
    pub imagekit_public_key: String,
    pub imagekit_private_key: String,
    pub imagekit_url_endpoint: String,
    pub meta_client_id: String,
    pub meta_client_secret: String,
    pub meta_redirect_uri: String,
    pub meta_scopes: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// TTF font used when drawing overlay text
    pub font_path: String,
    /// Fallback logo composited onto generated layouts
    pub logo_url: String,
    pub jpeg_quality: u8,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }

        if let Ok(v) = env::var("REDIS_URL") {
            self.cache.url = v;
        }
        if let Ok(v) = env::var("CACHE_TTL_SECS") {
            self.cache.ttl_secs = v.parse().unwrap_or(self.cache.ttl_secs);
        }
        if let Ok(v) = env::var("LOGIN_WINDOW_MS") {
            self.cache.login_window_ms = v.parse().unwrap_or(self.cache.login_window_ms);
        }
        if let Ok(v) = env::var("LOGIN_MAX_ATTEMPTS") {
            self.cache.login_max_attempts = v.parse().unwrap_or(self.cache.login_max_attempts);
        }

        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_TTL_SECS") {
            self.security.access_token_ttl_secs =
                v.parse().unwrap_or(self.security.access_token_ttl_secs);
        }
        if let Ok(v) = env::var("REFRESH_TOKEN_TTL_SECS") {
            self.security.refresh_token_ttl_secs =
                v.parse().unwrap_or(self.security.refresh_token_ttl_secs);
        }
        if let Ok(v) = env::var("BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }

        if let Ok(v) = env::var("IMGBB_KEY") {
            self.integrations.imgbb_key = v;
        }
        if let Ok(v) = env::var("IMAGEKIT_PUBLIC_KEY") {
            self.integrations.imagekit_public_key = v;
        }
        if let Ok(v) = env::var("IMAGEKIT_PRIVATE_KEY") {
            self.integrations.imagekit_private_key = v;
        }
        if let Ok(v) = env::var("IMAGEKIT_URL_ENDPOINT") {
            self.integrations.imagekit_url_endpoint = v;
        }
        if let Ok(v) = env::var("META_CLIENT_ID") {
            self.integrations.meta_client_id = v;
        }
        if let Ok(v) = env::var("META_CLIENT_SECRET") {
            self.integrations.meta_client_secret = v;
        }
        if let Ok(v) = env::var("META_REDIRECT_URI") {
            self.integrations.meta_redirect_uri = v;
        }
        if let Ok(v) = env::var("META_SCOPES") {
            self.integrations.meta_scopes = v;
        }
        if let Ok(v) = env::var("MAIL_API_URL") {
            self.integrations.mail_api_url = v;
        }
        if let Ok(v) = env::var("MAIL_API_KEY") {
            self.integrations.mail_api_key = v;
        }
        if let Ok(v) = env::var("MAIL_FROM") {
            self.integrations.mail_from = v;
        }

        if let Ok(v) = env::var("LAYOUT_FONT_PATH") {
            self.layout.font_path = v;
        }
        if let Ok(v) = env::var("LAYOUT_LOGO_URL") {
            self.layout.logo_url = v;
        }

        self
    }

    fn base_integrations() -> IntegrationsConfig {
        IntegrationsConfig {
            imgbb_key: String::new(),
            imagekit_public_key: String::new(),
            imagekit_private_key: String::new(),
            imagekit_url_endpoint: String::new(),
            meta_client_id: String::new(),
            meta_client_secret: String::new(),
            meta_redirect_uri: String::new(),
            meta_scopes: "pages_show_list,pages_manage_posts".to_string(),
            mail_api_url: String::new(),
            mail_api_key: String::new(),
            mail_from: "no-reply@brandforge.local".to_string(),
        }
    }

    fn base_layout() -> LayoutConfig {
        LayoutConfig {
            font_path: "assets/DejaVuSans.ttf".to_string(),
            logo_url: "https://cdn.vectorstock.com/i/1000v/44/02/circle-logo-vector-41774402.jpg"
                .to_string(),
            jpeg_quality: 90,
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            cache: CacheConfig {
                url: "redis://127.0.0.1:6379".to_string(),
                ttl_secs: 3600,
                login_window_ms: 60_000,
                login_max_attempts: 3,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_upload_files: 31,
                max_upload_bytes: 50 * 1024 * 1024,
            },
            security: SecurityConfig {
                jwt_secret: "secretkey".to_string(),
                access_token_ttl_secs: 15 * 60,
                refresh_token_ttl_secs: 7 * 24 * 60 * 60,
                bcrypt_cost: 10,
                otp_ttl_minutes: 10,
            },
            integrations: Self::base_integrations(),
            layout: Self::base_layout(),
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.database = DatabaseConfig {
            max_connections: 20,
            connection_timeout_secs: 10,
        };
        // Secrets must come from the environment outside development
        config.security.jwt_secret = String::new();
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.database = DatabaseConfig {
            max_connections: 50,
            connection_timeout_secs: 5,
        };
        config.api.enable_request_logging = false;
        config.security.jwt_secret = String::new();
        config.security.bcrypt_cost = 12;
        config
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.cache.login_max_attempts, 3);
        assert_eq!(config.cache.login_window_ms, 60_000);
        assert_eq!(config.security.access_token_ttl_secs, 15 * 60);
        assert_eq!(config.api.max_upload_files, 31);
        assert!(config.api.enable_request_logging);
    }

    #[test]
    fn production_hardens_defaults() {
        let config = AppConfig::production();
        assert_eq!(config.environment, Environment::Production);
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.bcrypt_cost, 12);
        assert!(!config.api.enable_request_logging);
    }

    #[test]
    fn staging_has_no_default_secret() {
        let config = AppConfig::staging();
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.database.max_connections, 20);
    }
}
