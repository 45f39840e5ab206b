pub mod facebook;
pub mod imagekit;
pub mod imgbb;
pub mod mailer;

use once_cell::sync::Lazy;
use thiserror::Error;

/// Shared HTTP client for all outbound integrations
pub static HTTP: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

pub use facebook::FacebookClient;
pub use imagekit::ImageKitClient;
pub use imgbb::ImgbbClient;
pub use mailer::Mailer;
