pub mod content;
pub mod logo;
pub mod social;
pub mod taxonomy;
pub mod user;

pub use content::{Content, Hashtag};
pub use logo::{Logo, LogoPosition, LogoSize};
pub use social::{LinkedAccount, SocialPlatform};
pub use taxonomy::{Image, ImageSummary, Industry, IndustryTree, SubIndustry, SubIndustryTree};
pub use user::{User, UserRole};
