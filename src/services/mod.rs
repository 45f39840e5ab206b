pub mod auth_service;
pub mod content_service;
pub mod image_service;
pub mod industry_service;
pub mod layout_service;
pub mod logo_service;
pub mod social_service;
pub mod subindustry_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use content_service::ContentService;
pub use image_service::ImageService;
pub use industry_service::IndustryService;
pub use layout_service::LayoutService;
pub use logo_service::LogoService;
pub use social_service::SocialService;
pub use subindustry_service::SubIndustryService;
pub use user_service::UserService;
