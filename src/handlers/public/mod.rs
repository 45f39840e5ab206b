pub mod auth;
pub mod content;
pub mod images;
pub mod industries;
pub mod layout;
pub mod social;
pub mod subindustries;
pub mod users;
