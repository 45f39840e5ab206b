pub mod auth;
pub mod cache;
pub mod clients;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod layout;
pub mod middleware;
pub mod services;
