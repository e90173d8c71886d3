pub mod admin;
pub mod auth;
pub mod client;
pub mod posts;
pub mod session;
pub mod social;
pub mod token;
mod wire;

pub use reqwest::StatusCode;
