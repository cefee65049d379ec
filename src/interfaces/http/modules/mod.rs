pub mod auth;
pub mod health;
pub mod logs;
pub mod plants;
pub mod request_id;
pub mod seasons;
pub mod upload;
