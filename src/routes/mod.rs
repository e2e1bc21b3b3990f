pub mod admin;
pub mod api;
pub mod assets;
pub mod local;
pub mod upload;
