pub mod api;
pub mod config;
pub mod database;
pub mod di;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod repositories;
pub mod router;
pub mod server;
pub mod services;
