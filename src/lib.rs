// Library exports for testing and modular access

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod services;
pub mod wizard;
