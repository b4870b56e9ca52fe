pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod listing;
pub mod outcome;
pub mod products;
pub mod state;
pub mod throttle;
pub mod users;
pub mod validation;
