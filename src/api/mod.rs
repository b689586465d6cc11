pub mod health;
pub mod auth;
pub mod profile;
pub mod journey;
pub mod ai;
pub mod results;
pub mod export;
pub mod admin;
pub mod metrics;
pub mod swagger;
