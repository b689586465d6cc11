pub mod admin_service;
pub mod ai_service;
pub mod auth_service;
pub mod export_service;
pub mod journey_service;
pub mod profile_service;
