pub mod attachments;
pub mod audit;
pub mod auth;
pub mod config;
pub mod content_filter;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod pricing;
pub mod sweep;
