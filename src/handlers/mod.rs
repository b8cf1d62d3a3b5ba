pub mod admin_handlers;
pub mod auth_handlers;
pub mod comment_handlers;
pub mod idea_handlers;
pub mod sweep_handlers;
