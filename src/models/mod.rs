pub mod comment;
pub mod idea;
pub mod user;
