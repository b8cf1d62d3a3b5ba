pub mod exclusive;
pub mod finalize;

pub use exclusive::*;
pub use finalize::*;
