pub mod auth;
pub mod entities;
pub mod pagination;
pub mod validation;

pub use auth::*;
pub use entities::*;
pub use pagination::*;

/// Primary key type shared by every REST entity.
pub type Id = i64;
