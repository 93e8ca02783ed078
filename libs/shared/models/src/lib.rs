pub mod error;
pub mod ids;
pub mod nullable;

pub use error::AppError;
pub use ids::{EntityId, EntityRef};
pub use nullable::null_as_default;
