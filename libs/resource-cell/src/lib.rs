pub mod confirm;
pub mod models;
pub mod schema;
pub mod services;

pub use confirm::Confirm;
pub use models::*;
pub use schema::EntitySchema;
pub use services::*;
