pub mod rest;

pub use rest::{ApiClient, ResourceClient};
