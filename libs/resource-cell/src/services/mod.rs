pub mod filter;
pub mod lookup;
pub mod manager;

pub use filter::filter_items;
pub use lookup::ReferenceLookup;
pub use manager::ResourceManager;
