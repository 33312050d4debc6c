//! # Storage Module
//!
//! Local persistence for client-side preferences. The backend owns all
//! financial records; the only state kept here is display configuration such
//! as the label-to-color map used by the charts.

pub mod memory;
pub mod traits;
pub mod yaml_file;

pub use memory::InMemoryStore;
pub use traits::KeyValueStore;
pub use yaml_file::YamlFileStore;
