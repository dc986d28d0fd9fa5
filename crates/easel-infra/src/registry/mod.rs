//! Account registries.

mod memory;

pub use memory::InMemoryRegistry;
