//! Post board storage.

mod memory;

pub use memory::InMemoryPostRepository;
