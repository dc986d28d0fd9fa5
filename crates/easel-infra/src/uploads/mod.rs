//! Upload storage.

mod disk;

pub use disk::DiskFileStore;
