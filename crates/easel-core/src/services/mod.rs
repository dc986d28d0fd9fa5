//! Use cases built on top of the ports.

mod registration;

pub use registration::RegistrationService;
