//! # Application Layer
//!
//! Interfaces to the outside world, the interpreter and usage services, and
//! the use cases that orchestrate them.

pub mod interfaces;
pub mod services;
pub mod use_cases;

pub use interfaces::*;
pub use services::*;
pub use use_cases::*;
