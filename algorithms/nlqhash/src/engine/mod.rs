//! Execution Engine
//!
//! One-time kernel selection.

pub mod dispatcher;

pub use dispatcher::get_active_backend_name;
