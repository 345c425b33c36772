//! Command handlers.

pub mod extract;
