//! Calls out to the model backend.

pub mod analysis;
