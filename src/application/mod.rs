//! Application services: rendering, hero loading, and secret generation.

pub mod error;
pub mod hero;
pub mod keys;
pub mod render;
