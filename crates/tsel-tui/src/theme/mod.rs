//! Theme for the target select card.
//!
//! - `palette`: raw color constants
//! - `styles`: semantic style builders

pub mod palette;
pub mod styles;
