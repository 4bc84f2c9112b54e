//! tsel-tui - Terminal UI for Target Select
//!
//! This crate provides the ratatui-based terminal interface. It creates an Engine
//! from tsel-app and adds terminal rendering, key polling, and widget display.

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

// Re-export main entry points
pub use runner::run;
