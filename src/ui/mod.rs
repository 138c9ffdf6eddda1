//! Terminal UI components
//!
//! Built with ratatui. Keyboard-first throughout.

pub mod equation;
pub mod theme;

pub use equation::render;
pub use theme::Theme;
