//! Console output and prompts.

pub mod display;

pub use display::Display;
