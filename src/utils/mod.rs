//! Utility modules for common functionality.
//!
//! This module contains helpers shared by the binary, currently the logging
//! setup.

pub mod logger;
