//! kernrig: kerning class manager
//!
//! Hierarchical class editing on a generational arena, pair composition and
//! generation, and leader transplanting between class collections.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
