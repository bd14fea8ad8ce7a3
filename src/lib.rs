//! statforge - attribute point allocation optimizer
//!
//! Core library providing the scaling engine, the build optimizer and the
//! bundled game catalog for a twelve-attribute RPG character system.

pub mod config;
pub mod core;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
