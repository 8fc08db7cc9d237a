//! Filesystem primitives for state files

pub mod atomic;

pub use atomic::{atomic_write, read_optional};
