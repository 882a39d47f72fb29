//! Shared utilities.
//!
//! Filesystem helpers used by the assembler, plus test helpers.

pub mod fs;

#[cfg(test)]
pub mod testutil;
