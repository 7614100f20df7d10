//! Integration test crate for clipforge.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on multiple clipforge crates to verify they work together.

#[cfg(test)]
mod editing;

#[cfg(test)]
mod persistence;

#[cfg(test)]
mod rendering;
