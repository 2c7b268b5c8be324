//! Integration test crate for Cutline.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on multiple cutline crates to verify they work together.

#[cfg(test)]
mod timeline;

#[cfg(test)]
mod render;

#[cfg(test)]
mod media;
