//! Mute criteria
//!
//! A run is muted when it matches any [`Criterion`] of the applicable
//! [`Criteria`]. A criterion combines a set of exit codes with a set of
//! stdout patterns:
//!
//! - An empty exit code set accepts any exit code
//! - An empty pattern set accepts any stdout
//! - A criterion with neither is empty and never matches anything

mod criterion;
mod pattern;


pub use criterion::{Criteria, Criterion};
pub use pattern::{PatternError, StdoutPattern};
