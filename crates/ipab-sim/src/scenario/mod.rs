//! Scenario templates
//!
//! A scenario is a named, described array configuration. Loading one
//! instantiates a new array from a copy of the template; the template itself
//! is never modified.

pub mod builtin;
pub mod template;

pub use builtin::builtin_scenarios;
pub use template::{slugify, ScenarioTemplate};
