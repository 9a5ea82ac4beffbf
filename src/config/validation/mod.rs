//! Configuration validation
//!
//! - `validators`: implementations for every configuration section
//! - `tests`: test suite for all validators

mod validators;


/// Check a configuration section, describing the first problem found
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
