//! Unit tests for configuration loading and precedence.
//!
//! - `helpers`: shared test utilities
//! - `precedence`: layer precedence tests
//! - `field_resolution`: provider, token, and repository resolution tests

mod helpers;
