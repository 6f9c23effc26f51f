//! Support modules for the error handling BDD tests.

pub(crate) mod domain;
#[path = "../support/mod.rs"]
pub(crate) mod support;
pub(crate) mod state;

pub(crate) use domain::{ExpectedFailure, Millis};
pub(crate) use state::{ErrorState, api_prefix};
