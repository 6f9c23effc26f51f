//! Support modules for the provider parity BDD tests.

#[path = "../support/mod.rs"]
pub(crate) mod support;
pub(crate) mod state;

pub(crate) use state::ParityState;
