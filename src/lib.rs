//! Forgelink library crate providing one typed client over Gitea and GitLab.
//!
//! The [`forge`] module defines the provider-agnostic [`GitService`]
//! contract, the normalised entities it returns, and an adapter per
//! provider. [`config`] loads the layered settings the CLI uses to pick and
//! build an adapter.

pub mod config;
pub mod forge;

pub use config::ForgeConfig;
pub use forge::{
    GitService, GitServiceError, GitLabService, GiteaService, PersonalAccessToken, Provider,
    ProviderConfig, connect,
};
