//! Scenario state for the error handling BDD tests.

use std::time::Duration;

use forgelink::forge::{GitService, GitServiceError, Provider, ValidationResult};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use wiremock::Mock;

use super::support::ForgeServer;

#[derive(ScenarioState, Default)]
pub(crate) struct ErrorState {
    pub(crate) forge: Slot<ForgeServer>,
    pub(crate) validation: Slot<ValidationResult>,
    pub(crate) error: Slot<GitServiceError>,
}

impl ErrorState {
    /// Fake host shared by every step of the scenario.
    pub(crate) fn forge(&self) -> ForgeServer {
        ForgeServer::ensure(&self.forge)
    }

    pub(crate) fn mount(&self, mock: Mock) {
        self.forge().mount(mock);
    }

    pub(crate) fn connect(&self, provider: Provider, timeout: Duration) -> Box<dyn GitService> {
        self.forge().connect(provider, timeout)
    }
}

/// REST prefix each provider serves its API under.
pub(crate) const fn api_prefix(provider: Provider) -> &'static str {
    match provider {
        Provider::Gitea => "/api/v1",
        Provider::GitLab => "/api/v4",
    }
}
