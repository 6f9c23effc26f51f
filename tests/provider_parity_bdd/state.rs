//! Scenario state for the provider parity BDD tests.

use std::time::Duration;

use forgelink::forge::{Branch, GitService, Provider, PullRequest};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use wiremock::Mock;

use super::support::ForgeServer;

#[derive(ScenarioState, Default)]
pub(crate) struct ParityState {
    pub(crate) forge: Slot<ForgeServer>,
    pub(crate) pulls: Slot<Vec<PullRequest>>,
    pub(crate) fetched: Slot<Vec<(Provider, PullRequest)>>,
    pub(crate) branches: Slot<Vec<(Provider, Vec<Branch>)>>,
}

impl ParityState {
    /// Fake host shared by every step of the scenario.
    pub(crate) fn forge(&self) -> ForgeServer {
        ForgeServer::ensure(&self.forge)
    }

    pub(crate) fn mount(&self, mock: Mock) {
        self.forge().mount(mock);
    }

    pub(crate) fn connect(&self, provider: Provider) -> Box<dyn GitService> {
        self.forge().connect(provider, Duration::from_secs(5))
    }
}
