//! Shared harness for the behavioural tests.
//!
//! [`ForgeServer`] owns a Tokio runtime and a `wiremock` server standing in
//! for a Gitea or GitLab host. Scenario state keeps it in a single
//! `rstest-bdd` slot and builds adapters against it on demand.

use std::cell::RefCell;
use std::future::Future;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use forgelink::forge::{GitService, Provider, ProviderConfig, connect};
use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer};

/// Token presented by every adapter built for tests.
pub const TEST_TOKEN: &str = "secret-token";

/// Runtime plus fake Git host, cheap to clone into and out of a slot.
#[derive(Clone)]
pub struct ForgeServer {
    runtime: Rc<RefCell<Runtime>>,
    server: Rc<MockServer>,
}

impl ForgeServer {
    /// Starts a runtime and a mock server on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the Tokio runtime cannot be created.
    pub fn start() -> Result<Self, io::Error> {
        let runtime = Runtime::new()?;
        let server = runtime.block_on(MockServer::start());
        Ok(Self {
            runtime: Rc::new(RefCell::new(runtime)),
            server: Rc::new(server),
        })
    }

    /// Returns the server stored in `slot`, starting one on first use.
    ///
    /// # Panics
    ///
    /// Panics if the runtime cannot be created.
    pub fn ensure(slot: &Slot<Self>) -> Self {
        if let Some(existing) = slot.get() {
            return existing;
        }
        let started =
            Self::start().unwrap_or_else(|error| panic!("failed to start mock forge: {error}"));
        slot.set(started.clone());
        started
    }

    /// Drives `future` to completion on the shared runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.borrow().block_on(future)
    }

    /// Mounts `mock` on the fake host.
    pub fn mount(&self, mock: Mock) {
        self.block_on(mock.mount(&self.server));
    }

    /// Builds an adapter for `provider` pointed at the fake host.
    ///
    /// # Panics
    ///
    /// Panics if the adapter cannot be constructed.
    pub fn connect(&self, provider: Provider, timeout: Duration) -> Box<dyn GitService> {
        let mut config =
            ProviderConfig::new(provider, self.server.uri(), Some(TEST_TOKEN.to_owned()));
        config.timeout = timeout;
        connect(&config)
            .unwrap_or_else(|error| panic!("failed to build {provider} adapter: {error}"))
    }
}
