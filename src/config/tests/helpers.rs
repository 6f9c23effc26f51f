//! Layer composition for configuration tests.

use ortho_config::MergeComposer;
use serde_json::{Value, json};

use crate::ForgeConfig;

/// Where a configuration layer comes from, lowest precedence first.
#[derive(Debug, Clone, Copy)]
pub enum Source {
    Defaults,
    File,
    Environment,
    Cli,
}

/// Merges `layers` over an empty base the way `ForgeConfig::load` orders
/// them.
pub fn merge_sources(layers: &[(Source, Value)]) -> ForgeConfig {
    let mut composer = MergeComposer::new();
    composer.push_defaults(json!({ "provider": null, "base_url": null, "token": null }));

    for (source, value) in layers {
        let layer = value.clone();
        match source {
            Source::Defaults => composer.push_defaults(layer),
            Source::File => composer.push_file(layer, None),
            Source::Environment => composer.push_environment(layer),
            Source::Cli => composer.push_cli(layer),
        }
    }

    ForgeConfig::merge_from_layers(composer.layers()).expect("layers should merge")
}
