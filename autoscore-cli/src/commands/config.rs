use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use autoscore_remote::{ConfigSource, RemoteConfig};

/// Show the catalog API configuration and where each value comes from.
pub(crate) fn run_config_show() {
    let path = autoscore_remote::config_path();
    let sources = autoscore_remote::config_sources();

    log::info!("{}", "Catalog API Configuration".if_supports_color(Stdout, |t| t.bold()));
    log::info!("");

    match &path {
        Some(p) if p.exists() => log::info!(
            "  Config file: {} {}",
            p.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        ),
        Some(p) => log::info!(
            "  Config file: {} {}",
            p.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        ),
        None => log::info!(
            "  Config file: {}",
            "could not determine path".if_supports_color(Stdout, |t| t.red()),
        ),
    }
    log::info!("");

    // Loading fails outright when a required field is missing; show what we can.
    let config = RemoteConfig::load().ok();

    let fields: [(&str, &ConfigSource, Option<String>); 4] = [
        ("base_url", &sources.base_url, config.as_ref().map(|c| c.base_url.clone())),
        ("api_key", &sources.api_key, config.as_ref().map(RemoteConfig::masked_api_key)),
        ("schema", &sources.schema, config.as_ref().map(|c| c.schema.clone())),
        (
            "timeout_secs",
            &sources.timeout_secs,
            config.as_ref().map(|c| c.timeout_secs.to_string()),
        ),
    ];

    for (name, source, value) in fields {
        match (source, value) {
            (ConfigSource::Missing, _) | (_, None) => log::info!(
                "  {:<13} {} ({})",
                name,
                "(not set)".if_supports_color(Stdout, |t| t.red()),
                source,
            ),
            (_, Some(value)) => log::info!(
                "  {:<13} {} ({})",
                name,
                value.if_supports_color(Stdout, |t| t.green()),
                source.if_supports_color(Stdout, |t| t.dimmed()),
            ),
        }
    }
}

pub(crate) fn run_config_path() {
    match autoscore_remote::config_path() {
        Some(p) => log::info!("{}", p.display()),
        None => log::warn!("Could not determine config directory"),
    }
}
