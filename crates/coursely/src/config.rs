//! CLI configuration: thin wrapper around `coursely_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects the
//! `GlobalOpts` flag overrides (`--api-url`, `--insecure`, `--timeout`).

use std::time::Duration;

use coursely_core::{ClientConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use coursely_config::{
    Config, Profile, TokenStoreKind, config_path, load_config_or_default, open_token_store,
    save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile_name().to_owned())
}

/// Look up the active profile, listing the known ones when it is missing.
pub fn resolve_profile(config: &Config, name: &str) -> Result<Profile, CliError> {
    config.profile(name).map_err(|_| CliError::ProfileNotFound {
        name: name.to_owned(),
        available: available_profiles(config),
    })
}

/// Comma-separated, sorted profile names (or `(none)`).
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
///
/// CLI flag overrides take priority over profile values, which take
/// priority over `[defaults]`.
pub fn resolve_client_config(
    profile: &Profile,
    config: &Config,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    let mut client = coursely_config::profile_to_client_config(profile, &config.defaults)?;

    if let Some(url_str) = global.api_url.as_deref() {
        client.api_url = url_str.parse().map_err(|_| CliError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {url_str}"),
        })?;
    }
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Some(Duration::from_secs(secs));
    }

    Ok(client)
}
