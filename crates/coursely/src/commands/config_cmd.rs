//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile, TokenStoreKind};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const VALID_KEYS: &str = "api_url, email, token_store, ca_cert, insecure, timeout";

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display as TOML-like text.
///
/// Profiles hold no secrets; the session token lives in its own store.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    if let Some(timeout) = cfg.defaults.timeout {
        let _ = writeln!(out, "timeout = {timeout}");
    }

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "api_url = \"{}\"", p.api_url);
        if let Some(ref email) = p.email {
            let _ = writeln!(out, "email = \"{email}\"");
        }
        let _ = writeln!(out, "token_store = \"{}\"", token_store_name(p.token_store));
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

fn token_store_name(kind: TokenStoreKind) -> &'static str {
    match kind {
        TokenStoreKind::File => "file",
        TokenStoreKind::Keyring => "keyring",
    }
}

fn parse_token_store(value: &str) -> Result<TokenStoreKind, CliError> {
    match value {
        "file" => Ok(TokenStoreKind::File),
        "keyring" => Ok(TokenStoreKind::Keyring),
        _ => Err(CliError::Validation {
            field: "token_store".into(),
            reason: "must be 'file' or 'keyring'".into(),
        }),
    }
}

/// Apply `key = value` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "api_url" | "api-url" => {
            url::Url::parse(&value).map_err(|e| CliError::Validation {
                field: "api_url".into(),
                reason: format!("invalid URL: {e}"),
            })?;
            profile.api_url = value;
        }
        "email" => profile.email = Some(value),
        "token_store" | "token-store" => profile.token_store = parse_token_store(&value)?,
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => {
            profile.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                field: "insecure".into(),
                reason: "must be 'true' or 'false'".into(),
            })?);
        }
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!("unknown config key '{other}'. Valid keys: {VALID_KEYS}"),
            });
        }
    }
    Ok(())
}

fn save_config(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("coursely configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default(coursely_core::DEFAULT_API_URL.into())
                .validate_with(|s: &String| url::Url::parse(s).map(|_| ()))
                .interact_text()
                .map_err(prompt_err)?;

            let email: String = Input::new()
                .with_prompt("Account email (optional)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let store_choices = &[
                "File in the data directory (default)",
                "System keyring",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to keep the session token?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let profile = Profile {
                api_url,
                email: Some(email).filter(|e| !e.is_empty()),
                token_store: if store_selection == 0 {
                    TokenStoreKind::File
                } else {
                    TokenStoreKind::Keyring
                },
                ..Profile::default()
            };

            // Re-running the wizard keeps the other profiles.
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            save_config(&cfg)?;

            output::success(
                &format!("Configuration written to {}", config_path.display()),
                &global.color,
                global.quiet,
            );
            output::hint(
                &format!("  Active profile: {profile_name}\n  Sign in with: coursely login"),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out =
                output::render_single(&global.output, &cfg, format_config, |_| "config".into());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, value)?;

            save_config(&cfg)?;
            output::success(
                &format!("Set {key} on profile '{profile_name}'"),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile_name();
            if cfg.profiles.is_empty() {
                output::hint(
                    "No profiles configured. Run: coursely config init",
                    &global.color,
                    global.quiet,
                );
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── SetDefault <name> ───────────────────────────────────────
        ConfigCommand::SetDefault { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            output::success(
                &format!("Default profile set to '{name}'"),
                &global.color,
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_known_keys() {
        let mut profile = Profile::default();
        set_profile_key(&mut profile, "api_url", "https://api.example.com".into()).unwrap();
        set_profile_key(&mut profile, "token-store", "keyring".into()).unwrap();
        set_profile_key(&mut profile, "timeout", "30".into()).unwrap();
        set_profile_key(&mut profile, "insecure", "true".into()).unwrap();

        assert_eq!(profile.api_url, "https://api.example.com");
        assert_eq!(profile.token_store, TokenStoreKind::Keyring);
        assert_eq!(profile.timeout, Some(30));
        assert_eq!(profile.insecure, Some(true));
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut profile = Profile::default();
        assert!(set_profile_key(&mut profile, "api_url", "nope".into()).is_err());
        assert!(set_profile_key(&mut profile, "timeout", "soon".into()).is_err());
        assert!(set_profile_key(&mut profile, "token_store", "vault".into()).is_err());

        let err = set_profile_key(&mut profile, "password", "x".into()).unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn format_lists_profiles_sorted() {
        let mut cfg = Config::default();
        cfg.profiles.insert("zeta".into(), Profile::default());
        cfg.profiles.insert(
            "alpha".into(),
            Profile {
                email: Some("ada@example.com".into()),
                ..Profile::default()
            },
        );
        let text = format_config(&cfg);
        let alpha = text.find("[profiles.alpha]").unwrap();
        let zeta = text.find("[profiles.zeta]").unwrap();
        assert!(alpha < zeta);
        assert!(text.contains("email = \"ada@example.com\""));
        assert!(text.contains("token_store = \"file\""));
    }
}
