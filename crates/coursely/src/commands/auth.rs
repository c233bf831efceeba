//! Session command handlers: login, logout, whoami.

use std::io::{BufRead, IsTerminal};

use dialoguer::Input;
use secrecy::SecretString;
use serde::Serialize;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;
use crate::output;

use super::App;
use super::util::prompt_err;

// ── Whoami view ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct WhoAmI {
    profile: String,
    api_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

fn whoami_detail(w: &WhoAmI) -> String {
    let user = match (&w.name, &w.email) {
        (Some(name), Some(email)) => format!("{name} <{email}>"),
        (None, Some(email)) => email.clone(),
        (Some(name), None) => name.clone(),
        (None, None) => "unknown (session restored from stored token)".into(),
    };
    [
        format!("User:     {user}"),
        format!("Profile:  {}", w.profile),
        format!("API:      {}", w.api_url),
    ]
    .join("\n")
}

// ── Input helpers ───────────────────────────────────────────────────

fn resolve_email(args: &LoginArgs, app: &App) -> Result<String, CliError> {
    if let Some(email) = args.email.clone().or_else(|| app.profile.email.clone()) {
        return Ok(email);
    }
    if !std::io::stdin().is_terminal() || args.password_stdin {
        return Err(CliError::Validation {
            field: "email".into(),
            reason: "pass --email or set one with `coursely config set email <address>`".into(),
        });
    }
    Input::new()
        .with_prompt("Email")
        .interact_text()
        .map_err(prompt_err)
}

fn read_password(from_stdin: bool) -> Result<SecretString, CliError> {
    let password = if from_stdin {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_owned()
    } else {
        rpassword::prompt_password("Password: ").map_err(prompt_err)?
    };

    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(password))
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn login(app: &App, args: &LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let email = resolve_email(args, app)?;
    let password = read_password(args.password_stdin)?;

    let session = app.store.auth().login(&email, &password).await?;

    let who = session
        .identity
        .map_or(email, |id| format!("{} <{}>", id.name, id.email));
    output::success(
        &format!("Logged in as {who} (profile '{}')", app.profile_name),
        &global.color,
        global.quiet,
    );
    Ok(())
}

pub fn logout(app: &App, global: &GlobalOpts) -> Result<(), CliError> {
    let was_signed_in = app.store.auth().is_authenticated();
    app.store.auth().logout()?;
    if was_signed_in {
        output::success("Logged out", &global.color, global.quiet);
    } else {
        output::hint("Not logged in; nothing to do", &global.color, global.quiet);
    }
    Ok(())
}

pub fn whoami(app: &App, global: &GlobalOpts) -> Result<(), CliError> {
    let auth = app.store.auth();
    if !auth.is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }
    let identity = auth.identity();
    let view = WhoAmI {
        profile: app.profile_name.clone(),
        api_url: auth.client().base_url().to_string(),
        name: identity.as_ref().map(|i| i.name.clone()),
        email: identity.map(|i| i.email),
    };
    let out = output::render_single(&global.output, &view, whoami_detail, |w| {
        w.email.clone().unwrap_or_else(|| w.profile.clone())
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
