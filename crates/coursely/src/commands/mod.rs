//! Command handlers, one module per top-level subcommand.

pub mod auth;
pub mod config_cmd;
pub mod courses;
pub mod util;

use coursely_core::CourseStore;

use crate::cli::{Command, GlobalOpts};
use crate::config::Profile;
use crate::error::CliError;

/// Everything a connected command needs: the store (which owns the
/// session) and the profile it was resolved from.
pub struct App {
    pub store: CourseStore,
    pub profile_name: String,
    pub profile: Profile,
}

/// Route a connected command to its handler.
pub async fn dispatch(cmd: Command, app: &App, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(app, &args, global).await,
        Command::Logout => auth::logout(app, global),
        Command::Whoami => auth::whoami(app, global),
        Command::Courses(args) => courses::handle(&app.store, args, global).await,
        // Handled in `run` before a connection is built.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
