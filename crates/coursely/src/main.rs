mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use coursely_core::{AuthContext, CourseStore};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::commands::App;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never touch the network or the session
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "coursely", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let app = build_app(&cli.global)?;
            tracing::debug!(command = ?cmd, profile = %app.profile_name, "dispatching command");
            commands::dispatch(cmd, &app, &cli.global).await
        }
    }
}

/// Resolve the profile, open its token store and restore the session.
fn build_app(global: &GlobalOpts) -> Result<App, CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);
    let profile = config::resolve_profile(&cfg, &profile_name)?;

    let client_config = config::resolve_client_config(&profile, &cfg, global)?;
    let client = client_config.build_client()?;
    let tokens = config::open_token_store(&profile_name, profile.token_store)?;

    let auth = AuthContext::new(client, tokens);
    Ok(App {
        store: CourseStore::new(auth),
        profile_name,
        profile,
    })
}
