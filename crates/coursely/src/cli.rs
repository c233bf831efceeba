//! Clap derive structures for the `coursely` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// coursely -- manage your courses from the command line
#[derive(Debug, Parser)]
#[command(
    name = "coursely",
    version,
    about = "Create, list, edit and delete your courses from the command line",
    long_about = "A command-line client for the course management API.\n\n\
        Sign in once with `coursely login`; the session token is kept in a\n\
        local file or the system keyring and reused by every command.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "COURSELY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "COURSELY_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "COURSELY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates (development servers)
    #[arg(long, short = 'k', env = "COURSELY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (default: wait indefinitely)
    #[arg(long, env = "COURSELY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session token
    Login(LoginArgs),

    /// Sign out and forget the stored session token
    Logout,

    /// Show the current session
    Whoami,

    /// Manage your courses
    #[command(alias = "c")]
    Courses(CoursesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (defaults to the profile's email, else prompts)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COURSES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CoursesArgs {
    #[command(subcommand)]
    pub command: CoursesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CoursesCommand {
    /// List your courses
    #[command(alias = "ls")]
    List,

    /// Show one course
    Get {
        /// Course ID
        id: String,
    },

    /// Create a course
    Create(CreateCourseArgs),

    /// Edit a course (only the given fields change)
    Update(UpdateCourseArgs),

    /// Delete a course
    #[command(alias = "rm")]
    Delete {
        /// Course ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct CreateCourseArgs {
    /// Course title
    #[arg(long, short = 't')]
    pub title: String,

    /// Course description
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,

    /// Beginner, Intermediate or Advanced (default: Beginner)
    #[arg(long, short = 'l')]
    pub level: Option<String>,

    /// WebDevelopment, CyberSecurity, "Data Management", "Data Analyst",
    /// "Data Science" or "Embedded Systems" (default: WebDevelopment)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Free-form subcategory
    #[arg(long, default_value = "")]
    pub subcategory: String,

    /// Image file to embed as the cover (sent as a data URI)
    #[arg(long)]
    pub cover_image: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct UpdateCourseArgs {
    /// Course ID
    pub id: String,

    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// New level
    #[arg(long, short = 'l')]
    pub level: Option<String>,

    /// New category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// New subcategory
    #[arg(long)]
    pub subcategory: Option<String>,

    /// Replace the cover with this image file
    #[arg(long, conflicts_with = "remove_cover")]
    pub cover_image: Option<PathBuf>,

    /// Remove the cover image
    #[arg(long)]
    pub remove_cover: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key: api_url, email, token_store, ca_cert, insecure, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    SetDefault {
        /// Profile name to use by default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
