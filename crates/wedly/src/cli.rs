//! Clap derive structures for the `wedly` CLI.
//!
//! Defines the command tree, global flags, and shared types. Also compiled
//! by `build.rs` for man page generation, so it depends on clap alone.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wedly -- admin console for the wedly invitation backend
#[derive(Debug, Parser)]
#[command(
    name = "wedly",
    version,
    about = "Administer wedding invitations from the command line",
    long_about = "Manage users, invitation templates, and guest lists on a wedly backend.\n\n\
        Sign in once with `wedly login`; the session token is kept per profile\n\
        and reused by every other command until it expires.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "WEDLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend API URL (overrides profile)
    #[arg(long, env = "WEDLY_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "WEDLY_OUTPUT",
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

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "WEDLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "WEDLY_TIMEOUT", global = true)]
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
    /// Plain text, one id per line (scripting)
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
    /// Sign in and keep the session token for this profile
    Login(LoginArgs),

    /// Forget the stored session token
    Logout,

    /// Show the signed-in account
    Whoami,

    /// List user accounts
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Manage the public template catalogue
    #[command(alias = "tpl")]
    Templates(TemplatesArgs),

    /// Manage user-owned invitation templates
    #[command(alias = "ut")]
    UserTemplates(UserTemplatesArgs),

    /// Manage the guest list of an invitation
    #[command(alias = "g")]
    Guests(GuestsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Pagination arguments shared by all list commands.
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Records per page (defaults to the configured page limit)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (defaults to the profile's email, else prompted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Account password (prompted when absent)
    #[arg(long, env = "WEDLY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List user accounts
    #[command(alias = "ls")]
    List(PageArgs),
}

// ── Public templates ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    pub command: TemplatesCommand,
}

#[derive(Debug, Subcommand)]
pub enum TemplatesCommand {
    /// List public templates
    #[command(alias = "ls")]
    List(PageArgs),

    /// Publish a new public template
    Create(TemplateCreateArgs),
}

#[derive(Debug, Args)]
pub struct TemplateCreateArgs {
    /// Template name
    #[arg(long)]
    pub name: String,

    /// Short description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Price in the smallest currency unit
    #[arg(long, default_value = "0")]
    pub price: i64,

    /// Billing interval (e.g., "day", "month")
    #[arg(long, default_value = "")]
    pub price_interval: String,

    /// Publication state code
    #[arg(long, default_value = "1")]
    pub state: i32,

    /// Template type (e.g., "wedding")
    #[arg(long = "type", default_value = "")]
    pub kind: String,

    /// Tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Cover image file
    #[arg(long)]
    pub cover_image: Option<PathBuf>,

    /// Zipped template bundle
    #[arg(long)]
    pub zip_file: Option<PathBuf>,
}

// ── User templates ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UserTemplatesArgs {
    #[command(subcommand)]
    pub command: UserTemplatesCommand,
}

#[derive(Debug, Subcommand)]
pub enum UserTemplatesCommand {
    /// List user templates
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Only templates owned by this user
        #[arg(long)]
        user_id: Option<String>,
    },

    /// Create a user template
    Create(UserTemplateCreateArgs),
}

#[derive(Debug, Args)]
pub struct UserTemplateCreateArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// URL slug
    #[arg(long)]
    pub slug: String,

    /// Public invitation URL
    #[arg(long)]
    pub url: String,

    /// Expiry as RFC 3339 (e.g., 2026-12-31T23:59:00Z)
    #[arg(long)]
    pub expire_at: String,

    /// WhatsApp message sent with each invitation
    #[arg(long)]
    pub whatsapp_text: String,

    /// Public template this instance is based on
    #[arg(long)]
    pub base_template_id: Option<String>,

    /// Cover image file
    #[arg(long)]
    pub cover_image: Option<PathBuf>,

    /// Zipped template bundle
    #[arg(long)]
    pub zip_file: Option<PathBuf>,
}

// ── Guests ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GuestsArgs {
    #[command(subcommand)]
    pub command: GuestsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GuestsCommand {
    /// List the guests of a user template
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,

        /// User template whose guests to list
        #[arg(long, short = 't')]
        user_template_id: String,
    },

    /// Add a guest
    Create(GuestCreateArgs),

    /// Update a guest
    Update(GuestUpdateArgs),

    /// Remove a guest
    #[command(alias = "rm")]
    Delete {
        /// Guest ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct GuestCreateArgs {
    /// User template the guest belongs to
    #[arg(long, short = 't')]
    pub user_template_id: String,

    /// Guest name
    #[arg(long)]
    pub name: String,

    /// Guest group (e.g., "family")
    #[arg(long, default_value = "")]
    pub group: String,

    /// Number of people invited
    #[arg(long, default_value = "1")]
    pub person: i32,

    /// Tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Phone number
    #[arg(long, default_value = "")]
    pub telp: String,

    /// Postal address
    #[arg(long, default_value = "")]
    pub address: String,
}

#[derive(Debug, Args)]
pub struct GuestUpdateArgs {
    /// Guest ID
    pub id: String,

    /// Load this user template's guests first so the result shows the
    /// merged record
    #[arg(long, short = 't')]
    pub user_template_id: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub group: Option<String>,

    #[arg(long)]
    pub person: Option<i32>,

    /// Replace tags (repeatable)
    #[arg(long = "tag", conflicts_with = "clear_tags")]
    pub tags: Vec<String>,

    /// Remove all tags
    #[arg(long)]
    pub clear_tags: bool,

    #[arg(long)]
    pub telp: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub message: Option<String>,

    /// Attendance confirmation
    #[arg(long)]
    pub attend: Option<bool>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the current configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    SetDefault {
        /// Profile name to make the default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
