//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// SandLink CLI - terminal host for SandLink lighting-control devices
#[derive(Parser, Debug)]
#[command(name = "sandlink")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Preferences directory (defaults to the platform config dir)
    #[arg(long, global = true, env = "SANDLINK_PREFS_DIR")]
    pub prefs_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Host a device until interrupted
    Run(RunArgs),

    /// Send presence advertisements without keeping the device running
    Advertise(AdvertiseArgs),

    /// Device preferences management
    Prefs(PrefsArgs),
}

// ==================== Run ====================

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Interface IP to bind (overrides the stored preference)
    #[arg(long)]
    pub ip: Option<String>,

    /// Advertised node name (overrides the stored preference)
    #[arg(long)]
    pub name: Option<String>,

    /// Start without the periodic advertisement timer
    #[arg(long)]
    pub no_advertise: bool,
}

// ==================== Advertise ====================

#[derive(Args, Debug)]
pub struct AdvertiseArgs {
    /// Number of advertisements to send
    #[arg(short, long, default_value = "1")]
    pub count: u32,

    /// Delay between advertisements in milliseconds
    #[arg(long, default_value = "2000")]
    pub interval_ms: u64,

    /// Interface IP to bind (overrides the stored preference)
    #[arg(long)]
    pub ip: Option<String>,
}

// ==================== Prefs ====================

#[derive(Args, Debug)]
pub struct PrefsArgs {
    #[command(subcommand)]
    pub command: PrefsCommands,
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommands {
    /// Show all stored preferences
    Show,

    /// Read a single preference
    Get(PrefsKeyArgs),

    /// Write a preference
    Set(PrefsSetArgs),

    /// Remove a preference
    Unset(PrefsKeyArgs),
}

#[derive(Args, Debug)]
pub struct PrefsKeyArgs {
    /// Preference key
    pub key: String,
}

#[derive(Args, Debug)]
pub struct PrefsSetArgs {
    /// Preference key
    pub key: String,

    /// Preference value
    pub value: String,
}
