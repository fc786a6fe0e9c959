use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "hush",
    about = "Hush - anonymous confession relay",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Relay configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Drive the relay from stdin against an in-memory channel
    Console(ConsoleArgs),
    /// Print the effective configuration as TOML
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ConsoleArgs {
    /// Community every console user belongs to
    #[arg(long, default_value = "local")]
    pub community: String,

    /// Owner of the community; may run admin commands
    #[arg(long, default_value = "owner")]
    pub owner: String,

    /// Extra users allowed to run admin commands
    #[arg(long = "admin")]
    pub admins: Vec<String>,

    /// Initial target channel, overrides the config file
    #[arg(long)]
    pub channel: Option<String>,

    /// Also serve the status endpoint on this address
    #[arg(long)]
    pub status_bind: Option<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Initial target channel, overrides the config file
    #[arg(long)]
    pub channel: Option<String>,
}
