use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;

use hush_crypto::IdentityHasher;
use hush_dispatch::{Dispatcher, StaticPrivileges};
use hush_relay::{ConfessionRelay, InMemorySurface, RelayConfig};
use hush_server::{StatusConfig, StatusServer};
use hush_types::{CommunityId, SurfaceId, UserId};

use crate::cli::{Cli, Command, ConfigArgs, ConsoleArgs};
use crate::console;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Console(args) => cmd_console(cli.config.as_deref(), args).await,
        Command::Config(args) => cmd_config(cli.config.as_deref(), args),
    }
}

/// Load the file if given, then apply command-line overrides.
fn effective_config(path: Option<&Path>, channel: Option<&str>) -> anyhow::Result<RelayConfig> {
    let mut config = match path {
        Some(path) => RelayConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RelayConfig::default(),
    };
    if let Some(channel) = channel {
        config.target_surface = Some(SurfaceId::parse(channel)?);
    }
    config.validate()?;
    Ok(config)
}

fn cmd_config(path: Option<&Path>, args: ConfigArgs) -> anyhow::Result<()> {
    let config = effective_config(path, args.channel.as_deref())?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

async fn cmd_console(path: Option<&Path>, args: ConsoleArgs) -> anyhow::Result<()> {
    let config = effective_config(path, args.channel.as_deref())?;
    let community = CommunityId::parse(&args.community)?;

    let mut privileges =
        StaticPrivileges::new().with_owner(community.clone(), UserId::parse(&args.owner)?);
    for admin in &args.admins {
        privileges = privileges.with_admin(UserId::parse(admin)?);
    }

    let surface = Arc::new(InMemorySurface::new());
    let relay = Arc::new(ConfessionRelay::new(
        &config,
        IdentityHasher::with_random_salt(),
        surface.clone(),
    )?);

    if let Some(bind) = args.status_bind.as_deref() {
        let server = StatusServer::new(StatusConfig::from_bind(bind)?, relay.state());
        println!("{} status endpoint on {}", "✓".green(), bind.bold());
        tokio::spawn(async move {
            if let Err(e) = server.serve().await {
                tracing::error!(error = %e, "status server stopped");
            }
        });
    }

    let dispatcher = Dispatcher::new(relay, Arc::new(privileges));
    println!(
        "{} Hush console for community {} (owner {}), type `help`",
        "✓".green().bold(),
        community.as_str().cyan(),
        args.owner.yellow()
    );
    console::run(&dispatcher, &surface, &community).await
}
