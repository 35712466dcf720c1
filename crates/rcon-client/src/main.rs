//! `rcon-admin` — command-line front end for the RCON client.
//!
//! Loads the server configuration from a TOML file (`--config`) or, when no
//! file is given, from the `RCON_HOST` / `RCON_PORT` / `RCON_PASSWORD`
//! environment variables, then runs one operation and prints the server's
//! raw text to stdout.
//!
//! ```text
//! rcon-admin --config server.toml map de_mirage
//! rcon-admin exec sv_password hunter2
//! rcon-admin mode "game_type 1; game_mode 2" --map workshop/3070284539/de_sparity
//! RCON_HOST=... RCON_PASSWORD=... rcon-admin info
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rcon_client::{RconClient, ServerConfig};
use rcon_core::command::BotTeam;

#[derive(Parser)]
#[command(name = "rcon-admin", about = "Administer a game server over RCON")]
struct Cli {
    /// Path to a TOML config file; falls back to RCON_* environment
    /// variables when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a raw console command.
    Exec {
        /// Command words, joined with spaces before sending.
        #[arg(required = true)]
        command: Vec<String>,
    },
    /// Change the map via `changelevel`.
    Map { name: String },
    /// Apply a mode command, optionally chaining a map directive.
    Mode {
        mode_cmd: String,
        /// Map argument; `workshop/<id>/<name>` paths are rewritten to
        /// `host_workshop_map <id>`.
        #[arg(long)]
        map: Option<String>,
    },
    /// Kick a player by name.
    Kick { name: String },
    /// Add a bot to the given team.
    BotAdd { team: TeamArg },
    /// Kick all bots.
    BotKick,
    /// Print the raw `status` output.
    Status,
    /// Print the aggregated server info bundle.
    Info,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TeamArg {
    T,
    Ct,
}

impl From<TeamArg> for BotTeam {
    fn from(team: TeamArg) -> Self {
        match team {
            TeamArg::T => BotTeam::Terrorist,
            TeamArg::Ct => BotTeam::CounterTerrorist,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::from_env()
            .context("no --config given and RCON_* environment is incomplete")?,
    };

    info!(addr = %config.addr(), "target server");
    let client = RconClient::new(config);

    match cli.command {
        Command::Exec { command } => println!("{}", client.execute(&command.join(" ")).await),
        Command::Map { name } => println!("{}", client.change_map(&name).await),
        Command::Mode { mode_cmd, map } => {
            println!("{}", client.change_mode(&mode_cmd, map.as_deref()).await)
        }
        Command::Kick { name } => println!("{}", client.kick_player(&name).await),
        Command::BotAdd { team } => println!("{}", client.add_bot(team.into()).await),
        Command::BotKick => println!("{}", client.remove_bots().await),
        Command::Status => println!("{}", client.status().await),
        Command::Info => {
            let info = client.server_info().await;
            println!("status:\n{}\n", info.status);
            println!("sv_password: {}", info.password);
            println!("game_type:   {}", info.game_type);
            println!("game_mode:   {}", info.game_mode);
            println!("host_map:    {}", info.map);
        }
    }

    Ok(())
}
