use clap::{Parser, Subcommand};
use emby302_core::modules::config::DEFAULT_CONFIG_PATH;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "emby302",
    about = "emby302 - 302 redirect front proxy for Emby",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, env = "EMBY302_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[arg(
        short,
        long,
        global = true,
        env = "EMBY302_PORT",
        value_parser = clap::value_parser!(u16).range(1..),
        help = "Override server.port from the config file"
    )]
    pub port: Option<u16>,

    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the proxy server (default if no command specified)")]
    Serve,

    #[command(subcommand, about = "Inspect the configuration file")]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show the effective configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Validate the configuration file and exit")]
    Check,
}
