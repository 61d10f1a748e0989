use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Chat with historical figures")]
pub struct Cli {
    #[arg(long, default_value_t = 8000)]
    pub port: u16,
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,
    /// Directory holding the chat UI served at `/`
    #[arg(long, default_value = "static")]
    pub dist_dir: PathBuf,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Insert or refresh the built-in characters
    Seed,
    /// Fill in characters from the encyclopedia and the language model
    Populate {
        #[arg(required = true)]
        names: Vec<String>,
    },
}
