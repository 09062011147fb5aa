mod app;
mod auth;
mod backend;
mod cli;
mod commands;
mod config;
mod content;
mod error;
mod info;
mod messages;
mod navbar;
mod page;
mod parallax;
mod preview;
mod scroll;
mod slider;
mod surface;
mod theme;
mod upload;
mod view;
mod worker;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = cli::Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli.run() {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}
