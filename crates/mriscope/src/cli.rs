use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use crate::backend::AuthForm;
use crate::config::Config;

#[derive(Parser)]
#[command(name = "mriscope")]
#[command(author, version, about)]
#[command(long_about = "Desktop front-end for an MRI tumor classifier service.\n\n\
    Pick a brain MRI slice, send it to the classifier and read about the result.\n\n\
    Examples:\n  \
    mriscope                              Open the page (maximized)\n  \
    mriscope --windowed                   Open the page in a window\n  \
    mriscope classify scan.png --info     Classify from the terminal\n  \
    mriscope config set ui.parallax compounding")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Classifier service base URL (overrides server.base_url)
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Launch in a window instead of maximized
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify an MRI image without opening the page
    Classify {
        /// Image to upload
        file: PathBuf,

        /// Also fetch the description of the predicted tumor type
        #[arg(long)]
        info: bool,
    },

    /// Create an account on the classifier service
    Signup {
        /// Username (prompted when omitted)
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Log in to the classifier service
    Login {
        /// Username (prompted when omitted)
        #[arg(short, long)]
        username: Option<String>,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. server.base_url, ui.parallax, ui.theme)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Tracing filter implied by `-v`/`-q` when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        let mut settings = Config::load_or_default().settings();
        if let Some(server) = self.server {
            settings.base_url = server.trim_end_matches('/').to_string();
        }

        match self.command {
            Some(Commands::Classify { file, info }) => {
                crate::commands::classify::run(&settings, &file, info, self.quiet)
            }
            Some(Commands::Signup { username }) => {
                crate::commands::auth::run(&settings, AuthForm::Signup, username, self.quiet)
            }
            Some(Commands::Login { username }) => {
                crate::commands::auth::run(&settings, AuthForm::Login, username, self.quiet)
            }
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!(
                    "{} {}",
                    "mriscope".bold(),
                    env!("CARGO_PKG_VERSION").cyan()
                );
                Ok(())
            }
            None => crate::app::run(settings, self.windowed),
        }
    }
}
