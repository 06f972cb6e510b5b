//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// turnero - appointment booking on Google Calendar
#[derive(Debug, Parser)]
#[command(name = "turnero")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "TURNERO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the command to run, `serve` when none was given.
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            host: None,
            port: None,
        })
    }
}

/// Available commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Authorize if needed, then serve the booking site
    Serve {
        /// Address to listen on (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Authorize calendar access and save the token, then exit
    Auth {
        /// Authorize again even if a token is stored
        #[arg(long, short)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["turnero"]).unwrap();
        assert_eq!(
            cli.command_or_default(),
            Command::Serve {
                host: None,
                port: None
            }
        );
        assert!(!cli.debug);
    }

    #[test]
    fn serve_overrides() {
        let cli = Cli::try_parse_from(["turnero", "serve", "--host", "0.0.0.0", "-p", "9000"])
            .unwrap();
        assert_eq!(
            cli.command_or_default(),
            Command::Serve {
                host: Some("0.0.0.0".to_string()),
                port: Some(9000)
            }
        );
    }

    #[test]
    fn auth_force() {
        let cli = Cli::try_parse_from(["turnero", "--debug", "auth", "--force"]).unwrap();
        assert_eq!(cli.command_or_default(), Command::Auth { force: true });
        assert!(cli.debug);
    }

    #[test]
    fn config_flag() {
        let cli = Cli::try_parse_from(["turnero", "--config", "/etc/turnero.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/turnero.toml")));
    }
}
