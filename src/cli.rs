//! CLI command definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// designcoach - guided conversations for learning design
#[derive(Debug, Parser)]
#[command(
    name = "dc",
    about = "Guided-conversation tool for building learning designs",
    version,
    after_help = "Logs are written to: ~/.local/share/designcoach/logs/designcoach.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive design conversation (the default)
    Chat {
        /// Opening message to send before the prompt appears
        message: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_args_defaults_to_chat() {
        let cli = Cli::parse_from(["dc"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_chat_with_message() {
        let cli = Cli::parse_from(["dc", "chat", "Jag vill skapa en CRM-utbildning"]);
        match cli.command {
            Some(Command::Chat { message }) => {
                assert_eq!(message.as_deref(), Some("Jag vill skapa en CRM-utbildning"));
            }
            _ => panic!("Expected chat command"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::parse_from(["dc", "--verbose", "--config", "my.yml", "chat"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("my.yml")));
    }
}
