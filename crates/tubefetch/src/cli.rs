use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tubefetch")]
#[command(author, version, about = "Telegram bot for downloading YouTube videos and MP3 audio", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (long polling). Default when no command is given.
    Run,

    /// Remove staged files older than the retention window, then exit
    Sweep,

    /// List files currently in the staging directory
    Files,

    /// Print metadata for a YouTube link without downloading it
    Info {
        /// YouTube link
        url: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_defaults_to_none() {
        let cli = Cli::try_parse_from(["tubefetch"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_info_takes_url() {
        let cli = Cli::try_parse_from(["tubefetch", "info", "https://youtu.be/dQw4w9WgXcQ"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Info {
                url: "https://youtu.be/dQw4w9WgXcQ".to_string()
            })
        );
    }

    #[test]
    fn test_info_requires_url() {
        assert!(Cli::try_parse_from(["tubefetch", "info"]).is_err());
    }
}
