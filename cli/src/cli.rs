use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "fieldcheck")]
#[command(
    author,
    version,
    about = "Smoke checks for the mobile UI and pet-store API test harness"
)]
pub struct Cli {
    /// Configuration file path (defaults to fieldcheck.toml)
    #[clap(short, long, global = true, default_value = "fieldcheck.toml")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[clap(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[clap(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the error category and description for an HTTP status code
    Classify {
        /// HTTP status code to classify
        status: u16,
    },

    /// Fetch a pet by id and report how the response classifies
    ProbePet {
        /// Pet id to request
        id: i64,
    },

    /// Open a device session, save a screenshot and close the session
    Screenshot {
        /// Label used in the screenshot file name
        label: String,

        /// Directory screenshots are written to
        #[clap(long, default_value = "screenshots")]
        dir: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Text,

    /// One JSON object per event
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fieldcheck",
            "probe-pet",
            "42",
            "--config",
            "ci.toml",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.config, "ci.toml");
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Commands::ProbePet { id: 42 }));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["fieldcheck", "screenshot", "home"]).unwrap();

        assert_eq!(cli.config, "fieldcheck.toml");
        assert_eq!(cli.log_level, "info");
        match cli.command {
            Commands::Screenshot { label, dir } => {
                assert_eq!(label, "home");
                assert_eq!(dir, "screenshots");
            }
            _ => panic!("expected screenshot command"),
        }
    }

    #[test]
    fn test_status_must_be_numeric() {
        assert!(Cli::try_parse_from(["fieldcheck", "classify", "teapot"]).is_err());
    }
}
