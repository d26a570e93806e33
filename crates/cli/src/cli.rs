//! CLI argument definitions using clap.

use clap::{Parser, ValueEnum};
use observability::ObservabilityConfig;
use std::path::PathBuf;

/// target-rest - Singer target delivering records to a REST API
#[derive(Parser, Debug)]
#[command(
    name = "target-rest",
    author,
    version,
    about = "Singer target that POSTs validated records to a REST endpoint",
    long_about = "Reads Singer messages (SCHEMA, RECORD, STATE, ACTIVATE_VERSION) from stdin,\n\
                  validates every record against the latest schema of its stream, POSTs\n\
                  records individually or in batches to `api_url`, and prints the last\n\
                  state on stdout when the input ends."
)]
pub struct Cli {
    /// Path to configuration file (JSON, or TOML by extension)
    #[arg(short, long, env = "TARGET_REST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, env = "TARGET_REST_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format (logs always go to stderr)
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        env = "TARGET_REST_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Log payloads instead of POSTing them
    #[arg(long, env = "TARGET_REST_DRY_RUN")]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "TARGET_REST_METRICS_PORT")]
    pub metrics_port: u16,
}

impl Cli {
    /// Logging and metrics settings derived from the flags
    pub fn observability_config(&self) -> ObservabilityConfig {
        ObservabilityConfig {
            log_format: self.log_format.into(),
            metrics_port: (self.metrics_port != 0).then_some(self.metrics_port),
            default_log_level: ObservabilityConfig::level_for_verbosity(self.verbose, self.quiet)
                .to_string(),
            ignore_env_filter: self.quiet,
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["target-rest"]).unwrap();
        assert_eq!(cli.config, None);
        assert_eq!(cli.log_format, LogFormat::Compact);
        assert!(!cli.dry_run);

        let config = cli.observability_config();
        assert_eq!(config.metrics_port, None);
        assert_eq!(config.default_log_level, "info");
    }

    #[test]
    fn test_config_and_verbosity() {
        let cli = Cli::try_parse_from(["target-rest", "-c", "config.json", "-vv", "--metrics-port", "9100"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("config.json")));

        let config = cli.observability_config();
        assert_eq!(config.default_log_level, "trace");
        assert_eq!(config.metrics_port, Some(9100));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["target-rest", "-q", "-v"]).is_err());

        let cli = Cli::try_parse_from(["target-rest", "--quiet", "--log-format", "json"]).unwrap();
        let config = cli.observability_config();
        assert_eq!(config.default_log_level, "warn");
        assert!(config.ignore_env_filter);
        assert_eq!(config.log_format, observability::LogFormat::Json);
    }
}
