//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use promo_planner::Region;

/// Plan duty-free promotions for one region and month.
///
/// Fetches the month's promotion intelligence from the configured webhook
/// (or reads it from a file) and prints trends, holidays, top search
/// keywords and theme product picks.
#[derive(Parser, Debug)]
#[command(name = "promo-planner")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Target month, e.g. "2025-12" or "12월" (defaults to the current month)
    #[arg(short, long)]
    pub month: Option<String>,

    /// Region to report on
    #[arg(long, value_enum, ignore_case = true)]
    pub region: Option<Region>,

    /// Read the payload from a file ('-' for stdin) instead of the webhook
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Webhook URL (overrides N8N_WEBHOOK_URL and the config file)
    #[arg(long, value_name = "URL")]
    pub webhook: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also print the raw flattened payload
    #[arg(long)]
    pub raw: bool,

    /// Maximum retry attempts for transient webhook failures (0-10)
    #[arg(short = 'r', long, value_parser = clap::value_parser!(u8).range(0..=10))]
    pub max_retries: Option<u8>,
}

/// How the report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["promo-planner"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(args.month.is_none());
        assert!(args.region.is_none());
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.raw);
        assert!(args.max_retries.is_none());
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["promo-planner", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_region_values() {
        let args = Args::try_parse_from(["promo-planner", "--region", "SEA"]).unwrap();
        assert_eq!(args.region, Some(Region::Sea));

        let args = Args::try_parse_from(["promo-planner", "--region", "jp"]).unwrap();
        assert_eq!(args.region, Some(Region::Jp));

        let err = Args::try_parse_from(["promo-planner", "--region", "EU"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_cli_month_and_input() {
        let args =
            Args::try_parse_from(["promo-planner", "-m", "12월", "-i", "-", "-f", "json"]).unwrap();
        assert_eq!(args.month.as_deref(), Some("12월"));
        assert_eq!(args.input, Some(PathBuf::from("-")));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_max_retries_range() {
        let args = Args::try_parse_from(["promo-planner", "-r", "0"]).unwrap();
        assert_eq!(args.max_retries, Some(0));

        let args = Args::try_parse_from(["promo-planner", "--max-retries", "10"]).unwrap();
        assert_eq!(args.max_retries, Some(10));

        let err = Args::try_parse_from(["promo-planner", "-r", "11"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["promo-planner", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Args::try_parse_from(["promo-planner", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
