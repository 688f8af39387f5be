use clap::{Parser, Subcommand, ValueEnum};
use mtci_core::config::DEFAULT_CONFIG_PATH;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mtci",
    version,
    about = "Budgeted metamorphic testing for model CI: pick relations, retry, classify flakes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run metamorphic testing under a profile
    Run(RunArgs),
    /// Validate config, dataset, relation locators and endpoint connectivity
    Doctor(DoctorArgs),
    /// Show persisted per-relation statistics
    Stats(StatsArgs),
    /// List built-in metamorphic relations
    Mrs,
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[arg(long, default_value = "pr-fast")]
    pub profile: String,

    /// Artifacts land in `<out>/<profile>-<timestamp>/`
    #[arg(long, default_value = "mtci_artifacts")]
    pub out: PathBuf,

    /// Directory holding `.mtci/state.json`
    #[arg(long, default_value = ".", env = "MTCI_STATE_DIR")]
    pub state_dir: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct DoctorArgs {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatsFormat {
    Text,
    Json,
}

#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    #[arg(long, default_value = ".", env = "MTCI_STATE_DIR")]
    pub state_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = StatsFormat::Text)]
    pub format: StatsFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["mtci", "run"]).unwrap();
        let Command::Run(args) = cli.cmd else {
            panic!("expected run");
        };
        assert_eq!(args.config, PathBuf::from("mtci.yml"));
        assert_eq!(args.profile, "pr-fast");
        assert_eq!(args.out, PathBuf::from("mtci_artifacts"));
    }

    #[test]
    fn test_stats_format() {
        let cli = Cli::try_parse_from(["mtci", "stats", "--format", "json"]).unwrap();
        let Command::Stats(args) = cli.cmd else {
            panic!("expected stats");
        };
        assert_eq!(args.format, StatsFormat::Json);
        assert!(Cli::try_parse_from(["mtci", "stats", "--format", "xml"]).is_err());
    }
}
