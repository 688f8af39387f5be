use super::super::args::RunArgs;
use crate::exit_codes::CONFIG_ERROR;
use mtci_core::config::load_config;
use mtci_core::engine::{run_profile, SessionOptions};
use mtci_core::report::console::print_summary;
use mtci_relations::builtin_registry;
use tracing::error;

pub(crate) async fn run(args: RunArgs) -> anyhow::Result<i32> {
    let cfg = match load_config(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(CONFIG_ERROR);
        }
    };

    let registry = builtin_registry();
    let options = SessionOptions {
        profile: args.profile,
        out_root: args.out,
        state_root: args.state_dir,
    };

    match run_profile(&cfg, &registry, &options).await {
        Ok(outcome) => {
            print_summary(&outcome.report);
            println!("Artifacts: {}", outcome.out_dir.display());
            Ok(outcome.exit_code())
        }
        Err(e) => {
            error!(reason_code = e.reason_code(), "session aborted");
            eprintln!("{}", e);
            Ok(e.exit_code())
        }
    }
}
