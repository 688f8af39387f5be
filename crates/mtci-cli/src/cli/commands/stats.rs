use super::super::args::{StatsArgs, StatsFormat};
use crate::exit_codes::{INFRA_ERROR, SUCCESS};
use mtci_core::state::{StatsMap, StatsStore};

pub fn run(args: StatsArgs) -> anyhow::Result<i32> {
    let mut store = StatsStore::new(&args.state_dir);
    let stats = match store.load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(INFRA_ERROR);
        }
    };

    match args.format {
        StatsFormat::Json => println!("{}", serde_json::to_string_pretty(stats)?),
        StatsFormat::Text => {
            for line in format_text(stats) {
                println!("{}", line);
            }
        }
    }
    Ok(SUCCESS)
}

fn format_text(stats: &StatsMap) -> Vec<String> {
    if stats.is_empty() {
        return vec!["No statistics recorded yet.".to_string()];
    }
    let mut lines = vec![format!(
        "{:<32} {:>6} {:>6} {:>6} {:>10}",
        "relation", "runs", "fails", "flaky", "median_s"
    )];
    for (name, s) in stats {
        lines.push(format!(
            "{:<32} {:>6} {:>6} {:>6} {:>10.3}",
            name, s.runs, s.fails, s.flaky_count, s.median_runtime_s
        ));
    }
    lines
}
