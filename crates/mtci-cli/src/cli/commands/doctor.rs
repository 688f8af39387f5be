use super::super::args::DoctorArgs;
use crate::exit_codes::{CONFIG_ERROR, SUCCESS};
use mtci_core::config::{load_config, Config, ModelConfig};
use mtci_core::dataset::load_jsonl;
use mtci_core::providers::model::{EndpointModel, LocalModel, Model};
use mtci_core::registry::MrRegistry;
use mtci_relations::builtin_registry;

pub async fn run(args: DoctorArgs) -> anyhow::Result<i32> {
    let cfg = match load_config(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(CONFIG_ERROR);
        }
    };

    if let Err(msg) = check_relations(&cfg, &builtin_registry()) {
        eprintln!("{}", msg);
        return Ok(CONFIG_ERROR);
    }
    println!("Config validation: ok");

    match load_jsonl(&cfg.dataset.path, &cfg.dataset.jsonl_field) {
        Ok(inputs) => println!("Dataset: ok ({} examples)", inputs.len()),
        Err(e) => {
            eprintln!("{}", e);
            return Ok(CONFIG_ERROR);
        }
    }

    match &cfg.model {
        ModelConfig::Local(local) => match LocalModel::from_config(local) {
            Ok(m) => println!("Model: ok (local {})", m.entrypoint()),
            Err(e) => {
                eprintln!("{}", e);
                return Ok(CONFIG_ERROR);
            }
        },
        ModelConfig::Endpoint(ep) => {
            if let Err(e) = check_endpoint(ep).await {
                eprintln!("Endpoint check failed: {}", e);
                return Ok(CONFIG_ERROR);
            }
            println!("Endpoint connectivity: ok");
        }
    }

    Ok(SUCCESS)
}

/// Every locator of every profile must resolve.
fn check_relations(cfg: &Config, registry: &MrRegistry) -> Result<(), String> {
    let unknown: Vec<String> = cfg
        .profiles
        .iter()
        .flat_map(|(name, p)| p.mrs.iter().map(move |m| (name, m)))
        .filter(|(_, m)| !registry.contains(m))
        .map(|(name, m)| format!("- profiles.{}.mrs: unknown relation {}", name, m))
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(format!("Config validation failed:\n{}", unknown.join("\n")))
    }
}

async fn check_endpoint(
    ep: &mtci_core::config::EndpointModelConfig,
) -> anyhow::Result<()> {
    let model = EndpointModel::from_config(ep)?;
    model.health().await?;
    model.predict(&["hello".to_string()]).await?;
    Ok(())
}
