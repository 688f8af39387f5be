use crate::exit_codes::SUCCESS;
use mtci_relations::builtin_registry;

pub fn run() -> anyhow::Result<i32> {
    for info in builtin_registry().list() {
        let endpoint = if info.requires_endpoint {
            " [endpoint only]"
        } else {
            ""
        };
        println!("{}{}", info.name, endpoint);
        if !info.description.is_empty() {
            println!("    {}", info.description);
        }
        for alias in &info.aliases {
            println!("    locator: {}", alias);
        }
    }
    Ok(SUCCESS)
}
