use anyhow::Context;
use cadence_core::config::Config;
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let created = Config::init(root)
        .with_context(|| format!("failed to initialize {}", root.display()))?;
    if created {
        println!("Initialized cadence data root at {}", root.display());
    } else {
        println!("Already initialized at {}", root.display());
    }
    Ok(())
}
