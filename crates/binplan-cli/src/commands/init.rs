use std::path::Path;

use binplan_core::BinPlanConfig;

pub fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    let output = path.join("binplan.toml");
    if output.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", output.display());
    }

    std::fs::write(&output, BinPlanConfig::default().to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_loadable_default_config() {
        let dir = tempfile::tempdir().unwrap();

        init(dir.path(), false).unwrap();
        let config = BinPlanConfig::from_file(&dir.path().join("binplan.toml")).unwrap();
        assert_eq!(config.dispatch.max_concurrent_workers, 40);

        assert!(init(dir.path(), false).is_err());
        init(dir.path(), true).unwrap();
    }
}
