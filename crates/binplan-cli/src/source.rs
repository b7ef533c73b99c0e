//! Resolve CLI arguments into a config, a request and a catalog.

use std::path::Path;

use anyhow::Context;
use tracing::debug;

use binplan_catalog::{DirectoryCatalog, FetchResult, ManifestCatalog, ObjectCatalog};
use binplan_core::{BinPlanConfig, OpaqueRules, StorageObject};
use binplan_job::JobRequest;

use crate::JobArgs;

const DEFAULT_CONFIG_FILE: &str = "binplan.toml";

/// The catalogs selectable from the command line.
pub enum CliCatalog {
    Manifest(ManifestCatalog),
    Directory(DirectoryCatalog),
}

impl ObjectCatalog for CliCatalog {
    async fn list_objects(
        &self,
        bucket: &str,
        keys: Option<&[String]>,
    ) -> FetchResult<Vec<StorageObject>> {
        match self {
            CliCatalog::Manifest(c) => c.list_objects(bucket, keys).await,
            CliCatalog::Directory(c) => c.list_objects(bucket, keys).await,
        }
    }
}

pub fn load_config(args: &JobArgs) -> anyhow::Result<BinPlanConfig> {
    match &args.config {
        Some(path) => Ok(BinPlanConfig::from_file(path)?),
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            debug!(path = DEFAULT_CONFIG_FILE, "using config from working directory");
            Ok(BinPlanConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?)
        }
        None => Ok(BinPlanConfig::default()),
    }
}

pub fn load_request(args: &JobArgs) -> anyhow::Result<JobRequest> {
    if let Some(path) = &args.request {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request {}", path.display()))?;
        return serde_json::from_str(&content)
            .with_context(|| format!("failed to parse request {}", path.display()));
    }

    Ok(JobRequest {
        bucket_identifier: args.bucket.clone().unwrap_or_default(),
        explicit_keys: (!args.keys.is_empty()).then(|| args.keys.clone()),
        access_credential_ref: args.credential_ref.clone().unwrap_or_default(),
        rules: OpaqueRules::default(),
    })
}

pub fn catalog(args: &JobArgs) -> anyhow::Result<CliCatalog> {
    match (&args.manifest, &args.root) {
        (Some(manifest), _) => Ok(CliCatalog::Manifest(ManifestCatalog::new(manifest.clone()))),
        (None, Some(root)) => Ok(CliCatalog::Directory(DirectoryCatalog::new(root.clone()))),
        (None, None) => anyhow::bail!("one of --manifest or --root is required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> JobArgs {
        JobArgs {
            request: None,
            bucket: Some("corpus".into()),
            credential_ref: Some("role".into()),
            keys: Vec::new(),
            manifest: None,
            root: None,
            config: None,
        }
    }

    #[test]
    fn request_from_flags() {
        let mut a = args();
        a.keys = vec!["x".into()];

        let req = load_request(&a).unwrap();
        assert_eq!(req.bucket_identifier, "corpus");
        assert_eq!(req.explicit_keys, Some(vec!["x".to_string()]));
        assert!(req.rules.is_empty());
    }

    #[test]
    fn request_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("req.json");
        std::fs::write(
            &path,
            r#"{"bucket_identifier": "b", "access_credential_ref": "r", "rules": [[1, "x"]]}"#,
        )
        .unwrap();
        let mut a = args();
        a.request = Some(path);

        let req = load_request(&a).unwrap();
        assert_eq!(req.bucket_identifier, "b");
        assert_eq!(req.rules.len(), 1);
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[dispatch]\nmax_concurrent_workers = 3\n").unwrap();
        let mut a = args();
        a.config = Some(path);

        let config = load_config(&a).unwrap();
        assert_eq!(config.dispatch.max_concurrent_workers, 3);
    }

    #[test]
    fn catalog_requires_a_source() {
        assert!(catalog(&args()).is_err());

        let mut a = args();
        a.root = Some("/tmp".into());
        assert!(matches!(catalog(&a).unwrap(), CliCatalog::Directory(_)));
    }
}
