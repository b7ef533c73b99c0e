use binplan_catalog::ObjectCatalog;
use binplan_core::BinPlanConfig;
use binplan_job::{JobHandler, JobOutcome, JobRequest};
use binplan_packer::report;

use crate::source;
use crate::{JobArgs, OutputFormat};

pub async fn plan(args: &JobArgs, format: OutputFormat) -> anyhow::Result<()> {
    let (_, _, outcome) = build(args).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome.response)?);
        }
        OutputFormat::Text => {
            println!("{}", report::format_plan(&outcome.plan, &outcome.excluded));
        }
    }

    Ok(())
}

/// Load config, request and catalog, then plan the job.
pub async fn build(args: &JobArgs) -> anyhow::Result<(BinPlanConfig, JobRequest, JobOutcome)> {
    let config = source::load_config(args)?;
    let request = source::load_request(args)?;
    let catalog = source::catalog(args)?;
    let outcome = plan_with(catalog, &config, &request).await?;
    Ok((config, request, outcome))
}

async fn plan_with<C: ObjectCatalog>(
    catalog: C,
    config: &BinPlanConfig,
    request: &JobRequest,
) -> anyhow::Result<JobOutcome> {
    let handler = JobHandler::new(catalog, config.packing.clone())?;
    Ok(handler.plan(request).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_plan_from_directory_catalog() {
        let root = tempfile::tempdir().unwrap();
        let bucket = root.path().join("corpus");
        std::fs::create_dir(&bucket).unwrap();
        std::fs::write(bucket.join("a"), vec![0u8; 100]).unwrap();
        std::fs::write(bucket.join("b"), vec![0u8; 100]).unwrap();
        std::fs::write(bucket.join("c"), vec![0u8; 40]).unwrap();
        let config_path = root.path().join("binplan.toml");
        std::fs::write(
            &config_path,
            "[packing]\ndesired_capacity = 150\nmax_object_size = 256\n",
        )
        .unwrap();

        let args = JobArgs {
            request: None,
            bucket: Some("corpus".into()),
            credential_ref: Some("role".into()),
            keys: Vec::new(),
            manifest: None,
            root: Some(root.path().to_path_buf()),
            config: Some(config_path),
        };

        let (_, _, outcome) = build(&args).await.unwrap();
        let totals: Vec<u64> = outcome.response.bins.iter().map(|b| b.total).collect();
        assert_eq!(totals, vec![140, 100]);
    }
}
