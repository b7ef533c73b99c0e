//! Job handler — validate, fetch, filter, pack.

use tracing::info;

use binplan_catalog::ObjectCatalog;
use binplan_core::{ExcludedObject, PackingConfig};
use binplan_packer::{BinPlan, FirstFitAllocator, SizeFilter};

use crate::error::JobResult;
use crate::request::{JobRequest, JobResponse};

/// Everything one successful job produced.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub plan: BinPlan,
    pub excluded: Vec<ExcludedObject>,
    pub response: JobResponse,
}

/// Runs packing jobs against a catalog with a fixed packing config.
pub struct JobHandler<C> {
    catalog: C,
    config: PackingConfig,
    filter: SizeFilter,
}

impl<C: ObjectCatalog> JobHandler<C> {
    pub fn new(catalog: C, config: PackingConfig) -> JobResult<Self> {
        config.validate()?;
        let filter = SizeFilter::from_config(&config);
        Ok(Self {
            catalog,
            config,
            filter,
        })
    }

    pub fn config(&self) -> &PackingConfig {
        &self.config
    }

    /// Build the bin plan for `request`.
    ///
    /// Validation happens before the catalog is touched. Fetch and filter
    /// failures abort the job.
    pub async fn plan(&self, request: &JobRequest) -> JobResult<JobOutcome> {
        request.validate()?;

        let objects = self
            .catalog
            .list_objects(&request.bucket_identifier, request.explicit_keys.as_deref())
            .await?;
        info!(
            bucket = %request.bucket_identifier,
            objects = objects.len(),
            explicit_keys = request.explicit_keys.is_some(),
            "objects fetched"
        );

        let filtered = self.filter.apply(objects)?;

        let mut allocator = FirstFitAllocator::from_config(&self.config);
        for object in filtered.eligible {
            allocator.push(object);
        }
        let plan = allocator.finish();

        for (i, bin) in plan.bins().iter().enumerate() {
            info!(bin = i, objects = bin.len(), total = bin.total(), "bin planned");
        }

        let response = JobResponse::new(request, &plan, filtered.excluded.len());
        Ok(JobOutcome {
            plan,
            excluded: filtered.excluded,
            response,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use binplan_catalog::{FetchError, FetchResult, InMemoryCatalog};
    use binplan_core::{ByteSize, EmptyPolicy, OpaqueRules, StorageObject};
    use binplan_packer::FilterError;

    use crate::error::JobError;

    fn config(empty_result: EmptyPolicy) -> PackingConfig {
        PackingConfig {
            desired_capacity: ByteSize(150),
            max_object_size: ByteSize(256),
            ceiling_tolerance: None,
            empty_result,
        }
    }

    fn handler(sizes: &[u64], empty_result: EmptyPolicy) -> JobHandler<InMemoryCatalog> {
        let objects = sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| StorageObject::new(format!("obj-{i}"), size))
            .collect();
        let catalog = InMemoryCatalog::new().with_bucket("corpus", objects);
        JobHandler::new(catalog, config(empty_result)).unwrap()
    }

    fn request() -> JobRequest {
        JobRequest {
            bucket_identifier: "corpus".into(),
            explicit_keys: None,
            access_credential_ref: "role/reader".into(),
            rules: OpaqueRules::new(vec![vec![serde_json::json!("keep")]]),
        }
    }

    fn bin_sizes(outcome: &JobOutcome) -> Vec<Vec<u64>> {
        outcome
            .response
            .bins
            .iter()
            .map(|b| b.items.iter().map(|o| o.size).collect())
            .collect()
    }

    #[tokio::test]
    async fn three_hundreds_make_three_bins() {
        let outcome = handler(&[100, 100, 100], EmptyPolicy::Fail)
            .plan(&request())
            .await
            .unwrap();
        assert_eq!(bin_sizes(&outcome), vec![vec![100], vec![100], vec![100]]);
        assert_eq!(outcome.response.total_bins, 3);
        assert_eq!(outcome.response.total_items, 3);
    }

    #[tokio::test]
    async fn three_fifties_share_a_bin() {
        let outcome = handler(&[50, 50, 50], EmptyPolicy::Fail)
            .plan(&request())
            .await
            .unwrap();
        assert_eq!(bin_sizes(&outcome), vec![vec![50, 50, 50]]);
        assert_eq!(outcome.response.bins[0].total, 150);
    }

    #[tokio::test]
    async fn arrival_order_is_respected() {
        let outcome = handler(&[50, 100, 40], EmptyPolicy::Fail)
            .plan(&request())
            .await
            .unwrap();
        assert_eq!(bin_sizes(&outcome), vec![vec![50, 100], vec![40]]);
        let totals: Vec<u64> = outcome.response.bins.iter().map(|b| b.total).collect();
        assert_eq!(totals, vec![150, 40]);
    }

    #[tokio::test]
    async fn only_oversized_object_fails_job() {
        let err = handler(&[300], EmptyPolicy::Fail)
            .plan(&request())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            JobError::NoEligibleItems(FilterError::NoEligibleItems { excluded: 1, .. })
        ));
    }

    #[tokio::test]
    async fn object_between_capacity_and_ceiling_gets_own_bin() {
        let outcome = handler(&[200], EmptyPolicy::Fail)
            .plan(&request())
            .await
            .unwrap();
        assert_eq!(bin_sizes(&outcome), vec![vec![200]]);
        assert_eq!(outcome.plan.summary().oversized_bins, 1);
    }

    #[tokio::test]
    async fn empty_catalog_fails_by_default() {
        let err = handler(&[], EmptyPolicy::Fail)
            .plan(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, JobError::NoEligibleItems(_)));
    }

    #[tokio::test]
    async fn empty_result_succeeds_when_allowed() {
        let outcome = handler(&[300], EmptyPolicy::Allow)
            .plan(&request())
            .await
            .unwrap();
        assert!(outcome.plan.is_empty());
        assert_eq!(outcome.response.total_bins, 0);
        assert_eq!(outcome.response.excluded_items, 1);
        assert_eq!(outcome.excluded[0].id, "obj-0");

        let outcome = handler(&[], EmptyPolicy::Allow)
            .plan(&request())
            .await
            .unwrap();
        assert!(outcome.response.bins.is_empty());
    }

    #[tokio::test]
    async fn response_echoes_request_fields() {
        let req = request();
        let outcome = handler(&[10, 300], EmptyPolicy::Fail).plan(&req).await.unwrap();

        assert_eq!(outcome.response.bucket_identifier, "corpus");
        assert_eq!(outcome.response.access_credential_ref, "role/reader");
        assert_eq!(outcome.response.rules, req.rules);
        assert_eq!(outcome.response.excluded_items, 1);
        assert_eq!(outcome.response.total_items, 1);
    }

    #[tokio::test]
    async fn explicit_keys_limit_the_job() {
        let mut req = request();
        req.explicit_keys = Some(vec!["obj-2".into(), "obj-0".into()]);

        let outcome = handler(&[10, 20, 30], EmptyPolicy::Fail).plan(&req).await.unwrap();
        let ids: Vec<&str> = outcome.response.bins[0]
            .items
            .iter()
            .map(|o| o.id.as_str())
            .collect();
        assert_eq!(ids, vec!["obj-2", "obj-0"]);
    }

    #[tokio::test]
    async fn fetch_failure_aborts() {
        let mut req = request();
        req.bucket_identifier = "other".into();

        let err = handler(&[10], EmptyPolicy::Fail).plan(&req).await.unwrap_err();
        assert!(matches!(err, JobError::Fetch(FetchError::BucketNotFound(_))));
    }

    struct CountingCatalog {
        calls: AtomicUsize,
    }

    impl ObjectCatalog for CountingCatalog {
        async fn list_objects(
            &self,
            _bucket: &str,
            _keys: Option<&[String]>,
        ) -> FetchResult<Vec<StorageObject>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![StorageObject::new("a", 1)])
        }
    }

    #[tokio::test]
    async fn validation_happens_before_fetch() {
        let catalog = CountingCatalog {
            calls: AtomicUsize::new(0),
        };
        let handler = JobHandler::new(catalog, config(EmptyPolicy::Fail)).unwrap();
        let mut req = request();
        req.access_credential_ref = String::new();

        let err = handler.plan(&req).await.unwrap_err();
        assert!(matches!(err, JobError::Validation(_)));
        assert_eq!(handler.catalog.calls.load(Ordering::SeqCst), 0);

        handler.plan(&request()).await.unwrap();
        assert_eq!(handler.catalog.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalid_config_rejected() {
        let mut bad = config(EmptyPolicy::Fail);
        bad.desired_capacity = ByteSize(0);
        let err = JobHandler::new(InMemoryCatalog::new(), bad).err().unwrap();
        assert!(matches!(err, JobError::Config(_)));
    }
}
