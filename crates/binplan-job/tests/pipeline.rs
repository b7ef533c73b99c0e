//! End-to-end pipeline tests.
//!
//! Manifest catalog → job handler → dispatcher, with a worker that records
//! which objects it received.

use std::sync::{Arc, Mutex};

use binplan_catalog::ManifestCatalog;
use binplan_core::{ByteSize, DispatchConfig, EmptyPolicy, PackingConfig};
use binplan_dispatch::{BinJob, BinWorker, Dispatcher};
use binplan_job::{JobHandler, JobRequest};

#[derive(Default)]
struct CollectingWorker {
    received: Mutex<Vec<(usize, Vec<String>, String)>>,
}

impl BinWorker for CollectingWorker {
    async fn process(&self, job: BinJob) -> anyhow::Result<()> {
        let ids = job.bin.objects().iter().map(|o| o.id.clone()).collect();
        self.received
            .lock()
            .unwrap()
            .push((job.index, ids, job.context.bucket_identifier.clone()));
        Ok(())
    }
}

fn packing() -> PackingConfig {
    PackingConfig {
        desired_capacity: ByteSize(150),
        max_object_size: ByteSize(256),
        ceiling_tolerance: None,
        empty_result: EmptyPolicy::Fail,
    }
}

fn request() -> JobRequest {
    serde_json::from_str(
        r#"{"bucket_identifier": "corpus", "access_credential_ref": "role/reader", "rules": [["x"]]}"#,
    )
    .unwrap()
}

#[tokio::test]
async fn manifest_to_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("manifest.json");
    std::fs::write(
        &manifest,
        r#"{"corpus": [
            {"id": "a", "size": 50},
            {"id": "b", "size": 100},
            {"id": "c", "size": 40},
            {"id": "d", "size": 300},
            {"id": "e", "size": 200}
        ]}"#,
    )
    .unwrap();

    let handler = JobHandler::new(ManifestCatalog::new(manifest), packing()).unwrap();
    let req = request();
    let outcome = handler.plan(&req).await.unwrap();

    assert_eq!(outcome.response.total_bins, 3);
    assert_eq!(outcome.response.total_items, 4);
    assert_eq!(outcome.response.excluded_items, 1);
    assert_eq!(outcome.excluded[0].id, "d");

    let json = serde_json::to_value(&outcome.response).unwrap();
    assert_eq!(json["bins"][0]["total"], 150);
    assert_eq!(json["rules"], serde_json::json!([["x"]]));

    let worker = Arc::new(CollectingWorker::default());
    let dispatcher = Dispatcher::new(DispatchConfig {
        max_concurrent_workers: 2,
    })
    .unwrap();
    let report = dispatcher
        .dispatch(outcome.plan, req.dispatch_context(), Arc::clone(&worker))
        .await
        .unwrap();

    assert!(report.is_success());
    assert!(report.peak_concurrency <= 2);

    let mut received = worker.received.lock().unwrap().clone();
    received.sort();
    assert_eq!(
        received,
        vec![
            (0, vec!["a".to_string(), "b".to_string()], "corpus".to_string()),
            (1, vec!["c".to_string()], "corpus".to_string()),
            (2, vec!["e".to_string()], "corpus".to_string()),
        ]
    );
}

#[tokio::test]
async fn fetch_failure_produces_no_plan() {
    let dir = tempfile::tempdir().unwrap();
    let handler = JobHandler::new(
        ManifestCatalog::new(dir.path().join("missing.json")),
        packing(),
    )
    .unwrap();

    let err = handler.plan(&request()).await.unwrap_err();
    assert!(err.to_string().starts_with("failed to fetch objects"));
}
