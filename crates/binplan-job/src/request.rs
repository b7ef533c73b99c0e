//! Job request and response documents.

use serde::{Deserialize, Serialize};

use binplan_core::{OpaqueRules, StorageObject};
use binplan_dispatch::DispatchContext;
use binplan_packer::{Bin, BinPlan};

use crate::error::{JobError, JobResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    pub bucket_identifier: String,
    /// Restrict the job to these keys. Absent means enumerate the bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_keys: Option<Vec<String>>,
    pub access_credential_ref: String,
    #[serde(default)]
    pub rules: OpaqueRules,
}

impl JobRequest {
    pub fn validate(&self) -> JobResult<()> {
        if self.bucket_identifier.trim().is_empty() {
            return Err(JobError::Validation("bucket_identifier is required".into()));
        }
        if self.access_credential_ref.trim().is_empty() {
            return Err(JobError::Validation(
                "access_credential_ref is required".into(),
            ));
        }
        if self.explicit_keys.as_ref().is_some_and(Vec::is_empty) {
            return Err(JobError::Validation(
                "explicit_keys must not be empty when present".into(),
            ));
        }
        Ok(())
    }

    /// Pass-through data for workers.
    pub fn dispatch_context(&self) -> DispatchContext {
        DispatchContext {
            bucket_identifier: self.bucket_identifier.clone(),
            access_credential_ref: self.access_credential_ref.clone(),
            rules: self.rules.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBin {
    pub items: Vec<StorageObject>,
    pub total: u64,
}

impl From<&Bin> for ResponseBin {
    fn from(bin: &Bin) -> Self {
        Self {
            items: bin.objects().to_vec(),
            total: bin.total(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResponse {
    pub bins: Vec<ResponseBin>,
    pub total_bins: usize,
    /// Objects placed in bins.
    pub total_items: usize,
    /// Objects dropped by the size filter.
    pub excluded_items: usize,
    pub bucket_identifier: String,
    pub access_credential_ref: String,
    pub rules: OpaqueRules,
}

impl JobResponse {
    pub fn new(request: &JobRequest, plan: &BinPlan, excluded_items: usize) -> Self {
        let summary = plan.summary();
        Self {
            bins: plan.bins().iter().map(ResponseBin::from).collect(),
            total_bins: summary.total_bins,
            total_items: summary.total_items,
            excluded_items,
            bucket_identifier: request.bucket_identifier.clone(),
            access_credential_ref: request.access_credential_ref.clone(),
            rules: request.rules.clone(),
        }
    }
}
