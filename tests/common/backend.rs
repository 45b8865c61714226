use std::sync::Mutex;

use async_trait::async_trait;
use onboarding_core::model::{OnboardingRecord, RecordPatch};
use onboarding_core::submission::{
    ArchiveReceipt, ArchiveUpload, ComplianceRegistry, DocumentStore, GatewayError, Gateways,
    RecordStore, RtwLinkRequest, ScanFile, ScanStore, scan_path,
};

/// In-memory stand-in for every backend service. `stored` plays the
/// `onboarding_records` table in insertion order.
#[derive(Default)]
pub struct FakeBackend {
    pub calls: Mutex<Vec<String>>,
    pub stored: Mutex<Vec<OnboardingRecord>>,
    pub patches: Mutex<Vec<(String, RecordPatch)>>,
    pub uploads: Mutex<Vec<ArchiveUpload>>,
    pub links: Mutex<Vec<RtwLinkRequest>>,
    pub fail_scan: bool,
    pub fail_sign: bool,
    pub fail_archive: bool,
    pub fail_link: bool,
}

impl FakeBackend {
    pub fn with_records(records: Vec<OnboardingRecord>) -> Self {
        Self {
            stored: Mutex::new(records),
            ..Self::default()
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn gateways(&self) -> Gateways<'_> {
        Gateways {
            records: self,
            scans: self,
            documents: self,
            compliance: self,
        }
    }
}

#[async_trait]
impl RecordStore for FakeBackend {
    async fn fetch_all(&self) -> Result<Vec<OnboardingRecord>, GatewayError> {
        self.record("fetch_all".into());
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn fetch(&self, id: &str) -> Result<OnboardingRecord, GatewayError> {
        self.record(format!("fetch {id}"));
        self.stored
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    async fn create(&self, draft: &OnboardingRecord) -> Result<OnboardingRecord, GatewayError> {
        self.record("create".into());
        let created = OnboardingRecord {
            id: Some("rec-1".into()),
            created_at: Some("2025-03-07T14:05:09Z".into()),
            ..draft.clone()
        };
        self.stored.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &str,
        draft: &OnboardingRecord,
    ) -> Result<OnboardingRecord, GatewayError> {
        self.record(format!("update {id}"));
        Ok(OnboardingRecord {
            id: Some(id.to_string()),
            ..draft.clone()
        })
    }

    async fn patch(&self, id: &str, patch: &RecordPatch) -> Result<(), GatewayError> {
        self.record(format!("patch {id}"));
        self.patches
            .lock()
            .unwrap()
            .push((id.to_string(), patch.clone()));
        Ok(())
    }
}

#[async_trait]
impl ScanStore for FakeBackend {
    async fn upload_scan(&self, record_id: &str, scan: &ScanFile) -> Result<String, GatewayError> {
        self.record("scan".into());
        if self.fail_scan {
            return Err(GatewayError::Backend("bucket unavailable".into()));
        }
        Ok(scan_path(record_id, &scan.file_name))
    }

    async fn signed_url(&self, path: &str, ttl_secs: u64) -> Result<Option<String>, GatewayError> {
        self.record(format!("sign {path} {ttl_secs}"));
        if self.fail_sign {
            return Err(GatewayError::Backend("signing refused".into()));
        }
        Ok(Some(format!("https://scans.example/{path}?expires={ttl_secs}")))
    }
}

#[async_trait]
impl DocumentStore for FakeBackend {
    async fn upload(&self, upload: &ArchiveUpload) -> Result<ArchiveReceipt, GatewayError> {
        self.record("archive".into());
        if self.fail_archive {
            return Err(GatewayError::NotAuthenticated);
        }
        self.uploads.lock().unwrap().push(upload.clone());
        Ok(ArchiveReceipt {
            employee_folder_id: "folder-7".into(),
            web_view_link: "https://docs.example/file/7".into(),
        })
    }
}

#[async_trait]
impl ComplianceRegistry for FakeBackend {
    async fn create_linked_record(&self, request: &RtwLinkRequest) -> Result<String, GatewayError> {
        self.record("link".into());
        if self.fail_link {
            return Err(GatewayError::Backend("rtw_records insert refused".into()));
        }
        self.links.lock().unwrap().push(request.clone());
        Ok("rtw-9".into())
    }
}
