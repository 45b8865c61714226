//! Saving a new-starter form: the record itself, its paper scan, and on first
//! creation the archived PDF and the linked right-to-work (RTW) record.
//!
//! Saving the record and the scan must succeed. Archiving and RTW linking
//! are best effort: a failure is logged and reported but the submission
//! still succeeds.

use async_trait::async_trait;
use base64::Engine;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::forms::{PDF_MIME, filled_document_filename, generate_filled_document_bytes_at};
use crate::model::{OnboardingRecord, OnboardingStatus, RecordPatch};
use crate::validation::{FieldError, validate_onboarding};

pub const MAX_SCAN_BYTES: usize = 10 * 1024 * 1024;
pub const SCAN_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", PDF_MIME];
pub const ARCHIVE_SUBFOLDER: &str = "Onboarding";
pub const SOURCE_APP: &str = "onboarding";

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("record {0} not found")]
    NotFound(String),
    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("File is too large. Maximum size is 10 MB.")]
    TooLarge { size: usize },
    #[error("Invalid file type. Please upload JPEG, PNG or PDF.")]
    UnsupportedType(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(Vec<FieldError>),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// A scanned copy of the paper form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ScanFile {
    pub fn check(&self) -> Result<(), ScanError> {
        if self.bytes.len() > MAX_SCAN_BYTES {
            return Err(ScanError::TooLarge {
                size: self.bytes.len(),
            });
        }
        if !SCAN_MIME_TYPES.contains(&self.mime_type.as_str()) {
            return Err(ScanError::UnsupportedType(self.mime_type.clone()));
        }
        Ok(())
    }
}

/// Storage key of a scan: one folder per record.
pub fn scan_path(record_id: &str, file_name: &str) -> String {
    format!("{record_id}/{file_name}")
}

/// Request body of the document-store upload proxy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArchiveUpload {
    pub employee_name: String,
    pub file_name: String,
    pub file_base64: String,
    pub mime_type: String,
    pub subfolder: String,
    pub source_app: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ArchiveReceipt {
    pub employee_folder_id: String,
    pub web_view_link: String,
}

/// Partial RTW record pointing back at the onboarding record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RtwLinkRequest {
    pub person_name: String,
    pub date_of_birth: Option<String>,
    pub onboarding_id: String,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record, newest first.
    async fn fetch_all(&self) -> Result<Vec<OnboardingRecord>, GatewayError>;
    async fn fetch(&self, id: &str) -> Result<OnboardingRecord, GatewayError>;
    async fn create(&self, draft: &OnboardingRecord) -> Result<OnboardingRecord, GatewayError>;
    async fn update(
        &self,
        id: &str,
        draft: &OnboardingRecord,
    ) -> Result<OnboardingRecord, GatewayError>;
    async fn patch(&self, id: &str, patch: &RecordPatch) -> Result<(), GatewayError>;
}

#[async_trait]
pub trait ScanStore: Send + Sync {
    /// Stores the scan (overwriting any previous one) and returns its path.
    async fn upload_scan(&self, record_id: &str, scan: &ScanFile) -> Result<String, GatewayError>;
    /// Link to the scan at `path`, valid for `ttl_secs`.
    async fn signed_url(&self, path: &str, ttl_secs: u64) -> Result<Option<String>, GatewayError>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn upload(&self, upload: &ArchiveUpload) -> Result<ArchiveReceipt, GatewayError>;
}

#[async_trait]
pub trait ComplianceRegistry: Send + Sync {
    /// Returns the id of the new RTW record.
    async fn create_linked_record(&self, request: &RtwLinkRequest) -> Result<String, GatewayError>;
}

/// Backend services a submission talks to.
#[derive(Clone, Copy)]
pub struct Gateways<'a> {
    pub records: &'a dyn RecordStore,
    pub scans: &'a dyn ScanStore,
    pub documents: &'a dyn DocumentStore,
    pub compliance: &'a dyn ComplianceRegistry,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Submission {
    pub draft: OnboardingRecord,
    pub scan: Option<ScanFile>,
    /// Set when editing an existing record.
    pub edit_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepStatus {
    Skipped,
    Done,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmitReport {
    /// The saved record with every applied patch.
    pub record: OnboardingRecord,
    pub record_id: String,
    pub created: bool,
    pub scan_uploaded: bool,
    pub archive: StepStatus,
    pub compliance_link: StepStatus,
}

impl SubmitReport {
    /// Where the portal goes once the submission is done.
    pub fn detail_path(&self) -> String {
        format!("/onboarding/{}", self.record_id)
    }
}

#[derive(Debug, thiserror::Error)]
enum ArchiveError {
    #[error("PDF generation failed: {0}")]
    Render(#[from] crate::Error),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub async fn submit(
    gateways: Gateways<'_>,
    submission: &Submission,
    settings: &Settings,
    now: NaiveDateTime,
) -> Result<SubmitReport, SubmitError> {
    let draft = &submission.draft;
    let errors = validate_onboarding(draft);
    if !errors.is_empty() {
        return Err(SubmitError::Invalid(errors));
    }
    if let Some(scan) = &submission.scan {
        scan.check()?;
    }

    let mut record = match &submission.edit_id {
        Some(id) => gateways.records.update(id, draft).await?,
        None => gateways.records.create(draft).await?,
    };
    let record_id = record
        .id
        .clone()
        .or_else(|| submission.edit_id.clone())
        .ok_or_else(|| GatewayError::Backend("saved record has no id".to_string()))?;
    let created = submission.edit_id.is_none();
    log::info!(
        "{} onboarding record {record_id}",
        if created { "Created" } else { "Updated" }
    );

    let mut scan_uploaded = false;
    if let Some(scan) = &submission.scan {
        let path = gateways.scans.upload_scan(&record_id, scan).await?;
        let patch = RecordPatch {
            paper_scan_path: Some(path),
            paper_scan_filename: Some(scan.file_name.clone()),
            ..RecordPatch::default()
        };
        gateways.records.patch(&record_id, &patch).await?;
        patch.apply(&mut record);
        scan_uploaded = true;
    }

    let mut archive = StepStatus::Skipped;
    let mut compliance_link = StepStatus::Skipped;
    if created {
        archive = match archive_pdf(gateways, &record, &record_id, draft, settings, now).await {
            Ok(patch) => {
                patch.apply(&mut record);
                StepStatus::Done
            }
            Err(e) => {
                log::error!("Document-store archive failed (non-blocking): {e}");
                StepStatus::Failed(e.to_string())
            }
        };

        compliance_link = match link_rtw_record(gateways, &record_id, draft).await {
            Ok(patch) => {
                patch.apply(&mut record);
                StepStatus::Done
            }
            Err(e) => {
                log::error!("RTW record creation failed (non-blocking): {e}");
                StepStatus::Failed(e.to_string())
            }
        };
    }

    Ok(SubmitReport {
        record,
        record_id,
        created,
        scan_uploaded,
        archive,
        compliance_link,
    })
}

async fn archive_pdf(
    gateways: Gateways<'_>,
    record: &OnboardingRecord,
    record_id: &str,
    draft: &OnboardingRecord,
    settings: &Settings,
    now: NaiveDateTime,
) -> Result<RecordPatch, ArchiveError> {
    let bytes = generate_filled_document_bytes_at(record, settings, now)?;
    let upload = ArchiveUpload {
        employee_name: draft.full_name.clone(),
        file_name: filled_document_filename(&draft.full_name, now.date()),
        file_base64: base64::engine::general_purpose::STANDARD.encode(&bytes),
        mime_type: PDF_MIME.to_string(),
        subfolder: ARCHIVE_SUBFOLDER.to_string(),
        source_app: SOURCE_APP.to_string(),
    };
    let receipt = gateways.documents.upload(&upload).await?;
    let patch = RecordPatch {
        gdrive_folder_id: Some(receipt.employee_folder_id),
        gdrive_pdf_link: Some(receipt.web_view_link),
        ..RecordPatch::default()
    };
    gateways.records.patch(record_id, &patch).await?;
    Ok(patch)
}

async fn link_rtw_record(
    gateways: Gateways<'_>,
    record_id: &str,
    draft: &OnboardingRecord,
) -> Result<RecordPatch, GatewayError> {
    let request = RtwLinkRequest {
        person_name: draft.full_name.clone(),
        date_of_birth: draft.date_of_birth.clone(),
        onboarding_id: record_id.to_string(),
    };
    let rtw_id = gateways.compliance.create_linked_record(&request).await?;
    let patch = RecordPatch {
        rtw_record_id: Some(rtw_id),
        status: Some(OnboardingStatus::RtwInProgress),
        ..RecordPatch::default()
    };
    gateways.records.patch(record_id, &patch).await?;
    Ok(patch)
}
