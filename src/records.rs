//! Read side of the portal: the dashboard list and the record detail page.

use crate::model::{OnboardingRecord, OnboardingStatus};
use crate::submission::{GatewayError, RecordStore, ScanStore};

/// Lifetime of a signed scan link.
pub const SCAN_URL_TTL_SECS: u64 = 300;

/// Records whose name contains `search` (ignoring case and surrounding
/// whitespace) and, when `status` is set, whose status matches. The input
/// order is kept.
pub fn filter_records<'a>(
    records: &'a [OnboardingRecord],
    search: &str,
    status: Option<OnboardingStatus>,
) -> Vec<&'a OnboardingRecord> {
    let search = search.trim().to_lowercase();
    records
        .iter()
        .filter(|r| search.is_empty() || r.full_name.to_lowercase().contains(&search))
        .filter(|r| status.as_ref().is_none_or(|s| &r.status == s))
        .collect()
}

/// Newest first by `created_at`. Records without a timestamp go last.
pub fn sort_newest_first(records: &mut [OnboardingRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Every record, newest first.
pub async fn load_dashboard(
    records: &dyn RecordStore,
) -> Result<Vec<OnboardingRecord>, GatewayError> {
    let mut all = records.fetch_all().await?;
    sort_newest_first(&mut all);
    log::debug!("loaded {} onboarding records", all.len());
    Ok(all)
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordDetail {
    pub record: OnboardingRecord,
    /// Short-lived link to the paper scan, when there is one and it could be
    /// signed.
    pub scan_url: Option<String>,
}

impl RecordDetail {
    /// PDF scans are offered as a link, images are shown inline.
    pub fn scan_is_pdf(&self) -> bool {
        self.record
            .paper_scan_filename
            .as_deref()
            .is_some_and(|name| name.to_lowercase().ends_with(".pdf"))
    }
}

/// Fetches one record and signs its scan link. A failure to sign is logged
/// and leaves `scan_url` empty.
pub async fn load_detail(
    records: &dyn RecordStore,
    scans: &dyn ScanStore,
    id: &str,
) -> Result<RecordDetail, GatewayError> {
    let record = records.fetch(id).await?;
    let scan_url = match record.paper_scan_path.as_deref() {
        Some(path) if !path.is_empty() => {
            match scans.signed_url(path, SCAN_URL_TTL_SECS).await {
                Ok(url) => url,
                Err(e) => {
                    log::error!("Failed to get scan URL for {id}: {e}");
                    None
                }
            }
        }
        _ => None,
    };
    Ok(RecordDetail { record, scan_url })
}
