use serde::{Deserialize, Serialize};

/// HMRC starter-checklist statement chosen by the new starter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeStatement {
    A,
    B,
    C,
}

impl EmployeeStatement {
    pub const ALL: [EmployeeStatement; 3] = [Self::A, Self::B, Self::C];

    pub fn code(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
        }
    }

    /// Text printed on the filled record.
    pub fn summary(self) -> &'static str {
        match self {
            Self::A => "Statement A: First job since last 6 April, no taxable benefits or pensions.",
            Self::B => {
                "Statement B: Only job now, but had other job or taxable benefits since last 6 April."
            }
            Self::C => "Statement C: Has another job or receives a State/Occupational Pension.",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "A" | "a" => Some(Self::A),
            "B" | "b" => Some(Self::B),
            "C" | "c" => Some(Self::C),
            _ => None,
        }
    }
}

/// Workflow state of a record. Values the portal does not know yet are kept
/// verbatim and shown as they are.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OnboardingStatus {
    #[default]
    Pending,
    RtwInProgress,
    Complete,
    Other(String),
}

impl OnboardingStatus {
    pub const KNOWN: [OnboardingStatus; 3] = [Self::Pending, Self::RtwInProgress, Self::Complete];

    /// Value stored in the `status` column.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::RtwInProgress => "rtw_in_progress",
            Self::Complete => "complete",
            Self::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::RtwInProgress => "RTW In Progress",
            Self::Complete => "Complete",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for OnboardingStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => Self::Pending,
            "rtw_in_progress" => Self::RtwInProgress,
            "complete" => Self::Complete,
            _ => Self::Other(raw),
        }
    }
}

impl From<OnboardingStatus> for String {
    fn from(status: OnboardingStatus) -> Self {
        match status {
            OnboardingStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// One row of `onboarding_records`, as returned by the data service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub full_name: String,
    pub date_of_birth: Option<String>,
    pub ni_number: Option<String>,
    pub address: Option<String>,
    pub personal_email: Option<String>,
    pub mobile_number: Option<String>,

    pub employee_statement: Option<EmployeeStatement>,
    pub has_student_loan: bool,
    pub student_loan_plan: Option<String>,
    pub has_postgraduate_loan: bool,

    pub bank_account_holder: Option<String>,
    pub bank_sort_code: Option<String>,
    pub bank_account_number: Option<String>,

    pub emergency_contact_name: Option<String>,
    pub emergency_contact_relationship: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub medical_notes: Option<String>,
    pub tshirt_size: Option<String>,
    pub trouser_size: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_scan_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_scan_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdrive_folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdrive_pdf_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtw_record_id: Option<String>,
    pub status: OnboardingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// `Some` only for values with visible content.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl OnboardingRecord {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Four bullets then the last four characters; never the full number.
    pub fn masked_account_number(&self) -> Option<String> {
        present(&self.bank_account_number).map(mask_account_number)
    }

    pub fn student_loan_summary(&self) -> String {
        if !self.has_student_loan {
            return "No".to_string();
        }
        match present(&self.student_loan_plan) {
            Some(plan) => format!("Yes \u{2014} {plan}"),
            None => "Yes".to_string(),
        }
    }

    pub fn statement_summary(&self) -> &'static str {
        self.employee_statement
            .map(EmployeeStatement::summary)
            .unwrap_or("Not selected")
    }
}

pub const MASK_GLYPH: char = '\u{2022}';

pub fn mask_account_number(number: &str) -> String {
    let chars: Vec<char> = number.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    let mut masked: String = std::iter::repeat_n(MASK_GLYPH, 4).collect();
    masked.push_str(&tail);
    masked
}

/// Partial update; unset fields are left untouched by the data service.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_scan_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_scan_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdrive_folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdrive_pdf_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtw_record_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OnboardingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl RecordPatch {
    pub fn apply(&self, record: &mut OnboardingRecord) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if let Some(v) = &self.$field { record.$field = Some(v.clone()); })*
            };
        }
        take!(
            paper_scan_path,
            paper_scan_filename,
            gdrive_folder_id,
            gdrive_pdf_link,
            rtw_record_id,
            updated_at
        );
        if let Some(status) = &self.status {
            record.status = status.clone();
        }
    }
}
