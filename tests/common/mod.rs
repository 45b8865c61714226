#![allow(dead_code)]

pub mod backend;

use chrono::{NaiveDate, NaiveDateTime};
use onboarding_core::model::{EmployeeStatement, OnboardingRecord};

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
}

/// Fixed "generated at" time so documents are reproducible.
pub fn generated_at() -> NaiveDateTime {
    date().and_hms_opt(14, 5, 9).unwrap()
}

pub fn sample_record() -> OnboardingRecord {
    OnboardingRecord {
        id: Some("rec-1".into()),
        full_name: "Jane Doe".into(),
        date_of_birth: Some("1990-05-17".into()),
        ni_number: Some("QQ 12 34 56 A".into()),
        address: Some("1 High Street, Leeds LS1 1AA".into()),
        personal_email: Some("jane@example.com".into()),
        mobile_number: Some("07700 900123".into()),
        employee_statement: Some(EmployeeStatement::A),
        has_student_loan: true,
        student_loan_plan: Some("Plan 2".into()),
        has_postgraduate_loan: false,
        bank_account_holder: Some("Jane Doe".into()),
        bank_sort_code: Some("12-34-56".into()),
        bank_account_number: Some("12345678".into()),
        emergency_contact_name: Some("John Doe".into()),
        emergency_contact_relationship: Some("Brother".into()),
        emergency_contact_phone: Some("07700 900456".into()),
        medical_notes: None,
        tshirt_size: Some("M".into()),
        trouser_size: Some("32R".into()),
        ..OnboardingRecord::default()
    }
}

/// Sample record without backend-assigned fields, as the form submits it.
pub fn draft() -> OnboardingRecord {
    OnboardingRecord {
        id: None,
        ..sample_record()
    }
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
