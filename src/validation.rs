use std::sync::LazyLock;

use regex::Regex;

use crate::model::{OnboardingRecord, present};

static NI_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2}\s?\d{2}\s?\d{2}\s?\d{2}\s?[A-Da-d]$").expect("NI number pattern")
});
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));
static SORT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}-?\d{2}-?\d{2}$").expect("sort code pattern"));
static ACCOUNT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8}$").expect("account number pattern"));

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Checks a draft before it is sent to the data service. Optional fields are
/// only format-checked when present.
pub fn validate_onboarding(record: &OnboardingRecord) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let mut fail = |field, message| errors.push(FieldError { field, message });

    if record.full_name.trim().is_empty() {
        fail("full_name", "Full name is required.");
    }
    if present(&record.date_of_birth).is_none() {
        fail("date_of_birth", "Date of birth is required.");
    }
    if let Some(ni) = present(&record.ni_number)
        && !NI_NUMBER.is_match(ni)
    {
        fail(
            "ni_number",
            "National Insurance number format is invalid (e.g. QQ 12 34 56 A).",
        );
    }
    if let Some(email) = present(&record.personal_email)
        && !EMAIL.is_match(email)
    {
        fail("personal_email", "Personal email format is invalid.");
    }
    if let Some(sort_code) = present(&record.bank_sort_code)
        && !SORT_CODE.is_match(sort_code)
    {
        fail("bank_sort_code", "Sort code must be 6 digits (XX-XX-XX).");
    }
    if let Some(account) = present(&record.bank_account_number)
        && !ACCOUNT_NUMBER.is_match(account)
    {
        fail("bank_account_number", "Account number must be 8 digits.");
    }

    errors
}

/// Normalises free-typed sort codes: digits only, at most six, dash-grouped.
pub fn format_sort_code(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).take(6).collect();
    match digits.len() {
        0..=2 => digits,
        3..=4 => format!("{}-{}", &digits[..2], &digits[2..]),
        _ => format!("{}-{}-{}", &digits[..2], &digits[2..4], &digits[4..]),
    }
}
