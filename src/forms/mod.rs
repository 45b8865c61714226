//! The two paper-equivalent documents and their output modes.
//!
//! Both templates are plain functions over any [`Renderer`], so tests can
//! lay them out on a [`crate::pdf::Recorder`] and the portal can write real
//! PDF through [`PdfRenderer`].

mod blank;
mod filled;

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::Settings;
use crate::dates::{self, date_stamp};
use crate::error::Error;
use crate::model::OnboardingRecord;
use crate::pdf::{Logo, PdfRenderer};

pub use blank::blank_starter_pack;
pub use filled::{MEDICAL_NOTES_HEADING, onboarding_record};

pub const PDF_MIME: &str = "application/pdf";

/// `Onboarding_<name>_<YYYYMMDD>.pdf`, keeping only `[A-Za-z0-9 ]` of the name.
pub fn filled_document_filename(full_name: &str, date: NaiveDate) -> String {
    let kept: String = full_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();
    let name = match kept.trim() {
        "" => "record",
        trimmed => trimmed,
    };
    format!("Onboarding_{}_{}.pdf", name, date_stamp(date))
}

/// `<Organisation>_NewStarterPack_<YYYYMMDD>.pdf`, organisation reduced to
/// `[A-Za-z0-9]`.
pub fn blank_form_filename(organisation: &str, date: NaiveDate) -> String {
    let org: String = organisation
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    let title: String = blank::TITLE.split_whitespace().collect();
    format!("{}_{}_{}.pdf", org, title, date_stamp(date))
}

/// Decodes the configured logo. A logo that cannot be read is left out of
/// the header rather than failing the document.
pub fn load_logo(settings: &Settings) -> Option<Logo> {
    let path = settings.logo.as_deref()?;
    match Logo::load(path) {
        Ok(logo) => Some(logo),
        Err(e) => {
            log::warn!("Skipping logo: {e}");
            None
        }
    }
}

fn renderer(settings: &Settings) -> PdfRenderer {
    PdfRenderer {
        compress: settings.compress,
    }
}

fn write_output(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, Error> {
    let path = dir.join(file_name);
    std::fs::write(&path, bytes).map_err(|source| Error::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Renders the blank starter pack into `dir` and returns the written path.
pub fn generate_blank_form(dir: &Path, settings: &Settings) -> Result<PathBuf, Error> {
    let t0 = Instant::now();
    let logo = load_logo(settings);
    let bytes = blank_starter_pack(&renderer(settings), settings, logo.as_ref())?;
    let t_render = t0.elapsed();

    let file_name = blank_form_filename(&settings.organisation, dates::now().date());
    let path = write_output(dir, &file_name, &bytes)?;
    let t_total = t0.elapsed();

    log::info!(
        "Blank form: render={:.1}ms, write={:.1}ms (output {} bytes) → {}",
        t_render.as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        bytes.len(),
        path.display(),
    );
    Ok(path)
}

/// In-memory filled record, for upstream transmission.
pub fn generate_filled_document_bytes(
    record: &OnboardingRecord,
    settings: &Settings,
) -> Result<Vec<u8>, Error> {
    generate_filled_document_bytes_at(record, settings, dates::now())
}

/// As [`generate_filled_document_bytes`] with a fixed footer timestamp.
pub fn generate_filled_document_bytes_at(
    record: &OnboardingRecord,
    settings: &Settings,
    generated_at: NaiveDateTime,
) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();
    let logo = load_logo(settings);
    let bytes = onboarding_record(
        &renderer(settings),
        record,
        settings,
        logo.as_ref(),
        generated_at,
    )?;
    log::info!(
        "Onboarding record: render={:.1}ms (output {} bytes)",
        t0.elapsed().as_secs_f64() * 1000.0,
        bytes.len(),
    );
    Ok(bytes)
}

/// Writes the filled record into `dir` and returns the written path.
pub fn generate_filled_document(
    record: &OnboardingRecord,
    dir: &Path,
    settings: &Settings,
) -> Result<PathBuf, Error> {
    generate_filled_document_at(record, dir, settings, dates::now())
}

pub fn generate_filled_document_at(
    record: &OnboardingRecord,
    dir: &Path,
    settings: &Settings,
    generated_at: NaiveDateTime,
) -> Result<PathBuf, Error> {
    let bytes = generate_filled_document_bytes_at(record, settings, generated_at)?;
    let file_name = filled_document_filename(&record.full_name, generated_at.date());
    let path = write_output(dir, &file_name, &bytes)?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}
