mod common;

use onboarding_core::Error;
use onboarding_core::config::Settings;
use onboarding_core::forms::{
    MEDICAL_NOTES_HEADING, blank_form_filename, blank_starter_pack, filled_document_filename,
    generate_blank_form, generate_filled_document_at, generate_filled_document_bytes_at,
    load_logo, onboarding_record,
};
use onboarding_core::model::{MASK_GLYPH, OnboardingRecord, mask_account_number};
use onboarding_core::pdf::{
    DrawOp, PageSize, PdfRenderer, Recorder, Recording, RecordingRenderer, Renderer,
};
use rayon::prelude::*;

const RECORD_FOOTER: &str = "CONFIDENTIAL \u{2014} New Starter Onboarding Record";

fn record_layout(record: &OnboardingRecord) -> Recording {
    onboarding_record(
        &RecordingRenderer,
        record,
        &Settings::default(),
        None,
        common::generated_at(),
    )
    .unwrap()
}

/// A backend that cannot produce a surface.
struct Unavailable;

impl Renderer for Unavailable {
    type Surface = Recorder;

    fn open(&self, _page: PageSize) -> Result<Recorder, Error> {
        Err(Error::RendererUnavailable("no PDF backend".into()))
    }
}

#[test]
fn masking_law() {
    for number in ["1234", "12345678", "GB29NWBK60161331926819"] {
        let masked = mask_account_number(number);
        let tail: String = number.chars().skip(number.chars().count() - 4).collect();
        let expected: String = std::iter::repeat_n(MASK_GLYPH, 4).chain(tail.chars()).collect();
        assert_eq!(masked, expected);
        if number.len() > 4 {
            assert!(!masked.contains(number));
        }
    }
}

#[test]
fn filled_record_never_shows_full_account_number() {
    let record = common::sample_record();
    let recording = record_layout(&record);
    assert!(recording.contains_text("\u{2022}\u{2022}\u{2022}\u{2022}5678"));
    assert!(!recording.contains_text("12345678"));

    let settings = Settings::default().uncompressed();
    let bytes = generate_filled_document_bytes_at(&record, &settings, common::generated_at())
        .unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(!common::contains(&bytes, b"12345678"));
}

#[test]
fn filled_record_binds_fields() {
    let recording = record_layout(&common::sample_record());
    for expected in [
        "Jane Doe",
        "17 May 1990",
        "QQ 12 34 56 A",
        "Statement A: First job since last 6 April, no taxable benefits or pensions.",
        "Yes \u{2014} Plan 2",
        "12-34-56",
        "Brother",
        "32R",
        "ImmersiveCore Onboarding Portal | Generated: 07/03/2025, 14:05:09",
    ] {
        assert!(recording.contains_text(expected), "missing {expected:?}");
    }
}

#[test]
fn multi_line_address_prints_on_one_line() {
    let recording = record_layout(&OnboardingRecord {
        address: Some("1 High Street\nLeeds\nLS1 1AA".into()),
        ..common::sample_record()
    });
    assert!(recording.contains_text("1 High Street, Leeds, LS1 1AA"));
    assert!(!recording.contains_text("1 High Street\nLeeds"));

    let settings = Settings::default().uncompressed();
    let record = OnboardingRecord {
        address: Some("1 High Street\nLeeds\nLS1 1AA".into()),
        ..common::sample_record()
    };
    let bytes = generate_filled_document_bytes_at(&record, &settings, common::generated_at())
        .unwrap();
    assert!(common::contains(&bytes, b"1 High Street, Leeds, LS1 1AA"));
}

#[test]
fn same_input_and_time_gives_identical_bytes() {
    let record = common::sample_record();
    let settings = Settings::default();
    let first = generate_filled_document_bytes_at(&record, &settings, common::generated_at())
        .unwrap();
    let second = generate_filled_document_bytes_at(&record, &settings, common::generated_at())
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn only_the_timestamp_varies_between_runs() {
    let record = common::sample_record();
    let earlier = record_layout(&record);
    let later = onboarding_record(
        &RecordingRenderer,
        &record,
        &Settings::default(),
        None,
        common::date().and_hms_opt(18, 30, 0).unwrap(),
    )
    .unwrap();

    let a = earlier.all_texts();
    let b = later.all_texts();
    assert_eq!(a.len(), b.len());
    let differing: Vec<_> = a.iter().zip(&b).filter(|(x, y)| x != y).collect();
    assert!(!differing.is_empty());
    assert!(differing.iter().all(|(x, _)| x.contains("Generated:")));
}

#[test]
fn filename_law() {
    assert_eq!(
        filled_document_filename("O'Brien / Smith!", common::date()),
        "Onboarding_OBrien  Smith_20250307.pdf"
    );
    assert_eq!(
        filled_document_filename("!!!", common::date()),
        "Onboarding_record_20250307.pdf"
    );
    assert_eq!(
        blank_form_filename("Immersive Core Ltd.", common::date()),
        "ImmersiveCoreLtd_NewStarterPack_20250307.pdf"
    );
}

#[test]
fn download_writes_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let record = OnboardingRecord {
        full_name: "O'Brien / Smith!".into(),
        ..common::sample_record()
    };
    let path = generate_filled_document_at(
        &record,
        dir.path(),
        &Settings::default(),
        common::generated_at(),
    )
    .unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "Onboarding_OBrien  Smith_20250307.pdf"
    );
    let on_disk = std::fs::read(&path).unwrap();
    let in_memory =
        generate_filled_document_bytes_at(&record, &Settings::default(), common::generated_at())
            .unwrap();
    assert_eq!(on_disk, in_memory);
}

#[test]
fn medical_notes_omitted_when_absent() {
    let absent = record_layout(&common::sample_record());
    assert!(!absent.contains_text(MEDICAL_NOTES_HEADING));

    let blank = record_layout(&OnboardingRecord {
        medical_notes: Some("   ".into()),
        ..common::sample_record()
    });
    assert!(!blank.contains_text(MEDICAL_NOTES_HEADING));

    let present = record_layout(&OnboardingRecord {
        medical_notes: Some("Asthma, carries an inhaler.".into()),
        ..common::sample_record()
    });
    assert!(present.contains_text(MEDICAL_NOTES_HEADING));
    assert!(present.contains_text("Asthma, carries an inhaler."));
}

#[test]
fn long_medical_notes_spill_onto_second_page() {
    let notes = "Requires an adjusted workstation and regular breaks. ".repeat(60);
    let recording = record_layout(&OnboardingRecord {
        medical_notes: Some(notes),
        ..common::sample_record()
    });

    assert!(recording.page_count() >= 2);
    assert_eq!(recording.pages_with_text(RECORD_FOOTER), recording.page_count());
    assert!(recording.texts(recording.page_count() - 1).contains(&"Trouser size:"));
    let limit = PageSize::A4.height - 20.0;
    let body_max = recording
        .pages
        .iter()
        .flatten()
        .filter_map(|op| match op {
            DrawOp::Text { text, y, .. }
                if text != RECORD_FOOTER && !text.contains("Generated:") =>
            {
                Some(*y)
            }
            _ => None,
        })
        .fold(0.0, f32::max);
    assert!(body_max <= limit);
}

#[test]
fn unavailable_renderer_is_reported_before_layout() {
    let record = common::sample_record();
    let err = onboarding_record(
        &Unavailable,
        &record,
        &Settings::default(),
        None,
        common::generated_at(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::RendererUnavailable(_)));

    let err = blank_starter_pack(&Unavailable, &Settings::default(), None).unwrap_err();
    assert!(matches!(err, Error::RendererUnavailable(_)));
}

#[test]
fn pdf_renderer_rejects_empty_page() {
    let result = PdfRenderer::default().open(PageSize {
        width: 0.0,
        height: 297.0,
    });
    assert!(matches!(result, Err(Error::RendererUnavailable(_))));
}

#[test]
fn concurrent_generation_matches_sequential() {
    let records: Vec<OnboardingRecord> = (0..8)
        .map(|i| OnboardingRecord {
            full_name: format!("Starter {i}"),
            bank_account_number: Some(format!("{:08}", 10_000_000 + i)),
            ..common::sample_record()
        })
        .collect();
    let settings = Settings::default();

    let sequential: Vec<Vec<u8>> = records
        .iter()
        .map(|r| generate_filled_document_bytes_at(r, &settings, common::generated_at()).unwrap())
        .collect();
    let parallel: Vec<Vec<u8>> = records
        .par_iter()
        .map(|r| generate_filled_document_bytes_at(r, &settings, common::generated_at()).unwrap())
        .collect();

    assert_eq!(sequential, parallel);
}

#[test]
fn blank_form_has_every_section_and_footer_per_page() {
    let settings = Settings::default().with_organisation("Acme");
    let recording = blank_starter_pack(&RecordingRenderer, &settings, None).unwrap();

    for section in [
        "1. Personal Details",
        "2. HMRC New Starter Checklist",
        "3. Banking Details",
        "4. Emergency Contact & Operational",
        "5. Declaration",
    ] {
        assert!(recording.contains_text(section), "missing {section:?}");
    }
    let footer = "CONFIDENTIAL \u{2014} Acme New Starter Pack";
    assert_eq!(recording.pages_with_text(footer), recording.page_count());
}

#[test]
fn blank_form_is_identical_every_time() {
    let settings = Settings::default();
    let a = blank_starter_pack(&PdfRenderer::default(), &settings, None).unwrap();
    let b = blank_starter_pack(&PdfRenderer::default(), &settings, None).unwrap();
    assert_eq!(a, b);
}

#[test]
fn blank_form_download_is_named_after_organisation() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::default().with_organisation("Immersive Core");
    let path = generate_blank_form(dir.path(), &settings).unwrap();
    let name = path.file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("ImmersiveCore_NewStarterPack_"));
    assert!(name.ends_with(".pdf"));
    assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
}

#[test]
fn logo_is_embedded_with_soft_mask() {
    let dir = tempfile::tempdir().unwrap();
    let logo_path = dir.path().join("logo.png");
    image::RgbaImage::from_pixel(4, 4, image::Rgba([29, 79, 145, 128]))
        .save(&logo_path)
        .unwrap();
    let settings = Settings::default().with_logo(&logo_path);

    let logo = load_logo(&settings).unwrap();
    assert_eq!((logo.pixel_width, logo.pixel_height), (4, 4));
    assert!(logo.alpha.is_some());

    let recording = blank_starter_pack(&RecordingRenderer, &settings, Some(&logo)).unwrap();
    assert!(
        recording.pages[0]
            .iter()
            .any(|op| matches!(op, DrawOp::Image { .. }))
    );

    let bytes = blank_starter_pack(&PdfRenderer::default(), &settings, Some(&logo)).unwrap();
    assert!(common::contains(&bytes, b"/SMask"));
}

#[test]
fn unreadable_logo_is_skipped() {
    let settings = Settings::default().with_logo("does/not/exist.png");
    assert!(load_logo(&settings).is_none());

    let dir = tempfile::tempdir().unwrap();
    let path = generate_blank_form(dir.path(), &settings).unwrap();
    assert!(path.exists());
}
