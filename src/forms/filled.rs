use chrono::NaiveDateTime;

use crate::config::Settings;
use crate::dates::{format_date_uk, generated_stamp};
use crate::error::Error;
use crate::fonts::Font;
use crate::model::{OnboardingRecord, present};
use crate::pdf::layout::{Banner, Footer, Layout, PageGeometry, Palette};
use crate::pdf::{Frame, Logo, PageSize, Renderer, Surface, TextStyle};

pub(super) const GEOMETRY: PageGeometry = PageGeometry {
    page: PageSize::A4,
    margin_left: 18.0,
    margin_right: 18.0,
    margin_top: 18.0,
    footer_reserve: 20.0,
};

pub(super) const PALETTE: Palette = Palette {
    accent: [29, 79, 145],
    text: [11, 12, 12],
    muted: [80, 90, 95],
    rule: [80, 90, 95],
    panel: [243, 242, 241],
};

const LINE_H: f32 = 7.0;
const CORE_DETAIL_ROWS: usize = 6;
const BODY_LINE_H: f32 = 4.5;

pub const MEDICAL_NOTES_HEADING: &str = "Medical Notes:";

fn text_or_blank(value: &Option<String>) -> &str {
    present(value).unwrap_or("")
}

/// Lays out one onboarding record. `generated_at` only feeds the footer.
pub fn onboarding_record<R: Renderer>(
    renderer: &R,
    record: &OnboardingRecord,
    settings: &Settings,
    logo: Option<&Logo>,
    generated_at: NaiveDateTime,
) -> Result<<R::Surface as Surface>::Output, Error> {
    let surface = renderer.open(GEOMETRY.page)?;
    let footer = Footer::new(
        "CONFIDENTIAL \u{2014} New Starter Onboarding Record",
        format!(
            "{} Onboarding Portal | Generated: {}",
            settings.organisation,
            generated_stamp(generated_at)
        ),
    );
    let mut doc = Layout::new(surface, GEOMETRY, PALETTE, footer);
    let ml = GEOMETRY.margin_left;
    let cw = GEOMETRY.content_width();
    let body = TextStyle::new(Font::Regular, 9.0, PALETTE.text);

    doc.banner(&Banner {
        height: 26.0,
        fill: PALETTE.text,
        logo: logo.map(|l| {
            (
                l,
                Frame {
                    x: ml,
                    y: 4.0,
                    width: 14.0,
                    height: 14.0,
                },
            )
        }),
        title: "New Starter Onboarding",
        title_size: 14.0,
        subtitle: "Employee Onboarding Record",
        text_x: ml + 55.0,
        title_y: 10.0,
        subtitle_y: 17.0,
    });
    doc.set_y(34.0);

    // Core details sit in a panel sized for a fixed number of rows.
    doc.titled_rule("1. Core Details");
    let panel_h = 10.0 + CORE_DETAIL_ROWS as f32 * LINE_H;
    let top = doc.y();
    doc.panel(Frame {
        x: ml,
        y: top - 3.0,
        width: cw,
        height: panel_h,
    });
    let date_of_birth = format_date_uk(record.date_of_birth.as_deref());
    let rows: [(&str, &str); CORE_DETAIL_ROWS] = [
        ("Full name:", record.full_name.trim()),
        ("Date of birth:", &date_of_birth),
        ("NI number:", text_or_blank(&record.ni_number)),
        ("Address:", text_or_blank(&record.address)),
        ("Email:", text_or_blank(&record.personal_email)),
        ("Mobile:", text_or_blank(&record.mobile_number)),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        doc.label_value(label, value, top + 4.0 + i as f32 * LINE_H);
    }
    doc.set_y(top + panel_h + 6.0);

    doc.ensure_space(45.0);
    doc.titled_rule("2. HMRC New Starter Checklist");
    doc.subheading("Employee Statement:");
    doc.advance(5.0);
    doc.paragraph(record.statement_summary(), body, 2.0, BODY_LINE_H, 4.0);
    let y = doc.y();
    doc.label_value("Student loan:", &record.student_loan_summary(), y);
    doc.advance(LINE_H);
    let y = doc.y();
    let postgraduate = if record.has_postgraduate_loan { "Yes" } else { "No" };
    doc.label_value("Postgraduate loan:", postgraduate, y);
    doc.advance(LINE_H + 4.0);

    doc.ensure_space(35.0);
    doc.titled_rule("3. Banking Details");
    let masked = record.masked_account_number().unwrap_or_default();
    let banking = [
        ("Account holder:", text_or_blank(&record.bank_account_holder)),
        ("Sort code:", text_or_blank(&record.bank_sort_code)),
        ("Account number:", masked.as_str()),
    ];
    for (label, value) in banking {
        let y = doc.y();
        doc.label_value(label, value, y);
        doc.advance(LINE_H);
    }
    doc.advance(6.0);

    doc.ensure_space(60.0);
    doc.titled_rule("4. Operational Specifications");
    doc.subheading("Emergency Contact");
    doc.advance(5.0);
    let contact = [
        ("Name:", text_or_blank(&record.emergency_contact_name)),
        ("Relationship:", text_or_blank(&record.emergency_contact_relationship)),
        ("Phone:", text_or_blank(&record.emergency_contact_phone)),
    ];
    for (label, value) in contact {
        let y = doc.y();
        doc.label_value(label, value, y);
        doc.advance(LINE_H);
    }
    doc.advance(3.0);

    if let Some(notes) = present(&record.medical_notes) {
        // Keep the heading with the notes.
        let notes_h = doc.paragraph_height(notes, body, 2.0, BODY_LINE_H);
        doc.ensure_space(5.0 + notes_h);
        doc.subheading(MEDICAL_NOTES_HEADING);
        doc.advance(5.0);
        doc.paragraph(notes, body, 2.0, BODY_LINE_H, 4.0);
    }

    doc.ensure_space(2.0 * LINE_H);
    let y = doc.y();
    doc.label_value("T-shirt size:", text_or_blank(&record.tshirt_size), y);
    doc.advance(LINE_H);
    let y = doc.y();
    doc.label_value("Trouser size:", text_or_blank(&record.trouser_size), y);

    Ok(doc.finish())
}
