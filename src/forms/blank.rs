use crate::config::Settings;
use crate::error::Error;
use crate::fonts::Font;
use crate::pdf::layout::{Banner, Footer, Layout, PageGeometry, Palette};
use crate::pdf::{Frame, Logo, PageSize, Renderer, Surface, TextStyle};

pub(super) const GEOMETRY: PageGeometry = PageGeometry {
    page: PageSize::A4,
    margin_left: 16.0,
    margin_right: 16.0,
    margin_top: 16.0,
    footer_reserve: 22.0,
};

pub(super) const PALETTE: Palette = Palette {
    accent: [29, 79, 145],
    text: [30, 30, 30],
    muted: [120, 120, 120],
    rule: [180, 180, 180],
    panel: [243, 242, 241],
};

pub(super) const TITLE: &str = "New Starter Pack";
const INSTRUCTIONS: &str = "Please complete all sections in BLOCK CAPITALS using black ink.";

/// Lays out the paper New Starter Pack. No record data is bound, so the
/// output depends only on `settings`.
pub fn blank_starter_pack<R: Renderer>(
    renderer: &R,
    settings: &Settings,
    logo: Option<&Logo>,
) -> Result<<R::Surface as Surface>::Output, Error> {
    let surface = renderer.open(GEOMETRY.page)?;
    let footer = Footer::new(
        format!("CONFIDENTIAL \u{2014} {} New Starter Pack", settings.organisation),
        INSTRUCTIONS,
    );
    let mut doc = Layout::new(surface, GEOMETRY, PALETTE, footer);
    let ml = GEOMETRY.margin_left;

    doc.banner(&Banner {
        height: 28.0,
        fill: PALETTE.accent,
        logo: logo.map(|l| {
            (
                l,
                Frame {
                    x: ml,
                    y: 4.0,
                    width: 16.0,
                    height: 16.0,
                },
            )
        }),
        title: TITLE,
        title_size: 16.0,
        subtitle: INSTRUCTIONS,
        text_x: ml + 60.0,
        title_y: 12.0,
        subtitle_y: 19.0,
    });
    doc.set_y(36.0);

    doc.section_header(1, "Personal Details");
    doc.field_line("Full name (as on passport / birth certificate):");
    doc.two_fields("Date of birth (DD/MM/YYYY):", "National Insurance number:");
    doc.text_area(Some("Address (including postcode):"), 2);
    doc.two_fields("Personal email address:", "Mobile number:");

    doc.section_header(2, "HMRC New Starter Checklist");
    doc.wrapped_note(
        "Your employer needs this information to set up your tax code correctly. \
         Please tick ONE statement below that applies to you.",
    );
    doc.advance(2.0);

    doc.checkbox(
        "Statement A \u{2014} This is my first job since last 6 April and I have not been receiving",
    );
    doc.wrapped_note(
        "    taxable Jobseeker's Allowance, Employment and Support Allowance, or Incapacity Benefit.",
    );
    doc.advance(1.0);

    doc.checkbox(
        "Statement B \u{2014} This is now my only job but since last 6 April I have had another job,",
    );
    doc.wrapped_note(
        "    or received taxable Jobseeker's Allowance, Employment and Support Allowance, or Incapacity Benefit.",
    );
    doc.advance(1.0);

    doc.checkbox("Statement C \u{2014} I have another job or receive a State or Occupational Pension.");
    doc.advance(4.0);

    doc.checkbox("I have a student loan (tick if yes)");
    doc.ensure_space(10.0);
    let plan_y = doc.y();
    doc.text(
        "If yes, which plan?    Plan 1  /  Plan 2  /  Plan 4  /  Plan 5   (circle one)",
        ml + 14.0,
        plan_y,
        TextStyle::new(Font::Regular, 9.0, PALETTE.muted),
    );
    doc.advance(8.0);

    doc.checkbox("I have a postgraduate loan (tick if yes)");
    doc.advance(4.0);

    doc.section_header(3, "Banking Details");
    doc.wrapped_note(
        "Your wages will be paid by BACS transfer. Please provide your UK bank account details.",
    );
    doc.field_line("Account holder name (as shown on bank statement):");
    doc.two_fields("Sort code (XX-XX-XX):", "Account number (8 digits):");
    doc.advance(2.0);

    doc.section_header(4, "Emergency Contact & Operational");
    doc.ensure_space(12.0);
    doc.subheading("Emergency Contact");
    doc.advance(6.0);
    doc.field_line("Contact name:");
    doc.two_fields("Relationship:", "Contact phone number:");
    doc.advance(2.0);

    doc.ensure_space(12.0);
    doc.subheading("Medical Information");
    doc.advance(4.0);
    doc.wrapped_note(
        "Please note any medical conditions, allergies, or medications we should be aware of in an emergency.",
    );
    doc.text_area(None, 3);

    doc.ensure_space(12.0);
    doc.subheading("Uniform Sizes");
    doc.advance(6.0);
    doc.two_fields("T-shirt size (XS / S / M / L / XL / XXL):", "Trouser size:");
    doc.advance(4.0);

    doc.section_header(5, "Declaration");
    doc.wrapped_note(&format!(
        "I confirm that the information provided on this form is true and complete to the best \
         of my knowledge. I understand that providing false information may result in \
         disciplinary action. I consent to {} processing this data for employment purposes in \
         accordance with GDPR.",
        settings.organisation
    ));
    doc.advance(4.0);

    doc.ensure_space(20.0);
    doc.two_fields("Signature:", "Date:");
    doc.advance(6.0);
    doc.field_line("Print name:");

    Ok(doc.finish())
}
