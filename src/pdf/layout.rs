//! Flowing form layout: a vertical cursor over fixed-size pages.
//!
//! Every primitive checks the space it needs up front, so a field, checkbox
//! or text area is never split across a page boundary. When a page fills up
//! its footer is written and layout continues at the top margin of a new page.

use crate::fonts::Font;

use super::{Align, Frame, Logo, PageSize, Paint, Rgb, Stroke, Surface, TextStyle};

const SECTION_BAND_HEIGHT: f32 = 9.0;
const SECTION_RESERVE: f32 = 14.0;
const FIELD_RESERVE: f32 = 12.0;
const CHECKBOX_RESERVE: f32 = 8.0;
const RULE_WIDTH: f32 = 0.3;
const FIELD_FONT_SIZE: f32 = 9.5;
const NOTE_FONT_SIZE: f32 = 8.0;
const NOTE_LINE_HEIGHT: f32 = 3.5;
const TEXT_AREA_LINE_HEIGHT: f32 = 6.0;
const TEXT_AREA_LINE_RESERVE: f32 = 7.0;
/// Offset of the value column in boxed label/value panels.
pub const VALUE_COLUMN: f32 = 60.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub page: PageSize,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Cursor position at the top of every continuation page.
    pub margin_top: f32,
    /// Space kept free above the bottom edge for the footer.
    pub footer_reserve: f32,
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.page.width - self.margin_left - self.margin_right
    }

    pub fn right_edge(&self) -> f32 {
        self.page.width - self.margin_right
    }

    /// Lowest y a primitive may reach before a page break is forced.
    pub fn break_limit(&self) -> f32 {
        self.page.height - self.footer_reserve
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub accent: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
    pub rule: Rgb,
    pub panel: Rgb,
}

/// Two centred lines repeated at the bottom of every page.
#[derive(Clone, Debug, PartialEq)]
pub struct Footer {
    pub lines: [String; 2],
}

impl Footer {
    pub const SIZE: f32 = 7.5;
    const OFFSETS: [f32; 2] = [10.0, 6.0];

    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            lines: [first.into(), second.into()],
        }
    }
}

/// Full-width coloured band at the top of the first page.
#[derive(Clone, Debug)]
pub struct Banner<'a> {
    pub height: f32,
    pub fill: Rgb,
    pub logo: Option<(&'a Logo, Frame)>,
    pub title: &'a str,
    pub title_size: f32,
    pub subtitle: &'a str,
    pub text_x: f32,
    pub title_y: f32,
    pub subtitle_y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
    pub y: f32,
    /// Zero-based index of the page being written.
    pub page: usize,
}

pub struct Layout<S: Surface> {
    surface: S,
    geometry: PageGeometry,
    palette: Palette,
    footer: Footer,
    cursor: Cursor,
}

impl<S: Surface> Layout<S> {
    pub fn new(surface: S, geometry: PageGeometry, palette: Palette, footer: Footer) -> Self {
        Self {
            surface,
            geometry,
            palette,
            footer,
            cursor: Cursor {
                y: geometry.margin_top,
                page: 0,
            },
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn y(&self) -> f32 {
        self.cursor.y
    }

    pub fn set_y(&mut self, y: f32) {
        self.cursor.y = y;
    }

    pub fn advance(&mut self, dy: f32) {
        self.cursor.y += dy;
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Breaks the page when `needed` more millimetres would cross the footer
    /// reserve. Returns whether a break happened. A fresh page is never
    /// broken again, however much is asked for.
    pub fn ensure_space(&mut self, needed: f32) -> bool {
        let at_top = self.cursor.y <= self.geometry.margin_top;
        if !at_top && self.cursor.y + needed > self.geometry.break_limit() {
            self.page_break();
            true
        } else {
            false
        }
    }

    pub fn page_break(&mut self) {
        self.draw_footer();
        self.surface.add_page();
        self.cursor = Cursor {
            y: self.geometry.margin_top,
            page: self.cursor.page + 1,
        };
        log::debug!("page break → page {}", self.cursor.page + 1);
    }

    fn draw_footer(&mut self) {
        let style = TextStyle::new(Font::Regular, Footer::SIZE, self.palette.muted);
        let centre = self.geometry.page.width / 2.0;
        let bottom = self.geometry.page.height;
        for (line, offset) in self.footer.lines.iter().zip(Footer::OFFSETS) {
            self.surface
                .text(line, centre, bottom - offset, &style, Align::Center);
        }
    }

    /// Writes the last footer and hands back the backend's output.
    pub fn finish(mut self) -> S::Output {
        self.draw_footer();
        self.surface.finish()
    }

    fn field_style(&self) -> TextStyle {
        TextStyle::new(Font::Regular, FIELD_FONT_SIZE, self.palette.text)
    }

    fn rule(&self) -> Stroke {
        Stroke {
            color: self.palette.rule,
            width: RULE_WIDTH,
        }
    }

    pub fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.surface.text(text, x, y, &style, Align::Left);
    }

    pub fn banner(&mut self, banner: &Banner<'_>) {
        let page_width = self.geometry.page.width;
        self.surface.rect(
            Frame {
                x: 0.0,
                y: 0.0,
                width: page_width,
                height: banner.height,
            },
            0.0,
            &Paint::Fill(banner.fill),
        );
        if let Some((logo, frame)) = banner.logo {
            self.surface.image(logo, frame);
        }
        let white = [255, 255, 255];
        self.text(
            banner.title,
            banner.text_x,
            banner.title_y,
            TextStyle::new(Font::Bold, banner.title_size, white),
        );
        self.text(
            banner.subtitle,
            banner.text_x,
            banner.subtitle_y,
            TextStyle::new(Font::Regular, 9.0, white),
        );
    }

    /// Numbered section band in the accent colour.
    pub fn section_header(&mut self, number: u32, title: &str) {
        self.ensure_space(SECTION_RESERVE);
        let g = self.geometry;
        let y = self.cursor.y;
        self.surface.rect(
            Frame {
                x: g.margin_left,
                y,
                width: g.content_width(),
                height: SECTION_BAND_HEIGHT,
            },
            1.5,
            &Paint::Fill(self.palette.accent),
        );
        self.text(
            &format!("{number}. {title}"),
            g.margin_left + 5.0,
            y + 6.5,
            TextStyle::new(Font::Bold, 11.0, [255, 255, 255]),
        );
        self.cursor.y += 13.0;
    }

    /// Section title underlined with a full-width rule.
    pub fn titled_rule(&mut self, title: &str) {
        let g = self.geometry;
        self.text(
            title,
            g.margin_left,
            self.cursor.y,
            TextStyle::new(Font::Bold, 11.0, self.palette.text),
        );
        self.cursor.y += 2.0;
        let y = self.cursor.y;
        self.surface.line(
            (g.margin_left, y),
            (g.right_edge(), y),
            &Stroke {
                color: self.palette.muted,
                width: RULE_WIDTH,
            },
        );
        self.cursor.y += 6.0;
    }

    /// Bold sub-heading inside a section; the caller advances the cursor.
    pub fn subheading(&mut self, text: &str) {
        let x = self.geometry.margin_left + 2.0;
        let y = self.cursor.y;
        self.text(text, x, y, TextStyle::new(Font::Bold, 10.0, self.palette.text));
    }

    /// Label followed by a write-in rule across the content width.
    pub fn field_line(&mut self, label: &str) {
        self.ensure_space(FIELD_RESERVE);
        let g = self.geometry;
        let style = self.field_style();
        self.text(label, g.margin_left + 2.0, self.cursor.y, style);
        self.cursor.y += 1.0;
        let rule_y = self.cursor.y + 3.0;
        let rule = self.rule();
        self.surface.line(
            (g.margin_left + 2.0, rule_y),
            (g.right_edge() - 2.0, rule_y),
            &rule,
        );
        self.cursor.y += 8.0;
    }

    fn inline_field(&mut self, label: &str, x: f32, line_end: f32, y: f32) {
        let style = self.field_style();
        self.text(label, x, y, style);
        let label_w = self.surface.text_width(label, style.font, style.size) + 2.0;
        let rule = self.rule();
        self.surface
            .line((x + label_w, y + 3.0), (line_end, y + 3.0), &rule);
    }

    /// Two label + rule pairs sharing one row, split around a gutter.
    pub fn two_fields(&mut self, left: &str, right: &str) {
        self.ensure_space(FIELD_RESERVE);
        let g = self.geometry;
        let half = g.content_width() / 2.0 - 4.0;
        let second_col = g.margin_left + g.content_width() / 2.0 + 4.0;
        let y = self.cursor.y;
        self.inline_field(left, g.margin_left + 2.0, g.margin_left + half, y);
        self.inline_field(right, second_col, g.right_edge() - 2.0, y);
        self.cursor.y += 9.0;
    }

    pub fn checkbox(&mut self, label: &str) {
        self.ensure_space(CHECKBOX_RESERVE);
        let g = self.geometry;
        let y = self.cursor.y;
        let rule = self.rule();
        self.surface.rect(
            Frame {
                x: g.margin_left + 4.0,
                y: y - 3.0,
                width: 4.0,
                height: 4.0,
            },
            0.0,
            &Paint::Stroke(rule),
        );
        let style = self.field_style();
        self.text(label, g.margin_left + 12.0, y, style);
        self.cursor.y += 7.0;
    }

    /// Optional label and `lines` write-in rules. The whole block is
    /// reserved at once so it always lands on a single page; more lines than
    /// a page holds are cut with a warning.
    pub fn text_area(&mut self, label: Option<&str>, lines: usize) {
        let g = self.geometry;
        let fits = ((g.break_limit() - g.margin_top - 8.0) / TEXT_AREA_LINE_RESERVE).floor();
        let fits = fits.max(0.0) as usize;
        let lines = if lines > fits {
            log::warn!("text area of {lines} lines cut to {fits} to fit one page");
            fits
        } else {
            lines
        };
        self.ensure_space(8.0 + lines as f32 * TEXT_AREA_LINE_RESERVE);
        if let Some(label) = label.filter(|l| !l.is_empty()) {
            let style = self.field_style();
            self.text(label, g.margin_left + 2.0, self.cursor.y, style);
        }
        self.cursor.y += 4.0;
        let rule = self.rule();
        for _ in 0..lines {
            self.cursor.y += TEXT_AREA_LINE_HEIGHT;
            let y = self.cursor.y;
            self.surface
                .line((g.margin_left + 2.0, y), (g.right_edge() - 2.0, y), &rule);
        }
        self.cursor.y += 4.0;
    }

    /// Small italic guidance text wrapped to the content width.
    pub fn wrapped_note(&mut self, text: &str) {
        let style = TextStyle::new(Font::Italic, NOTE_FONT_SIZE, self.palette.muted);
        self.paragraph(text, style, 2.0, NOTE_LINE_HEIGHT, 2.0);
    }

    fn wrap(&self, text: &str, style: TextStyle, inset: f32) -> Vec<String> {
        let width = self.geometry.content_width() - 2.0 * inset;
        self.surface
            .split_to_width(text, style.font, style.size, width)
    }

    /// Height [`Layout::paragraph`] would take, excluding the gap after it.
    pub fn paragraph_height(
        &self,
        text: &str,
        style: TextStyle,
        inset: f32,
        line_height: f32,
    ) -> f32 {
        self.wrap(text, style, inset).len() as f32 * line_height
    }

    /// Word-wrapped text block starting `inset` from the left margin.
    /// Advances by the wrapped line count times `line_height`, plus `after`.
    /// A block that fits on one page is kept together; a longer one flows
    /// line by line.
    pub fn paragraph(
        &mut self,
        text: &str,
        style: TextStyle,
        inset: f32,
        line_height: f32,
        after: f32,
    ) -> usize {
        let g = self.geometry;
        let lines = self.wrap(text, style, inset);
        let height = lines.len() as f32 * line_height;
        if height <= g.break_limit() - g.margin_top {
            self.ensure_space(height);
        }
        let x = g.margin_left + inset;
        for line in &lines {
            self.ensure_space(line_height);
            let y = self.cursor.y;
            self.text(line, x, y, style);
            self.cursor.y += line_height;
        }
        self.cursor.y += after;
        lines.len()
    }

    /// Bold label and plain value at a fixed `y`, for pre-sized panels.
    /// Multi-line values are joined onto one line with commas. Missing values
    /// print as an em dash.
    pub fn label_value(&mut self, label: &str, value: &str, y: f32) {
        let g = self.geometry;
        let joined = single_line(value);
        let value = if joined.is_empty() { "\u{2014}" } else { joined.as_str() };
        self.text(
            label,
            g.margin_left + 5.0,
            y,
            TextStyle::new(Font::Bold, 10.0, self.palette.text),
        );
        self.text(
            value,
            g.margin_left + VALUE_COLUMN,
            y,
            TextStyle::new(Font::Regular, 10.0, self.palette.text),
        );
    }

    /// Rounded panel with a fill and an outline.
    pub fn panel(&mut self, frame: Frame) {
        self.surface
            .rect(frame, 2.0, &Paint::Fill(self.palette.panel));
        self.surface.rect(
            frame,
            2.0,
            &Paint::Stroke(Stroke {
                color: self.palette.text,
                width: 0.5,
            }),
        );
    }
}

/// Lines of `value`, trimmed, blanks dropped, joined with ", ".
fn single_line(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
