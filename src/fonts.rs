//! Standard-14 Helvetica faces: metrics, WinAnsi encoding and word wrapping.
//!
//! Nothing is embedded; every PDF viewer ships these faces, so only the
//! advance widths are needed for layout.

/// Millimetres per PDF point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Font {
    Regular,
    Bold,
    Italic,
}

impl Font {
    pub const ALL: [Font; 3] = [Font::Regular, Font::Bold, Font::Italic];

    pub fn base_font(self) -> &'static [u8] {
        match self {
            Font::Regular => b"Helvetica",
            Font::Bold => b"Helvetica-Bold",
            Font::Italic => b"Helvetica-Oblique",
        }
    }

    /// Resource name inside page dictionaries.
    pub fn resource_name(self) -> &'static [u8] {
        match self {
            Font::Regular => b"F1",
            Font::Bold => b"F2",
            Font::Italic => b"F3",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            Font::Regular | Font::Italic => &HELVETICA,
            Font::Bold => &HELVETICA_BOLD,
        }
    }

    /// Advance width of one char in 1000-units.
    pub fn char_width_1000(self, ch: char) -> f32 {
        match ch {
            ' '..='~' => self.widths()[ch as usize - 32] as f32,
            '\u{2022}' => 350.0,
            '\u{2013}' => 556.0,
            '\u{2014}' => 1000.0,
            '\u{2018}' | '\u{2019}' => if self == Font::Bold { 278.0 } else { 222.0 },
            '\u{201C}' | '\u{201D}' => if self == Font::Bold { 500.0 } else { 333.0 },
            _ => 556.0,
        }
    }
}

// AFM advance widths for ASCII 0x20..=0x7E.
#[rustfmt::skip]
static HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width of `text` in millimetres at `size` points.
pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: f32 = text.chars().map(|ch| font.char_width_1000(ch)).sum();
    units * size / 1000.0 * MM_PER_PT
}

/// Greedy word wrap to `max_width` millimetres. Explicit newlines start a
/// new line; a single word wider than the line is broken by characters.
pub fn split_to_width(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let space = text_width(" ", font, size);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_w = 0.0f32;
        let mut started = false;

        for word in paragraph.split(' ') {
            let word_w = text_width(word, font, size);
            if started && current_w + space + word_w <= max_width {
                current.push(' ');
                current.push_str(word);
                current_w += space + word_w;
                continue;
            }

            if started {
                lines.push(std::mem::take(&mut current));
            }
            started = true;
            if word_w <= max_width {
                current.push_str(word);
                current_w = word_w;
                continue;
            }

            // Hard-break an overlong word.
            current_w = 0.0;
            for ch in word.chars() {
                let ch_w = font.char_width_1000(ch) * size / 1000.0 * MM_PER_PT;
                if current_w + ch_w > max_width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_w = 0.0;
                }
                current.push(ch);
                current_w += ch_w;
            }
        }
        lines.push(current);
    }

    lines
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Unmappable characters become `?`.
pub fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c as u32 {
            0x0000..=0x007F => c as u8,
            0x00A0..=0x00FF => c as u8, // Latin-1 supplement maps directly
            0x20AC => 0x80,
            0x201A => 0x82,
            0x0192 => 0x83,
            0x201E => 0x84,
            0x2026 => 0x85,
            0x2020 => 0x86,
            0x2021 => 0x87,
            0x02C6 => 0x88,
            0x2030 => 0x89,
            0x0160 => 0x8A,
            0x2039 => 0x8B,
            0x0152 => 0x8C,
            0x017D => 0x8E,
            0x2018 => 0x91,
            0x2019 => 0x92,
            0x201C => 0x93,
            0x201D => 0x94,
            0x2022 => 0x95, // bullet
            0x2013 => 0x96,
            0x2014 => 0x97,
            0x02DC => 0x98,
            0x2122 => 0x99,
            0x0161 => 0x9A,
            0x203A => 0x9B,
            0x0153 => 0x9C,
            0x017E => 0x9E,
            0x0178 => 0x9F,
            _ => b'?',
        })
        .collect()
}
