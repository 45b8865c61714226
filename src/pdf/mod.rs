//! Rendering capability used by the form layouts.
//!
//! Layout code talks to a [`Surface`] in millimetres with a top-left origin
//! and an explicit style on every call. [`PdfRenderer`] writes real PDF
//! through `pdf-writer`; [`Recorder`] keeps the draw calls for inspection.

pub mod layout;
mod recorder;

use std::path::Path;
use std::time::Instant;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::fonts::{self, Font, MM_PER_PT, to_winansi_bytes};

pub use recorder::{DrawOp, Recorder, Recording, RecordingRenderer};

pub type Rgb = [u8; 3];

/// Page dimensions in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width: 210.0,
        height: 297.0,
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    /// Points.
    pub size: f32,
    pub color: Rgb,
}

impl TextStyle {
    pub const fn new(font: Font, size: f32, color: Rgb) -> Self {
        Self { font, size, color }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    /// Millimetres.
    pub width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    Fill(Rgb),
    Stroke(Stroke),
}

/// Axis-aligned box, top-left origin, millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Decoded PNG ready for embedding.
#[derive(Clone, Debug, PartialEq)]
pub struct Logo {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub rgb: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

impl Logo {
    pub fn from_png(data: &[u8]) -> Result<Self, Error> {
        let cursor = std::io::Cursor::new(data);
        let reader = image::ImageReader::with_format(
            std::io::BufReader::new(cursor),
            image::ImageFormat::Png,
        );
        let decoded = reader.decode().map_err(|e| Error::Image(e.to_string()))?;
        let rgba: image::RgbaImage = decoded.to_rgba8();
        let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

        Ok(Self {
            pixel_width: rgba.width(),
            pixel_height: rgba.height(),
            rgb: rgba.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect(),
            alpha: has_alpha.then(|| rgba.pixels().map(|p| p.0[3]).collect()),
        })
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let data = std::fs::read(path).map_err(|e| {
            Error::Image(format!("{}: {}", path.display(), e))
        })?;
        Self::from_png(&data)
    }
}

/// Drawing and measurement primitives a layout needs from a backend.
pub trait Surface {
    type Output;

    fn page_size(&self) -> PageSize;

    /// Pages started so far; a fresh surface already has one.
    fn page_count(&self) -> usize;

    fn add_page(&mut self);

    /// Draws one line of text with its baseline at `y`. With
    /// [`Align::Center`], `x` is the horizontal centre.
    fn text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle, align: Align);

    fn line(&mut self, from: (f32, f32), to: (f32, f32), stroke: &Stroke);

    fn rect(&mut self, frame: Frame, radius: f32, paint: &Paint);

    fn image(&mut self, logo: &Logo, frame: Frame);

    fn finish(self) -> Self::Output;

    fn text_width(&self, text: &str, font: Font, size: f32) -> f32 {
        fonts::text_width(text, font, size)
    }

    fn split_to_width(&self, text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
        fonts::split_to_width(text, font, size, max_width)
    }
}

/// Opens a fresh surface per document.
pub trait Renderer {
    type Surface: Surface;

    /// Fails with [`Error::RendererUnavailable`] before any layout runs.
    fn open(&self, page: PageSize) -> Result<Self::Surface, Error>;
}

#[derive(Clone, Copy, Debug)]
pub struct PdfRenderer {
    pub compress: bool,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self { compress: true }
    }
}

impl PdfRenderer {
    pub fn uncompressed() -> Self {
        Self { compress: false }
    }
}

impl Renderer for PdfRenderer {
    type Surface = PdfSurface;

    fn open(&self, page: PageSize) -> Result<PdfSurface, Error> {
        if !(page.width > 0.0 && page.height > 0.0) {
            return Err(Error::RendererUnavailable(format!(
                "unusable page size {}x{} mm",
                page.width, page.height
            )));
        }
        Ok(PdfSurface {
            page,
            pages: vec![Content::new()],
            images: Vec::new(),
            compress: self.compress,
        })
    }
}

fn pt(mm: f32) -> f32 {
    mm / MM_PER_PT
}

fn rgb_f32([r, g, b]: Rgb) -> (f32, f32, f32) {
    (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

/// Bezier circle constant for quarter arcs.
const KAPPA: f32 = 0.552_284_8;

pub struct PdfSurface {
    page: PageSize,
    pages: Vec<Content>,
    images: Vec<Logo>,
    compress: bool,
}

impl PdfSurface {
    fn content(&mut self) -> &mut Content {
        // `pages` is never empty: `open` seeds the first page.
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Flip a top-left millimetre coordinate into PDF user space.
    fn to_pdf(&self, x: f32, y: f32) -> (f32, f32) {
        (pt(x), pt(self.page.height - y))
    }
}

impl Surface for PdfSurface {
    type Output = Vec<u8>;

    fn page_size(&self) -> PageSize {
        self.page
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn add_page(&mut self) {
        self.pages.push(Content::new());
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle, align: Align) {
        if text.is_empty() {
            return;
        }
        let start_x = match align {
            Align::Left => x,
            Align::Center => x - fonts::text_width(text, style.font, style.size) / 2.0,
        };
        let (px, py) = self.to_pdf(start_x, y);
        let (r, g, b) = rgb_f32(style.color);
        let bytes = to_winansi_bytes(text);
        let content = self.content();
        content.save_state();
        content.set_fill_rgb(r, g, b);
        content
            .begin_text()
            .set_font(Name(style.font.resource_name()), style.size)
            .next_line(px, py)
            .show(Str(&bytes))
            .end_text();
        content.restore_state();
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), stroke: &Stroke) {
        let (x1, y1) = self.to_pdf(from.0, from.1);
        let (x2, y2) = self.to_pdf(to.0, to.1);
        let (r, g, b) = rgb_f32(stroke.color);
        let width = pt(stroke.width);
        let content = self.content();
        content.save_state();
        content.set_line_width(width);
        content.set_stroke_rgb(r, g, b);
        content.move_to(x1, y1);
        content.line_to(x2, y2);
        content.stroke();
        content.restore_state();
    }

    fn rect(&mut self, frame: Frame, radius: f32, paint: &Paint) {
        let (left, top) = self.to_pdf(frame.x, frame.y);
        let w = pt(frame.width);
        let h = pt(frame.height);
        let bottom = top - h;
        let right = left + w;
        let r = pt(radius).min(w / 2.0).min(h / 2.0);
        let content = self.content();
        content.save_state();
        match paint {
            Paint::Fill(color) => {
                let (cr, cg, cb) = rgb_f32(*color);
                content.set_fill_rgb(cr, cg, cb);
            }
            Paint::Stroke(stroke) => {
                let (cr, cg, cb) = rgb_f32(stroke.color);
                content.set_line_width(pt(stroke.width));
                content.set_stroke_rgb(cr, cg, cb);
            }
        }
        if r <= 0.0 {
            content.rect(left, bottom, w, h);
        } else {
            let k = r * KAPPA;
            content.move_to(left + r, bottom);
            content.line_to(right - r, bottom);
            content.cubic_to(right - r + k, bottom, right, bottom + r - k, right, bottom + r);
            content.line_to(right, top - r);
            content.cubic_to(right, top - r + k, right - r + k, top, right - r, top);
            content.line_to(left + r, top);
            content.cubic_to(left + r - k, top, left, top - r + k, left, top - r);
            content.line_to(left, bottom + r);
            content.cubic_to(left, bottom + r - k, left + r - k, bottom, left + r, bottom);
            content.close_path();
        }
        match paint {
            Paint::Fill(_) => content.fill_nonzero(),
            Paint::Stroke(_) => content.stroke(),
        };
        content.restore_state();
    }

    fn image(&mut self, logo: &Logo, frame: Frame) {
        self.images.push(logo.clone());
        let name = format!("Im{}", self.images.len());
        let (x, top) = self.to_pdf(frame.x, frame.y);
        let w = pt(frame.width);
        let h = pt(frame.height);
        let content = self.content();
        content.save_state();
        content.transform([w, 0.0, 0.0, h, x, top - h]);
        content.x_object(Name(name.as_bytes()));
        content.restore_state();
    }

    fn finish(self) -> Vec<u8> {
        let t0 = Instant::now();
        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();

        let font_refs: Vec<(Font, Ref)> = Font::ALL.iter().map(|&f| (f, alloc())).collect();
        for (font, font_ref) in &font_refs {
            pdf.type1_font(*font_ref)
                .base_font(Name(font.base_font()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        let mut image_xobjects: Vec<(String, Ref)> = Vec::new();
        for (i, logo) in self.images.iter().enumerate() {
            let xobj_ref = alloc();
            let smask_ref = logo.alpha.as_ref().map(|alpha| {
                let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(alpha, 6);
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(logo.pixel_width as i32);
                mask.height(logo.pixel_height as i32);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                mask_ref
            });

            let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&logo.rgb, 6);
            let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(logo.pixel_width as i32);
            xobj.height(logo.pixel_height as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = smask_ref {
                xobj.s_mask(mask_ref);
            }
            image_xobjects.push((format!("Im{}", i + 1), xobj_ref));
        }

        let n = self.pages.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

        let mut raw_bytes = 0usize;
        for (i, c) in self.pages.into_iter().enumerate() {
            let raw = c.finish();
            raw_bytes += raw.as_slice().len();
            if self.compress {
                let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
                pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
            } else {
                pdf.stream(content_ids[i], raw.as_slice());
            }
        }

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        let media_box = Rect::new(0.0, 0.0, pt(self.page.width), pt(self.page.height));
        for i in 0..n {
            let mut page = pdf.page(page_ids[i]);
            page.media_box(media_box)
                .parent(pages_id)
                .contents(content_ids[i]);
            let mut resources = page.resources();
            {
                let mut fonts = resources.fonts();
                for (font, font_ref) in &font_refs {
                    fonts.pair(Name(font.resource_name()), *font_ref);
                }
            }
            if !image_xobjects.is_empty() {
                let mut xobjects = resources.x_objects();
                for (name, xobj_ref) in &image_xobjects {
                    xobjects.pair(Name(name.as_bytes()), *xobj_ref);
                }
            }
        }

        let bytes = pdf.finish();
        log::debug!(
            "PDF assembly: {n} pages, {raw_bytes} content bytes, {} images → {} bytes in {:.1}ms",
            image_xobjects.len(),
            bytes.len(),
            t0.elapsed().as_secs_f64() * 1000.0,
        );
        bytes
    }
}
