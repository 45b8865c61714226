use super::{Align, Frame, Logo, PageSize, Paint, Renderer, Stroke, Surface, TextStyle};
use crate::error::Error;

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
        align: Align,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        stroke: Stroke,
    },
    Rect {
        frame: Frame,
        radius: f32,
        paint: Paint,
    },
    Image {
        frame: Frame,
    },
}

/// A surface that keeps every draw call, grouped by page.
#[derive(Clone, Debug)]
pub struct Recorder {
    page: PageSize,
    pages: Vec<Vec<DrawOp>>,
}

impl Recorder {
    pub fn new(page: PageSize) -> Self {
        Self {
            page,
            pages: vec![Vec::new()],
        }
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.push(op);
        }
    }
}

/// Renderer handing out [`Recorder`] surfaces.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecordingRenderer;

impl Renderer for RecordingRenderer {
    type Surface = Recorder;

    fn open(&self, page: PageSize) -> Result<Recorder, Error> {
        Ok(Recorder::new(page))
    }
}

impl Surface for Recorder {
    type Output = Recording;

    fn page_size(&self) -> PageSize {
        self.page
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn add_page(&mut self) {
        self.pages.push(Vec::new());
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle, align: Align) {
        self.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            style: *style,
            align,
        });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), stroke: &Stroke) {
        self.push(DrawOp::Line {
            from,
            to,
            stroke: *stroke,
        });
    }

    fn rect(&mut self, frame: Frame, radius: f32, paint: &Paint) {
        self.push(DrawOp::Rect {
            frame,
            radius,
            paint: *paint,
        });
    }

    fn image(&mut self, _logo: &Logo, frame: Frame) {
        self.push(DrawOp::Image { frame });
    }

    fn finish(self) -> Recording {
        Recording {
            page: self.page,
            pages: self.pages,
        }
    }
}

/// Finished recording of a document.
#[derive(Clone, Debug)]
pub struct Recording {
    pub page: PageSize,
    pub pages: Vec<Vec<DrawOp>>,
}

impl Recording {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text runs on page `index` in drawing order.
    pub fn texts(&self, index: usize) -> Vec<&str> {
        self.pages
            .get(index)
            .into_iter()
            .flatten()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn all_texts(&self) -> Vec<&str> {
        (0..self.pages.len()).flat_map(|i| self.texts(i)).collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.all_texts().iter().any(|t| t.contains(needle))
    }

    /// How many pages carry a text run equal to `text`.
    pub fn pages_with_text(&self, text: &str) -> usize {
        (0..self.pages.len())
            .filter(|&i| self.texts(i).contains(&text))
            .count()
    }

    /// Largest text baseline on any page.
    pub fn max_text_y(&self) -> f32 {
        self.pages
            .iter()
            .flatten()
            .filter_map(|op| match op {
                DrawOp::Text { y, .. } => Some(*y),
                _ => None,
            })
            .fold(0.0, f32::max)
    }
}
