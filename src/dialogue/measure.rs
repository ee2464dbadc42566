//! Text and pictogram measurement supplied by the rendering surface.

use crate::types::Size;

/// Font a piece of bubble text is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Dialogue words and fallback labels.
    Body,
    /// The bold, smaller speaker-name line.
    SpeakerName,
}

pub trait Measure {
    fn text(&self, text: &str, font: Font) -> Size;
    fn pictogram(&self, name: &str) -> Size;
}

impl<M: Measure + ?Sized> Measure for &M {
    fn text(&self, text: &str, font: Font) -> Size {
        (**self).text(text, font)
    }

    fn pictogram(&self, name: &str) -> Size {
        (**self).pictogram(name)
    }
}

/// Character-cell measurement: one unit per `char`, one row per line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMeasure {
    /// Side of the square a pictogram occupies.
    pub pictogram_size: f64,
    /// Blank columns after each pictogram.
    pub pictogram_gap: f64,
}

impl Default for CellMeasure {
    fn default() -> Self {
        Self {
            pictogram_size: 2.0,
            pictogram_gap: 1.0,
        }
    }
}

impl Measure for CellMeasure {
    fn text(&self, text: &str, _font: Font) -> Size {
        Size::new(text.chars().count() as f64, 1.0)
    }

    fn pictogram(&self, _name: &str) -> Size {
        // Terminal rows are roughly twice as tall as columns are wide, so a
        // square is `size` columns by one row.
        Size::new(self.pictogram_size + self.pictogram_gap, 1.0)
    }
}
