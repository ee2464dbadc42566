//! Shared boundary types for the dialogue player.
//!
//! This module defines the data contracts between the stages:
//! - Stage → Renderer (in-memory): `ResolvedScene` containing `DrawOp`s
//! - Renderer → Player (in-memory): `Frame`s of `Cell`s

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Shared style primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(NamedColor),
    Rgb { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl NamedColor {
    /// Conventional RGB value of the named terminal colour.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            NamedColor::Black => (0, 0, 0),
            NamedColor::Red => (205, 49, 49),
            NamedColor::Green => (13, 188, 121),
            NamedColor::Yellow => (229, 229, 16),
            NamedColor::Blue => (36, 114, 200),
            NamedColor::Magenta => (188, 63, 188),
            NamedColor::Cyan => (17, 168, 205),
            NamedColor::White => (229, 229, 229),
        }
    }
}

impl Color {
    /// Scale the colour towards black by `opacity` (clamped to `[0, 1]`).
    ///
    /// A fully opaque colour is returned unchanged so named colours keep
    /// using the terminal palette.
    pub fn faded(&self, opacity: f32) -> Color {
        if opacity >= 1.0 {
            return self.clone();
        }
        let a = opacity.max(0.0);
        let (r, g, b) = match self {
            Color::Named(n) => n.rgb(),
            Color::Rgb { r, g, b } => (*r, *g, *b),
        };
        let scale = |c: u8| (c as f32 * a).round() as u8;
        Color::Rgb {
            r: scale(r),
            g: scale(g),
            b: scale(b),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<Color>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub dim: bool,
}

impl Style {
    /// The same style with both colours faded by `opacity`.
    pub fn faded(&self, opacity: f32) -> Style {
        Style {
            fg: self.fg.as_ref().map(|c| c.faded(opacity)),
            bg: self.bg.as_ref().map(|c| c.faded(opacity)),
            bold: self.bold,
            dim: self.dim,
        }
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Current drawable area, in layout units (terminal cells for the player).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// ---------------------------------------------------------------------------
// Stage → Renderer boundary
// ---------------------------------------------------------------------------

/// One character cell to paint. Coordinates are node-local while the op
/// lives inside a stage node, absolute once resolved into a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOp {
    pub x: i32,
    pub y: i32,
    pub ch: char,
    pub style: Style,
    pub z_order: i32,
}

#[derive(Debug, Clone)]
pub struct ResolvedScene {
    pub width: u16,
    pub height: u16,
    pub ops: Vec<DrawOp>,
}

// ---------------------------------------------------------------------------
// Renderer → Player boundary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}

#[derive(Debug, Clone)]
pub enum Frame {
    Full { cells: Vec<Vec<Cell>> },
    Diff { changes: Vec<CellChange> },
}
