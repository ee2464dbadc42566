//! Dialogue bubbles — tokenizing, laying out and drawing one line.
//!
//! The pipeline is pure: `tokenize` → `LayoutEngine::layout` → `bubble::render`.
//! Nothing here knows about terminals, time or the playback order.

pub mod bubble;
pub mod font;
pub mod layout;
pub mod measure;
pub mod tokenizer;

pub use bubble::BubbleTheme;
pub use layout::{BubbleLayout, LayoutEngine, LayoutSettings, PlacedBox};
pub use measure::{CellMeasure, Font, Measure};
pub use tokenizer::{Token, tokenize};
