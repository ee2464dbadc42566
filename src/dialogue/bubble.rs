//! Bubble rendering — turns a `BubbleLayout` into a stage node.

use serde::{Deserialize, Serialize};

use crate::script::PictogramRegistry;
use crate::stage::{Node, layer};
use crate::types::{Color, DrawOp, NamedColor, Style};

use super::layout::{BubbleLayout, PlacedBox};
use super::tokenizer::Token;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleTheme {
    pub backdrop: Style,
    pub body: Style,
    pub speaker: Style,
    pub pictogram: Style,
}

impl Default for BubbleTheme {
    fn default() -> Self {
        let paper = Some(Color::Named(NamedColor::White));
        Self {
            backdrop: Style {
                bg: paper.clone(),
                ..Default::default()
            },
            body: Style {
                fg: Some(Color::Named(NamedColor::Black)),
                bg: paper.clone(),
                bold: true,
                dim: false,
            },
            speaker: Style {
                fg: Some(Color::Named(NamedColor::Blue)),
                bg: paper.clone(),
                bold: true,
                dim: false,
            },
            pictogram: Style {
                fg: Some(Color::Named(NamedColor::Magenta)),
                bg: paper,
                bold: true,
                dim: false,
            },
        }
    }
}

const BACKDROP_Z: i32 = 0;
const CONTENT_Z: i32 = 1;

/// Build a fresh node for `layout`. The caller removes the previous bubble;
/// nothing here touches earlier nodes.
pub fn render(layout: &BubbleLayout, pictograms: &PictogramRegistry, theme: &BubbleTheme) -> Node {
    let mut ops = Vec::new();
    draw_backdrop(&mut ops, layout, &theme.backdrop);

    if let Some(speaker) = &layout.speaker {
        draw_text(&mut ops, speaker, &speaker.token.source_text(), &theme.speaker);
    }

    for placed in &layout.boxes {
        match &placed.token {
            Token::Word(text) => draw_text(&mut ops, placed, text, &theme.body),
            Token::Pictogram(name) => {
                if let Some(pic) = pictograms.get(name) {
                    let cells = placed.width.floor().max(0.0) as usize;
                    let glyph: String = pic.glyph.chars().take(cells).collect();
                    draw_text(&mut ops, placed, &glyph, &theme.pictogram);
                }
            }
            // The backdrop already paints the gap.
            Token::Whitespace(_) => {}
        }
    }

    Node::new(ops, layer::BUBBLE)
}

/// Rounded backdrop: a filled rectangle whose corner cells are left empty.
fn draw_backdrop(ops: &mut Vec<DrawOp>, layout: &BubbleLayout, style: &Style) {
    let left = (-layout.padding / 2.0).floor() as i32;
    let top = (-layout.padding / 2.0).floor() as i32;
    let w = layout.total_width.ceil().max(0.0) as i32;
    let h = layout.total_height.ceil().max(0.0) as i32;
    let rounded = w >= 3 && h >= 2;

    for row in 0..h {
        for col in 0..w {
            let corner = (row == 0 || row == h - 1) && (col == 0 || col == w - 1);
            if rounded && corner {
                continue;
            }
            ops.push(DrawOp {
                x: left + col,
                y: top + row,
                ch: ' ',
                style: style.clone(),
                z_order: BACKDROP_Z,
            });
        }
    }
}

fn draw_text(ops: &mut Vec<DrawOp>, placed: &PlacedBox, text: &str, style: &Style) {
    let x0 = placed.x.floor() as i32;
    let y = placed.y.floor() as i32;
    for (i, ch) in text.chars().enumerate() {
        ops.push(DrawOp {
            x: x0 + i as i32,
            y,
            ch,
            style: style.clone(),
            z_order: CONTENT_Z,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::layout::{LayoutEngine, LayoutSettings};
    use crate::dialogue::measure::CellMeasure;
    use crate::dialogue::tokenizer::tokenize;
    use crate::script::PictogramEntry;

    fn bubble(text: &str, glyph: Option<&str>) -> Node {
        let measure = CellMeasure::default();
        let reg = PictogramRegistry::from_entries(&[PictogramEntry {
            name: "wave".into(),
            url: "https://example.com/wave.png".into(),
            glyph: glyph.map(str::to_string),
        }]);
        let engine = LayoutEngine::new(&measure, &reg, LayoutSettings::default());
        let layout = engine.layout(&tokenize(text), Some("A"), 80.0);
        render(&layout, &reg, &BubbleTheme::default())
    }

    fn row_text(node: &Node, y: i32) -> String {
        let mut content: Vec<_> = node
            .ops
            .iter()
            .filter(|op| op.y == y && op.z_order == CONTENT_Z)
            .collect();
        content.sort_by_key(|op| op.x);
        content.iter().map(|op| op.ch).collect()
    }

    #[test]
    fn renders_speaker_words_and_glyph() {
        let node = bubble("Hi {wave}!", Some(":)"));
        assert_eq!(node.z_order, layer::BUBBLE);
        assert_eq!(row_text(&node, 0), "A:");
        assert_eq!(row_text(&node, 1), "Hi:)!");
        let bang = node.ops.iter().find(|op| op.ch == '!').unwrap();
        assert_eq!(bang.x, 6);
    }

    #[test]
    fn backdrop_covers_total_size_minus_corners() {
        let node = bubble("Hi", None);
        let backdrop: Vec<_> = node.ops.iter().filter(|op| op.z_order == BACKDROP_Z).collect();
        // 16 x 3 rectangle starting at (-1, -1), four corners removed.
        assert_eq!(backdrop.len(), 16 * 3 - 4);
        assert!(backdrop.iter().all(|op| op.x >= -1 && op.x < 15));
        assert!(backdrop.iter().all(|op| op.y >= -1 && op.y < 2));
        assert!(!backdrop.iter().any(|op| op.x == -1 && op.y == -1));
    }

    #[test]
    fn backdrop_sits_behind_content() {
        let node = bubble("Hi {wave}!", None);
        let max_backdrop = node
            .ops
            .iter()
            .filter(|op| op.ch == ' ')
            .map(|op| op.z_order)
            .max()
            .unwrap();
        assert!(node.ops.iter().filter(|op| op.ch != ' ').all(|op| op.z_order > max_backdrop));
    }
}
