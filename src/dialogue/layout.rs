//! Line layout — greedy wrapping of words and pictograms inside a bubble.
//!
//! Coordinates are bubble-local: the origin is the top-left of the first
//! line (the speaker line when present). The backdrop extends `padding / 2`
//! beyond the origin on the left and top.

use crate::script::PictogramRegistry;

use super::measure::{Font, Measure};
use super::tokenizer::Token;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    pub padding: f64,
    pub line_spacing: f64,
    /// Vertical gap between the speaker line and the first content line.
    /// Zero in cell units: the bold name row already sets itself apart.
    pub speaker_gap: f64,
    pub min_bubble_width: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            padding: 2.0,
            line_spacing: 0.0,
            speaker_gap: 0.0,
            min_bubble_width: 16.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBox {
    pub token: Token,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BubbleLayout {
    /// The `"name:"` line, when a speaker prefix was requested.
    pub speaker: Option<PlacedBox>,
    pub boxes: Vec<PlacedBox>,
    pub content_width: f64,
    pub content_height: f64,
    pub total_width: f64,
    pub total_height: f64,
    /// Padding the layout was computed with; the backdrop starts at
    /// `(-padding / 2, -padding / 2)`.
    pub padding: f64,
}

/// Label drawn in place of a pictogram the registry doesn't know.
pub fn fallback_label(name: &str) -> String {
    format!("({name} tone)")
}

pub struct LayoutEngine<'a> {
    pub measure: &'a dyn Measure,
    pub pictograms: &'a PictogramRegistry,
    pub settings: LayoutSettings,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(
        measure: &'a dyn Measure,
        pictograms: &'a PictogramRegistry,
        settings: LayoutSettings,
    ) -> Self {
        Self {
            measure,
            pictograms,
            settings,
        }
    }

    /// Lay `tokens` out within `max_width`.
    ///
    /// Single pass, no look-ahead: a box that would cross
    /// `max_width - padding` starts a new line unless it is the first box on
    /// its line. Whitespace never triggers a break. The output depends only on
    /// the inputs, so re-running it on resize places everything identically.
    pub fn layout(
        &self,
        tokens: &[Token],
        speaker_prefix: Option<&str>,
        max_width: f64,
    ) -> BubbleLayout {
        let s = &self.settings;
        let mut content_width: f64 = 0.0;
        let mut line_y = 0.0;

        let speaker = speaker_prefix.map(|name| {
            let label = format!("{name}:");
            let size = self.measure.text(&label, Font::SpeakerName);
            line_y = size.height + s.speaker_gap;
            content_width = size.width;
            PlacedBox {
                token: Token::Word(label),
                x: 0.0,
                y: 0.0,
                width: size.width,
                height: size.height,
            }
        });

        let wrap_at = max_width - s.padding;
        let mut x = 0.0;
        let mut line_max_height: f64 = 0.0;
        let mut boxes = Vec::with_capacity(tokens.len());

        for token in tokens {
            let (token, size) = match token {
                Token::Pictogram(name) if self.pictograms.contains(name) => {
                    (token.clone(), self.measure.pictogram(name))
                }
                Token::Pictogram(name) => {
                    let label = fallback_label(name);
                    let size = self.measure.text(&label, Font::Body);
                    (Token::Word(label), size)
                }
                Token::Word(text) | Token::Whitespace(text) => {
                    (token.clone(), self.measure.text(text, Font::Body))
                }
            };

            if !token.is_whitespace() && x + size.width > wrap_at && x > 0.0 {
                x = 0.0;
                line_y += line_max_height + s.line_spacing;
                line_max_height = 0.0;
            }

            boxes.push(PlacedBox {
                token,
                x,
                y: line_y,
                width: size.width,
                height: size.height,
            });
            x += size.width;
            line_max_height = line_max_height.max(size.height);
            content_width = content_width.max(x);
        }

        let content_height = line_y + line_max_height;
        BubbleLayout {
            speaker,
            boxes,
            content_width,
            content_height,
            total_width: (content_width + s.padding).max(s.min_bubble_width),
            total_height: content_height + s.padding / 2.0,
            padding: s.padding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::measure::CellMeasure;
    use crate::dialogue::tokenizer::tokenize;
    use crate::script::PictogramEntry;

    fn registry(names: &[&str]) -> PictogramRegistry {
        let entries: Vec<_> = names
            .iter()
            .map(|n| PictogramEntry {
                name: n.to_string(),
                url: format!("https://example.com/{n}.png"),
                glyph: None,
            })
            .collect();
        PictogramRegistry::from_entries(&entries)
    }

    fn lay(text: &str, pics: &[&str], speaker: Option<&str>, max_width: f64) -> BubbleLayout {
        let measure = CellMeasure::default();
        let reg = registry(pics);
        let engine = LayoutEngine::new(&measure, &reg, LayoutSettings::default());
        engine.layout(&tokenize(text), speaker, max_width)
    }

    fn line_of(layout: &BubbleLayout, needle: &str) -> f64 {
        layout
            .boxes
            .iter()
            .find(|b| b.token == Token::Word(needle.into()))
            .map(|b| b.y)
            .unwrap()
    }

    #[test]
    fn single_line_with_pictogram() {
        let l = lay("Hi {wave}!", &["wave"], Some("A"), 80.0);
        let speaker = l.speaker.as_ref().unwrap();
        assert_eq!(speaker.token, Token::Word("A:".into()));
        assert_eq!(l.boxes.len(), 4);
        assert!(l.boxes.iter().all(|b| b.y == 1.0));
        assert_eq!(l.boxes[2].token, Token::Pictogram("wave".into()));
        assert_eq!(l.boxes[2].x, 3.0);
        assert_eq!(l.boxes[2].width, 3.0);
        assert_eq!(l.boxes[3].x, 6.0);
        assert_eq!(l.content_width, 7.0);
        assert_eq!(l.content_height, 2.0);
        assert_eq!(l.total_width, 16.0);
        assert_eq!(l.total_height, 3.0);
    }

    #[test]
    fn unknown_pictogram_falls_back_to_label() {
        let l = lay("Hi {wave}!", &[], None, 80.0);
        let words: String = l.boxes.iter().map(|b| b.token.source_text()).collect();
        assert_eq!(words, "Hi (wave tone)!");
        assert!(l.boxes.iter().all(|b| !matches!(b.token, Token::Pictogram(_))));
    }

    #[test]
    fn wraps_greedily_before_the_overflowing_word() {
        // wrap_at = 12 - 2 = 10
        let l = lay("aaaa bbbb cccc", &[], None, 12.0);
        assert_eq!(line_of(&l, "aaaa"), 0.0);
        assert_eq!(line_of(&l, "bbbb"), 0.0);
        assert_eq!(line_of(&l, "cccc"), 1.0);
        assert_eq!(l.content_height, 2.0);
    }

    #[test]
    fn whitespace_never_breaks_a_line() {
        let l = lay("abcdefghij     x", &[], None, 12.0);
        let ws = &l.boxes[1];
        assert!(ws.token.is_whitespace());
        assert_eq!(ws.y, 0.0);
        assert_eq!(ws.x, 10.0);
        assert_eq!(line_of(&l, "x"), 1.0);
    }

    #[test]
    fn oversized_word_stays_whole_on_its_own_line() {
        let l = lay("Hi", &[], None, 1.0);
        assert_eq!(l.boxes.len(), 1);
        assert_eq!(l.boxes[0].token, Token::Word("Hi".into()));
        assert_eq!(l.boxes[0].x, 0.0);

        let l = lay("a verylongword b", &[], None, 6.0);
        let long = l
            .boxes
            .iter()
            .find(|b| b.token == Token::Word("verylongword".into()))
            .unwrap();
        assert_eq!(long.x, 0.0);
        assert_eq!(long.y, 1.0);
        assert_eq!(line_of(&l, "b"), 2.0);
    }

    #[test]
    fn speaker_gap_pushes_content_down() {
        let measure = CellMeasure::default();
        let reg = registry(&[]);
        let settings = LayoutSettings {
            speaker_gap: 1.0,
            ..LayoutSettings::default()
        };
        let engine = LayoutEngine::new(&measure, &reg, settings);
        let l = engine.layout(&tokenize("Hi there"), Some("A"), 80.0);
        assert_eq!(line_of(&l, "Hi"), 2.0);
        assert_eq!(l.content_height, 3.0);
        assert_eq!(l.total_height, 4.0);

        let flush = lay("Hi there", &[], Some("A"), 80.0);
        assert_eq!(line_of(&flush, "Hi"), 1.0);
        assert_eq!(flush.content_height, 2.0);

        // Without a speaker line the gap has nothing to separate.
        let bare = engine.layout(&tokenize("Hi there"), None, 80.0);
        assert_eq!(line_of(&bare, "Hi"), 0.0);
    }

    #[test]
    fn long_speaker_name_widens_the_bubble() {
        let l = lay("ok", &[], Some("A very long speaker name"), 80.0);
        assert_eq!(l.content_width, 25.0);
        assert_eq!(l.total_width, 27.0);
    }

    #[test]
    fn layout_is_deterministic() {
        let a = lay("Neighbours {affirmative}, how are you doing today?", &["affirmative"], Some("Penny"), 20.0);
        let b = lay("Neighbours {affirmative}, how are you doing today?", &["affirmative"], Some("Penny"), 20.0);
        assert_eq!(a, b);
    }

    #[test]
    fn non_leading_boxes_respect_the_wrap_limit() {
        let text = "the quick brown fox {jumps} over the lazy dog and keeps on running far away";
        for max_width in [4.0, 9.0, 13.0, 20.0, 31.0] {
            let l = lay(text, &["jumps"], None, max_width);
            for b in l.boxes.iter().filter(|b| !b.token.is_whitespace() && b.x > 0.0) {
                assert!(
                    b.x + b.width <= max_width - 2.0,
                    "{:?} overflows at width {max_width}",
                    b.token
                );
            }
        }
    }
}
