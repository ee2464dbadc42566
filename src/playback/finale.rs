//! Terminal sequence: the background fades out, then the epilogue fades in.

use crate::dialogue::font;
use crate::stage::TweenId;
use crate::types::{Color, DrawOp, NamedColor, Size, Style, Viewport};

/// Progress of the terminal sequence once the script has run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finale {
    FadingOut(TweenId),
    FadingIn(TweenId),
    Finished,
}

impl Finale {
    pub fn is_finished(&self) -> bool {
        matches!(self, Finale::Finished)
    }
}

const BANNER_FILL: char = '█';

/// Draw ops for the epilogue and the size they cover.
///
/// Uses the block font when the text is supported and fits with a one-cell
/// border, otherwise a single bold line.
pub fn epilogue_ops(text: &str, vp: Viewport) -> (Vec<DrawOp>, Size) {
    let text_style = Style {
        fg: Some(Color::Named(NamedColor::White)),
        bold: true,
        ..Default::default()
    };
    let shadow_style = Style {
        fg: Some(Color::Rgb {
            r: 60,
            g: 60,
            b: 60,
        }),
        ..Default::default()
    };

    let banner_w = font::banner_width(text) as f64;
    let banner_h = font::BANNER_HEIGHT as f64;
    if font::can_render(text) && banner_w + 3.0 <= vp.width && banner_h + 3.0 <= vp.height {
        let mut ops = font::draw_banner(text, BANNER_FILL, &shadow_style, 0);
        for op in &mut ops {
            op.x += 1;
            op.y += 1;
        }
        ops.extend(font::draw_banner(text, BANNER_FILL, &text_style, 1));
        return (ops, Size::new(banner_w + 1.0, banner_h + 1.0));
    }

    let ops = text
        .chars()
        .enumerate()
        .map(|(i, ch)| DrawOp {
            x: i as i32,
            y: 0,
            ch,
            style: text_style.clone(),
            z_order: 1,
        })
        .collect();
    (ops, Size::new(text.chars().count() as f64, 1.0))
}

/// Node origin that centres an epilogue of `size` in the viewport.
pub fn epilogue_origin(size: Size, vp: Viewport) -> (f64, f64) {
    (
        ((vp.width - size.width) / 2.0).max(0.0),
        ((vp.height - size.height) / 2.0).max(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_viewports_get_the_banner() {
        let (ops, size) = epilogue_ops("The end", Viewport::new(80.0, 24.0));
        assert_eq!(size, Size::new(40.0, 6.0));
        assert!(ops.iter().all(|op| op.ch == BANNER_FILL));
    }

    #[test]
    fn narrow_viewports_fall_back_to_plain_text() {
        let (ops, size) = epilogue_ops("The end", Viewport::new(30.0, 24.0));
        assert_eq!(size, Size::new(7.0, 1.0));
        let text: String = ops.iter().map(|op| op.ch).collect();
        assert_eq!(text, "The end");
    }

    #[test]
    fn unsupported_characters_fall_back_to_plain_text() {
        let (_, size) = epilogue_ops("~ fin ~", Viewport::new(200.0, 50.0));
        assert_eq!(size.height, 1.0);
    }

    #[test]
    fn origin_centres_the_epilogue() {
        assert_eq!(
            epilogue_origin(Size::new(40.0, 6.0), Viewport::new(80.0, 24.0)),
            (20.0, 9.0)
        );
        assert_eq!(
            epilogue_origin(Size::new(7.0, 1.0), Viewport::new(4.0, 1.0)),
            (0.0, 0.0)
        );
    }
}
