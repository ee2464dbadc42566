//! Where characters and bubbles go for a given viewport.
//!
//! Every position is recomputed from the viewport alone, so the same line laid
//! out at the same size always lands in the same place.

use crate::dialogue::BubbleLayout;
use crate::script::Side;
use crate::speakers::{CHARACTER_HEIGHT, CHARACTER_WIDTH};
use crate::types::Viewport;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Viewports narrower than this use the compact margins.
    pub narrow_breakpoint: f64,
    pub bubble_margin: f64,
    pub bubble_margin_narrow: f64,
    /// Character margin as a share of the viewport width, clamped to
    /// `[character_margin_min, character_margin_max]`.
    pub character_margin_ratio: f64,
    pub character_margin_min: f64,
    pub character_margin_max: f64,
    pub bottom_margin: f64,
    pub bottom_margin_narrow: f64,
    /// Gap between a bubble and the top of its speaker.
    pub head_offset: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            narrow_breakpoint: 60.0,
            bubble_margin: 4.0,
            bubble_margin_narrow: 1.0,
            character_margin_ratio: 0.08,
            character_margin_min: 2.0,
            character_margin_max: 10.0,
            bottom_margin: 2.0,
            bottom_margin_narrow: 1.0,
            head_offset: 1.0,
        }
    }
}

impl Placement {
    pub fn is_narrow(&self, vp: Viewport) -> bool {
        vp.width < self.narrow_breakpoint
    }

    pub fn bubble_margin(&self, vp: Viewport) -> f64 {
        if self.is_narrow(vp) {
            self.bubble_margin_narrow
        } else {
            self.bubble_margin
        }
    }

    pub fn max_bubble_width(&self, vp: Viewport) -> f64 {
        (vp.width - self.bubble_margin(vp) * 2.0).max(0.0)
    }

    pub fn character_margin(&self, vp: Viewport) -> f64 {
        (vp.width * self.character_margin_ratio)
            .min(self.character_margin_max)
            .max(self.character_margin_min)
    }

    /// Top-left corner of a character's box.
    pub fn character_origin(&self, side: Side, vp: Viewport) -> (f64, f64) {
        let margin = self.character_margin(vp);
        let x = match side {
            Side::Left => margin,
            Side::Right => vp.width - CHARACTER_WIDTH - margin,
        };
        let bottom = if self.is_narrow(vp) {
            self.bottom_margin_narrow
        } else {
            self.bottom_margin
        };
        (x, vp.height - CHARACTER_HEIGHT - bottom)
    }

    /// Node origin for a bubble. `speaker` is the speaker's side and the y of
    /// its top edge; `None` centres the bubble in the viewport.
    ///
    /// The backdrop starts `padding / 2` left of and above the origin, so the
    /// origin is shifted by that much to put the backdrop's edge on the margin.
    pub fn bubble_origin(
        &self,
        layout: &BubbleLayout,
        speaker: Option<(Side, f64)>,
        vp: Viewport,
    ) -> (f64, f64) {
        let inset = layout.padding / 2.0;
        let (left, top) = match speaker {
            Some((side, head_y)) => {
                let margin = self.bubble_margin(vp);
                let left = match side {
                    Side::Left => margin,
                    Side::Right => vp.width - margin - layout.total_width,
                };
                (left, head_y - self.head_offset - layout.total_height)
            }
            None => (
                (vp.width - layout.total_width) / 2.0,
                (vp.height - layout.total_height) / 2.0,
            ),
        };
        // The backdrop never starts off screen; in cramped viewports it
        // overlaps the character instead.
        (left.max(0.0) + inset, top.max(0.0) + inset)
    }
}
