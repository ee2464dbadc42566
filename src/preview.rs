//! Non-interactive preview: every screen of a session as plain text.

use std::time::Duration;

use crate::dialogue::CellMeasure;
use crate::playback::{Advance, PlaybackController, PlaybackSettings};
use crate::renderer::Renderer;
use crate::script::DialogueData;
use crate::stage::{Stage, TweenGroup};
use crate::types::Viewport;

/// Render each dialogue line, then the epilogue, at a fixed viewport.
///
/// The background is left out so the text stays readable and fades are
/// collapsed to a single tick.
pub fn screens(data: DialogueData, width: u16, height: u16) -> Vec<String> {
    let mut stage = Stage::new(Viewport::new(width as f64, height as f64));
    let mut tweens = TweenGroup::new();
    let settings = PlaybackSettings {
        fade_out: Duration::ZERO,
        fade_in: Duration::ZERO,
        ..PlaybackSettings::default()
    };
    let mut controller = PlaybackController::new(data, CellMeasure::default(), settings, &mut stage);
    stage.detach(controller.background_node());
    controller.start();

    let mut screens = Vec::with_capacity(controller.script_len() + 1);
    loop {
        match controller.advance(&mut stage, &mut tweens) {
            Advance::Showed(_) => {
                screens.push(Renderer::to_text(&Renderer::rasterize(&stage.resolve())));
            }
            _ => break,
        }
    }

    while matches!(controller.finale(), Some(f) if !f.is_finished()) {
        controller.tick(&mut stage, &mut tweens, Duration::ZERO);
    }
    screens.push(Renderer::to_text(&Renderer::rasterize(&stage.resolve())));

    screens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_screen_per_line_plus_epilogue() {
        let data = DialogueData::from_json(
            r#"{"dialogue": [{"name": "A", "text": "one"}, {"name": "B", "text": "two"}]}"#,
        )
        .unwrap();
        let screens = screens(data, 60, 20);
        assert_eq!(screens.len(), 3);
        assert!(screens[0].contains("A:"));
        assert!(screens[0].contains("one"));
        assert!(screens[1].contains("two"));
        assert!(!screens[1].contains("one"));
        assert!(screens[2].contains('█'));
    }
}
