//! Playback controller — the advance/resize state machine.
//!
//! `Idle` (nothing shown) → `Showing(k)` for each line → `Ended`. The
//! controller is the only writer of `PlaybackState`; the host delivers
//! advance, resize and tick calls one at a time.

pub mod finale;
pub mod placement;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dialogue::{BubbleTheme, LayoutEngine, LayoutSettings, Measure, bubble, tokenize};
use crate::script::{DialogueData, DialogueLine, PictogramRegistry};
use crate::speakers::SpeakerRegistry;
use crate::stage::{Easing, Node, NodeId, Stage, TweenGroup, layer};
use crate::types::{Color, DrawOp, Style, Viewport};

pub use finale::Finale;
pub use placement::Placement;

/// When the `"name:"` line is drawn in a bubble.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerNames {
    #[default]
    Always,
    /// Only for speakers without a character on screen.
    NarrationOnly,
}

#[derive(Debug, Clone)]
pub struct PlaybackSettings {
    pub layout: LayoutSettings,
    pub placement: Placement,
    pub theme: BubbleTheme,
    pub speaker_names: SpeakerNames,
    pub fade_out: Duration,
    pub fade_in: Duration,
    pub epilogue: String,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            layout: LayoutSettings::default(),
            placement: Placement::default(),
            theme: BubbleTheme::default(),
            speaker_names: SpeakerNames::default(),
            fade_out: Duration::from_millis(1200),
            fade_in: Duration::from_millis(1500),
            epilogue: "The end".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackState {
    /// Lines shown so far; the visible line is `current_index - 1`.
    pub current_index: usize,
    pub has_ended: bool,
    /// Set when the terminal sequence has been started.
    pub ended_once: bool,
}

/// What an advance request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// `start` hasn't been called yet.
    NotArmed,
    /// The line at this index is now on screen.
    Showed(usize),
    /// The script ran out; the terminal sequence has begun.
    Ended,
    AlreadyEnded,
}

pub struct PlaybackController<M: Measure> {
    script: Vec<DialogueLine>,
    pictograms: PictogramRegistry,
    speakers: SpeakerRegistry,
    measure: M,
    settings: PlaybackSettings,
    state: PlaybackState,
    armed: bool,
    torn_down: bool,
    background: NodeId,
    bubble: Option<NodeId>,
    speaker: Option<NodeId>,
    epilogue: Option<NodeId>,
    finale: Option<Finale>,
}

impl<M: Measure> PlaybackController<M> {
    /// Build the session's persistent visuals on `stage`. Nothing is shown
    /// until `start` is called and the first advance arrives.
    pub fn new(data: DialogueData, measure: M, settings: PlaybackSettings, stage: &mut Stage) -> Self {
        let pictograms = PictogramRegistry::from_entries(&data.emojies);
        let speakers = SpeakerRegistry::new(&data.avatars, stage);
        let background = stage.add(Node::new(background_ops(stage.viewport()), layer::BACKGROUND));

        Self {
            script: data.dialogue,
            pictograms,
            speakers,
            measure,
            settings,
            state: PlaybackState::default(),
            armed: false,
            torn_down: false,
            background,
            bubble: None,
            speaker: None,
            epilogue: None,
            finale: None,
        }
    }

    pub fn start(&mut self) {
        if self.torn_down {
            log::warn!("Start ignored: playback was torn down");
            return;
        }
        if !self.armed {
            log::info!("Playback armed with {} lines", self.script.len());
        }
        self.armed = true;
    }

    pub fn advance(&mut self, stage: &mut Stage, tweens: &mut TweenGroup) -> Advance {
        if !self.armed {
            log::debug!("Advance ignored: playback not started");
            return Advance::NotArmed;
        }
        if self.state.has_ended {
            return Advance::AlreadyEnded;
        }

        self.clear(stage);

        if self.state.current_index == self.script.len() {
            self.state.has_ended = true;
            if !self.state.ended_once {
                self.state.ended_once = true;
                let id = tweens.fade(
                    stage,
                    self.background,
                    1.0,
                    0.0,
                    self.settings.fade_out,
                    Easing::QuadOut,
                );
                self.finale = Some(Finale::FadingOut(id));
                log::info!("Script finished, fading out");
            }
            return Advance::Ended;
        }

        let index = self.state.current_index;
        self.present(stage, index);
        self.state.current_index += 1;
        log::debug!("Showing line {}/{}", index + 1, self.script.len());
        Advance::Showed(index)
    }

    /// Re-lay out what is on screen for a new viewport without advancing.
    pub fn on_resize(&mut self, stage: &mut Stage, width: f64, height: f64) {
        stage.resize(width, height);
        log::debug!("Resized to {width}x{height}");

        if self.torn_down {
            return;
        }
        if self.state.has_ended {
            // The background stays visible until its fade-out completes.
            if matches!(self.finale, Some(Finale::FadingOut(_))) {
                stage.set_ops(self.background, background_ops(stage.viewport()));
            }
            if let Some(id) = self.epilogue {
                self.place_epilogue(stage, id);
            }
            return;
        }

        stage.set_ops(self.background, background_ops(stage.viewport()));
        if self.state.current_index > 0 {
            self.clear(stage);
            self.present(stage, self.state.current_index - 1);
        }
    }

    /// Advance running tweens by `dt` and step the terminal sequence.
    pub fn tick(&mut self, stage: &mut Stage, tweens: &mut TweenGroup, dt: Duration) {
        let completed = tweens.update(dt, stage);

        match self.finale {
            Some(Finale::FadingOut(id)) if completed.contains(&id) && self.torn_down => {
                self.finale = Some(Finale::Finished);
                log::debug!("Fade-out finished after teardown, skipping epilogue");
            }
            Some(Finale::FadingOut(id)) if completed.contains(&id) => {
                let node = stage.add(Node::new(Vec::new(), layer::EPILOGUE));
                self.place_epilogue(stage, node);
                self.epilogue = Some(node);
                let fade = tweens.fade(stage, node, 0.0, 1.0, self.settings.fade_in, Easing::QuadInOut);
                self.finale = Some(Finale::FadingIn(fade));
            }
            Some(Finale::FadingIn(id)) if completed.contains(&id) => {
                self.finale = Some(Finale::Finished);
                log::info!("Epilogue shown");
            }
            _ => {}
        }
    }

    /// Remove every visual this session put on `stage` and disarm it.
    ///
    /// A terminal sequence already under way keeps stepping on `tick` until
    /// it reaches `Finale::Finished`, but no epilogue is created for it.
    pub fn teardown(&mut self, stage: &mut Stage) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.armed = false;
        self.speaker = None;
        for node in [Some(self.background), self.bubble.take(), self.epilogue.take()]
            .into_iter()
            .flatten()
        {
            stage.remove(node);
        }
        for character in self.speakers.characters() {
            stage.remove(character.node);
        }
        log::info!("Playback torn down");
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn finale(&self) -> Option<Finale> {
        self.finale
    }

    /// The line on screen, if any.
    pub fn current_line(&self) -> Option<&DialogueLine> {
        if self.state.has_ended {
            return None;
        }
        self.state
            .current_index
            .checked_sub(1)
            .and_then(|i| self.script.get(i))
    }

    pub fn script_len(&self) -> usize {
        self.script.len()
    }

    pub fn speakers(&self) -> &SpeakerRegistry {
        &self.speakers
    }

    pub fn bubble_node(&self) -> Option<NodeId> {
        self.bubble
    }

    pub fn speaker_node(&self) -> Option<NodeId> {
        self.speaker
    }

    pub fn epilogue_node(&self) -> Option<NodeId> {
        self.epilogue
    }

    pub fn background_node(&self) -> NodeId {
        self.background
    }

    fn clear(&mut self, stage: &mut Stage) {
        if let Some(id) = self.bubble.take() {
            stage.remove(id);
        }
        if let Some(id) = self.speaker.take() {
            stage.detach(id);
        }
    }

    /// Put line `index` and its speaker on stage for the current viewport.
    fn present(&mut self, stage: &mut Stage, index: usize) {
        let vp = stage.viewport();
        let placement = &self.settings.placement;
        let line = &self.script[index];
        let character = self.speakers.resolve(&line.speaker);

        let anchor = character.map(|c| {
            let (x, y) = placement.character_origin(c.side, vp);
            stage.set_position(c.node, x, y);
            stage.attach(c.node);
            (c.side, y)
        });

        let named = match self.settings.speaker_names {
            SpeakerNames::Always => true,
            SpeakerNames::NarrationOnly => character.is_none(),
        };
        let prefix = (named && !line.speaker.is_empty()).then_some(line.speaker.as_str());

        let engine = LayoutEngine::new(&self.measure, &self.pictograms, self.settings.layout);
        let layout = engine.layout(&tokenize(&line.text), prefix, placement.max_bubble_width(vp));
        let id = stage.add(bubble::render(&layout, &self.pictograms, &self.settings.theme));
        let (x, y) = placement.bubble_origin(&layout, anchor, vp);
        stage.set_position(id, x, y);

        self.speaker = character.map(|c| c.node);
        self.bubble = Some(id);
    }

    fn place_epilogue(&self, stage: &mut Stage, id: NodeId) {
        let vp = stage.viewport();
        let (ops, size) = finale::epilogue_ops(&self.settings.epilogue, vp);
        let (x, y) = finale::epilogue_origin(size, vp);
        stage.set_ops(id, ops);
        stage.set_position(id, x, y);
    }
}

/// Largest background fill along either axis, in cells.
const BACKGROUND_MAX_SIDE: f64 = 512.0;

/// Brushed-metal fill covering the viewport, capped at
/// `BACKGROUND_MAX_SIDE` cells on each axis.
fn background_ops(vp: Viewport) -> Vec<DrawOp> {
    let w = vp.width.clamp(0.0, BACKGROUND_MAX_SIDE).floor() as i32;
    let h = vp.height.clamp(0.0, BACKGROUND_MAX_SIDE).floor() as i32;
    let base = Style {
        fg: Some(Color::Rgb {
            r: 92,
            g: 96,
            b: 104,
        }),
        bg: Some(Color::Rgb {
            r: 38,
            g: 40,
            b: 46,
        }),
        ..Default::default()
    };

    let mut ops = Vec::with_capacity((w as usize).saturating_mul(h as usize));
    for y in 0..h {
        for x in 0..w {
            let ch = if (x * 7 + y * 13) % 11 == 0 { '▒' } else { '░' };
            ops.push(DrawOp {
                x,
                y,
                ch,
                style: base.clone(),
                z_order: 0,
            });
        }
    }
    ops
}
