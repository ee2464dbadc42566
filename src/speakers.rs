//! Speaker registry — one persistent character visual per known speaker.
//!
//! Character nodes are built once when the session starts and live on the
//! stage detached. Showing a speaker attaches its node; hiding it detaches.

use std::collections::HashMap;

use crate::script::{AvatarEntry, Side};
use crate::stage::{Node, NodeId, Stage, layer};
use crate::types::{Color, DrawOp, NamedColor, Style};

pub const CHARACTER_WIDTH: f64 = 12.0;
pub const CHARACTER_HEIGHT: f64 = 6.0;

#[derive(Debug, Clone)]
pub struct Character {
    pub name: String,
    /// Image reference from the avatar registry.
    pub avatar: String,
    pub side: Side,
    pub node: NodeId,
}

#[derive(Debug, Default)]
pub struct SpeakerRegistry {
    characters: Vec<Character>,
    by_name: HashMap<String, usize>,
}

impl SpeakerRegistry {
    pub fn new(avatars: &[AvatarEntry], stage: &mut Stage) -> Self {
        let mut characters = Vec::with_capacity(avatars.len());
        let mut by_name = HashMap::with_capacity(avatars.len());

        for avatar in avatars {
            if by_name.contains_key(&avatar.name) {
                log::warn!("Duplicate avatar {:?} ignored", avatar.name);
                continue;
            }
            let node = stage.insert_detached(Node::new(
                portrait(&avatar.name, avatar.position),
                layer::CHARACTER,
            ));
            by_name.insert(avatar.name.clone(), characters.len());
            characters.push(Character {
                name: avatar.name.clone(),
                avatar: avatar.url.clone(),
                side: avatar.position,
                node,
            });
        }

        Self {
            characters,
            by_name,
        }
    }

    /// `None` means the line is narration.
    pub fn resolve(&self, name: &str) -> Option<&Character> {
        self.by_name.get(name).map(|&i| &self.characters[i])
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

/// A boxed stand-in for the avatar image with the speaker's name beneath.
fn portrait(name: &str, side: Side) -> Vec<DrawOp> {
    let frame = Style {
        fg: Some(Color::Named(NamedColor::Yellow)),
        ..Default::default()
    };
    let face = Style {
        fg: Some(Color::Named(NamedColor::White)),
        bold: true,
        ..Default::default()
    };
    let label = Style {
        fg: Some(Color::Named(NamedColor::Cyan)),
        bold: true,
        ..Default::default()
    };
    let w = CHARACTER_WIDTH as i32;
    let h = CHARACTER_HEIGHT as i32 - 1;
    let mut ops = Vec::new();
    let mut put = |x: i32, y: i32, ch: char, style: &Style| {
        ops.push(DrawOp {
            x,
            y,
            ch,
            style: style.clone(),
            z_order: 0,
        });
    };

    put(0, 0, '┌', &frame);
    put(w - 1, 0, '┐', &frame);
    put(0, h - 1, '└', &frame);
    put(w - 1, h - 1, '┘', &frame);
    for x in 1..w - 1 {
        put(x, 0, '─', &frame);
        put(x, h - 1, '─', &frame);
    }
    for y in 1..h - 1 {
        put(0, y, '│', &frame);
        put(w - 1, y, '│', &frame);
    }

    // Faces look towards the middle of the screen.
    let rows: [&str; 3] = match side {
        Side::Left => ["  .---.", " ( o o)", "  \\ - /"],
        Side::Right => ["  .---.", "  (o o )", "   \\ - /"],
    };
    for (dy, row) in rows.iter().enumerate() {
        for (dx, ch) in row.chars().enumerate() {
            if ch != ' ' && (dx as i32) < w - 2 {
                put(1 + dx as i32, 1 + dy as i32, ch, &face);
            }
        }
    }

    let shown: String = name.chars().take(w as usize).collect();
    let offset = (w - shown.chars().count() as i32) / 2;
    for (i, ch) in shown.chars().enumerate() {
        put(offset + i as i32, h, ch, &label);
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Viewport;

    fn avatar(name: &str, position: &str) -> AvatarEntry {
        AvatarEntry {
            name: name.into(),
            url: format!("https://example.com/{name}.png"),
            position: Side::parse(position),
        }
    }

    #[test]
    fn resolves_known_speakers_only() {
        let mut stage = Stage::new(Viewport::new(80.0, 24.0));
        let reg = SpeakerRegistry::new(&[avatar("A", "left"), avatar("B", "right")], &mut stage);
        assert_eq!(reg.resolve("A").unwrap().side, Side::Left);
        assert_eq!(reg.resolve("B").unwrap().side, Side::Right);
        assert!(reg.resolve("Narrator").is_none());
    }

    #[test]
    fn character_nodes_start_detached() {
        let mut stage = Stage::new(Viewport::new(80.0, 24.0));
        let reg = SpeakerRegistry::new(&[avatar("A", "left")], &mut stage);
        let node = reg.resolve("A").unwrap().node;
        assert!(stage.contains(node));
        assert!(!stage.is_attached(node));
        assert_eq!(stage.attached_count(), 0);
    }

    #[test]
    fn duplicate_names_keep_the_first_avatar() {
        let mut stage = Stage::new(Viewport::new(80.0, 24.0));
        let reg = SpeakerRegistry::new(&[avatar("A", "left"), avatar("A", "right")], &mut stage);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.resolve("A").unwrap().side, Side::Left);
    }

    #[test]
    fn portrait_fits_the_character_box() {
        let ops = portrait("A rather long name", Side::Right);
        assert!(ops.iter().all(|op| op.x >= 0 && op.x < CHARACTER_WIDTH as i32));
        assert!(ops.iter().all(|op| op.y >= 0 && op.y < CHARACTER_HEIGHT as i32));
    }
}
