//! Script data — the session's dialogue, avatars and pictograms.
//!
//! Loaded once per session and never mutated. The JSON shape is
//! `{ dialogue: [{name, text}], avatars: [{name, url, position}], emojies: [{name, url}] }`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueData {
    pub dialogue: Vec<DialogueLine>,
    #[serde(default)]
    pub avatars: Vec<AvatarEntry>,
    #[serde(default)]
    pub emojies: Vec<PictogramEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    #[serde(rename = "name")]
    pub speaker: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarEntry {
    pub name: String,
    pub url: String,
    #[serde(deserialize_with = "deserialize_side")]
    pub position: Side,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PictogramEntry {
    pub name: String,
    pub url: String,
    /// Short rendition for character-cell surfaces, e.g. `":)"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,
}

/// Horizontal screen anchor of a speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// `"left"` anchors left; every other value anchors right.
    pub fn parse(s: &str) -> Side {
        if s == "left" { Side::Left } else { Side::Right }
    }
}

/// Serde deserializer accepting any string for an avatar position.
fn deserialize_side<'de, D>(d: D) -> Result<Side, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(d)?;
    Ok(Side::parse(&s))
}

impl DialogueData {
    pub fn from_json(json: &str) -> Result<Self> {
        let data: DialogueData =
            serde_json::from_str(json).context("Failed to parse dialogue script")?;
        Ok(data)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let data = Self::from_json(&json)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        log::info!(
            "Loaded {} dialogue lines, {} avatars, {} pictograms from {}",
            data.dialogue.len(),
            data.avatars.len(),
            data.emojies.len(),
            path.display(),
        );
        Ok(data)
    }
}

// ---------------------------------------------------------------------------
// Pictogram registry
// ---------------------------------------------------------------------------

/// Glyph used for pictograms that carry no glyph of their own.
pub const DEFAULT_PICTOGRAM_GLYPH: &str = "<>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pictogram {
    pub name: String,
    pub image: String,
    pub glyph: String,
}

/// Exact-match lookup from token name to pictogram.
#[derive(Debug, Clone, Default)]
pub struct PictogramRegistry {
    entries: HashMap<String, Pictogram>,
}

impl PictogramRegistry {
    pub fn from_entries(entries: &[PictogramEntry]) -> Self {
        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            if map.contains_key(&entry.name) {
                log::warn!("Duplicate pictogram {:?} ignored", entry.name);
                continue;
            }
            let glyph = entry
                .glyph
                .clone()
                .filter(|g| !g.is_empty())
                .unwrap_or_else(|| DEFAULT_PICTOGRAM_GLYPH.to_string());
            map.insert(
                entry.name.clone(),
                Pictogram {
                    name: entry.name.clone(),
                    image: entry.url.clone(),
                    glyph,
                },
            );
        }
        Self { entries: map }
    }

    pub fn get(&self, name: &str) -> Option<&Pictogram> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "dialogue": [
            {"name": "Sheldon", "text": "Hey {satisfied}"},
            {"name": "Narrator", "text": "Silence."}
        ],
        "avatars": [
            {"name": "Sheldon", "url": "https://example.com/s.png", "position": "left"},
            {"name": "Penny", "url": "https://example.com/p.png", "position": "somewhere"}
        ],
        "emojies": [
            {"name": "satisfied", "url": "https://example.com/sat.png", "glyph": ":)"},
            {"name": "satisfied", "url": "https://example.com/dup.png"},
            {"name": "neutral", "url": "https://example.com/n.png"}
        ]
    }"#;

    #[test]
    fn parses_the_full_shape() {
        let data = DialogueData::from_json(SAMPLE).unwrap();
        assert_eq!(data.dialogue.len(), 2);
        assert_eq!(data.dialogue[0].speaker, "Sheldon");
        assert_eq!(data.avatars[0].position, Side::Left);
        assert_eq!(data.avatars[1].position, Side::Right);
    }

    #[test]
    fn registries_are_optional() {
        let data = DialogueData::from_json(r#"{"dialogue": []}"#).unwrap();
        assert!(data.avatars.is_empty());
        assert!(data.emojies.is_empty());
    }

    #[test]
    fn missing_dialogue_is_an_error() {
        assert!(DialogueData::from_json(r#"{"avatars": []}"#).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = DialogueData::load("/definitely/not/here.json").unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }

    #[test]
    fn first_pictogram_wins_and_default_glyph_applies() {
        let data = DialogueData::from_json(SAMPLE).unwrap();
        let reg = PictogramRegistry::from_entries(&data.emojies);
        assert_eq!(reg.len(), 2);
        let sat = reg.get("satisfied").unwrap();
        assert_eq!(sat.image, "https://example.com/sat.png");
        assert_eq!(sat.glyph, ":)");
        assert_eq!(reg.get("neutral").unwrap().glyph, DEFAULT_PICTOGRAM_GLYPH);
        assert!(reg.get("Satisfied").is_none());
    }
}
