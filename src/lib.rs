//! Click-through dialogue player.
//!
//! A script of speaker lines is shown one bubble at a time: `dialogue` lays a
//! line out, `speakers` and `playback` decide what is on the `stage`, and the
//! `renderer` and `player` paint the stage into a terminal.

pub mod dialogue;
pub mod menubar;
pub mod playback;
pub mod player;
pub mod preview;
pub mod renderer;
pub mod script;
pub mod speakers;
pub mod stage;
pub mod types;
