//! Player — the terminal host for a dialogue session.
//!
//! Owns the stage, the tween group and the playback controller, turns
//! crossterm events into advance/resize calls and paints the stage. A left
//! mouse press is one advance request.

pub mod config;

use std::io::{self, Write};
use std::time::Instant;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use crossterm::{cursor, execute, queue, style, terminal};

use crate::dialogue::CellMeasure;
use crate::menubar::print_menu_item;
use crate::playback::{Advance, PlaybackController};
use crate::renderer::{Grid, Renderer};
use crate::script::DialogueData;
use crate::stage::{Stage, TweenGroup};
use crate::types::{Cell, Color, Frame, NamedColor, Style, Viewport};

use config::PlayerConfig;

/// Rows reserved above the canvas for the menu bar.
const CANVAS_OFFSET: u16 = 1;

pub struct Player {
    controller: PlaybackController<CellMeasure>,
    stage: Stage,
    tweens: TweenGroup,
    config: PlayerConfig,
    grid: Option<Grid>,
}

impl Player {
    /// Set up a session for a terminal of `size` (columns, rows).
    pub fn new(data: DialogueData, config: PlayerConfig, size: (u16, u16)) -> Self {
        let mut stage = Stage::new(canvas_viewport(size.0, size.1));
        let controller = PlaybackController::new(
            data,
            CellMeasure::default(),
            config.playback_settings(),
            &mut stage,
        );
        Self {
            controller,
            stage,
            tweens: TweenGroup::new(),
            config,
            grid: None,
        }
    }

    /// Play the session in the terminal.
    ///
    /// Sets up the terminal, enters the event loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            event::EnableMouseCapture,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        let _ = execute!(
            stdout,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen,
        );
        let _ = terminal::disable_raw_mode();

        result
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.controller.start();
        self.render_menubar(stdout)?;
        self.render(stdout)?;

        let mut last_tick = Instant::now();
        loop {
            if event::poll(self.config.frame_interval())? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.config.is_quit(&key) {
                            break;
                        }
                        if self.config.is_advance(&key) {
                            self.advance(stdout)?;
                        }
                    }
                    Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                        self.advance(stdout)?;
                    }
                    Event::Resize(w, h) => {
                        let vp = canvas_viewport(w, h);
                        self.controller.on_resize(&mut self.stage, vp.width, vp.height);
                        self.grid = None;
                        execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
                        self.render_menubar(stdout)?;
                    }
                    _ => {}
                }
            }

            let now = Instant::now();
            self.controller
                .tick(&mut self.stage, &mut self.tweens, now.duration_since(last_tick));
            last_tick = now;
            self.render(stdout)?;
        }

        Ok(())
    }

    fn advance(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        match self.controller.advance(&mut self.stage, &mut self.tweens) {
            Advance::Showed(_) | Advance::Ended => self.render_menubar(stdout),
            Advance::NotArmed | Advance::AlreadyEnded => Ok(()),
        }
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn render_menubar(&self, stdout: &mut io::Stdout) -> Result<()> {
        let state = self.controller.state();
        let progress = if state.has_ended {
            "[end]".to_string()
        } else {
            format!("line {}/{}", state.current_index, self.controller.script_len())
        };
        let items = ["[click][Space] next", "[q][Esc] quit", progress.as_str()];

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                queue!(stdout, style::Print("  "))?;
            }
            print_menu_item(stdout, item)?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Paint the stage, as a diff against the last painted grid when possible.
    fn render(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let scene = self.stage.resolve();
        let (grid, frame) = Renderer::frame(self.grid.as_ref(), &scene);

        match frame {
            Frame::Full { cells } => {
                for (y, row) in cells.iter().enumerate() {
                    queue!(stdout, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
                    for cell in row {
                        print_cell(stdout, cell)?;
                    }
                }
                stdout.flush()?;
            }
            Frame::Diff { changes } => {
                if !changes.is_empty() {
                    for change in &changes {
                        queue!(stdout, cursor::MoveTo(change.x, change.y + CANVAS_OFFSET))?;
                        print_cell(stdout, &change.cell)?;
                    }
                    stdout.flush()?;
                }
            }
        }

        self.grid = Some(grid);
        Ok(())
    }
}

fn canvas_viewport(cols: u16, rows: u16) -> Viewport {
    Viewport::new(cols as f64, rows.saturating_sub(CANVAS_OFFSET) as f64)
}

fn print_cell(stdout: &mut io::Stdout, cell: &Cell) -> Result<()> {
    let cs = to_content_style(&cell.style);
    queue!(
        stdout,
        style::PrintStyledContent(style::StyledContent::new(cs, cell.ch))
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

pub fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = &s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = &s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

pub fn to_ct_color(c: &Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb {
            r: *r,
            g: *g,
            b: *b,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_row_is_excluded_from_the_canvas() {
        assert_eq!(canvas_viewport(80, 24), Viewport::new(80.0, 23.0));
        assert_eq!(canvas_viewport(80, 0), Viewport::new(80.0, 0.0));
    }

    #[test]
    fn style_conversion() {
        let cs = to_content_style(&Style {
            fg: Some(Color::Named(NamedColor::Black)),
            bg: Some(Color::Rgb { r: 1, g: 2, b: 3 }),
            bold: true,
            dim: false,
        });
        assert_eq!(cs.foreground_color, Some(style::Color::Black));
        assert_eq!(cs.background_color, Some(style::Color::Rgb { r: 1, g: 2, b: 3 }));
        assert!(cs.attributes.has(style::Attribute::Bold));
        assert!(!cs.attributes.has(style::Attribute::Dim));
    }
}
