use std::fs::File;
use std::path::Path;
use std::process;

use anyhow::{Context, Result, bail};
use crossterm::terminal;

use magic_words::{
    player::{Player, config::PlayerConfig},
    preview,
    script::DialogueData,
};

fn main() {
    if let Err(e) = init_logging() {
        eprintln!("Warning: logging disabled ({e:#})");
    }
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const PLAY_USAGE: &str = "magic-words play <script.json> [--config <player.json>]";
const PREVIEW_USAGE: &str = "magic-words preview <script.json> [--width <cols>] [--height <rows>]";

/// `RUST_LOG` picks the filter (default `warn`); `MAGIC_WORDS_LOG=<path>`
/// sends output to a file instead of stderr.
fn init_logging() -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Ok(path) = std::env::var("MAGIC_WORDS_LOG") {
        let file = File::create(&path).with_context(|| format!("Failed to create {path}"))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init()?;
    Ok(())
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("play") => {
            let path = args.next().context(PLAY_USAGE)?;
            let mut config_path = None;
            while let Some(flag) = args.next() {
                match flag.as_str() {
                    "--config" => config_path = Some(args.next().context(PLAY_USAGE)?),
                    other => bail!("Unknown option {other}\n\nUsage:\n  {PLAY_USAGE}"),
                }
            }
            play(&path, config_path.as_deref().map(Path::new))
        }
        Some("preview") => {
            let path = args.next().context(PREVIEW_USAGE)?;
            let (mut width, mut height) = (80u16, 24u16);
            while let Some(flag) = args.next() {
                let value = args.next().context(PREVIEW_USAGE)?;
                match flag.as_str() {
                    "--width" => width = value.parse().with_context(|| format!("Invalid width {value}"))?,
                    "--height" => height = value.parse().with_context(|| format!("Invalid height {value}"))?,
                    other => bail!("Unknown option {other}\n\nUsage:\n  {PREVIEW_USAGE}"),
                }
            }
            print_preview(&path, width, height)
        }
        _ => bail!(
            "Magic Words — click-through dialogue player\n\nUsage:\n  {PLAY_USAGE}\n  {PREVIEW_USAGE}"
        ),
    }
}

fn play(path: &str, config_path: Option<&Path>) -> Result<()> {
    // The script must load before anything is shown.
    let data = DialogueData::load(path)?;
    let config = PlayerConfig::load(config_path);
    let size = terminal::size().context("Failed to query terminal size")?;

    let mut player = Player::new(data, config, size);
    player.play()
}

fn print_preview(path: &str, width: u16, height: u16) -> Result<()> {
    let data = DialogueData::load(path)?;
    let screens = preview::screens(data, width, height);
    let total = screens.len();
    for (i, screen) in screens.iter().enumerate() {
        let title = if i + 1 == total {
            "epilogue".to_string()
        } else {
            format!("line {}/{}", i + 1, total - 1)
        };
        println!("── {title} {}", "─".repeat((width as usize).saturating_sub(title.len() + 4)));
        print!("{screen}");
    }
    Ok(())
}
