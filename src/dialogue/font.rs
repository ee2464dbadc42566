//! Five-row block font for the epilogue banner.
//!
//! A `#` in a glyph row is a filled cell. Rows of one glyph share a width;
//! glyphs are separated by one blank column.

use crate::types::{DrawOp, Style};

pub const BANNER_HEIGHT: u16 = 5;

const GLYPHS: &[(char, [&str; 5])] = &[
    ('A', [" ### ", "#   #", "#####", "#   #", "#   #"]),
    ('B', ["#### ", "#   #", "#### ", "#   #", "#### "]),
    ('C', [" ### ", "#   #", "#    ", "#   #", " ### "]),
    ('D', ["#### ", "#   #", "#   #", "#   #", "#### "]),
    ('E', ["#####", "#    ", "###  ", "#    ", "#####"]),
    ('F', ["#####", "#    ", "###  ", "#    ", "#    "]),
    ('G', [" ### ", "#    ", "#  ##", "#   #", " ### "]),
    ('H', ["#   #", "#   #", "#####", "#   #", "#   #"]),
    ('I', ["###", " # ", " # ", " # ", "###"]),
    ('J', ["  ###", "   # ", "   # ", "#  # ", " ##  "]),
    ('K', ["#   #", "#  # ", "###  ", "#  # ", "#   #"]),
    ('L', ["#    ", "#    ", "#    ", "#    ", "#####"]),
    ('M', ["#   #", "## ##", "# # #", "#   #", "#   #"]),
    ('N', ["#   #", "##  #", "# # #", "#  ##", "#   #"]),
    ('O', [" ### ", "#   #", "#   #", "#   #", " ### "]),
    ('P', ["#### ", "#   #", "#### ", "#    ", "#    "]),
    ('Q', [" ### ", "#   #", "# # #", "#  # ", " ## #"]),
    ('R', ["#### ", "#   #", "#### ", "#  # ", "#   #"]),
    ('S', [" ####", "#    ", " ### ", "    #", "#### "]),
    ('T', ["#####", "  #  ", "  #  ", "  #  ", "  #  "]),
    ('U', ["#   #", "#   #", "#   #", "#   #", " ### "]),
    ('V', ["#   #", "#   #", "#   #", " # # ", "  #  "]),
    ('W', ["#   #", "#   #", "# # #", "## ##", "#   #"]),
    ('X', ["#   #", " # # ", "  #  ", " # # ", "#   #"]),
    ('Y', ["#   #", " # # ", "  #  ", "  #  ", "  #  "]),
    ('Z', ["#####", "   # ", "  #  ", " #   ", "#####"]),
    ('0', [" ### ", "#   #", "#   #", "#   #", " ### "]),
    ('1', [" # ", "## ", " # ", " # ", "###"]),
    ('2', [" ### ", "#   #", "  ## ", " #   ", "#####"]),
    ('3', [" ### ", "#   #", "  ## ", "#   #", " ### "]),
    ('4', ["#  # ", "#  # ", "#####", "   # ", "   # "]),
    ('5', ["#####", "#    ", "#### ", "    #", "#### "]),
    ('6', [" ### ", "#    ", "#### ", "#   #", " ### "]),
    ('7', ["#####", "   # ", "  #  ", " #   ", " #   "]),
    ('8', [" ### ", "#   #", " ### ", "#   #", " ### "]),
    ('9', [" ### ", "#   #", " ####", "   # ", " ### "]),
    (' ', ["   ", "   ", "   ", "   ", "   "]),
    ('!', ["#", "#", "#", " ", "#"]),
    ('.', [" ", " ", " ", " ", "#"]),
    (',', [" ", " ", " ", "#", "#"]),
    ('\'', ["#", "#", " ", " ", " "]),
    ('-', ["     ", "     ", "#####", "     ", "     "]),
    ('?', [" ### ", "#   #", "  ## ", "     ", "  #  "]),
    (':', [" ", "#", " ", "#", " "]),
];

/// Bitmap for `ch`, case-folded. `None` when the font lacks the character.
pub fn glyph(ch: char) -> Option<&'static [&'static str; 5]> {
    let upper = ch.to_ascii_uppercase();
    GLYPHS.iter().find(|(c, _)| *c == upper).map(|(_, g)| g)
}

/// True when every character of `text` has a glyph.
pub fn can_render(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| glyph(c).is_some())
}

/// Width of `text` in cells, including the one-cell gaps between glyphs.
/// Unsupported characters are skipped.
pub fn banner_width(text: &str) -> u16 {
    let widths: Vec<u16> = text
        .chars()
        .filter_map(glyph)
        .map(|g| g[0].len() as u16)
        .collect();
    let gaps = widths.len().saturating_sub(1) as u16;
    widths.iter().sum::<u16>() + gaps
}

/// Draw `text` as a banner with its top-left cell at the node origin.
pub fn draw_banner(text: &str, fill: char, style: &Style, z_order: i32) -> Vec<DrawOp> {
    let mut ops = Vec::new();
    let mut cursor_x = 0i32;

    for g in text.chars().filter_map(glyph) {
        for (row, line) in g.iter().enumerate() {
            for (col, c) in line.chars().enumerate() {
                if c == '#' {
                    ops.push(DrawOp {
                        x: cursor_x + col as i32,
                        y: row as i32,
                        ch: fill,
                        style: style.clone(),
                        z_order,
                    });
                }
            }
        }
        cursor_x += g[0].len() as i32 + 1;
    }
    ops
}
