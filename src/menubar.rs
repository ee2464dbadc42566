use std::io::Write;

use crossterm::{queue, style};

/// Print a menu item string, bolding any text inside `[...]` brackets.
/// Text outside brackets is printed dim.
pub fn print_menu_item(out: &mut impl Write, item: &str) -> anyhow::Result<()> {
    let mut rest = item;
    while !rest.is_empty() {
        let Some(open) = rest.find('[') else {
            print_attr(out, rest, style::Attribute::Dim)?;
            break;
        };
        if open > 0 {
            print_attr(out, &rest[..open], style::Attribute::Dim)?;
        }
        rest = &rest[open..];
        match rest.find(']') {
            Some(close) => {
                print_attr(out, &rest[..=close], style::Attribute::Bold)?;
                rest = &rest[close + 1..];
            }
            None => {
                queue!(out, style::Print(rest))?;
                break;
            }
        }
    }
    Ok(())
}

fn print_attr(out: &mut impl Write, text: &str, attr: style::Attribute) -> anyhow::Result<()> {
    queue!(
        out,
        style::SetAttribute(attr),
        style::Print(text),
        style::SetAttribute(style::Attribute::Reset),
    )?;
    Ok(())
}
