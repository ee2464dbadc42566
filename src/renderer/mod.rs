//! Renderer — the deterministic rasterizer.
//!
//! Turns a `ResolvedScene` into a cell grid and computes the cell-level
//! changes between consecutive grids. Pure and stateless: it knows nothing
//! about dialogue, time or the terminal.

use crate::types::{Cell, CellChange, Frame, ResolvedScene};

pub type Grid = Vec<Vec<Cell>>;

pub struct Renderer;

impl Renderer {
    /// Rasterize `scene` and express it relative to `prev`.
    ///
    /// Without a previous grid, or when the size changed, the frame is full.
    pub fn frame(prev: Option<&Grid>, scene: &ResolvedScene) -> (Grid, Frame) {
        let grid = Self::rasterize(scene);
        let same_size = prev.is_some_and(|p| {
            p.len() == grid.len() && p.first().map(Vec::len) == grid.first().map(Vec::len)
        });
        let frame = match prev {
            Some(p) if same_size => Frame::Diff {
                changes: Self::diff(p, &grid),
            },
            _ => Frame::Full {
                cells: grid.clone(),
            },
        };
        (grid, frame)
    }

    /// Rasterize a resolved scene onto a grid of the scene's size.
    ///
    /// Draw operations are sorted by z-order so that higher z values
    /// paint over lower ones; ops outside the grid are dropped.
    pub fn rasterize(scene: &ResolvedScene) -> Grid {
        let w = scene.width as usize;
        let h = scene.height as usize;
        let mut grid = vec![vec![Cell::default(); w]; h];

        let mut ops: Vec<_> = scene.ops.iter().collect();
        ops.sort_by_key(|op| op.z_order);

        for op in ops {
            if op.x < 0 || op.y < 0 {
                continue;
            }
            let (x, y) = (op.x as usize, op.y as usize);
            if x < w && y < h {
                grid[y][x] = Cell {
                    ch: op.ch,
                    style: op.style.clone(),
                };
            }
        }

        grid
    }

    /// Compute a cell-level diff between two grids of equal size.
    pub fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
            for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
                if prev_cell != next_cell {
                    changes.push(CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: next_cell.clone(),
                    });
                }
            }
        }
        changes
    }

    /// Plain-text rendition of a grid, one line per row, trailing blanks
    /// trimmed.
    pub fn to_text(grid: &Grid) -> String {
        let mut out = String::new();
        for row in grid {
            let line: String = row.iter().map(|c| c.ch).collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DrawOp, Style};

    fn op(x: i32, y: i32, ch: char, z_order: i32) -> DrawOp {
        DrawOp {
            x,
            y,
            ch,
            style: Style::default(),
            z_order,
        }
    }

    fn scene(ops: Vec<DrawOp>) -> ResolvedScene {
        ResolvedScene {
            width: 4,
            height: 2,
            ops,
        }
    }

    #[test]
    fn higher_z_wins_and_offscreen_ops_are_dropped() {
        let grid = Renderer::rasterize(&scene(vec![
            op(1, 0, 'b', 2),
            op(1, 0, 'a', 1),
            op(-1, 0, 'x', 9),
            op(4, 1, 'x', 9),
        ]));
        assert_eq!(Renderer::to_text(&grid), " b\n\n");
    }

    #[test]
    fn first_frame_is_full_then_diffs() {
        let (grid, frame) = Renderer::frame(None, &scene(vec![op(0, 0, 'a', 0)]));
        assert!(matches!(frame, Frame::Full { .. }));

        let (_, frame) = Renderer::frame(Some(&grid), &scene(vec![op(0, 0, 'a', 0), op(3, 1, 'z', 0)]));
        match frame {
            Frame::Diff { changes } => {
                assert_eq!(changes.len(), 1);
                assert_eq!((changes[0].x, changes[0].y, changes[0].cell.ch), (3, 1, 'z'));
            }
            Frame::Full { .. } => panic!("expected a diff"),
        }
    }

    #[test]
    fn size_change_forces_a_full_frame() {
        let (grid, _) = Renderer::frame(None, &scene(Vec::new()));
        let bigger = ResolvedScene {
            width: 5,
            height: 2,
            ops: Vec::new(),
        };
        let (_, frame) = Renderer::frame(Some(&grid), &bigger);
        assert!(matches!(frame, Frame::Full { .. }));
    }
}
