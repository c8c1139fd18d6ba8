//! Cell-grid renderer: paints a [`Scene`] into a buffer of styled cells and
//! flushes only the cells that changed since the previous frame.

use std::io::Write;

use anyhow::Result;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color as TermColor, Print, SetBackgroundColor, SetForegroundColor};
use termpose_core::prelude::{Color, Rect, Scene, SceneNode};
use unicode_width::UnicodeWidthChar;

/// Marks the shadowed cell to the right of a double-width character.
const WIDE_CONTINUATION: char = '\0';

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

#[derive(Clone, PartialEq)]
pub struct CellBuffer {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(width: u16, height: u16, bg: Color) -> Self {
        let blank = Cell {
            ch: ' ',
            fg: bg,
            bg,
        };
        Self {
            width,
            height,
            cells: vec![blank; width as usize * height as usize],
        }
    }

    fn idx(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        (x < self.width && y < self.height).then(|| &self.cells[self.idx(x, y)])
    }

    fn clip(&self, rect: Rect) -> Option<(u16, u16, u16, u16)> {
        let x0 = rect.x.round().max(0.0) as i32;
        let y0 = rect.y.round().max(0.0) as i32;
        let x1 = ((rect.x + rect.w).round() as i32).min(self.width as i32);
        let y1 = ((rect.y + rect.h).round() as i32).min(self.height as i32);
        (x0 < x1 && y0 < y1).then_some((x0 as u16, y0 as u16, x1 as u16, y1 as u16))
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let i = self.idx(x, y);
                self.cells[i] = Cell {
                    ch: ' ',
                    fg: color,
                    bg: color,
                };
            }
        }
    }

    /// One-cell box-drawing border on the rectangle's perimeter. Keeps the
    /// background of the cells it draws over.
    pub fn draw_border(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let (x1, y1) = (x1 - 1, y1 - 1);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        self.put(x0, y0, '┌', color);
        self.put(x1, y0, '┐', color);
        self.put(x0, y1, '└', color);
        self.put(x1, y1, '┘', color);
        for x in x0 + 1..x1 {
            self.put(x, y0, '─', color);
            self.put(x, y1, '─', color);
        }
        for y in y0 + 1..y1 {
            self.put(x0, y, '│', color);
            self.put(x1, y, '│', color);
        }
    }

    fn put(&mut self, x: u16, y: u16, ch: char, fg: Color) {
        let i = self.idx(x, y);
        self.cells[i].ch = ch;
        self.cells[i].fg = fg;
    }

    /// Writes one line of text starting at the rect origin, clipped to the
    /// rect. Cell backgrounds underneath are preserved.
    pub fn draw_text(&mut self, rect: Rect, text: &str, fg: Color) {
        let Some((x0, y0, x1, _)) = self.clip(Rect { h: 1.0, ..rect }) else {
            return;
        };
        let mut x = x0;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as u16;
            if w == 0 {
                continue;
            }
            if x + w > x1 {
                break;
            }
            self.put(x, y0, ch, fg);
            if w == 2 {
                self.put(x + 1, y0, WIDE_CONTINUATION, fg);
            }
            x += w;
        }
    }
}

/// Rasterizes a scene for a `width x height` cell grid.
pub fn paint(scene: &Scene, width: u16, height: u16) -> CellBuffer {
    let mut buf = CellBuffer::new(width, height, scene.clear_color);
    for node in &scene.nodes {
        match node {
            SceneNode::Rect { rect, color } => buf.fill_rect(*rect, *color),
            SceneNode::Border { rect, color } => buf.draw_border(*rect, *color),
            SceneNode::Text { rect, text, color } => buf.draw_text(*rect, text, *color),
        }
    }
    buf
}

fn term_color(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

/// Double-buffered writer: emits only cells that differ from the previous
/// frame, with a full repaint after a resize.
#[derive(Default)]
pub struct TermRenderer {
    prev: Option<CellBuffer>,
}

impl TermRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    pub fn flush(&mut self, out: &mut impl Write, buf: &CellBuffer) -> Result<()> {
        let full = match &self.prev {
            Some(p) => p.width != buf.width || p.height != buf.height,
            None => true,
        };

        for y in 0..buf.height {
            for x in 0..buf.width {
                let cell = buf.get(x, y).expect("cell in range");
                if cell.ch == WIDE_CONTINUATION {
                    continue;
                }
                if !full
                    && let Some(prev) = &self.prev
                    && prev.get(x, y) == Some(cell)
                {
                    continue;
                }
                queue!(
                    out,
                    MoveTo(x, y),
                    SetForegroundColor(term_color(cell.fg)),
                    SetBackgroundColor(term_color(cell.bg)),
                    Print(cell.ch),
                )?;
            }
        }
        out.flush()?;
        self.prev = Some(buf.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect { x, y, w, h }
    }

    #[test]
    fn paint_fills_background_with_clear_color() {
        let scene = Scene {
            clear_color: Color(1, 2, 3),
            nodes: vec![],
        };
        let buf = paint(&scene, 4, 2);
        assert_eq!(buf.get(3, 1).unwrap().bg, Color(1, 2, 3));
    }

    #[test]
    fn rects_clip_to_the_grid() {
        let scene = Scene {
            clear_color: Color::BLACK,
            nodes: vec![SceneNode::Rect {
                rect: rect(-2.0, 1.0, 100.0, 100.0),
                color: Color(9, 9, 9),
            }],
        };
        let buf = paint(&scene, 8, 4);
        assert_eq!(buf.get(0, 0).unwrap().bg, Color::BLACK);
        assert_eq!(buf.get(7, 3).unwrap().bg, Color(9, 9, 9));
    }

    #[test]
    fn text_keeps_cell_background() {
        let scene = Scene {
            clear_color: Color::BLACK,
            nodes: vec![
                SceneNode::Rect {
                    rect: rect(0.0, 0.0, 5.0, 1.0),
                    color: Color(10, 10, 10),
                },
                SceneNode::Text {
                    rect: rect(1.0, 0.0, 4.0, 1.0),
                    text: "hi".into(),
                    color: Color::WHITE,
                },
            ],
        };
        let buf = paint(&scene, 8, 2);
        let cell = buf.get(1, 0).unwrap();
        assert_eq!(cell.ch, 'h');
        assert_eq!(cell.fg, Color::WHITE);
        assert_eq!(cell.bg, Color(10, 10, 10));
    }

    #[test]
    fn wide_characters_occupy_two_cells() {
        let scene = Scene {
            clear_color: Color::BLACK,
            nodes: vec![SceneNode::Text {
                rect: rect(0.0, 0.0, 4.0, 1.0),
                text: "你x".into(),
                color: Color::WHITE,
            }],
        };
        let buf = paint(&scene, 4, 1);
        assert_eq!(buf.get(0, 0).unwrap().ch, '你');
        assert_eq!(buf.get(1, 0).unwrap().ch, WIDE_CONTINUATION);
        assert_eq!(buf.get(2, 0).unwrap().ch, 'x');
    }

    #[test]
    fn border_draws_corners() {
        let scene = Scene {
            clear_color: Color::BLACK,
            nodes: vec![SceneNode::Border {
                rect: rect(0.0, 0.0, 3.0, 3.0),
                color: Color::WHITE,
            }],
        };
        let buf = paint(&scene, 4, 4);
        assert_eq!(buf.get(0, 0).unwrap().ch, '┌');
        assert_eq!(buf.get(2, 0).unwrap().ch, '┐');
        assert_eq!(buf.get(0, 2).unwrap().ch, '└');
        assert_eq!(buf.get(2, 2).unwrap().ch, '┘');
        assert_eq!(buf.get(1, 0).unwrap().ch, '─');
        assert_eq!(buf.get(0, 1).unwrap().ch, '│');
    }
}
