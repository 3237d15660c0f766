//! GameView: maps a [`TileView`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! World coordinates are y-up with the board centered on the origin; the
//! framebuffer is y-down. The drawn area covers the board plus the preview
//! and hold panels, each framed by a border, with a status line underneath.

use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{GameConfig, Point, Shape};
use crate::view::TileView;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned cell rectangle in world coordinates: min inclusive, max exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    min: Point,
    max: Point,
}

impl Rect {
    fn contains(&self, at: Point) -> bool {
        at.x >= self.min.x && at.x < self.max.x && at.y >= self.min.y && at.y < self.max.y
    }

    fn union(self, other: Rect) -> Rect {
        Rect {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    fn grown(self, by: i32) -> Rect {
        Rect {
            min: Point::new(self.min.x - by, self.min.y - by),
            max: Point::new(self.max.x + by, self.max.y + by),
        }
    }

    fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    fn height(&self) -> i32 {
        self.max.y - self.min.y
    }
}

/// Box around a spawn-orientation piece anchored at `anchor`.
fn panel_rect(anchor: Point) -> Rect {
    Rect {
        min: Point::new(anchor.x - 1, anchor.y),
        max: Point::new(anchor.x + 3, anchor.y + 2),
    }
}

fn clamp_u16(v: i32) -> u16 {
    u16::try_from(v.max(0)).unwrap_or(u16::MAX)
}

const BG: Rgb = Rgb::new(30, 30, 40);

/// A lightweight terminal renderer for the playfield.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    board: Rect,
    preview: Rect,
    hold: Rect,
    /// Everything that is drawn, including one cell of margin for borders.
    world: Rect,
}

impl GameView {
    pub fn new(config: &GameConfig) -> Self {
        let origin = config.board_origin();
        let board = Rect {
            min: origin,
            max: Point::new(origin.x + config.board_width, origin.y + config.board_height),
        };
        let preview = panel_rect(config.preview_anchor);
        let hold = panel_rect(config.hold_anchor);
        let world = board.union(preview).union(hold).grown(1);

        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            board,
            preview,
            hold,
            world,
        }
    }

    pub fn with_cell_size(mut self, cell_w: u16, cell_h: u16) -> Self {
        self.cell_w = cell_w.max(1);
        self.cell_h = cell_h.max(1);
        self
    }

    /// Terminal size needed to show everything (board, panels and status line).
    pub fn required_size(&self) -> (u16, u16) {
        let w = clamp_u16(self.world.width()).saturating_mul(self.cell_w);
        let h = clamp_u16(self.world.height())
            .saturating_mul(self.cell_h)
            .saturating_add(1);
        (w, h)
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, view: &TileView, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Default::default());

        let (need_w, need_h) = self.required_size();
        let start_x = viewport.width.saturating_sub(need_w) / 2;
        let start_y = viewport.height.saturating_sub(need_h) / 2;
        let screen = Screen {
            view: self,
            start_x: start_x as i32,
            start_y: start_y as i32,
        };

        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        let label = CellStyle::new(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0)).bold();
        let empty = CellStyle::new(Rgb::new(90, 90, 100), BG).dim();

        // Board background with grid dots.
        for y in self.board.min.y..self.board.max.y {
            for x in self.board.min.x..self.board.max.x {
                screen.fill_cell(fb, Point::new(x, y), '·', empty);
            }
        }
        for panel in [self.preview, self.hold] {
            for y in panel.min.y..panel.max.y {
                for x in panel.min.x..panel.max.x {
                    screen.fill_cell(fb, Point::new(x, y), ' ', CellStyle::new(BG, BG));
                }
            }
        }

        screen.draw_border(fb, self.board, border);
        screen.draw_border(fb, self.preview, border);
        screen.draw_border(fb, self.hold, border);
        screen.put_label(fb, self.preview, "NEXT", label);
        screen.put_label(fb, self.hold, "HOLD", label);

        for (&at, &shape) in view.tiles() {
            if self.world.contains(at) {
                screen.fill_cell(fb, at, '█', shape_style(shape));
            }
        }

        // Status line.
        let status_y = start_y + need_h - 1;
        let value = CellStyle::default();
        fb.put_str(start_x, status_y, "LINES", label);
        fb.put_u32(start_x + 6, status_y, view.lines(), value);
        fb.put_str(start_x + 14, status_y, "PIECES", label);
        fb.put_u32(start_x + 21, status_y, view.pieces(), value);

        if view.is_game_over() {
            screen.draw_overlay_text(fb, self.board, "GAME OVER");
            let hint = "r: restart  q: quit";
            let hint_x = start_x + need_w.saturating_sub(hint.chars().count() as u16);
            fb.put_str(hint_x, status_y, hint, value.dim());
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, view: &TileView, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(view, viewport, &mut fb);
        fb
    }

    /// Top-left terminal position of a world cell, relative to the drawn area.
    fn offset_of(&self, at: Point) -> (i32, i32) {
        let col = (at.x - self.world.min.x) * self.cell_w as i32;
        let row = (self.world.max.y - 1 - at.y) * self.cell_h as i32;
        (col, row)
    }
}

/// A [`GameView`] placed at a terminal position.
struct Screen<'a> {
    view: &'a GameView,
    start_x: i32,
    start_y: i32,
}

impl Screen<'_> {
    fn to_screen(&self, col: i32, row: i32) -> Option<(u16, u16)> {
        let x = u16::try_from(self.start_x + col).ok()?;
        let y = u16::try_from(self.start_y + row).ok()?;
        Some((x, y))
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, at: Point, ch: char, style: CellStyle) {
        let (col, row) = self.view.offset_of(at);
        if let Some((x, y)) = self.to_screen(col, row) {
            fb.fill_rect(x, y, self.view.cell_w, self.view.cell_h, ch, style);
        }
    }

    /// Terminal rectangle (left, top, right, bottom; inclusive) just outside `rect`.
    fn frame_of(&self, rect: Rect) -> Option<(u16, u16, u16, u16)> {
        let (left, top) = self.view.offset_of(Point::new(rect.min.x, rect.max.y - 1));
        let (right, bottom) = self.view.offset_of(Point::new(rect.max.x, rect.min.y - 1));
        let (l, t) = self.to_screen(left - 1, top - 1)?;
        let (r, b) = self.to_screen(right, bottom)?;
        Some((l, t, r, b))
    }

    fn draw_border(&self, fb: &mut FrameBuffer, rect: Rect, style: CellStyle) {
        let Some((l, t, r, b)) = self.frame_of(rect) else {
            return;
        };
        if r <= l || b <= t {
            return;
        }

        fb.put_char(l, t, '┌', style);
        fb.put_char(r, t, '┐', style);
        fb.put_char(l, b, '└', style);
        fb.put_char(r, b, '┘', style);

        for x in l + 1..r {
            fb.put_char(x, t, '─', style);
            fb.put_char(x, b, '─', style);
        }
        for y in t + 1..b {
            fb.put_char(l, y, '│', style);
            fb.put_char(r, y, '│', style);
        }
    }

    fn put_label(&self, fb: &mut FrameBuffer, rect: Rect, text: &str, style: CellStyle) {
        if let Some((l, t, _, _)) = self.frame_of(rect) {
            fb.put_str(l + 1, t, text, style);
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, rect: Rect, text: &str) {
        let Some((l, t, r, b)) = self.frame_of(rect) else {
            return;
        };
        let text_w = text.chars().count() as u16;
        let x = l + (r - l).saturating_add(1).saturating_sub(text_w) / 2;
        let y = t + (b - t) / 2;
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
        fb.put_str(x, y, text, style);
    }
}

fn shape_style(shape: Shape) -> CellStyle {
    let fg = match shape {
        Shape::I => Rgb::new(80, 220, 220),
        Shape::O => Rgb::new(240, 220, 80),
        Shape::T => Rgb::new(200, 120, 220),
        Shape::S => Rgb::new(100, 220, 120),
        Shape::Z => Rgb::new(220, 80, 80),
        Shape::J => Rgb::new(80, 120, 220),
        Shape::L => Rgb::new(255, 165, 0),
    };
    CellStyle::new(fg, BG).bold()
}
