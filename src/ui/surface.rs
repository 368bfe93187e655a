//! Braille-dot rendering of the logical playfield
//!
//! Each terminal cell holds a 2x4 grid of braille dots. The logical screen
//! is stretched over the dots of the viewport area, and every sprite or
//! rectangle is drawn as its own colored layer on top of the cell grid.

use std::collections::HashMap;

use ratatui::layout::{Position, Rect};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::assets::Image;
use crate::geometry;
use crate::platform::{Surface, TextImage};
use crate::settings::Rgb;

pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Where the logical screen sits on the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub area: Rect,
    pub screen_w: i32,
    pub screen_h: i32,
}

impl Viewport {
    pub fn new(area: Rect, screen_w: i32, screen_h: i32) -> Self {
        Self {
            area,
            screen_w,
            screen_h,
        }
    }

    fn cols(&self) -> i32 {
        i32::from(self.area.width).max(1)
    }

    fn rows(&self) -> i32 {
        i32::from(self.area.height).max(1)
    }

    /// Logical pixels covered by one terminal cell
    pub fn cell_size(&self) -> (f32, f32) {
        (
            self.screen_w as f32 / self.cols() as f32,
            self.screen_h as f32 / self.rows() as f32,
        )
    }

    /// Logical pixels covered by one braille dot
    fn dot_size(&self) -> (f32, f32) {
        let (cw, ch) = self.cell_size();
        (cw / 2.0, ch / 4.0)
    }

    fn dots(&self) -> (i32, i32) {
        (self.cols() * 2, self.rows() * 4)
    }

    /// Cell (relative to `area`) containing the logical point
    pub fn to_cell(&self, x: i32, y: i32) -> (i32, i32) {
        let (cw, ch) = self.cell_size();
        ((x as f32 / cw).floor() as i32, (y as f32 / ch).floor() as i32)
    }

    /// Logical point at the center of a terminal cell, or None when the
    /// cell is outside the viewport.
    pub fn to_logical(&self, column: u16, row: u16) -> Option<(i32, i32)> {
        if !self.area.contains(Position::new(column, row)) {
            return None;
        }
        let (cw, ch) = self.cell_size();
        let col = f32::from(column - self.area.x) + 0.5;
        let row = f32::from(row - self.area.y) + 0.5;
        Some(((col * cw) as i32, (row * ch) as i32))
    }

    /// Dot columns and rows touched by `rect`, as half-open ranges
    fn dot_span(&self, rect: geometry::Rect) -> (std::ops::Range<i32>, std::ops::Range<i32>) {
        let (dw, dh) = self.dot_size();
        let (bw, bh) = self.dots();
        let x0 = ((rect.left() as f32 / dw).floor() as i32).clamp(0, bw);
        let x1 = ((rect.right() as f32 / dw).ceil() as i32).clamp(0, bw);
        let y0 = ((rect.top() as f32 / dh).floor() as i32).clamp(0, bh);
        let y1 = ((rect.bottom() as f32 / dh).ceil() as i32).clamp(0, bh);
        (x0..x1, y0..y1)
    }

    /// Logical point at the center of a dot
    fn dot_center(&self, bx: i32, by: i32) -> (i32, i32) {
        let (dw, dh) = self.dot_size();
        (
            ((bx as f32 + 0.5) * dw) as i32,
            ((by as f32 + 0.5) * dh) as i32,
        )
    }
}

type DotMap = HashMap<(usize, usize), u8>;

fn braille_bit(sub_x: usize, sub_y: usize) -> u8 {
    match (sub_x, sub_y) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0,
    }
}

fn set_dot(map: &mut DotMap, bx: i32, by: i32, bw: i32, bh: i32) {
    if bx < 0 || by < 0 || bx >= bw || by >= bh {
        return;
    }
    let cx = bx as usize / 2;
    let cy = by as usize / 4;
    let sx = bx as usize % 2;
    let sy = by as usize % 4;
    *map.entry((cx, cy)).or_insert(0) |= braille_bit(sx, sy);
}

/// Paint a dot layer over the grid, keeping each cell's background
fn write_layer(grid: &mut [Vec<(char, Style)>], map: &DotMap, fg: Color) {
    for (&(cx, cy), &bits) in map {
        if bits == 0 {
            continue;
        }
        if let Some(cell) = grid.get_mut(cy).and_then(|row| row.get_mut(cx)) {
            cell.0 = char::from_u32(0x2800 + u32::from(bits)).unwrap_or(' ');
            cell.1 = cell.1.fg(fg);
        }
    }
}

/// Draws into a ratatui frame. Nothing reaches the terminal buffer until
/// `present`.
pub struct TerminalSurface<'a, 'f> {
    frame: &'a mut Frame<'f>,
    viewport: Viewport,
    grid: Vec<Vec<(char, Style)>>,
}

impl<'a, 'f> TerminalSurface<'a, 'f> {
    pub fn new(frame: &'a mut Frame<'f>, viewport: Viewport) -> Self {
        let w = viewport.area.width as usize;
        let h = viewport.area.height as usize;
        Self {
            frame,
            viewport,
            grid: vec![vec![(' ', Style::default()); w]; h],
        }
    }
}

impl Surface for TerminalSurface<'_, '_> {
    fn size(&self) -> (i32, i32) {
        (self.viewport.screen_w, self.viewport.screen_h)
    }

    fn fill(&mut self, rgb: Rgb) {
        let style = Style::default().bg(color(rgb));
        for row in &mut self.grid {
            for cell in row.iter_mut() {
                *cell = (' ', style);
            }
        }
    }

    fn fill_rect(&mut self, rect: geometry::Rect, rgb: Rgb) {
        let (bw, bh) = self.viewport.dots();
        let (xs, ys) = self.viewport.dot_span(rect);
        let mut map = DotMap::new();
        for by in ys {
            for bx in xs.clone() {
                set_dot(&mut map, bx, by, bw, bh);
            }
        }
        write_layer(&mut self.grid, &map, color(rgb));
    }

    fn blit(&mut self, image: &Image, rect: geometry::Rect) {
        let (bw, bh) = self.viewport.dots();
        let (xs, ys) = self.viewport.dot_span(rect);
        let mut map = DotMap::new();
        for by in ys {
            for bx in xs.clone() {
                let (px, py) = self.viewport.dot_center(bx, by);
                if image.is_opaque(px - rect.x, py - rect.y) {
                    set_dot(&mut map, bx, by, bw, bh);
                }
            }
        }
        write_layer(&mut self.grid, &map, color(image.tint));
    }

    fn blit_text(&mut self, text: &TextImage) {
        let (col, row) = self.viewport.to_cell(text.rect.x, text.rect.y);
        let Ok(row) = usize::try_from(row) else {
            return;
        };
        let Some(line) = self.grid.get_mut(row) else {
            return;
        };
        let style = Style::default().fg(color(text.fg)).bg(color(text.bg));
        for (i, ch) in text.text.chars().enumerate() {
            let Ok(c) = usize::try_from(col + i as i32) else {
                continue;
            };
            if let Some(cell) = line.get_mut(c) {
                *cell = (ch, style);
            }
        }
    }

    fn present(&mut self) {
        let lines: Vec<Line<'static>> = std::mem::take(&mut self.grid)
            .into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|(ch, style)| Span::styled(String::from(ch), style))
                    .collect();
                Line::from(spans)
            })
            .collect();
        self.frame.render_widget(Paragraph::new(lines), self.viewport.area);
    }
}
