use std::io;
use std::mem;

use log::info;

use crate::constants::*;
use crate::grid::Grid;
use crate::state::GameState;
use crate::terminal_io::TerminalSurface;
use crate::themes::theme;
use crate::types::Cell;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn hex(value: u32) -> Self {
        Rgb {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    /// Perceived brightness in [0, 1].
    pub fn luma(self) -> f64 {
        (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
    }
}

/// Axis-aligned rectangle in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn cell(cell: Cell, size: u32) -> Self {
        Rect::new(cell.x, cell.y, size, size)
    }
}

/// Two-stop fills, in the style of a 2-D canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fill {
    Solid(Rgb),
    Linear { start: (f64, f64), end: (f64, f64), stops: [Rgb; 2] },
    Radial { center: (f64, f64), inner: f64, outer: f64, stops: [Rgb; 2] },
}

impl Fill {
    /// Colour of the fill at surface point (x, y).
    pub fn sample(&self, x: f64, y: f64) -> Rgb {
        match *self {
            Fill::Solid(color) => color,
            Fill::Linear { start, end, stops } => {
                let (dx, dy) = (end.0 - start.0, end.1 - start.1);
                let length_sq = dx * dx + dy * dy;
                if length_sq == 0.0 {
                    return stops[0];
                }
                let t = ((x - start.0) * dx + (y - start.1) * dy) / length_sq;
                stops[0].lerp(stops[1], t)
            }
            Fill::Radial { center, inner, outer, stops } => {
                let distance = ((x - center.0).powi(2) + (y - center.1).powi(2)).sqrt();
                if outer <= inner {
                    return if distance < inner { stops[0] } else { stops[1] };
                }
                stops[0].lerp(stops[1], (distance - inner) / (outer - inner))
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    Score,
    HighScore,
    Theme,
}

/// Something the renderer can paint a frame onto.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn fill_rect(&mut self, rect: Rect, fill: &Fill);
    fn set_label(&mut self, label: Label, text: &str);
    /// Hands the finished frame to the host.
    fn present(&mut self) -> io::Result<()>;
}

/// Board rasterised at cell resolution. Each grid cell keeps two samples,
/// left and right half, which is what a terminal can show in two columns.
#[derive(Clone, Debug)]
pub struct CellRaster {
    pub grid: Grid,
    cells: Vec<[Rgb; 2]>,
}

impl CellRaster {
    pub fn new(grid: Grid) -> Self {
        CellRaster {
            grid,
            cells: vec![[Rgb::default(); 2]; (grid.rows * grid.cols) as usize],
        }
    }

    pub fn get(&self, col: u32, row: u32) -> [Rgb; 2] {
        self.cells[(row * self.grid.cols + col) as usize]
    }

    pub fn fill_rect(&mut self, rect: Rect, fill: &Fill) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let size = self.grid.cell_size as i32;
        let first_col = rect.x.max(0) / size;
        let first_row = rect.y.max(0) / size;
        let last_col = ((rect.x + rect.width as i32 - 1) / size).min(self.grid.cols as i32 - 1);
        let last_row = ((rect.y + rect.height as i32 - 1) / size).min(self.grid.rows as i32 - 1);

        for row in first_row..=last_row {
            for col in first_col..=last_col {
                let x = (col * size) as f64;
                let y = (row * size) as f64;
                let s = size as f64;
                // Opposite quadrant centres, off the cell's middle so radial
                // shading shows.
                let left = fill.sample(x + s / 4.0, y + s / 4.0);
                let right = fill.sample(x + 3.0 * s / 4.0, y + 3.0 * s / 4.0);
                self.cells[(row as u32 * self.grid.cols + col as u32) as usize] = [left, right];
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub rect: Rect,
    pub fill: Fill,
}

/// Headless surface for debug runs and tests.
pub struct ScreenBuffer {
    pub raster: CellRaster,
    pub score: String,
    pub high_score: String,
    pub theme: String,
    pub frames_presented: u64,
    draw_calls: Vec<DrawCall>,
    last_frame: Vec<DrawCall>,
}

impl ScreenBuffer {
    pub fn new(grid: Grid) -> Self {
        ScreenBuffer {
            raster: CellRaster::new(grid),
            score: String::new(),
            high_score: String::new(),
            theme: String::new(),
            frames_presented: 0,
            draw_calls: Vec::new(),
            last_frame: Vec::new(),
        }
    }

    /// Draw calls of the most recently presented frame, in paint order.
    pub fn last_frame(&self) -> &[DrawCall] {
        &self.last_frame
    }

    /// One line per row, one character per cell, darker cells as lighter
    /// glyphs.
    pub fn ascii_rows(&self) -> Vec<String> {
        const RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];
        let grid = self.raster.grid;
        (0..grid.rows)
            .map(|row| {
                (0..grid.cols)
                    .map(|col| {
                        let [left, right] = self.raster.get(col, row);
                        let luma = (left.luma() + right.luma()) / 2.0;
                        RAMP[((luma * (RAMP.len() - 1) as f64).round() as usize).min(RAMP.len() - 1)]
                    })
                    .collect()
            })
            .collect()
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer (frame {}) ---", self.frames_presented);
        for row in self.ascii_rows() {
            info!("|{}|", row);
        }
        info!("Score: {}  High Score: {}  Theme: {}", self.score, self.high_score, self.theme);
    }
}

impl Surface for ScreenBuffer {
    fn width(&self) -> u32 {
        self.raster.grid.width
    }

    fn height(&self) -> u32 {
        self.raster.grid.height
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill) {
        self.raster.fill_rect(rect, fill);
        self.draw_calls.push(DrawCall { rect, fill: *fill });
    }

    fn set_label(&mut self, label: Label, text: &str) {
        let slot = match label {
            Label::Score => &mut self.score,
            Label::HighScore => &mut self.high_score,
            Label::Theme => &mut self.theme,
        };
        *slot = text.to_string();
    }

    fn present(&mut self) -> io::Result<()> {
        self.last_frame = mem::take(&mut self.draw_calls);
        self.frames_presented += 1;
        Ok(())
    }
}

// --- OutputTarget enum to handle the terminal or a ScreenBuffer ---
pub enum OutputTarget {
    Terminal(TerminalSurface),
    ScreenBuffer(ScreenBuffer),
}

impl Surface for OutputTarget {
    fn width(&self) -> u32 {
        match self {
            OutputTarget::Terminal(t) => t.width(),
            OutputTarget::ScreenBuffer(sb) => sb.width(),
        }
    }

    fn height(&self) -> u32 {
        match self {
            OutputTarget::Terminal(t) => t.height(),
            OutputTarget::ScreenBuffer(sb) => sb.height(),
        }
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill) {
        match self {
            OutputTarget::Terminal(t) => t.fill_rect(rect, fill),
            OutputTarget::ScreenBuffer(sb) => sb.fill_rect(rect, fill),
        }
    }

    fn set_label(&mut self, label: Label, text: &str) {
        match self {
            OutputTarget::Terminal(t) => t.set_label(label, text),
            OutputTarget::ScreenBuffer(sb) => sb.set_label(label, text),
        }
    }

    fn present(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Terminal(t) => t.present(),
            OutputTarget::ScreenBuffer(sb) => sb.present(),
        }
    }
}

fn radial(cell: Cell, size: u32, from: Rgb, to: Rgb) -> Fill {
    let half = size as f64 / 2.0;
    Fill::Radial {
        center: (cell.x as f64 + half, cell.y as f64 + half),
        inner: RADIAL_INNER_RADIUS,
        outer: half,
        stops: [from, to],
    }
}

/// Paints one frame, back to front. Reads the state, never changes it.
pub fn draw_frame(state: &GameState, surface: &mut dyn Surface) {
    let theme = theme(state.theme_index);
    let size = state.grid.cell_size;
    let (width, height) = (surface.width(), surface.height());

    surface.fill_rect(
        Rect::new(0, 0, width, height),
        &Fill::Linear {
            start: (0.0, 0.0),
            end: (width as f64, height as f64),
            stops: theme.gradient,
        },
    );

    for (index, segment) in state.snake.iter().enumerate() {
        // Head gets a white highlight
        let highlight = if index == 0 { Rgb::hex(HEAD_HIGHLIGHT) } else { theme.snake };
        let (x, y) = (segment.x as f64, segment.y as f64);
        surface.fill_rect(
            Rect::cell(*segment, size),
            &Fill::Linear {
                start: (x, y),
                end: (x + size as f64, y + size as f64),
                stops: [highlight, Rgb::hex(SEGMENT_SHADE)],
            },
        );
    }

    surface.fill_rect(Rect::cell(state.food, size), &radial(state.food, size, theme.food, Rgb::hex(FOOD_SHADE)));

    if let Some(power_up) = state.power_up {
        surface.fill_rect(
            Rect::cell(power_up, size),
            &radial(power_up, size, theme.power_up, Rgb::hex(POWER_UP_SHADE)),
        );
    }

    surface.set_label(Label::Score, &state.score.to_string());
    surface.set_label(Label::HighScore, &state.high_score.to_string());
    surface.set_label(Label::Theme, theme.name);
}
