use std::collections::{HashMap, VecDeque};
use std::io::{self, BufWriter, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use log::{error, info, warn};

use crate::grid::Grid;
use crate::rendering::{CellRaster, Fill, Label, Rect, Rgb, Surface};

/// Raw mode and the alternate screen for as long as the guard lives.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode().map_err(|e| { error!("Failed to enable raw mode: {}", e); e })?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))
            .map_err(|e| { error!("Failed to prepare screen: {}", e); e })?;
        info!("Raw mode enabled.");
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, ResetColor, Show, LeaveAlternateScreen) {
            error!("Failed to restore screen: {}", e);
        }
        if let Err(e) = terminal::disable_raw_mode() {
            error!("Failed to disable raw mode: {}", e);
        }
        info!("Terminal restored.");
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb { r: rgb.r, g: rgb.g, b: rgb.b }
}

/// True-colour terminal surface. Every grid cell is two terminal columns,
/// each painted with its own background sample.
pub struct TerminalSurface {
    raster: CellRaster,
    score: String,
    high_score: String,
    theme: String,
    out: BufWriter<Stdout>,
}

impl TerminalSurface {
    pub fn new(grid: Grid) -> Self {
        TerminalSurface {
            raster: CellRaster::new(grid),
            score: String::new(),
            high_score: String::new(),
            theme: String::new(),
            out: BufWriter::new(io::stdout()),
        }
    }

    /// Terminal columns and rows needed for the board plus status lines.
    pub fn required_size(grid: &Grid) -> (u16, u16) {
        ((grid.cols * 2) as u16, (grid.rows + 2) as u16)
    }

    pub fn check_fits(grid: &Grid) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        let (need_width, need_height) = Self::required_size(grid);
        if width < need_width || height < need_height {
            warn!("Terminal is {}x{}, board needs {}x{}; output will be clipped.", width, height, need_width, need_height);
        }
        Ok(())
    }

    /// Forces a clean repaint, e.g. after a resize.
    pub fn invalidate(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor, Clear(ClearType::All))
    }
}

impl Surface for TerminalSurface {
    fn width(&self) -> u32 {
        self.raster.grid.width
    }

    fn height(&self) -> u32 {
        self.raster.grid.height
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill) {
        self.raster.fill_rect(rect, fill);
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
        let grid = self.raster.grid;
        queue!(self.out, BeginSynchronizedUpdate)?;

        for row in 0..grid.rows {
            queue!(self.out, MoveTo(0, row as u16))?;
            let mut current: Option<Rgb> = None;
            for col in 0..grid.cols {
                for sample in self.raster.get(col, row) {
                    if current != Some(sample) {
                        queue!(self.out, SetBackgroundColor(color(sample)))?;
                        current = Some(sample);
                    }
                    queue!(self.out, Print(' '))?;
                }
            }
        }

        let status = format!("Score: {}  High Score: {}  Theme: {}", self.score, self.high_score, self.theme);
        queue!(
            self.out,
            ResetColor,
            MoveTo(0, grid.rows as u16),
            Clear(ClearType::UntilNewLine),
            Print(status),
            MoveTo(0, grid.rows as u16 + 1),
            Clear(ClearType::UntilNewLine),
            Print("Arrows/WASD: move  t: theme  q: quit"),
            EndSynchronizedUpdate
        )?;
        self.out.flush()
    }
}

/// Where key events come from.
pub enum InputSource {
    Terminal,
    Simulated(SimulatedInput),
}

impl InputSource {
    /// Waits up to `timeout` for the next terminal event. Simulated input
    /// never blocks; it hands out whatever is scripted for `frame`.
    pub fn next_event(&mut self, frame: u64, timeout: Duration) -> io::Result<Option<Event>> {
        match self {
            InputSource::Terminal => {
                if event::poll(timeout).map_err(|e| { error!("Failed to poll event: {}", e); e })? {
                    Ok(Some(event::read().map_err(|e| { error!("Failed to read event: {}", e); e })?))
                } else {
                    Ok(None)
                }
            }
            InputSource::Simulated(sim) => Ok(sim.next(frame)),
        }
    }
}

// --- SimulatedInput for debugging ---
pub struct SimulatedInput {
    events: HashMap<u64, VecDeque<Event>>,
}

impl SimulatedInput {
    pub fn new(script: Vec<(u64, Event)>) -> Self {
        let mut events: HashMap<u64, VecDeque<Event>> = HashMap::new();
        for (frame, event) in script {
            events.entry(frame).or_default().push_back(event);
        }
        SimulatedInput { events }
    }

    /// Next scripted event for `frame`, in script order.
    pub fn next(&mut self, frame: u64) -> Option<Event> {
        let queue = self.events.get_mut(&frame)?;
        let event = queue.pop_front();
        if queue.is_empty() {
            self.events.remove(&frame);
        }
        event
    }

    pub fn remaining(&self) -> usize {
        self.events.values().map(VecDeque::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    #[test]
    fn simulated_events_come_out_per_frame_in_order() {
        let mut sim = SimulatedInput::new(vec![
            (2, Event::Key(KeyCode::Up.into())),
            (2, Event::Key(KeyCode::Left.into())),
            (5, Event::Key(KeyCode::Char('t').into())),
        ]);
        assert_eq!(sim.next(0), None);
        assert_eq!(sim.next(2), Some(Event::Key(KeyCode::Up.into())));
        assert_eq!(sim.next(2), Some(Event::Key(KeyCode::Left.into())));
        assert_eq!(sim.next(2), None);
        assert_eq!(sim.remaining(), 1);
    }

    #[test]
    fn long_frame_queue_drains_in_order() {
        let keys = [KeyCode::Up, KeyCode::Left, KeyCode::Down, KeyCode::Right, KeyCode::Char('t')];
        let mut sim = SimulatedInput::new(keys.iter().map(|key| (7, Event::Key((*key).into()))).collect());
        for key in keys {
            assert_eq!(sim.next(7), Some(Event::Key(key.into())));
        }
        assert_eq!(sim.next(7), None);
        assert_eq!(sim.remaining(), 0);
    }

    #[test]
    fn required_size_accounts_for_double_width_cells() {
        assert_eq!(TerminalSurface::required_size(&Grid::new(400, 300, 20)), (40, 17));
    }
}
