/// Presentation layer: draws the board and HUD with crossterm.
///
/// The board is small (a 10×10 grid fills a fraction of a terminal),
/// so each frame is rebuilt and flushed in one queue!-batched pass —
/// no diffing needed at this size.
///
/// Cell layout: 4 columns × 2 rows each. The interior shows the source
/// glyph and the lit state as background color; the right/bottom edges
/// show walls. Interior walls are drawn thick, the outer border thin.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::domain::grid::Direction;
use crate::domain::light::SourceKind;
use crate::sim::save;
use crate::sim::world::{Phase, World};

const CELL_W: u16 = 4;
const CELL_H: u16 = 2;
const BOARD_TOP: u16 = 2;
const BOARD_LEFT: u16 = 2;

const BG_DARK: Color = Color::Rgb { r: 24, g: 24, b: 38 };
const BG_LIT: Color = Color::Rgb { r: 196, g: 168, b: 48 };
const BG_SOURCE: Color = Color::Rgb { r: 240, g: 220, b: 90 };
const FG_WALL: Color = Color::Rgb { r: 150, g: 110, b: 200 };
const FG_BORDER: Color = Color::DarkGrey;

pub struct Renderer {
    out: Stdout,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer { out: io::stdout() }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.out, EnterAlternateScreen, Hide)?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.out, Show, LeaveAlternateScreen, ResetColor)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn render(&mut self, world: &World, cursor: usize) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))?;

        match world.phase {
            Phase::Title => self.draw_title(world)?,
            _ => {
                self.draw_board(world, cursor)?;
                self.draw_hud(world)?;
            }
        }

        queue!(self.out, ResetColor)?;
        self.out.flush()
    }

    // ── Title ──

    fn draw_title(&mut self, world: &World) -> io::Result<()> {
        let mut lines = vec![
            "L U M E N G R I D",
            "",
            "Light every cell of the grid.",
            "",
            "[Enter] New game",
        ];
        if save::has_save() {
            lines.push("[C]     Continue saved game");
        }
        lines.push("[Q]     Quit");
        for (i, line) in lines.iter().enumerate() {
            queue!(
                self.out,
                MoveTo(6, 3 + i as u16),
                SetForegroundColor(Color::White),
                Print(line),
            )?;
        }
        if !world.message.is_empty() {
            queue!(
                self.out,
                MoveTo(6, 12),
                SetForegroundColor(Color::Yellow),
                Print(&world.message),
            )?;
        }
        Ok(())
    }

    // ── Board ──

    fn draw_board(&mut self, world: &World, cursor: usize) -> io::Result<()> {
        let size = world.grid.size;

        for index in 0..world.grid.cells.len() {
            let row = (index / size) as u16;
            let col = (index % size) as u16;
            let x = BOARD_LEFT + col * CELL_W;
            let y = BOARD_TOP + row * CELL_H;

            let cell = &world.grid.cells[index];
            let bg = if cell.is_light_source {
                BG_SOURCE
            } else if cell.is_lit() {
                BG_LIT
            } else {
                BG_DARK
            };
            let glyph = self.cell_glyph(world, index);
            let (open, close) = if index == cursor { ('[', ']') } else { (' ', ' ') };
            let fg = if cell.is_light_source || cell.is_lit() {
                Color::Black
            } else {
                Color::Grey
            };

            queue!(
                self.out,
                MoveTo(x, y),
                SetBackgroundColor(bg),
                SetForegroundColor(fg),
                Print(format!("{open}{glyph}{close}")),
                ResetColor,
            )?;

            // right wall (interior boundaries only; border drawn separately)
            if (col as usize) < size - 1 {
                let ch = if world.grid.has_wall_between(index, Direction::Right) { '┃' } else { ' ' };
                queue!(
                    self.out,
                    MoveTo(x + 3, y),
                    SetForegroundColor(FG_WALL),
                    Print(ch),
                )?;
            }
            // bottom wall
            if (row as usize) < size - 1 {
                let ch = if world.grid.has_wall_between(index, Direction::Bottom) { "━━━" } else { "   " };
                queue!(
                    self.out,
                    MoveTo(x, y + 1),
                    SetForegroundColor(FG_WALL),
                    Print(ch),
                )?;
            }
        }

        self.draw_border(size)
    }

    fn cell_glyph(&self, world: &World, index: usize) -> char {
        match world.sources.get(&index) {
            Some(s) => match s.kind {
                SourceKind::Bulb => '●',
                SourceKind::Flashlight => match s.orientation() {
                    Direction::Right => '▶',
                    Direction::Bottom => '▼',
                    Direction::Left => '◀',
                    Direction::Top => '▲',
                },
            },
            None => ' ',
        }
    }

    fn draw_border(&mut self, size: usize) -> io::Result<()> {
        let w = size as u16 * CELL_W;
        let h = size as u16 * CELL_H;
        queue!(self.out, SetForegroundColor(FG_BORDER))?;

        let horizontal: String = "─".repeat(w as usize);
        queue!(
            self.out,
            MoveTo(BOARD_LEFT - 1, BOARD_TOP - 1),
            Print(format!("┌{horizontal}┐")),
            MoveTo(BOARD_LEFT - 1, BOARD_TOP + h - 1),
            Print(format!("└{horizontal}┘")),
        )?;
        for y in 0..h - 1 {
            queue!(
                self.out,
                MoveTo(BOARD_LEFT - 1, BOARD_TOP + y),
                Print('│'),
                MoveTo(BOARD_LEFT + w, BOARD_TOP + y),
                Print('│'),
            )?;
        }
        Ok(())
    }

    // ── HUD ──

    fn draw_hud(&mut self, world: &World) -> io::Result<()> {
        let hud_x = BOARD_LEFT + world.grid.size as u16 * CELL_W + 4;

        let selected = |kind: SourceKind| if world.selected == kind { '▸' } else { ' ' };
        let lines = [
            format!("Level {}", world.level_id),
            String::new(),
            format!("{}Bulbs       {:>3}", selected(SourceKind::Bulb), world.inventory.bulbs),
            format!("{}Flashlights {:>3}", selected(SourceKind::Flashlight), world.inventory.flashlights),
            String::new(),
            "[arrows] move   [space] place/interact".into(),
            "[tab] tool   [r] restart level".into(),
            "[n] new game   [q] quit".into(),
        ];
        for (i, line) in lines.iter().enumerate() {
            queue!(
                self.out,
                MoveTo(hud_x, BOARD_TOP + i as u16),
                SetForegroundColor(Color::White),
                Print(line),
            )?;
        }

        if !world.message.is_empty() {
            let y = BOARD_TOP + world.grid.size as u16 * CELL_H + 1;
            queue!(
                self.out,
                MoveTo(BOARD_LEFT, y),
                SetForegroundColor(Color::Yellow),
                Print(&world.message),
            )?;
        }
        Ok(())
    }
}
