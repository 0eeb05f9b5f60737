/// Rendering layer — all terminal I/O lives here.
///
/// `TerminalRenderer` implements `Renderer` by scaling the pixel playfield
/// onto the terminal grid.  No game logic is performed; this module only
/// translates draw calls into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::config::GameConfig;
use crate::render::{Renderer, Sprite, TextStyle};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_PROJECTILE: Color = Color::Cyan;
const C_BANNER: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

const CONTROLS_HINT: &str = "← → / A D : Move   SPACE : Shoot   R : Restart   Q : Quit";

/// Screen layout, in terminal rows:
///   0          HUD
///   1          top border
///   2..h-2     playfield
///   h-2        bottom border
///   h-1        controls hint
const PLAY_TOP: u16 = 2;

pub struct TerminalRenderer<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    config: GameConfig,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, cols: u16, rows: u16, config: &GameConfig) -> Self {
        Self {
            out,
            cols,
            rows,
            config: config.clone(),
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Park the cursor and flush the queued frame.
    pub fn present(&mut self) -> std::io::Result<()> {
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }

    // ── Geometry ──────────────────────────────────────────────────────────────

    fn play_cols(&self) -> u16 {
        self.cols.saturating_sub(2).max(1)
    }

    fn play_rows(&self) -> u16 {
        self.rows.saturating_sub(4).max(1)
    }

    fn play_bottom(&self) -> i32 {
        i32::from(PLAY_TOP) + i32::from(self.play_rows())
    }

    fn col_of(&self, x: f64) -> i32 {
        1 + (x / self.config.screen_width * f64::from(self.play_cols())).floor() as i32
    }

    fn row_of(&self, y: f64) -> i32 {
        i32::from(PLAY_TOP) + (y / self.config.screen_height * f64::from(self.play_rows())).floor() as i32
    }

    fn cells_wide(&self, width: f64) -> usize {
        ((width / self.config.screen_width * f64::from(self.play_cols())).round() as usize).max(1)
    }

    fn cells_high(&self, height: f64) -> usize {
        ((height / self.config.screen_height * f64::from(self.play_rows())).round() as usize).max(1)
    }

    /// Print `line` at (`col`, `row`), clipped to the playfield interior.
    fn put_clipped(&mut self, col: i32, row: i32, line: &str) -> std::io::Result<()> {
        if row < i32::from(PLAY_TOP) || row >= self.play_bottom() {
            return Ok(());
        }
        let left = 1;
        let right = i32::from(self.cols.saturating_sub(1));
        let visible: String = line
            .chars()
            .enumerate()
            .filter(|(i, _)| {
                let c = col + *i as i32;
                c >= left && c < right
            })
            .map(|(_, ch)| ch)
            .collect();
        if visible.is_empty() {
            return Ok(());
        }
        let start = col.max(left) as u16;
        self.out.queue(cursor::MoveTo(start, row as u16))?;
        self.out.queue(Print(visible))?;
        Ok(())
    }

    // ── Background ────────────────────────────────────────────────────────────

    fn draw_background(&mut self) -> std::io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        let w = self.cols as usize;
        let bottom = self.play_bottom() as u16;

        self.out.queue(style::SetForegroundColor(C_BORDER))?;
        self.out.queue(cursor::MoveTo(0, PLAY_TOP - 1))?;
        self.out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
        self.out.queue(cursor::MoveTo(0, bottom))?;
        self.out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;
        for row in PLAY_TOP..bottom {
            self.out.queue(cursor::MoveTo(0, row))?;
            self.out.queue(Print("│"))?;
            self.out.queue(cursor::MoveTo(self.cols.saturating_sub(1), row))?;
            self.out.queue(Print("│"))?;
        }

        self.out.queue(cursor::MoveTo(1, bottom + 1))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out.queue(Print(CONTROLS_HINT))?;
        Ok(())
    }

    // ── Entities ──────────────────────────────────────────────────────────────

    fn draw_enemy(&mut self, x: f64, y: f64) -> std::io::Result<()> {
        // Row 0:  <▼▼▼>
        // Rest:   [___]
        let w = self.cells_wide(self.config.enemy_width);
        let h = self.cells_high(self.config.enemy_height);
        let (col, row) = (self.col_of(x), self.row_of(y));
        self.out.queue(style::SetForegroundColor(C_ENEMY))?;
        for r in 0..h {
            let line = if r == 0 {
                framed('<', '▼', '>', w)
            } else {
                framed('[', '_', ']', w)
            };
            self.put_clipped(col, row + r as i32, &line)?;
        }
        Ok(())
    }

    fn draw_player(&mut self, x: f64, y: f64) -> std::io::Result<()> {
        // Row 0:   ▲     (tip, centred)
        // Rest:   /|||\
        let w = self.cells_wide(self.config.player_width);
        let h = self.cells_high(self.config.player_height);
        let (col, row) = (self.col_of(x), self.row_of(y));
        self.out.queue(style::SetForegroundColor(C_PLAYER))?;
        self.put_clipped(col + (w / 2) as i32, row, "▲")?;
        for r in 1..h {
            self.put_clipped(col, row + r as i32, &framed('/', '|', '\\', w))?;
        }
        Ok(())
    }

    fn draw_projectile(&mut self, x: f64, y: f64) -> std::io::Result<()> {
        // The glyph marks the hit point, not the full sprite.
        let (col, row) = (self.col_of(x), self.row_of(y));
        self.out.queue(style::SetForegroundColor(C_PROJECTILE))?;
        self.put_clipped(col, row, "║")
    }
}

/// `left` + `fill`×(width-2) + `right`, degrading gracefully for tiny widths.
fn framed(left: char, fill: char, right: char, width: usize) -> String {
    match width {
        0 => String::new(),
        1 => fill.to_string(),
        2 => format!("{left}{right}"),
        _ => format!("{left}{}{right}", fill.to_string().repeat(width - 2)),
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw_sprite(&mut self, sprite: Sprite, x: f64, y: f64) -> std::io::Result<()> {
        match sprite {
            Sprite::Background => self.draw_background(),
            Sprite::Enemy => self.draw_enemy(x, y),
            Sprite::Player => self.draw_player(x, y),
            Sprite::Projectile => self.draw_projectile(x, y),
        }
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, text_style: TextStyle) -> std::io::Result<()> {
        match text_style {
            TextStyle::Hud => {
                let col = self.col_of(x).max(1) as u16;
                self.out.queue(cursor::MoveTo(col, 0))?;
                self.out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
                self.out.queue(Print(text))?;
            }
            TextStyle::Banner => {
                let half = (text.chars().count() / 2) as i32;
                let col = (self.col_of(x) - half).max(0) as u16;
                let row = self.row_of(y).clamp(0, i32::from(self.rows.saturating_sub(1))) as u16;
                self.out.queue(cursor::MoveTo(col, row))?;
                self.out.queue(style::SetForegroundColor(C_BANNER))?;
                self.out.queue(Print(text))?;
            }
        }
        Ok(())
    }
}
