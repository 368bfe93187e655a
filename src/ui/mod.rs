pub mod surface;

use std::io;
use std::thread;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::game::GameState;
use crate::geometry;
use crate::platform::{Platform, TextImage, TextRenderer};
use crate::settings::Rgb;

pub use surface::{TerminalSurface, Viewport};

/// Terminal side of the platform: text metrics follow the current viewport,
/// the pointer is mouse capture.
pub struct TerminalShell {
    pub viewport: Viewport,
}

impl TerminalShell {
    pub fn new(screen_w: i32, screen_h: i32) -> Self {
        Self {
            viewport: Viewport::new(Rect::default(), screen_w, screen_h),
        }
    }
}

impl TextRenderer for TerminalShell {
    /// One terminal cell per character
    fn render_text(&self, text: &str, fg: Rgb, bg: Rgb) -> TextImage {
        let (cw, ch) = self.viewport.cell_size();
        let chars = text.chars().count() as f32;
        TextImage {
            text: text.to_string(),
            rect: geometry::Rect::new(0, 0, (chars * cw).ceil() as i32, ch.ceil() as i32),
            fg,
            bg,
        }
    }
}

impl Platform for TerminalShell {
    fn set_pointer_visible(&mut self, visible: bool) {
        let result = if visible {
            execute!(io::stdout(), EnableMouseCapture)
        } else {
            execute!(io::stdout(), DisableMouseCapture)
        };
        if let Err(e) = result {
            log::warn!("Failed to toggle mouse capture: {e}");
        }
    }

    fn pause(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

pub fn render(frame: &mut Frame, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(80, 120, 220)))
        .title(" Alien Invasion ")
        .title_style(
            Style::default()
                .fg(Color::Rgb(100, 160, 255))
                .add_modifier(Modifier::BOLD),
        );

    let inner = block.inner(frame.area());
    frame.render_widget(block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let screen = app.game.screen();
    let viewport = Viewport::new(chunks[0], screen.w, screen.h);
    if viewport != app.shell.viewport {
        let area = viewport.area;
        log::debug!("Viewport now {}x{} cells", area.width, area.height);
        app.shell.viewport = viewport;
        app.game.refresh_display(&app.shell);
    }

    if viewport.area.width > 0 && viewport.area.height > 0 {
        let mut surface = TerminalSurface::new(frame, viewport);
        app.game.render(&mut surface);
    }

    let help = Paragraph::new(help_line(app.game.state()));
    frame.render_widget(help, chunks[1]);
}

/// Key hints for the current state
fn help_line(state: GameState) -> Line<'static> {
    let sep = || Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60)));
    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);

    let mut spans = match state {
        GameState::Idle => vec![Span::styled(" Enter/Click Play ", key)],
        GameState::Active => vec![
            Span::styled(" \u{2190}\u{2192} Move ", dim),
            sep(),
            Span::styled("Space Fire ", key),
        ],
    };
    spans.push(sep());
    spans.push(Span::styled("Q Quit", dim));
    Line::from(spans)
}
