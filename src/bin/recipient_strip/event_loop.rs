//! Interactive viewer: resize signals, pointer hover, and redraws on one thread.

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    Frame, Terminal,
};
use recipient_strip::terminal_restore::TerminalSession;
use recipient_strip::{
    layout_strip, CellSurface, RecipientStrip, RecipientStripView, ResizeBus, StripTheme,
};
use std::io::{self, Stdout};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const STRIP_ROW: u16 = 3;
const STRIP_MARGIN: u16 = 1;
const HINT: &str = "hover the +N badge to see everyone · q quits";

/// Rectangle the strip occupies for a given screen size.
pub(crate) fn strip_area(screen: Rect) -> Rect {
    let row = screen.y + STRIP_ROW.min(screen.height.saturating_sub(1));
    let width = screen.width.saturating_sub(STRIP_MARGIN * 2);
    Rect::new(screen.x + STRIP_MARGIN.min(screen.width), row, width, 1)
}

fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Esc => true,
        _ => false,
    }
}

fn draw(frame: &mut Frame<'_>, strip: &RecipientStrip, theme: StripTheme) {
    let screen = frame.area();
    let title = format!("To ({} recipients)", strip.recipients().len());
    frame.render_widget(
        Line::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        Rect::new(screen.x, screen.y, screen.width, screen.height.min(1)),
    );
    frame.render_widget(RecipientStripView::new(strip).theme(theme), strip_area(screen));
    if screen.height > STRIP_ROW + 2 {
        frame.render_widget(
            Line::styled(HINT, Style::default().add_modifier(Modifier::DIM)),
            Rect::new(screen.x, screen.bottom() - 1, screen.width, 1),
        );
    }
}

/// Switch the terminal into interactive mode and run the viewer until quit.
pub(crate) fn run(strip: &mut RecipientStrip, theme: StripTheme) -> Result<()> {
    let mut stdout = io::stdout();
    let session = TerminalSession::enter(&mut stdout).context("enter interactive terminal")?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout)).context("create terminal backend")?;

    let bus = ResizeBus::new();
    strip.activate(&bus);
    let result = event_loop(&mut terminal, strip, &bus, theme);
    strip.deactivate();

    drop(terminal);
    drop(session);
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    strip: &mut RecipientStrip,
    bus: &ResizeBus,
    theme: StripTheme,
) -> Result<()> {
    let mut surface = CellSurface::new();
    let (cols, rows) = crossterm::terminal::size().context("query terminal size")?;
    let mut screen = Rect::new(0, 0, cols, rows);
    bus.emit(strip_area(screen).width);

    let mut should_draw = true;
    loop {
        if strip.pump_resize(&mut surface)? > 0 {
            should_draw = true;
        }
        if should_draw {
            terminal.draw(|frame| draw(frame, strip, theme))?;
            should_draw = false;
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if is_quit_key(&key) => break,
            Event::Resize(cols, rows) => {
                screen = Rect::new(0, 0, cols, rows);
                bus.emit(strip_area(screen).width);
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Moved => {
                let layout = layout_strip(strip_area(screen), screen, strip);
                if strip.pointer_moved(layout.badge_contains(mouse.column, mouse.row)) {
                    tracing::debug!(
                        tooltip = strip.state().tooltip_visible,
                        "badge hover changed"
                    );
                    should_draw = true;
                }
            }
            _ => {}
        }
    }
    Ok(())
}
