//! Terminal-mode guard for the interactive strip: raw mode, alternate screen
//! and mouse capture are undone on drop and on panic.

use crossterm::{
    cursor::{Hide, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::{
    io::{self, Write},
    panic,
    sync::{
        atomic::{AtomicU8, Ordering},
        OnceLock,
    },
};

const RAW_MODE: u8 = 0b001;
const ALT_SCREEN: u8 = 0b010;
const MOUSE_CAPTURE: u8 = 0b100;

// Modes currently switched on; shared with the panic hook.
static ACTIVE_MODES: AtomicU8 = AtomicU8::new(0);
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

/// Owns the terminal modes the interactive view needs.
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    /// Switch the terminal into interactive mode.
    ///
    /// # Errors
    ///
    /// Returns the first failing mode switch. Modes already enabled are
    /// restored when the error propagates.
    pub fn enter(out: &mut impl Write) -> io::Result<Self> {
        install_terminal_panic_hook();
        let session = Self { _private: () };
        enable_raw_mode()?;
        ACTIVE_MODES.fetch_or(RAW_MODE, Ordering::SeqCst);
        session.enter_screen(out)?;
        Ok(session)
    }

    fn enter_screen(&self, out: &mut impl Write) -> io::Result<()> {
        execute!(out, EnterAlternateScreen, Hide)?;
        ACTIVE_MODES.fetch_or(ALT_SCREEN, Ordering::SeqCst);
        execute!(out, EnableMouseCapture)?;
        ACTIVE_MODES.fetch_or(MOUSE_CAPTURE, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Undo every mode recorded as active. Safe to call repeatedly.
pub fn restore_terminal() {
    let modes = ACTIVE_MODES.swap(0, Ordering::SeqCst);
    if modes == 0 {
        return;
    }
    let mut stdout = io::stdout();
    if modes & MOUSE_CAPTURE != 0 {
        let _ = execute!(stdout, DisableMouseCapture);
    }
    if modes & ALT_SCREEN != 0 {
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
    if modes & RAW_MODE != 0 {
        let _ = disable_raw_mode();
    }
    let _ = execute!(stdout, Show);
    let _ = stdout.flush();
    tracing::debug!(modes, "terminal restored");
}

/// Restore the terminal before the default panic message is printed.
pub fn install_terminal_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_terminal();
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown".to_string());
            tracing::error!(%location, "panic");
            previous(info);
        }));
    });
}
