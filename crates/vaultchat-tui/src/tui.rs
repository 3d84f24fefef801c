use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEvent, KeyEventKind, MouseEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stderr};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

/// How often a pending reply is checked for and the "Thinking..." dots move
const TICK_INTERVAL: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    /// Time to apply a finished reply, if any
    Tick,
}

/// Merges terminal input with the reply-polling tick.
///
/// Everything is awaited on the caller's task, so the conversation is only
/// ever touched from the UI loop.
pub struct EventHandler {
    input: EventStream,
    ticks: Interval,
}

impl EventHandler {
    pub fn new() -> Self {
        let mut ticks = tokio::time::interval(TICK_INTERVAL);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            input: EventStream::new(),
            ticks,
        }
    }

    /// Next event worth handling. `None` once the terminal input closes.
    pub async fn next(&mut self) -> Option<AppEvent> {
        loop {
            tokio::select! {
                _ = self.ticks.tick() => return Some(AppEvent::Tick),
                evt = self.input.next() => match evt? {
                    // Only key presses, not releases
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => return Some(AppEvent::Key(key)),
                    Ok(Event::Mouse(mouse)) => return Some(AppEvent::Mouse(mouse)),
                    Ok(Event::Resize(w, h)) => return Some(AppEvent::Resize(w, h)),
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "terminal event stream error"),
                },
            }
        }
    }
}

pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stderr(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(io::stderr());
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

pub fn restore() -> Result<()> {
    execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Install panic hook to restore terminal on panic
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}
