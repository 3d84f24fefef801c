use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::App;
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(w, h) => app.on_resize(w, h),
        AppEvent::Tick => app.on_tick(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.session.is_open() {
        handle_chat_key(app, key);
    } else {
        handle_host_key(app, key);
    }
}

/// Chat closed: only the floating button is interactive
fn handle_host_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Enter | KeyCode::Char('c') | KeyCode::Char(' ') => app.open_chat(),
        _ => {}
    }
}

fn handle_chat_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_chat(),
        // Send is disabled while a reply is pending
        KeyCode::Enter => {
            if !app.is_busy() {
                app.send();
            }
        }
        KeyCode::Backspace => app.delete_before_cursor(),
        KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(app.chat_height.max(1)),
        KeyCode::PageDown => app.scroll_down(app.chat_height.max(1)),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let (x, y) = (mouse.column, mouse.row);

    if app.session.is_open() {
        match mouse.kind {
            MouseEventKind::ScrollDown => app.scroll_down(3),
            MouseEventKind::ScrollUp => app.scroll_up(3),
            _ => {}
        }
        return;
    }

    let on_button = app.button_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if on_button => app.start_drag(x, y),
        MouseEventKind::Drag(MouseButton::Left) => app.drag_to(x, y, app.screen_area),
        MouseEventKind::Up(MouseButton::Left) => {
            if app.end_drag() && on_button {
                app.open_chat();
            }
        }
        _ => {}
    }
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}
