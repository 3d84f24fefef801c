use ratatui::layout::Rect;
use ratatui::text::Span;
use std::sync::Arc;
use vaultchat_core::appearance::{button_frame, ButtonFrame, ButtonMetrics};
use vaultchat_core::{ChatSession, Config, FloatingButtonOptions, SendOutcome};

/// Button size and default paddings in terminal cells
const BUTTON_HEIGHT: u16 = 3;
const BUTTON_H_PADDING: u16 = 2;
const BUTTON_V_PADDING: u16 = 1;

pub struct App {
    pub should_quit: bool,
    pub session: ChatSession,

    // Draft editing
    pub input_cursor: usize, // cursor position in chars

    // Chat view
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height, updated during render
    pub chat_width: u16,  // inner width, updated during render
    pub animation_frame: u8,

    pub screen_area: Rect, // updated during render

    // Floating button
    pub button_options: FloatingButtonOptions,
    pub button_area: Option<Rect>, // updated during render, for mouse hit-testing
    pub button_override: Option<ButtonFrame>, // set once the user drags the button
    pub drag_origin: Option<(u16, u16)>,
    pub drag_moved: bool,
}

impl App {
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_session(ChatSession::new(config))
    }

    pub fn with_session(session: ChatSession) -> Self {
        Self {
            should_quit: false,
            session,
            input_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            screen_area: Rect::default(),
            button_options: FloatingButtonOptions {
                enable_drag_to_reposition: true,
                ..Default::default()
            },
            button_area: None,
            button_override: None,
            drag_origin: None,
            drag_moved: false,
        }
    }

    pub fn button_metrics(&self) -> ButtonMetrics {
        // Label plus a space and a border on each side
        let label_width = Span::raw(self.session.config().button_content()).width() as u16;
        ButtonMetrics {
            width: label_width + 4,
            height: BUTTON_HEIGHT,
            horizontal_padding: BUTTON_H_PADDING,
            vertical_padding: BUTTON_V_PADDING,
        }
    }

    /// Where the floating button goes inside `host`
    pub fn button_rect(&self, host: Rect) -> Rect {
        let frame = self.button_override.unwrap_or_else(|| {
            button_frame(&self.button_metrics(), &self.button_options, host.width, host.height, 0)
        });
        let width = frame.width.min(host.width);
        let height = frame.height.min(host.height);
        Rect::new(host.x + frame.x.min(host.width - width), host.y + frame.y.min(host.height - height), width, height)
    }

    pub fn open_chat(&mut self) {
        self.session.open();
        self.scroll_chat_to_bottom();
    }

    pub fn close_chat(&mut self) {
        self.session.close();
    }

    pub fn is_busy(&self) -> bool {
        self.session.conversation().is_busy()
    }

    pub fn input(&self) -> &str {
        self.session.conversation().input()
    }

    pub fn send(&mut self) {
        if self.session.conversation_mut().send() == SendOutcome::Sent {
            self.input_cursor = 0;
            self.animation_frame = 0;
            // Scroll to bottom so "Thinking..." is visible
            self.scroll_chat_to_bottom();
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let cursor = self.input_cursor;
        self.session.conversation_mut().edit_input(|input| {
            let byte_pos = char_to_byte_index(input, cursor);
            input.insert(byte_pos, c);
        });
        self.input_cursor += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        self.input_cursor -= 1;
        let cursor = self.input_cursor;
        self.session.conversation_mut().edit_input(|input| {
            let byte_pos = char_to_byte_index(input, cursor);
            input.remove(byte_pos);
        });
    }

    pub fn delete_at_cursor(&mut self) {
        let cursor = self.input_cursor;
        if cursor >= self.input().chars().count() {
            return;
        }
        self.session.conversation_mut().edit_input(|input| {
            let byte_pos = char_to_byte_index(input, cursor);
            input.remove(byte_pos);
        });
    }

    pub fn cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.input_cursor = (self.input_cursor + 1).min(self.input().chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.input_cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.input_cursor = self.input().chars().count();
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines);
    }

    /// Advance the animation and pick up a finished reply
    pub fn on_tick(&mut self) {
        if self.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        if self.session.conversation_mut().poll_reply() {
            self.scroll_chat_to_bottom();
        }
    }

    /// Keep a dragged button on screen after the terminal shrinks
    pub fn on_resize(&mut self, width: u16, height: u16) {
        if let Some(frame) = self.button_override {
            self.button_override = Some(frame.dragged_by(0, 0, width, height));
        }
    }

    /// Mouse went down on the button
    pub fn start_drag(&mut self, column: u16, row: u16) {
        self.drag_origin = Some((column, row));
        self.drag_moved = false;
    }

    pub fn drag_to(&mut self, column: u16, row: u16, host: Rect) {
        let Some((from_col, from_row)) = self.drag_origin else {
            return;
        };
        if !self.button_options.enable_drag_to_reposition || (column, row) == (from_col, from_row) {
            return;
        }
        let current = self.button_rect(host);
        let frame = ButtonFrame {
            x: current.x - host.x,
            y: current.y - host.y,
            width: current.width,
            height: current.height,
        };
        let dx = i32::from(column) - i32::from(from_col);
        let dy = i32::from(row) - i32::from(from_row);
        self.button_override = Some(frame.dragged_by(dx, dy, host.width, host.height));
        self.drag_origin = Some((column, row));
        self.drag_moved = true;
    }

    /// Mouse released. Returns true when the press never moved, i.e. a tap.
    pub fn end_drag(&mut self) -> bool {
        let tapped = self.drag_origin.is_some() && !self.drag_moved;
        self.drag_origin = None;
        self.drag_moved = false;
        tapped
    }

    pub fn scroll_chat_to_bottom(&mut self) {
        // Default to 50 columns before the first render
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: usize = 0;
        for msg in self.session.conversation().messages() {
            total_lines = total_lines.saturating_add(1); // Role line
            for line in msg.text.lines() {
                let char_count = line.chars().count();
                total_lines = total_lines.saturating_add(char_count / wrap_width + 1);
            }
            total_lines = total_lines.saturating_add(1); // Blank line after message
        }
        if self.is_busy() {
            total_lines = total_lines.saturating_add(2); // Label + "Thinking..."
        }

        let visible_height = if self.chat_height > 0 { self.chat_height } else { 20 };
        let total_lines = u16::try_from(total_lines).unwrap_or(u16::MAX);
        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultchat_core::api::{ChatTransport, Reply};
    use vaultchat_core::ApiError;

    struct NeverTransport;

    #[async_trait::async_trait]
    impl ChatTransport for NeverTransport {
        async fn send_message(&self, _question: &str) -> Result<Reply, ApiError> {
            std::future::pending().await
        }
    }

    /// Answers every question with a reply far taller than a u16 line count
    struct TallReplyTransport;

    #[async_trait::async_trait]
    impl ChatTransport for TallReplyTransport {
        async fn send_message(&self, _question: &str) -> Result<Reply, ApiError> {
            Ok(Reply::text("a\n".repeat(70_000)))
        }
    }

    fn app() -> App {
        let config = Arc::new(Config::builder("k").build().unwrap());
        App::with_session(ChatSession::with_transport(config, Arc::new(NeverTransport)))
    }

    #[test]
    fn test_char_to_byte_index_multibyte() {
        assert_eq!(char_to_byte_index("héllo", 2), 3);
        assert_eq!(char_to_byte_index("héllo", 99), 6);
    }

    #[test]
    fn test_editing_at_cursor() {
        let mut app = app();
        for c in "hllo".chars() {
            app.insert_char(c);
        }
        app.cursor_home();
        app.cursor_right();
        app.insert_char('é');
        assert_eq!(app.input(), "héllo");

        app.cursor_end();
        app.delete_before_cursor();
        assert_eq!(app.input(), "héll");

        app.cursor_home();
        app.delete_at_cursor();
        assert_eq!(app.input(), "éll");
    }

    #[tokio::test]
    async fn test_send_resets_cursor_and_marks_busy() {
        let mut app = app();
        for c in " hi ".chars() {
            app.insert_char(c);
        }
        app.send();
        assert_eq!(app.input_cursor, 0);
        assert!(app.is_busy());
        assert_eq!(app.session.conversation().messages()[0].text, "hi");
    }

    #[tokio::test]
    async fn test_very_tall_reply_scrolls_without_overflow() {
        let config = Arc::new(Config::builder("k").build().unwrap());
        let mut app = App::with_session(ChatSession::with_transport(config, Arc::new(TallReplyTransport)));
        app.chat_height = 20;
        app.chat_width = 40;
        for c in "hi".chars() {
            app.insert_char(c);
        }
        app.send();

        for _ in 0..200 {
            app.on_tick();
            if !app.is_busy() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert!(!app.is_busy());
        assert_eq!(app.session.conversation().messages().len(), 2);
        assert_eq!(app.chat_scroll, u16::MAX - 20);
    }

    #[test]
    fn test_default_button_sits_bottom_right() {
        let app = app();
        let host = Rect::new(0, 0, 80, 24);
        // "💬" is two cells wide
        assert_eq!(app.button_rect(host), Rect::new(80 - 6 - 2, 24 - 3 - 1, 6, 3));
    }

    #[test]
    fn test_press_without_move_is_tap() {
        let mut app = app();
        app.start_drag(75, 21);
        app.drag_to(75, 21, Rect::new(0, 0, 80, 24));
        assert!(app.end_drag());
        assert!(app.button_override.is_none());
        assert!(!app.end_drag());
    }

    #[test]
    fn test_drag_moves_and_clamps_button() {
        let mut app = app();
        let host = Rect::new(0, 0, 80, 24);
        app.start_drag(75, 21);
        app.drag_to(0, 0, host);
        assert!(!app.end_drag());
        assert_eq!(app.button_rect(host), Rect::new(0, 0, 6, 3));

        app.on_resize(40, 10);
        assert_eq!(app.button_rect(Rect::new(0, 0, 40, 10)), Rect::new(0, 0, 6, 3));
    }
}
