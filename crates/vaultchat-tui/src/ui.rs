use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use vaultchat_core::{ButtonShape, ButtonType, ChatRole, Theme};

use crate::app::App;

struct Palette {
    bg: Color,
    fg: Color,
    muted: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            bg: Color::White,
            fg: Color::Black,
            muted: Color::Gray,
        },
        Theme::Dark => Palette {
            bg: Color::Black,
            fg: Color::White,
            muted: Color::DarkGray,
        },
        // Leave the terminal's own colors alone
        Theme::System => Palette {
            bg: Color::Reset,
            fg: Color::Reset,
            muted: Color::DarkGray,
        },
    }
}

fn primary(app: &App) -> Color {
    let c = app.session.config().primary_color();
    Color::Rgb(c.r, c.g, c.b)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    app.screen_area = area;
    let colors = palette(app.session.config().theme());

    frame.render_widget(Block::default().style(Style::default().bg(colors.bg).fg(colors.fg)), area);

    if app.session.is_open() {
        app.button_area = None;
        render_chat_screen(app, frame, area, &colors);
    } else {
        render_host(frame, area, &colors);
        render_floating_button(app, frame, area);
    }
}

/// Stand-in for the host application behind the button
fn render_host(frame: &mut Frame, area: Rect, colors: &Palette) {
    let text = Text::from(vec![
        Line::from(Span::styled("Your app goes here", Style::default().bold())),
        Line::default(),
        Line::from(Span::styled(
            "Enter / click the button to chat · drag to move · q to quit",
            Style::default().fg(colors.muted),
        )),
    ]);

    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), middle);
}

fn render_floating_button(app: &mut App, frame: &mut Frame, area: Rect) {
    let rect = app.button_rect(area);
    app.button_area = Some(rect);

    let config = app.session.config();
    let border_type = match config.button_shape() {
        ButtonShape::Circle => BorderType::Rounded,
        ButtonShape::Square => BorderType::Plain,
    };

    let label_style = match config.button_type() {
        ButtonType::Text => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ButtonType::Image => Style::default().fg(Color::White).add_modifier(Modifier::ITALIC),
    };

    let button = Paragraph::new(Span::styled(config.button_content().to_string(), label_style))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(border_type)
                .border_style(Style::default().fg(Color::White)),
        )
        .style(Style::default().bg(primary(app)));

    frame.render_widget(Clear, rect);
    frame.render_widget(button, rect);
}

fn render_chat_screen(app: &mut App, frame: &mut Frame, area: Rect, colors: &Palette) {
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let accent = primary(app);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {} ", app.session.config().chat_title()), Style::default().bold()),
        Span::raw(" "),
        Span::styled(format!("v{}", env!("CARGO_PKG_VERSION")), Style::default().fg(colors.muted)),
    ]))
    .style(Style::default().bg(accent).fg(Color::White));
    frame.render_widget(header, header_area);

    // Inner size minus borders, for scroll calculations
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors.muted));

    let conversation = app.session.conversation();
    let chat_text = if conversation.messages().is_empty() && !conversation.is_busy() {
        Text::from(Span::styled("Ask us anything...", Style::default().fg(colors.muted)))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for msg in conversation.messages() {
            match msg.role {
                ChatRole::User => {
                    lines.push(
                        Line::from(Span::styled("You", Style::default().fg(accent).add_modifier(Modifier::BOLD)))
                            .alignment(Alignment::Right),
                    );
                    for line in msg.text.lines() {
                        lines.push(Line::from(line.to_string()).alignment(Alignment::Right));
                    }
                }
                ChatRole::Assistant => {
                    lines.push(Line::from(Span::styled(
                        "Assistant",
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    )));
                    for line in msg.text.lines() {
                        lines.push(Line::from(line.to_string()));
                    }
                }
            }
            lines.push(Line::default());
        }

        if conversation.is_busy() {
            lines.push(Line::from(Span::styled(
                "Assistant",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("Thinking{}", dots),
                Style::default().fg(colors.muted).add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    let chat = Paragraph::new(chat_text)
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    render_input(app, frame, input_area, accent, colors);

    let hints = if app.is_busy() {
        " Waiting for a reply... · Esc close · Ctrl-C quit "
    } else {
        " Enter send · Esc close · ↑↓ scroll · Ctrl-C quit "
    };
    frame.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(colors.muted))),
        footer_area,
    );
}

fn render_input(app: &App, frame: &mut Frame, area: Rect, accent: Color, colors: &Palette) {
    let busy = app.is_busy();
    let border_color = if busy { colors.muted } else { accent };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(" Message ");

    // Horizontal scrolling keeps the cursor visible
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.input_cursor;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app.input().chars().skip(scroll_offset).take(inner_width).collect();

    let input = Paragraph::new(visible_text).style(Style::default().fg(colors.fg)).block(input_block);
    frame.render_widget(input, area);

    let cursor_x = (cursor_pos - scroll_offset) as u16;
    frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
}
