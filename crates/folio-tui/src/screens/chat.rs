//! Chat window - floating conversation overlay.

use crate::app::App;
use crate::screens::Screen;
use crate::ui::theme::{spinner, Styles};
use crate::ui::{chat_window, main_layout};
use chrono::Local;
use folio_engine::Role;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// The chat window.
pub struct ChatScreen;

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (main_area, _) = main_layout(area);
        let window = chat_window(main_area);
        Clear.render(window, buf);

        let block = Block::default()
            .title(format!(" Chat with {} ", app.profile.short_name))
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .style(Styles::default());

        let inner = block.inner(window);
        block.render(window, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(inner);

        render_transcript(app, chunks[0], buf);
        render_input(app, chunks[1], buf);
    }
}

/// Transcript as display lines, wrapped to `width`.
fn transcript_lines(app: &App, width: u16) -> Vec<Line<'static>> {
    // Bodies are indented by two cells under their label.
    let body_width = usize::from(width).saturating_sub(2).max(1);
    let mut lines = Vec::new();

    for msg in app.controller.transcript() {
        let (label, label_style, body_style) = match msg.role {
            Role::User => ("You", Styles::highlight(), Styles::user_message()),
            Role::Assistant => ("Assistant", Styles::active(), Styles::assistant_message()),
            Role::System => ("System", Styles::dim(), Styles::dim()),
        };
        let time = msg.timestamp.with_timezone(&Local).format("%H:%M");

        lines.push(Line::from(vec![
            Span::styled(label, label_style),
            Span::styled(format!(" {time}"), Styles::dim()),
        ]));
        for line in textwrap::wrap(&msg.content, body_width) {
            lines.push(Line::from(Span::styled(format!("  {line}"), body_style)));
        }
        lines.push(Line::from(""));
    }

    if app.controller.is_pending() {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", spinner(app.tick)), Styles::active()),
            Span::styled("Thinking...", Styles::dim()),
        ]));
    }

    lines
}

fn render_transcript(app: &App, area: Rect, buf: &mut Buffer) {
    let lines = transcript_lines(app, area.width);
    let max_scroll = lines.len().saturating_sub(usize::from(area.height));
    app.transcript_max_scroll.set(max_scroll);

    let scroll = u16::try_from(app.effective_scroll()).unwrap_or(u16::MAX);
    Paragraph::new(lines)
        .style(Styles::default())
        .scroll((scroll, 0))
        .render(area, buf);
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(if app.controller.is_pending() {
            Styles::border()
        } else {
            Styles::border_active()
        })
        .style(Styles::default());

    app.input_state
        .widget()
        .block(block)
        .focused(!app.controller.is_pending())
        .placeholder("Type a message...")
        .render(area, buf);
}
