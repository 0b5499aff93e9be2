//! Home screen - the portfolio owner's card behind the chat window.

use crate::app::App;
use crate::screens::Screen;
use crate::ui::theme::Styles;
use crate::ui::widgets::{KeyHint, StatusBar};
use crate::ui::{centered_fixed, main_layout};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// The home screen.
pub struct HomeScreen;

impl Screen for HomeScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);

        render_profile(app, main_area, buf);

        let hints = if app.is_chat_open() {
            vec![
                KeyHint::new("Enter", "Send"),
                KeyHint::new("Shift+Enter", "Newline"),
                KeyHint::new("Esc", "Close"),
            ]
        } else {
            vec![
                KeyHint::new("c", "Chat"),
                KeyHint::new("?", "Help"),
                KeyHint::new("q", "Quit"),
            ]
        };

        StatusBar::new("folio")
            .hints(hints)
            .right(&app.endpoint_label)
            .render(status_area, buf);
    }
}

/// Profile card size in cells.
const CARD_WIDTH: u16 = 64;
const CARD_HEIGHT: u16 = 10;

fn render_profile(app: &App, area: Rect, buf: &mut Buffer) {
    let content_area = centered_fixed(CARD_WIDTH, CARD_HEIGHT, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .style(Styles::default());

    let inner = block.inner(content_area);
    block.render(content_area, buf);

    let profile = &app.profile;
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", profile.name), Styles::title())),
        Line::from(Span::styled(format!("  {}", profile.tagline), Styles::highlight())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Location: ", Styles::dim()),
            Span::styled(profile.location.as_str(), Styles::default()),
        ]),
        Line::from(vec![
            Span::styled("  Email:    ", Styles::dim()),
            Span::styled(profile.email.as_str(), Styles::default()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("  Press c to chat with {}'s assistant.", profile.short_name),
            Styles::dim(),
        )),
    ];

    Paragraph::new(lines)
        .style(Styles::default())
        .wrap(Wrap { trim: false })
        .render(inner, buf);
}
