//! folio-tui: Terminal UI for the folio portfolio assistant
//!
//! This crate provides the rendering side of the chat widget:
//! - Home screen with the portfolio owner's card
//! - Floating chat window over the home screen
//! - Key handling that feeds the conversation controller
//! - Shared widgets (status bar, text input)

mod app;
mod event;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod ui;

use screens::Screen as ScreenTrait;

pub use app::App;
pub use event::{Action, Event, EventHandler};
pub use folio_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use folio_engine::{ChatTransport, Config};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;

/// RAII guard for terminal state restoration.
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// This is the main entry point for the TUI. It sets up the terminal,
/// opens the chat window, runs the event loop, and restores the terminal
/// on exit.
pub async fn run_tui(
    config: &Config,
    transport: Arc<dyn ChatTransport>,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;

    // Shift+Enter is only distinguishable from Enter with enhanced key reporting.
    let keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false);
    let _guard = TerminalGuard { keyboard_enhanced };

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    if keyboard_enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, transport);
    app.open_chat();

    // 4 Hz tick rate drives the spinner
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();

            screens::home::HomeScreen.render(app, area, buf);
            if app.is_chat_open() {
                screens::chat::ChatScreen.render(app, area, buf);
            }
            if app.show_help {
                screens::render_help_overlay(area, buf);
            }
        })?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    let handled = app.is_chat_open() && !app.show_help && handle_chat_key(app, key);
                    if !handled {
                        app.handle_action(event::key_to_action(key));
                    }
                }
                Event::Mouse(mouse) => {
                    use crossterm::event::MouseEventKind;
                    match mouse.kind {
                        MouseEventKind::ScrollUp => app.handle_action(Action::Up),
                        MouseEventKind::ScrollDown => app.handle_action(Action::Down),
                        _ => {}
                    }
                }
                Event::Tick => app.tick(),
                // Terminal will handle resize automatically
                Event::Resize(_, _) => {}
            }
        }

        app.poll_chat().await;

        if app.should_quit {
            app.close_chat();
            break;
        }
    }

    Ok(())
}

/// Handle a key typed while the chat window is open.
///
/// Enter without Shift sends the draft; Shift+Enter inserts a newline.
/// Returns `true` if the key was consumed by the chat input.
pub fn handle_chat_key(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Enter {
        if key.modifiers.contains(KeyModifiers::SHIFT) {
            app.edit_draft(|input| input.insert('\n'));
        } else {
            app.submit_draft();
        }
        return true;
    }

    // Ctrl chords are commands (Ctrl+C, Ctrl+G), not text.
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return false;
    }

    match key.code {
        KeyCode::Char(c) => app.edit_draft(|input| input.insert(c)),
        KeyCode::Backspace => app.edit_draft(ui::TextInputState::backspace),
        KeyCode::Delete => app.edit_draft(ui::TextInputState::delete),
        KeyCode::Left => app.edit_draft(ui::TextInputState::move_left),
        KeyCode::Right => app.edit_draft(ui::TextInputState::move_right),
        KeyCode::Home => app.edit_draft(ui::TextInputState::move_home),
        KeyCode::End => app.edit_draft(ui::TextInputState::move_end),
        // Esc, Tab and Up/Down fall through to actions
        _ => return false,
    }
    true
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
