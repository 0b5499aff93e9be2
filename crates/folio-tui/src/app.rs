//! Application state and update logic for the folio TUI.

use crate::event::Action;
use crate::ui::widgets::TextInputState;
use folio_engine::{ChatTransport, Config, ConversationController, Profile};
use std::cell::Cell;
use std::sync::Arc;
use tokio::sync::watch;

/// Application state.
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Tick counter for animations.
    pub tick: usize,

    /// Portfolio owner shown on the home screen.
    pub profile: Profile,

    /// Which endpoint the chat talks to, for the status bar.
    pub endpoint_label: String,

    /// The chat widget's conversation.
    pub controller: ConversationController,

    /// Text input state for the chat input.
    pub input_state: TextInputState,

    /// First visible transcript line when not following.
    pub transcript_scroll: usize,

    /// Whether the transcript view sticks to the newest message.
    pub follow_transcript: bool,

    /// Largest useful scroll offset, as measured by the last render.
    pub(crate) transcript_max_scroll: Cell<usize>,

    transcript_changes: watch::Receiver<u64>,
}

impl App {
    /// Create a new app instance with the chat closed.
    pub fn new(config: &Config, transport: Arc<dyn ChatTransport>) -> Self {
        let controller = ConversationController::new(config.chat_config(), transport);
        let transcript_changes = controller.subscribe();
        let endpoint_label = match &config.transport_url {
            Some(url) => url.clone(),
            None => config.environment.to_string(),
        };

        Self {
            should_quit: false,
            show_help: false,
            tick: 0,
            profile: config.profile.clone(),
            endpoint_label,
            controller,
            input_state: TextInputState::new(),
            transcript_scroll: 0,
            follow_transcript: true,
            transcript_max_scroll: Cell::new(0),
            transcript_changes,
        }
    }

    /// Whether the chat window is showing.
    pub fn is_chat_open(&self) -> bool {
        self.controller.is_open()
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        // Global actions
        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.controller.close();
                    self.should_quit = true;
                }
                return;
            }
            Action::Help => {
                self.show_help = !self.show_help;
                return;
            }
            _ => {}
        }

        // If help is showing, any key closes it
        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.is_chat_open() {
            self.handle_chat_action(action);
        } else if action == Action::Chat {
            self.open_chat();
        }
    }

    fn handle_chat_action(&mut self, action: Action) {
        match action {
            Action::Back | Action::Chat => self.close_chat(),
            Action::Up => self.scroll_up(),
            Action::Down => self.scroll_down(),
            Action::Bottom => self.follow_transcript = true,
            _ => {}
        }
    }

    /// Show the chat window with a fresh conversation.
    pub fn open_chat(&mut self) {
        self.controller.open();
        self.input_state.clear();
        self.transcript_scroll = 0;
        self.follow_transcript = true;
    }

    /// Hide the chat window, cancelling any outstanding request.
    pub fn close_chat(&mut self) {
        self.controller.close();
    }

    /// Apply an edit to the chat input and mirror it into the draft.
    pub fn edit_draft(&mut self, edit: impl FnOnce(&mut TextInputState)) {
        edit(&mut self.input_state);
        self.controller.update_draft(self.input_state.content());
    }

    /// Send the draft. The input is cleared only if the controller accepted it.
    pub fn submit_draft(&mut self) -> bool {
        let accepted = self.controller.submit_draft();
        if accepted {
            self.input_state.clear();
        }
        accepted
    }

    /// Apply a finished chat reply, if one is waiting.
    pub async fn poll_chat(&mut self) {
        self.controller.poll().await;
        self.sync_follow();
    }

    /// Increment tick counter and update time-based state.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.sync_follow();
    }

    /// Scroll offset the transcript should be drawn at.
    pub fn effective_scroll(&self) -> usize {
        let max = self.transcript_max_scroll.get();
        if self.follow_transcript {
            max
        } else {
            self.transcript_scroll.min(max)
        }
    }

    fn scroll_up(&mut self) {
        self.transcript_scroll = self.effective_scroll().saturating_sub(1);
        self.follow_transcript = false;
    }

    fn scroll_down(&mut self) {
        let next = self.effective_scroll() + 1;
        if next >= self.transcript_max_scroll.get() {
            self.follow_transcript = true;
        } else {
            self.transcript_scroll = next;
        }
    }

    /// New messages snap the view back to the bottom.
    fn sync_follow(&mut self) {
        if self.transcript_changes.has_changed().unwrap_or(false) {
            self.transcript_changes.borrow_and_update();
            self.follow_transcript = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, create_test_app_with_transport};
    use folio_engine::testing::ScriptedTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_chat_toggle_via_actions() {
        let mut app = create_test_app();
        assert!(!app.is_chat_open());

        app.handle_action(Action::Chat);
        assert!(app.is_chat_open());

        app.handle_action(Action::Back);
        assert!(!app.is_chat_open());
    }

    #[tokio::test]
    async fn test_quit_closes_help_first() {
        let mut app = create_test_app();
        app.show_help = true;

        app.handle_action(Action::Quit);
        assert!(!app.show_help);
        assert!(!app.should_quit);

        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_quit_cancels_pending_chat() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.queue_hang();
        let mut app = create_test_app_with_transport(transport);
        app.open_chat();

        app.edit_draft(|input| input.insert_str("hello"));
        assert!(app.submit_draft());
        assert!(app.controller.is_pending());

        app.handle_action(Action::Quit);
        assert!(app.should_quit);
        assert!(!app.controller.is_pending());
    }

    #[tokio::test]
    async fn test_edit_draft_mirrors_controller() {
        let mut app = create_test_app();
        app.open_chat();

        app.edit_draft(|input| input.insert_str("hi there"));
        assert_eq!(app.controller.draft(), "hi there");

        app.edit_draft(TextInputState::backspace);
        assert_eq!(app.controller.draft(), "hi ther");
    }

    #[tokio::test]
    async fn test_rejected_submit_keeps_input() {
        let mut app = create_test_app();
        app.open_chat();

        app.edit_draft(|input| input.insert_str("   "));
        assert!(!app.submit_draft());
        assert_eq!(app.input_state.content(), "   ");
    }

    #[tokio::test]
    async fn test_reply_resumes_following() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.queue_body(json!({"content": "hello back"}));
        let mut app = create_test_app_with_transport(transport);
        app.open_chat();
        app.transcript_max_scroll.set(10);

        app.handle_action(Action::Up);
        assert!(!app.follow_transcript);
        assert_eq!(app.effective_scroll(), 9);

        app.edit_draft(|input| input.insert_str("hello"));
        app.submit_draft();
        app.controller.settle().await;
        app.poll_chat().await;
        assert!(app.follow_transcript);
    }

    #[tokio::test]
    async fn test_scroll_down_to_bottom_follows() {
        let mut app = create_test_app();
        app.open_chat();
        app.transcript_max_scroll.set(3);

        app.handle_action(Action::Up);
        app.handle_action(Action::Up);
        assert_eq!(app.effective_scroll(), 1);

        app.handle_action(Action::Down);
        assert_eq!(app.effective_scroll(), 2);
        assert!(!app.follow_transcript);

        app.handle_action(Action::Down);
        assert!(app.follow_transcript);
        assert_eq!(app.effective_scroll(), 3);
    }

    #[tokio::test]
    async fn test_reopen_starts_fresh() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.queue_body(json!({"content": "A"}));
        let mut app = create_test_app_with_transport(transport);
        app.open_chat();

        app.edit_draft(|input| input.insert_str("one"));
        app.submit_draft();
        app.controller.settle().await;
        assert_eq!(app.controller.transcript().len(), 3);

        app.handle_action(Action::Chat);
        app.handle_action(Action::Chat);
        assert_eq!(app.controller.transcript().len(), 1);
        assert!(!app.controller.is_pending());
        assert!(app.input_state.is_empty());
    }
}
