//! Conversation controller for the chat widget.
//!
//! The controller owns the transcript, the draft and the pending flag. It
//! admits at most one request at a time, replays the whole transcript to
//! the transport on every send, and turns every outcome (reply, shape
//! miss, transport failure) into an assistant message.
//!
//! Each open period of the widget is a session. Opening or closing mints a
//! new session id and aborts the in-flight call, so a late reply can never
//! land in a transcript it was not asked for.

use crate::chat::{ChatMessage, ChatRequest, Role};
use crate::config::ChatConfig;
use crate::extract::reply_or_default;
use crate::transport::{ChatTransport, TransportError};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use uuid::Uuid;

type Outcome = Result<Value, TransportError>;

/// A request that has been dispatched but not yet applied.
struct InFlight {
    session: Uuid,
    handle: JoinHandle<Outcome>,
}

/// Mediates between user input and the chat transport.
pub struct ConversationController {
    config: ChatConfig,
    transport: Arc<dyn ChatTransport>,
    transcript: Vec<ChatMessage>,
    draft: String,
    pending: bool,
    open: bool,
    session: Uuid,
    in_flight: Option<InFlight>,
    revision: watch::Sender<u64>,
}

impl ConversationController {
    /// Create a closed controller seeded with the greeting.
    pub fn new(config: ChatConfig, transport: Arc<dyn ChatTransport>) -> Self {
        let (revision, _) = watch::channel(0);
        let transcript = vec![ChatMessage::assistant(config.greeting.clone())];
        Self {
            config,
            transport,
            transcript,
            draft: String::new(),
            pending: false,
            open: false,
            session: Uuid::new_v4(),
            in_flight: None,
            revision,
        }
    }

    /// The configuration this controller was built with.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Messages in chronological order.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Text currently being composed.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Whether a request is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether the chat widget is visible.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Current session id.
    pub fn session(&self) -> Uuid {
        self.session
    }

    /// Content of the most recent assistant message.
    pub fn last_reply(&self) -> Option<&str> {
        self.transcript
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }

    /// Subscribe to transcript changes.
    ///
    /// The value is a revision counter, bumped on every append and every
    /// time the widget opens.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Replace the draft verbatim.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Submit the current draft.
    pub fn submit_draft(&mut self) -> bool {
        let text = self.draft.clone();
        self.submit(&text)
    }

    /// Send `text` as the next user message.
    ///
    /// Returns `false` without touching any state if the trimmed text is
    /// empty or a request is already pending. Otherwise appends the user
    /// message, clears the draft and dispatches the request on the tokio
    /// runtime; the reply is applied by [`poll`](Self::poll) or
    /// [`settle`](Self::settle).
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("ignoring empty submission");
            return false;
        }
        if self.pending {
            tracing::debug!(session = %self.session, "ignoring submission while a request is pending");
            return false;
        }

        self.push(ChatMessage::user(text));
        self.draft.clear();
        self.pending = true;

        let request = ChatRequest::new(&self.config.system_prompt, &self.transcript);
        let transport = Arc::clone(&self.transport);
        let handle = tokio::spawn(async move { transport.send(&request).await });
        tracing::debug!(
            session = %self.session,
            messages = self.transcript.len() + 1,
            "chat request dispatched"
        );

        self.in_flight = Some(InFlight {
            session: self.session,
            handle,
        });
        true
    }

    /// Apply the in-flight reply if it has arrived. Never waits.
    ///
    /// Returns `true` if a reply was applied.
    pub async fn poll(&mut self) -> bool {
        let finished = self
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.handle.is_finished());
        if !finished {
            return false;
        }
        match self.in_flight.take() {
            Some(in_flight) => {
                let outcome = in_flight.handle.await;
                self.complete(in_flight.session, outcome)
            }
            None => false,
        }
    }

    /// Wait for the in-flight reply, if any, and apply it.
    ///
    /// Returns `true` if a reply was applied.
    pub async fn settle(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                let outcome = in_flight.handle.await;
                self.complete(in_flight.session, outcome)
            }
            None => false,
        }
    }

    /// Show the widget, starting a fresh session if it was hidden.
    pub fn open(&mut self) {
        if self.open {
            return;
        }
        self.reset_session();
        self.open = true;
        self.transcript = vec![ChatMessage::assistant(self.config.greeting.clone())];
        self.draft.clear();
        self.revision.send_modify(|r| *r += 1);
        tracing::debug!(session = %self.session, "chat opened");
    }

    /// Hide the widget, cancelling any outstanding request.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.reset_session();
        self.open = false;
        tracing::debug!("chat closed");
    }

    /// Flip visibility.
    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Abort the in-flight call and invalidate its session.
    fn reset_session(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.handle.abort();
            tracing::debug!(session = %in_flight.session, "cancelled in-flight chat request");
        }
        self.session = Uuid::new_v4();
        self.pending = false;
    }

    fn complete(&mut self, session: Uuid, outcome: Result<Outcome, JoinError>) -> bool {
        if session != self.session {
            tracing::debug!(%session, "discarding reply for a stale session");
            return false;
        }

        let content = match outcome {
            Ok(Ok(body)) => reply_or_default(&body),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "chat transport failed");
                self.config.unreachable_message.clone()
            }
            Err(e) => {
                tracing::warn!(error = %e, "chat request task failed");
                self.config.unreachable_message.clone()
            }
        };

        self.push(ChatMessage::assistant(content));
        self.pending = false;
        true
    }

    fn push(&mut self, message: ChatMessage) {
        self.transcript.push(message);
        self.revision.send_modify(|r| *r += 1);
    }
}

impl Drop for ConversationController {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.handle.abort();
        }
    }
}
