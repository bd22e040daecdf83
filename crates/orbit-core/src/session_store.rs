//! The ordered collection of chat sessions.
//!
//! The store is pure in-memory state. Each mutation queues a persistence
//! operation; the app drains the queue with [`SessionStore::take_pending`]
//! and hands it to [`crate::persistence::SessionRepository::apply`].
//!
//! Invariants:
//! - the collection is never empty once an operation returns
//! - exactly one session is current
//! - messages are append-only, except the text of a streaming model message

use orbit_types::{
    message::{Message, Role},
    personality::Personality,
    session::{derive_title, ChatSession},
};

/// A write to the durable session slot
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOp {
    /// Serialized session collection
    Write(Vec<u8>),
    /// Remove the slot entirely
    Erase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Pending {
    Write,
    Erase,
}

pub struct SessionStore {
    sessions: Vec<ChatSession>,
    current_id: String,
    personality: &'static Personality,
    pending: Vec<Pending>,
}

impl SessionStore {
    /// A store holding one fresh session.
    pub fn new() -> Self {
        let mut store = Self {
            sessions: Vec::new(),
            current_id: String::new(),
            personality: Personality::default_personality(),
            pending: Vec::new(),
        };
        store.create();
        store
    }

    /// Rebuild from a saved collection. The first saved session becomes
    /// current; an empty collection yields a fresh store.
    pub fn hydrate(saved: Vec<ChatSession>) -> Self {
        let Some(first) = saved.first() else {
            return Self::new();
        };
        let current_id = first.id.clone();
        let personality = Personality::find(&first.personality_id)
            .unwrap_or_else(Personality::default_personality);
        log::info!("Restored {} chat session(s)", saved.len());
        Self {
            sessions: saved,
            current_id,
            personality,
            pending: Vec::new(),
        }
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn current_id(&self) -> &str {
        &self.current_id
    }

    pub fn current(&self) -> Option<&ChatSession> {
        self.get(&self.current_id).or_else(|| self.sessions.first())
    }

    pub fn get(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn personality(&self) -> &'static Personality {
        self.personality
    }

    /// Start a new chat: prepended, made current, inherits the active personality.
    pub fn create(&mut self) -> String {
        let session = ChatSession::new(self.personality.id);
        let id = session.id.clone();
        self.sessions.insert(0, session);
        self.current_id = id.clone();
        self.mark(Pending::Write);
        id
    }

    /// Make `id` current and restore its personality if it is still known.
    /// Returns false for an unknown id.
    pub fn select(&mut self, id: &str) -> bool {
        let Some(session) = self.get(id) else {
            return false;
        };
        if let Some(p) = Personality::find(&session.personality_id) {
            self.personality = p;
        }
        self.current_id = id.to_string();
        true
    }

    pub fn delete(&mut self, id: &str) {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() == before {
            return;
        }

        if self.sessions.is_empty() {
            self.create();
            return;
        }
        if self.current_id == id {
            self.current_id = self.sessions[0].id.clone();
        }
        self.mark(Pending::Write);
    }

    /// Drop every session, erase the saved slot, then start over with one.
    pub fn clear_all(&mut self) {
        self.sessions.clear();
        self.mark(Pending::Erase);
        self.create();
    }

    /// Switch personality and record it on the current session.
    pub fn set_personality(&mut self, personality: &'static Personality) {
        self.personality = personality;
        let current_id = self.current_id.clone();
        if let Some(session) = self.session_mut(&current_id) {
            session.personality_id = personality.id.to_string();
            self.mark(Pending::Write);
        }
    }

    /// Append a message; the first user message of a session sets its title.
    pub fn append_message(&mut self, session_id: &str, message: Message) -> bool {
        let Some(session) = self.session_mut(session_id) else {
            return false;
        };
        if session.messages.is_empty() && message.role == Role::User {
            session.title = derive_title(&message.text);
        }
        session.messages.push(message);
        self.mark(Pending::Write);
        true
    }

    /// Replace the text of the trailing model message with the cumulative reply.
    pub fn set_message_text(&mut self, session_id: &str, message_id: &str, text: &str) -> bool {
        let Some(session) = self.session_mut(session_id) else {
            return false;
        };
        let Some(message) = session
            .messages
            .iter_mut()
            .rev()
            .find(|m| m.id == message_id && m.role == Role::Model)
        else {
            return false;
        };
        message.text.clear();
        message.text.push_str(text);
        self.mark(Pending::Write);
        true
    }

    /// Drain queued persistence operations. Consecutive writes collapse into
    /// one snapshot of the collection as it is now.
    pub fn take_pending(&mut self) -> Vec<PersistOp> {
        let pending = std::mem::take(&mut self.pending);
        pending
            .into_iter()
            .filter_map(|op| match op {
                Pending::Erase => Some(PersistOp::Erase),
                Pending::Write if self.sessions.is_empty() => Some(PersistOp::Erase),
                Pending::Write => match serde_json::to_vec(&self.sessions) {
                    Ok(bytes) => Some(PersistOp::Write(bytes)),
                    Err(e) => {
                        log::warn!("Failed to serialize sessions: {}", e);
                        None
                    }
                },
            })
            .collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn mark(&mut self, op: Pending) {
        if op == Pending::Write && self.pending.last() == Some(&Pending::Write) {
            return;
        }
        self.pending.push(op);
    }

    fn session_mut(&mut self, id: &str) -> Option<&mut ChatSession> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
