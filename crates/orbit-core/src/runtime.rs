//! Chat runtime — one user turn in, one streamed reply out.
//!
//! 1. Snapshot the current session's history and personality
//! 2. Append the user message, then an empty model message
//! 3. Open the generation stream
//! 4. Fold every fragment into the model message (concatenation only)
//! 5. On failure keep whatever text already arrived

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use futures::StreamExt;
use orbit_types::{
    config::LlmConfig,
    event::ChatEvent,
    message::{Message, MessageImage},
    OrbitError, Result,
};
use crate::event_bus::EventBus;
use crate::ports::{GenerateRequest, LlmPort, LlmStreamEvent};
use crate::session_store::SessionStore;

/// What the user is about to send
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub text: String,
    pub image: Option<MessageImage>,
}

impl Draft {
    pub fn new(text: impl Into<String>, image: Option<MessageImage>) -> Self {
        Self { text: text.into(), image }
    }

    /// Non-blank text or an image
    pub fn is_sendable(&self) -> bool {
        !self.text.trim().is_empty() || self.image.is_some()
    }
}

/// Shared handle to the runtime — clone-cheap via Rc.
#[derive(Clone)]
pub struct ChatRuntime {
    store: Rc<RefCell<SessionStore>>,
    event_bus: EventBus,
    generating: Rc<Cell<bool>>,
}

impl ChatRuntime {
    pub fn new(store: Rc<RefCell<SessionStore>>, event_bus: EventBus) -> Self {
        Self {
            store,
            event_bus,
            generating: Rc::new(Cell::new(false)),
        }
    }

    pub fn store(&self) -> &Rc<RefCell<SessionStore>> {
        &self.store
    }

    pub fn is_generating(&self) -> bool {
        self.generating.get()
    }

    /// Send a draft to the current session and stream the reply into it.
    ///
    /// Returns the final reply text. Rejects a second call while a reply is
    /// still streaming. Must be spawned with `wasm_bindgen_futures::spawn_local`
    /// in the browser; no RefCell borrow is held across an await.
    pub async fn send(&self, draft: Draft, llm: &dyn LlmPort, config: &LlmConfig) -> Result<String> {
        if !draft.is_sendable() {
            return Err(OrbitError::EmptyMessage);
        }
        if self.generating.get() {
            return Err(OrbitError::Busy);
        }
        self.generating.set(true);

        let prepared = self.prepare_turn(draft, config);
        let (session_id, message_id, request) = match prepared {
            Ok(p) => p,
            Err(e) => {
                self.generating.set(false);
                return Err(e);
            }
        };

        self.event_bus.emit(ChatEvent::TurnStart {
            session_id: session_id.clone(),
            message_id: message_id.clone(),
        });

        let result = self
            .consume(llm.stream_generate(request), &session_id, &message_id)
            .await;

        self.generating.set(false);
        if let Err(e) = &result {
            log::error!("Reply generation via {} failed: {}", llm.provider_name(), e);
            self.event_bus.emit(ChatEvent::Error {
                message: e.to_string(),
            });
        }
        self.event_bus.emit(ChatEvent::TurnEnd { session_id });
        result
    }

    fn prepare_turn(&self, draft: Draft, config: &LlmConfig) -> Result<(String, String, GenerateRequest)> {
        let mut store = self.store.borrow_mut();
        let (session_id, request) = {
            let session = store
                .current()
                .ok_or_else(|| OrbitError::Other("no current session".to_string()))?;
            let request = GenerateRequest::build(
                store.personality(),
                &session.messages,
                &draft.text,
                draft.image.as_ref(),
                config,
            );
            (session.id.clone(), request)
        };

        let placeholder = Message::model_placeholder();
        let message_id = placeholder.id.clone();
        store.append_message(&session_id, Message::user(draft.text, draft.image));
        store.append_message(&session_id, placeholder);
        Ok((session_id, message_id, request))
    }

    async fn consume<S>(&self, mut stream: S, session_id: &str, message_id: &str) -> Result<String>
    where
        S: futures::Stream<Item = LlmStreamEvent> + Unpin,
    {
        let mut reply = String::new();
        while let Some(event) = stream.next().await {
            match event {
                LlmStreamEvent::Delta(fragment) => {
                    reply.push_str(&fragment);
                    self.store
                        .borrow_mut()
                        .set_message_text(session_id, message_id, &reply);
                    self.event_bus.emit(ChatEvent::Delta {
                        session_id: session_id.to_string(),
                        message_id: message_id.to_string(),
                        text: reply.clone(),
                    });
                }
                LlmStreamEvent::Done => break,
                LlmStreamEvent::Error(e) => return Err(OrbitError::Llm(e)),
            }
        }
        Ok(reply)
    }
}
