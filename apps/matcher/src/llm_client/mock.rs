//! Scripted LLM service for tests.
//!
//! Every call is recorded. Responses come from a queue first; once the queue is
//! empty the responder closure answers, so a test can script either a fixed
//! sequence or a rule keyed on the prompt.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatMessage, LlmError, LlmService};

type Responder = Box<dyn Fn(&[ChatMessage]) -> Result<String, LlmError> + Send + Sync>;

pub struct ScriptedLlm {
    queued: Mutex<VecDeque<Result<String, LlmError>>>,
    responder: Responder,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedLlm {
    /// Answers every call with the same text.
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::with_responder(move |_| Ok(text.clone()))
    }

    /// Answers every call by echoing the persona role from the system message.
    pub fn echo_role() -> Self {
        Self::with_responder(|messages| {
            let system = messages
                .iter()
                .find(|m| m.role == "system")
                .map(|m| m.content.as_str())
                .unwrap_or_default();
            let role = system
                .strip_prefix("You are the ")
                .and_then(|rest| rest.split('.').next())
                .unwrap_or("unknown");
            Ok(format!("output of {role}"))
        })
    }

    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&[ChatMessage]) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            queued: Mutex::new(VecDeque::new()),
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response to be returned by the next call.
    pub fn queue(self, response: Result<String, LlmError>) -> Self {
        self.queued.lock().unwrap().push_back(response);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }

    /// The user-message content of every recorded call, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|messages| messages.iter().rev().find(|m| m.role == "user"))
            .map(|m| m.content.clone())
            .collect()
    }
}

#[async_trait]
impl LlmService for ScriptedLlm {
    async fn call(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        if let Some(response) = self.queued.lock().unwrap().pop_front() {
            return response;
        }
        (self.responder)(messages)
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
