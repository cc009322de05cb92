//! Agent: a persona bound to an LLM service.
//!
//! There is one `Agent` type. What differs between a résumé parser and a cover
//! letter writer is data: the `AgentProfile` carries the persona text, where
//! the prompt subject comes from, the prompt template, and how the reply is
//! wrapped.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::crew::envelope::{wrap_field, ResultField};
use crate::crew::task::{Task, TaskContext};
use crate::llm_client::{ChatMessage, LlmError, LlmService};

/// Placeholder replaced by the subject text (task description or accumulated context).
pub const SUBJECT_PLACEHOLDER: &str = "{subject}";

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Where an agent takes the subject of its prompt from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectSource {
    /// Leaf agents: the task description is the literal input text.
    /// An empty description fails with the given message.
    Description { required: &'static str },
    /// Derived agents: the outputs of the task's prerequisites.
    Context,
}

/// How the trimmed LLM reply is packaged as the task output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultEnvelope {
    /// `{"<key>": "<text>"}`
    Field(ResultField),
    /// The reply itself, unwrapped.
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentProfile {
    pub role: &'static str,
    pub backstory: &'static str,
    pub goal: &'static str,
    pub subject: SubjectSource,
    /// Prompt body; must contain `{subject}`.
    pub prompt_template: &'static str,
    pub envelope: ResultEnvelope,
}

impl AgentProfile {
    /// System message framing the persona.
    pub fn persona(&self) -> String {
        format!(
            "You are the {}. {}\nYour goal: {}",
            self.role, self.backstory, self.goal
        )
    }

    /// Fills the prompt template for a task, validating leaf input.
    pub fn build_prompt(&self, task: &Task, context: &TaskContext) -> Result<String, AgentError> {
        let subject = match self.subject {
            SubjectSource::Description { required } => {
                if task.description().is_empty() {
                    return Err(AgentError::Validation(required.to_string()));
                }
                task.description().to_string()
            }
            SubjectSource::Context => context.render(),
        };

        Ok(self.prompt_template.replace(SUBJECT_PLACEHOLDER, &subject))
    }

    /// Packages the LLM reply according to the envelope.
    pub fn wrap_result(&self, reply: &str) -> String {
        let reply = reply.trim();
        match self.envelope {
            ResultEnvelope::Field(field) => wrap_field(field, reply),
            ResultEnvelope::Raw => reply.to_string(),
        }
    }
}

/// Stateless across executions: the only thing it holds is the profile and the service.
#[derive(Clone)]
pub struct Agent {
    profile: AgentProfile,
    llm: Arc<dyn LlmService>,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.profile.role)
            .field("model", &self.llm.model())
            .finish()
    }
}

impl Agent {
    pub fn new(profile: AgentProfile, llm: Arc<dyn LlmService>) -> Self {
        Self { profile, llm }
    }

    pub fn role(&self) -> &'static str {
        self.profile.role
    }

    /// Builds one prompt, makes exactly one LLM call, and wraps the reply.
    /// LLM failures are returned unchanged; nothing is retried or cached here.
    pub async fn execute(&self, task: &Task, context: &TaskContext) -> Result<String, AgentError> {
        let prompt = self.profile.build_prompt(task, context)?;
        debug!(
            "Agent '{}' prompting {} for task '{}' ({} chars)",
            self.profile.role,
            self.llm.model(),
            task.id(),
            prompt.len()
        );

        let messages = [
            ChatMessage::system(self.profile.persona()),
            ChatMessage::user(prompt),
        ];
        let reply = self.llm.call(&messages).await?;

        Ok(self.profile.wrap_result(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crew::task::ContextEntry;
    use crate::llm_client::mock::ScriptedLlm;

    const LEAF: AgentProfile = AgentProfile {
        role: "Resume Parser",
        backstory: "I extract structured data from resumes.",
        goal: "Parse resumes.",
        subject: SubjectSource::Description {
            required: "Resume content is required.",
        },
        prompt_template: "Resume:\n{subject}",
        envelope: ResultEnvelope::Field(ResultField::Resume),
    };

    const DERIVED: AgentProfile = AgentProfile {
        role: "Recommendation Agent",
        backstory: "I write recommendations.",
        goal: "Recommend.",
        subject: SubjectSource::Context,
        prompt_template: "Context:\n{subject}",
        envelope: ResultEnvelope::Raw,
    };

    fn task(description: &str, agent: Agent) -> Task {
        Task::new("t", description, "anything", Arc::new(agent))
    }

    #[tokio::test]
    async fn test_leaf_agent_wraps_reply_in_named_field() {
        let llm = Arc::new(ScriptedLlm::replying("  Name: Jane Doe  \n"));
        let agent = Agent::new(LEAF, llm.clone());
        let t = task("Jane Doe, 5 years Python", agent.clone());

        let out = agent.execute(&t, &TaskContext::default()).await.unwrap();

        assert_eq!(out, r#"{"resume":"Name: Jane Doe"}"#);
        assert_eq!(llm.call_count(), 1);
        assert!(llm.prompts()[0].contains("Jane Doe, 5 years Python"));
    }

    #[tokio::test]
    async fn test_leaf_agent_rejects_empty_subject_without_calling_llm() {
        let llm = Arc::new(ScriptedLlm::replying("unused"));
        let agent = Agent::new(LEAF, llm.clone());
        let t = task("", agent.clone());

        let err = agent.execute(&t, &TaskContext::default()).await.unwrap_err();

        assert!(matches!(err, AgentError::Validation(ref m) if m == "Resume content is required."));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_leaf_subject_is_sent_verbatim() {
        let llm = Arc::new(ScriptedLlm::replying("ok"));
        let agent = Agent::new(LEAF, llm.clone());
        let t = task("  \n", agent.clone());

        agent.execute(&t, &TaskContext::default()).await.unwrap();

        assert_eq!(llm.call_count(), 1);
        assert_eq!(llm.prompts()[0], "Resume:\n  \n");
    }

    #[tokio::test]
    async fn test_derived_agent_uses_context_and_ignores_description() {
        let llm = Arc::new(ScriptedLlm::replying("Dear hiring manager"));
        let agent = Agent::new(DERIVED, llm.clone());
        let t = task("Generate a final report.", agent.clone());
        let context = TaskContext::new(vec![ContextEntry {
            task_id: "resume".to_string(),
            output: Some("parsed resume".to_string()),
        }]);

        let out = agent.execute(&t, &context).await.unwrap();

        assert_eq!(out, "Dear hiring manager");
        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("parsed resume"));
        assert!(!prompt.contains("Generate a final report."));
    }

    #[tokio::test]
    async fn test_system_message_frames_persona() {
        let llm = Arc::new(ScriptedLlm::replying("ok"));
        let agent = Agent::new(DERIVED, llm.clone());
        let t = task("x", agent.clone());

        agent.execute(&t, &TaskContext::default()).await.unwrap();

        let call = &llm.calls()[0];
        assert_eq!(call.len(), 2);
        assert_eq!(call[0].role, "system");
        assert!(call[0].content.starts_with("You are the Recommendation Agent."));
        assert_eq!(call[1].role, "user");
    }

    #[tokio::test]
    async fn test_llm_failure_is_passed_through() {
        let llm = Arc::new(ScriptedLlm::replying("unused").queue(Err(LlmError::Api {
            status: 400,
            message: "model not found".to_string(),
        })));
        let agent = Agent::new(DERIVED, llm);
        let t = task("x", agent.clone());

        let err = agent.execute(&t, &TaskContext::default()).await.unwrap_err();

        assert!(matches!(err, AgentError::Llm(LlmError::Api { status: 400, .. })));
        assert_eq!(err.to_string(), "API error (status 400): model not found");
    }

    #[tokio::test]
    async fn test_repeated_execution_calls_llm_each_time() {
        let llm = Arc::new(
            ScriptedLlm::replying("unused")
                .queue(Ok("first".to_string()))
                .queue(Ok("second".to_string())),
        );
        let agent = Agent::new(DERIVED, llm.clone());
        let t = task("x", agent.clone());
        let context = TaskContext::default();

        let a = agent.execute(&t, &context).await.unwrap();
        let b = agent.execute(&t, &context).await.unwrap();

        assert_eq!(llm.call_count(), 2);
        assert_eq!((a.as_str(), b.as_str()), ("first", "second"));
    }
}
