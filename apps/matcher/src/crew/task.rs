//! Task: one unit of work assigned to exactly one agent.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crew::agent::Agent;

pub type TaskId = String;

/// Separator between prerequisite outputs in the accumulated context.
pub const CONTEXT_DIVIDER: &str = "\n\n----------\n\n";

#[derive(Debug, Clone)]
pub struct Task {
    id: TaskId,
    /// Literal input text for leaf tasks, a work instruction for derived ones.
    description: String,
    /// Documentation only; never enforced.
    expected_output: String,
    agent: Arc<Agent>,
    context: Vec<TaskId>,
    output: Option<TaskOutput>,
}

impl Task {
    pub fn new(
        id: impl Into<TaskId>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: Arc<Agent>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent,
            context: Vec::new(),
            output: None,
        }
    }

    /// Declares the prerequisites whose outputs become this task's context, in order.
    pub fn with_context<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskId>,
    {
        self.context = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn context(&self) -> &[TaskId] {
        &self.context
    }

    pub fn output(&self) -> Option<&TaskOutput> {
        self.output.as_ref()
    }

    pub(crate) fn set_output(&mut self, output: TaskOutput) {
        self.output = Some(output);
    }
}

/// The stored result of one executed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    pub task_id: TaskId,
    pub agent_role: String,
    pub raw: String,
    pub completed_at: DateTime<Utc>,
}

/// One prerequisite's contribution to a task's context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextEntry {
    pub task_id: TaskId,
    /// `None` when the prerequisite has not produced output yet.
    pub output: Option<String>,
}

impl ContextEntry {
    pub fn render(&self) -> String {
        match &self.output {
            Some(raw) => raw.clone(),
            None => missing_output_marker(&self.task_id),
        }
    }
}

/// Outputs of a task's prerequisites, in declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskContext {
    entries: Vec<ContextEntry>,
}

impl TaskContext {
    pub fn new(entries: Vec<ContextEntry>) -> Self {
        Self { entries }
    }

    /// Task ids whose output was not available when the context was gathered.
    pub fn missing(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.output.is_none())
            .map(|e| e.task_id.as_str())
            .collect()
    }

    /// Joins the prerequisite outputs with `CONTEXT_DIVIDER`.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(ContextEntry::render)
            .collect::<Vec<_>>()
            .join(CONTEXT_DIVIDER)
    }
}

pub fn missing_output_marker(task_id: &str) -> String {
    format!("[no output available from task '{task_id}']")
}
