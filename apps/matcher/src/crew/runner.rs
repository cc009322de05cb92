//! Crew: runs a task graph to completion, one task at a time.
//!
//! Flow: execution_order → for each task: gather_context → agent.execute →
//!       record output on the graph → next. The first failure aborts the run;
//!       outputs already recorded stay on the graph.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::crew::graph::TaskGraph;
use crate::crew::task::{TaskId, TaskOutput};
use crate::crew::CrewError;

#[derive(Debug, Clone)]
pub struct Crew {
    name: String,
    description: String,
}

/// Result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct CrewOutput {
    pub run_id: Uuid,
    pub crew: String,
    /// Last task in execution order; its output is the run's result.
    pub final_task: TaskId,
    pub raw: String,
    /// Every task output, in execution order.
    pub tasks: Vec<TaskOutput>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrewOutput {
    pub fn task(&self, id: &str) -> Option<&TaskOutput> {
        self.tasks.iter().find(|t| t.task_id == id)
    }
}

impl Crew {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Executes every task in the graph sequentially in dependency order.
    pub async fn kickoff(&self, graph: &mut TaskGraph) -> Result<CrewOutput, CrewError> {
        if graph.is_empty() {
            return Err(CrewError::EmptyCrew(self.name.clone()));
        }

        let order = graph.execution_order()?;
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            "Crew '{}' run {} starting: {} tasks",
            self.name,
            run_id,
            order.len()
        );

        let mut outputs = Vec::with_capacity(order.len());

        for (step, &position) in order.iter().enumerate() {
            let task = graph.task_at(position);
            let task_id = task.id().to_string();
            let context = graph.gather_context(&task_id)?;

            let missing = context.missing();
            if !missing.is_empty() {
                warn!(
                    "Task '{}' is running with missing context from {:?}",
                    task_id, missing
                );
            }

            info!(
                "[{}/{}] Task '{}' → agent '{}'",
                step + 1,
                order.len(),
                task_id,
                task.agent().role()
            );

            let raw = match task.agent().execute(task, &context).await {
                Ok(raw) => raw,
                Err(source) => {
                    error!(
                        "Crew '{}' run {} aborted at task '{}': {}",
                        self.name, run_id, task_id, source
                    );
                    return Err(CrewError::TaskFailed {
                        task: task_id,
                        source,
                    });
                }
            };

            let output = TaskOutput {
                task_id: task_id.clone(),
                agent_role: task.agent().role().to_string(),
                raw,
                completed_at: Utc::now(),
            };
            graph.record(position, output.clone());
            outputs.push(output);
            info!("Task '{}' complete", task_id);
        }

        let last = outputs
            .last()
            .cloned()
            .ok_or_else(|| CrewError::EmptyCrew(self.name.clone()))?;
        let finished_at = Utc::now();
        info!(
            "Crew '{}' run {} finished in {}ms",
            self.name,
            run_id,
            (finished_at - started_at).num_milliseconds()
        );

        Ok(CrewOutput {
            run_id,
            crew: self.name.clone(),
            final_task: last.task_id,
            raw: last.raw,
            tasks: outputs,
            started_at,
            finished_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::crew::agent::{Agent, AgentError, AgentProfile, ResultEnvelope, SubjectSource};
    use crate::crew::task::Task;
    use crate::llm_client::mock::ScriptedLlm;
    use crate::llm_client::LlmError;

    const LEAF: AgentProfile = AgentProfile {
        role: "Parser",
        backstory: "I parse.",
        goal: "Parse.",
        subject: SubjectSource::Description {
            required: "Content is required.",
        },
        prompt_template: "Parse: {subject}",
        envelope: ResultEnvelope::Raw,
    };

    const DERIVED: AgentProfile = AgentProfile {
        role: "Combiner",
        backstory: "I combine.",
        goal: "Combine.",
        subject: SubjectSource::Context,
        prompt_template: "Combine: {subject}",
        envelope: ResultEnvelope::Raw,
    };

    /// Replies with the prompt itself, so outputs show what each task was given.
    fn echo_llm() -> Arc<ScriptedLlm> {
        Arc::new(ScriptedLlm::with_responder(|messages| {
            Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
        }))
    }

    fn graph(llm: Arc<ScriptedLlm>, a: &str, b: &str) -> TaskGraph {
        let leaf = Arc::new(Agent::new(LEAF, llm.clone()));
        let derived = Arc::new(Agent::new(DERIVED, llm));
        TaskGraph::from_tasks(vec![
            Task::new("a", a, "", leaf.clone()),
            Task::new("b", b, "", leaf),
            Task::new("c", "combine", "", derived).with_context(["a", "b"]),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_runs_prerequisites_before_dependent_and_threads_context() {
        let llm = echo_llm();
        let mut g = graph(llm.clone(), "alpha", "beta");

        let out = Crew::new("test", "").kickoff(&mut g).await.unwrap();

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 3);
        assert_eq!(prompts[0], "Parse: alpha");
        assert_eq!(prompts[1], "Parse: beta");
        assert_eq!(
            prompts[2],
            "Combine: Parse: alpha\n\n----------\n\nParse: beta"
        );
        assert_eq!(out.final_task, "c");
        assert_eq!(out.raw, prompts[2]);
        let order: Vec<_> = out.tasks.iter().map(|t| t.task_id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_outputs_remain_addressable_on_graph_and_result() {
        let llm = echo_llm();
        let mut g = graph(llm, "alpha", "beta");

        let out = Crew::new("test", "").kickoff(&mut g).await.unwrap();

        assert_eq!(g.output("a").unwrap().raw, "Parse: alpha");
        assert_eq!(out.task("b").unwrap().agent_role, "Parser");
        assert!(out.finished_at >= out.started_at);
    }

    #[tokio::test]
    async fn test_empty_subject_aborts_before_downstream_tasks() {
        let llm = echo_llm();
        let mut g = graph(llm.clone(), "alpha", "");

        let err = Crew::new("test", "").kickoff(&mut g).await.unwrap_err();

        match err {
            CrewError::TaskFailed { task, source } => {
                assert_eq!(task, "b");
                assert!(matches!(source, AgentError::Validation(_)));
            }
            other => panic!("expected task failure, got {other:?}"),
        }
        assert_eq!(llm.call_count(), 1);
        assert!(g.output("a").is_some());
        assert!(g.output("c").is_none());
    }

    #[tokio::test]
    async fn test_llm_failure_aborts_run_without_retry() {
        let llm = Arc::new(
            ScriptedLlm::replying("ok")
                .queue(Ok("first".to_string()))
                .queue(Err(LlmError::EmptyContent)),
        );
        let mut g = graph(llm.clone(), "alpha", "beta");

        let err = Crew::new("test", "").kickoff(&mut g).await.unwrap_err();

        assert!(matches!(
            err,
            CrewError::TaskFailed {
                source: AgentError::Llm(LlmError::EmptyContent),
                ..
            }
        ));
        assert_eq!(err.to_string(), "Task 'b' failed: LLM returned empty content");
        assert_eq!(llm.call_count(), 2);
        assert_eq!(g.output("a").unwrap().raw, "first");
    }

    #[tokio::test]
    async fn test_out_of_order_declaration_still_runs_in_dependency_order() {
        let llm = echo_llm();
        let leaf = Arc::new(Agent::new(LEAF, llm.clone()));
        let derived = Arc::new(Agent::new(DERIVED, llm.clone()));
        let mut g = TaskGraph::from_tasks(vec![
            Task::new("c", "combine", "", derived).with_context(["a", "b"]),
            Task::new("a", "alpha", "", leaf.clone()),
            Task::new("b", "beta", "", leaf),
        ])
        .unwrap();

        let out = Crew::new("test", "").kickoff(&mut g).await.unwrap();

        assert_eq!(out.final_task, "c");
        assert!(!out.raw.contains("no output available"));
    }

    #[tokio::test]
    async fn test_empty_graph_is_an_error() {
        let mut g = TaskGraph::new();
        let err = Crew::new("empty", "").kickoff(&mut g).await.unwrap_err();
        assert!(matches!(err, CrewError::EmptyCrew(ref name) if name == "empty"));
    }

    #[tokio::test]
    async fn test_cycle_fails_before_any_llm_call() {
        let llm = echo_llm();
        let derived = Arc::new(Agent::new(DERIVED, llm.clone()));
        let mut g = TaskGraph::from_tasks(vec![
            Task::new("x", "", "", derived.clone()).with_context(["y"]),
            Task::new("y", "", "", derived).with_context(["x"]),
        ])
        .unwrap();

        let err = Crew::new("loop", "").kickoff(&mut g).await.unwrap_err();

        assert!(matches!(err, CrewError::Cycle(_)));
        assert_eq!(llm.call_count(), 0);
    }
}
