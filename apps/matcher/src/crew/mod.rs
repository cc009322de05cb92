// Crew engine: agents, tasks, the task graph, and the sequential runner.
// Nothing in here knows about résumés; profiles and workflows live in `matching`.

pub mod agent;
pub mod envelope;
pub mod graph;
pub mod runner;
pub mod task;

use thiserror::Error;

use crate::crew::agent::AgentError;

pub use agent::{Agent, AgentProfile, ResultEnvelope, SubjectSource};
pub use graph::TaskGraph;
pub use runner::{Crew, CrewOutput};
pub use task::Task;

#[derive(Debug, Error)]
pub enum CrewError {
    #[error("Duplicate task id '{0}'")]
    DuplicateTask(String),

    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    #[error("Dependency cycle among tasks {0:?}")]
    Cycle(Vec<String>),

    #[error("Unknown task '{0}'")]
    UnknownTask(String),

    #[error("Crew '{0}' has no tasks")]
    EmptyCrew(String),

    #[error("Task '{task}' failed: {source}")]
    TaskFailed {
        task: String,
        #[source]
        source: AgentError,
    },
}
