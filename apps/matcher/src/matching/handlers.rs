//! Axum route handlers for the Crew API.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::crew::agent::AgentError;
use crate::crew::CrewError;
use crate::errors::AppError;
use crate::matching::workflows::{CrewAction, Section};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RunCrewRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct TaskSummary {
    pub id: String,
    pub role: String,
    pub raw: String,
}

#[derive(Debug, Serialize)]
pub struct RunCrewResponse {
    pub run_id: Uuid,
    pub action: CrewAction,
    pub crew: String,
    pub description: String,
    pub title: String,
    /// Primary result, envelope field extracted when possible.
    pub result: String,
    /// Final task output exactly as the agent produced it.
    pub raw: String,
    pub sections: Vec<Section>,
    pub tasks: Vec<TaskSummary>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/crews/:action
///
/// Builds the action's task graph around the two texts and runs it.
/// Any task failure discards the run; the error message carries the cause.
pub async fn handle_run_crew(
    State(state): State<AppState>,
    Path(action): Path<String>,
    Json(request): Json<RunCrewRequest>,
) -> Result<Json<RunCrewResponse>, AppError> {
    let action = parse_action(&action)?;

    let mut graph = action
        .build_graph(&request.resume_text, &request.jd_text, state.llm.clone())
        .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;
    let crew = action.crew();

    info!("Running '{}' with model {}", crew.name(), state.llm.model());
    let output = crew
        .kickoff(&mut graph)
        .await
        .map_err(|e| crew_error(action, e))?;

    let sections = action.sections(&output);
    let result = sections
        .last()
        .map(|s| s.text.clone())
        .unwrap_or_else(|| output.raw.clone());

    Ok(Json(RunCrewResponse {
        run_id: output.run_id,
        action,
        crew: output.crew,
        description: crew.description().to_string(),
        title: action.title().to_string(),
        result,
        raw: output.raw,
        sections,
        tasks: output
            .tasks
            .into_iter()
            .map(|t| TaskSummary {
                id: t.task_id,
                role: t.agent_role,
                raw: t.raw,
            })
            .collect(),
        started_at: output.started_at,
        finished_at: output.finished_at,
    }))
}

/// GET /api/v1/crews/:action/graph
///
/// Graphviz DOT for the action's task graph. Inputs are placeholders; nothing runs.
pub async fn handle_crew_graph(
    State(state): State<AppState>,
    Path(action): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let action = parse_action(&action)?;
    let graph = action
        .build_graph("<resume>", "<job description>", state.llm.clone())
        .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;

    Ok((
        [(header::CONTENT_TYPE, "text/vnd.graphviz; charset=utf-8")],
        graph.to_dot(action.crew().name()),
    ))
}

fn parse_action(slug: &str) -> Result<CrewAction, AppError> {
    slug.parse::<CrewAction>().map_err(AppError::NotFound)
}

/// Empty input is the caller's fault; everything else is reported as a failed run.
fn crew_error(action: CrewAction, err: CrewError) -> AppError {
    match err {
        CrewError::TaskFailed {
            source: AgentError::Validation(message),
            ..
        } => AppError::Validation(message),
        other => AppError::CrewFailed {
            label: action.failure_label().to_string(),
            message: other.to_string(),
        },
    }
}
