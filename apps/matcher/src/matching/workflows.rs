//! Named crews. Each action is a task graph over the two shared parsing tasks.
//!
//! match        : resume, job_description → matching
//! enhance      : resume, job_description → resume_enhancement
//! cover-letter : resume, job_description → cover_letter
//! report       : resume, job_description → matching, recommendation

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crew::envelope::{display_text, ResultField};
use crate::crew::{Crew, CrewError, CrewOutput, Task, TaskGraph};
use crate::llm_client::LlmService;
use crate::matching::agents::AgentKind;

pub const RESUME_TASK: &str = "resume";
pub const JD_TASK: &str = "job_description";
pub const MATCHING_TASK: &str = "matching";
pub const ENHANCEMENT_TASK: &str = "resume_enhancement";
pub const COVER_LETTER_TASK: &str = "cover_letter";
pub const RECOMMENDATION_TASK: &str = "recommendation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrewAction {
    Match,
    Enhance,
    CoverLetter,
    Report,
}

impl CrewAction {
    pub const ALL: [CrewAction; 4] = [
        CrewAction::Match,
        CrewAction::Enhance,
        CrewAction::CoverLetter,
        CrewAction::Report,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            CrewAction::Match => "match",
            CrewAction::Enhance => "enhance",
            CrewAction::CoverLetter => "cover-letter",
            CrewAction::Report => "report",
        }
    }

    pub fn crew(self) -> Crew {
        match self {
            CrewAction::Match => Crew::new(
                "Resume-JD Matcher Crew",
                "A team to analyze resumes and match them to job descriptions.",
            ),
            CrewAction::Enhance => Crew::new(
                "Resume Enhancer Crew",
                "A team to suggest resume improvements.",
            ),
            CrewAction::CoverLetter => Crew::new(
                "Cover Letter Crew",
                "A team to generate a cover letter.",
            ),
            CrewAction::Report => Crew::new(
                "Resume-JD Report Crew",
                "A crew to parse resumes, analyze JDs, perform matching, and generate summaries.",
            ),
        }
    }

    /// Heading for the run's primary result.
    pub fn title(self) -> &'static str {
        match self {
            CrewAction::Match => "Match Summary",
            CrewAction::Enhance => "Resume Enhancement Suggestions",
            CrewAction::CoverLetter | CrewAction::Report => "Generated Cover Letter",
        }
    }

    /// Prefix for the user-visible failure message.
    pub fn failure_label(self) -> &'static str {
        match self {
            CrewAction::Match => "Matching process failed",
            CrewAction::Enhance => "Resume enhancement failed",
            CrewAction::CoverLetter => "Cover letter generation failed",
            CrewAction::Report => "Processing failed",
        }
    }

    /// Field to read from the final output; `None` means the output is shown raw.
    pub fn result_field(self) -> Option<ResultField> {
        match self {
            CrewAction::Match => Some(ResultField::MatchSummary),
            CrewAction::Enhance => Some(ResultField::ResumeEnhancement),
            CrewAction::CoverLetter => Some(ResultField::CoverLetter),
            CrewAction::Report => None,
        }
    }

    /// Builds this action's task graph around the two input texts.
    pub fn build_graph(
        self,
        resume_text: &str,
        jd_text: &str,
        llm: Arc<dyn LlmService>,
    ) -> Result<TaskGraph, CrewError> {
        let (resume_expected, jd_expected) = match self {
            CrewAction::Report => (
                "Structured JSON with skills, experience, education, certifications, and career gaps.",
                "Structured JSON with mandatory/optional skills, seniority, and soft skills.",
            ),
            _ => ("Structured resume data", "Structured JD data"),
        };

        let mut tasks = vec![
            Task::new(
                RESUME_TASK,
                resume_text,
                resume_expected,
                AgentKind::ResumeParser.agent(llm.clone()),
            ),
            Task::new(
                JD_TASK,
                jd_text,
                jd_expected,
                AgentKind::JdParser.agent(llm.clone()),
            ),
        ];
        let inputs = [RESUME_TASK, JD_TASK];

        match self {
            CrewAction::Match => tasks.push(
                Task::new(
                    MATCHING_TASK,
                    "Match resume to JD.",
                    "Match score and insights.",
                    AgentKind::Matcher.agent(llm),
                )
                .with_context(inputs),
            ),
            CrewAction::Enhance => tasks.push(
                Task::new(
                    ENHANCEMENT_TASK,
                    "Optimize resumes based on job descriptions.",
                    "Readable text report with improvements to the resume to make it more relevant to the JD.",
                    AgentKind::ResumeEnhancer.agent(llm),
                )
                .with_context(inputs),
            ),
            CrewAction::CoverLetter => tasks.push(
                Task::new(
                    COVER_LETTER_TASK,
                    "Generate a cover letter based on the resume and job description.",
                    "Readable text cover letter tailored to the job description.",
                    AgentKind::CoverLetter.agent(llm),
                )
                .with_context(inputs),
            ),
            CrewAction::Report => {
                tasks.push(
                    Task::new(
                        MATCHING_TASK,
                        "Match resume to JD.",
                        "JSON with match score, skill matches, experience match, and gaps.",
                        AgentKind::ReportMatcher.agent(llm.clone()),
                    )
                    .with_context(inputs),
                );
                tasks.push(
                    Task::new(
                        RECOMMENDATION_TASK,
                        "Generate a final report.",
                        "Readable text report with fit summary and recommendations.",
                        AgentKind::Recommender.agent(llm),
                    )
                    .with_context(inputs),
                );
            }
        }

        TaskGraph::from_tasks(tasks)
    }

    /// Display sections for a finished run: the intermediate match summary
    /// (report only) followed by the primary result.
    pub fn sections(self, output: &CrewOutput) -> Vec<Section> {
        let mut sections = Vec::new();

        if self == CrewAction::Report {
            if let Some(matching) = output.task(MATCHING_TASK) {
                sections.push(Section {
                    title: "Matching Results".to_string(),
                    text: display_text(&matching.raw, Some(ResultField::MatchSummary)),
                });
            }
        }

        sections.push(Section {
            title: self.title().to_string(),
            text: display_text(&output.raw, self.result_field()),
        });
        sections
    }
}

impl fmt::Display for CrewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for CrewAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CrewAction::ALL
            .into_iter()
            .find(|a| a.slug() == s)
            .ok_or_else(|| format!("Unknown crew action '{s}'"))
    }
}

/// One titled block of display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub text: String,
}
