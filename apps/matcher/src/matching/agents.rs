//! Built-in agent profiles for résumé/JD work.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crew::envelope::ResultField;
use crate::crew::{Agent, AgentProfile, ResultEnvelope, SubjectSource};
use crate::llm_client::LlmService;
use crate::matching::prompts::{
    COVER_LETTER_PROMPT, ENHANCE_PROMPT, JD_PARSE_PROMPT, MATCH_PROMPT, MATCH_REPORT_PROMPT,
    RECOMMENDATION_PROMPT, RESUME_PARSE_PROMPT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    ResumeParser,
    JdParser,
    Matcher,
    /// Same persona as `Matcher`, with the itemized report prompt.
    ReportMatcher,
    ResumeEnhancer,
    CoverLetter,
    Recommender,
}

impl AgentKind {
    pub fn profile(self) -> AgentProfile {
        match self {
            AgentKind::ResumeParser => AgentProfile {
                role: "Resume Parser",
                backstory: "I extract structured data from resumes with high accuracy.",
                goal: "Parse resumes to extract skills, experience, education, certifications, and career gaps.",
                subject: SubjectSource::Description {
                    required: "Resume content is required.",
                },
                prompt_template: RESUME_PARSE_PROMPT,
                envelope: ResultEnvelope::Field(ResultField::Resume),
            },
            AgentKind::JdParser => AgentProfile {
                role: "JD Parser",
                backstory: "I analyze job descriptions to extract key requirements.",
                goal: "Extract mandatory/optional skills, seniority, and soft skills from job descriptions.",
                subject: SubjectSource::Description {
                    required: "JD content is required.",
                },
                prompt_template: JD_PARSE_PROMPT,
                envelope: ResultEnvelope::Field(ResultField::JobDescription),
            },
            AgentKind::Matcher => AgentProfile {
                role: "Candidate-Role Matcher",
                backstory: "I match candidates to roles based on skills and experience.",
                goal: "Compute a match score between resume and job description.",
                subject: SubjectSource::Context,
                prompt_template: MATCH_PROMPT,
                envelope: ResultEnvelope::Field(ResultField::MatchSummary),
            },
            AgentKind::ReportMatcher => AgentProfile {
                prompt_template: MATCH_REPORT_PROMPT,
                ..AgentKind::Matcher.profile()
            },
            AgentKind::ResumeEnhancer => AgentProfile {
                role: "Resume Enhancer",
                backstory: "I suggest improvements to the resume to make it more relevant to the JD.",
                goal: "Optimize resumes based on job descriptions.",
                subject: SubjectSource::Context,
                prompt_template: ENHANCE_PROMPT,
                envelope: ResultEnvelope::Field(ResultField::ResumeEnhancement),
            },
            AgentKind::CoverLetter => AgentProfile {
                role: "Cover Letter Generator",
                backstory: "I write cover letters tailored to job descriptions and candidate profiles.",
                goal: "Generate persuasive cover letters that address gaps and emphasize fit.",
                subject: SubjectSource::Context,
                prompt_template: COVER_LETTER_PROMPT,
                envelope: ResultEnvelope::Field(ResultField::CoverLetter),
            },
            AgentKind::Recommender => AgentProfile {
                role: "Recommendation Agent",
                backstory: "I create recommendations and cover letter for job seekers.",
                goal: "Generate recommendations and cover letter based on the resume and job description.",
                subject: SubjectSource::Context,
                prompt_template: RECOMMENDATION_PROMPT,
                envelope: ResultEnvelope::Raw,
            },
        }
    }

    pub fn agent(self, llm: Arc<dyn LlmService>) -> Arc<Agent> {
        Arc::new(Agent::new(self.profile(), llm))
    }
}
