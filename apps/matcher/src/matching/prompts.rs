// All prompt templates for the matching crews.
// `{subject}` is replaced by the task description (parsers) or the
// accumulated prerequisite outputs (everything else).

pub const RESUME_PARSE_PROMPT: &str = r#"You are a resume parser. Extract the following fields from the text:
- Name
- Education
- Skills
- Work experience (roles, companies, duration)

Resume:
{subject}"#;

pub const JD_PARSE_PROMPT: &str = r#"You are a JD parser. Extract:
- Job title
- Responsibilities
- Required/Preferred skills

Job Description:
{subject}"#;

pub const MATCH_PROMPT: &str = r#"Given the following resume and job_description in the context, identify:
1. Matched Skills
2. Missing Skills
3. Match Score (0.0 to 1.0)
4. Experience Match
5. Gaps
6. Risk Flags
7. Soft Skills
8. Seniority Level

Context:
{subject}"#;

/// Long-form variant used by the report crew; each item carries its definition.
pub const MATCH_REPORT_PROMPT: &str = r#"Given the following resume and job_description in the context, identify:
1. **Matched Skills** – Skills that are present in both the resume and the job description.
2. **Missing Skills** – Skills that are required in the job description but not found in the resume.
3. **Match Score** – A numerical score (0.0 to 1.0) representing the overall match quality.
4. **Experience Match** – Whether the candidate's experience aligns with the job requirements.
5. **Gaps** – Any significant gaps in skills or experience that may affect the candidate's fit.
6. **Risk Flags** – Any potential red flags in the candidate's profile that may affect hiring decisions.
7. **Soft Skills** – Any soft skills mentioned in the resume that match the job description.
8. **Seniority Level** – Whether the candidate's experience matches the seniority level required by the job.

Context:
{subject}"#;

pub const ENHANCE_PROMPT: &str = r#"Given this resume and job description, suggest improvements to the resume:
- Highlight missing skills
- Recommend better phrasing
- Suggest added sections or content

Context:
{subject}"#;

pub const COVER_LETTER_PROMPT: &str = r#"Generate a professional cover letter that:
- Highlights the candidate's strengths
- Acknowledges and bridges skill or experience gaps
- Aligns with the job description and tone

Context:
{subject}"#;

pub const RECOMMENDATION_PROMPT: &str = r#"Given the following resume and job_description in the context, write a personalized and professional short cover letter tailored to the specific job.

The letter must:
- Highlight the candidate's relevant skills, experience, and enthusiasm for the role.
- Briefly and professionally address any skill or experience gaps, if present.
- Be concise and suitable for immediate use—no additional explanations or commentary.

Context:
{subject}

Only output the final cover letter."#;
