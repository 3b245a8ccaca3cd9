// Prompt assembly for resume analysis.
// The system persona is shared from llm_client::prompts.

pub use crate::llm_client::prompts::RESUME_ANALYST_SYSTEM as ANALYSIS_SYSTEM;

const JOB_MATCH_ITEM: &str = "6. **Job Match Analysis**: How well does this resume align with the provided job requirements?";
const GENERAL_ITEM: &str =
    "6. **General Recommendations**: Suggestions for broader job market appeal";

/// Builds the user prompt. Role and description are optional and already trimmed;
/// giving either one switches the final focus item to job matching.
pub fn build_analysis_prompt(
    resume_text: &str,
    job_role: Option<&str>,
    job_description: Option<&str>,
) -> String {
    let context = target_context(job_role, job_description);
    let final_item = if job_role.is_some() || job_description.is_some() {
        JOB_MATCH_ITEM
    } else {
        GENERAL_ITEM
    };

    format!(
        r#"Please analyze this resume and provide constructive, actionable feedback.

{context}
Focus on these key aspects:
1. **Content Quality & Impact**: How well does the content showcase achievements?
2. **Skills Alignment**: How well do the skills match the target role?
3. **Experience Presentation**: Are experiences described with quantifiable results?
4. **ATS Compatibility**: Will this resume pass through Applicant Tracking Systems?
5. **Areas for Improvement**: Specific, actionable recommendations

{final_item}

Resume Content:
{resume_text}

Please provide your analysis in a clear, structured format with specific, actionable recommendations."#
    )
}

fn target_context(job_role: Option<&str>, job_description: Option<&str>) -> String {
    let mut context = String::new();
    if let Some(role) = job_role {
        context.push_str(&format!("Target Job Role: {role}\n"));
    }
    if let Some(description) = job_description {
        context.push_str(&format!("Job Description: {description}\n"));
    }
    context
}
