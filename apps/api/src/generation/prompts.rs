// Prompt templates for free-text drafting.
// Placeholders in `{braces}` are substituted before sending.

pub const SUMMARY_SYSTEM: &str = "You are a professional resume writer. \
    Create a concise, impactful professional summary in first person.";

pub const SUMMARY_PROMPT_TEMPLATE: &str = "Write a professional summary for {full_name}, \
who works as a {title}.
Additional context: {context}";

pub const SUMMARY_MAX_TOKENS: u32 = 150;

pub const NO_CONTEXT: &str = "No additional context provided";

pub const DESCRIPTION_SYSTEM: &str = "You are a professional resume writer. \
    Create accomplishment-focused bullet points for job descriptions.";

pub const DESCRIPTION_PROMPT_TEMPLATE: &str = "Write a professional job description in first person \
for someone who worked as a {position} at {company}.
Focus on quantifiable achievements, skills utilized, and value added. Use strong action verbs.";

pub const DESCRIPTION_MAX_TOKENS: u32 = 200;
