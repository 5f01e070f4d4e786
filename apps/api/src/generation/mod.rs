//! Drafting of free-text fields (summary, experience description).
//!
//! Generation never fails from the caller's point of view: any collaborator
//! error is logged and replaced by a fixed fallback sentence, which the caller
//! stores exactly like a successful draft.

pub mod handlers;
pub mod prompts;

use serde::Deserialize;
use tracing::error;

use crate::generation::prompts::{
    DESCRIPTION_MAX_TOKENS, DESCRIPTION_PROMPT_TEMPLATE, DESCRIPTION_SYSTEM, NO_CONTEXT,
    SUMMARY_MAX_TOKENS, SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM,
};
use crate::llm_client::{Completion, LlmError, TextGenerator};

pub const SUMMARY_FALLBACK: &str =
    "Unable to generate summary at this time. Please try again later.";
pub const SUMMARY_EMPTY: &str = "Failed to generate summary";
pub const DESCRIPTION_FALLBACK: &str =
    "Unable to generate description at this time. Please try again later.";
pub const DESCRIPTION_EMPTY: &str = "Failed to generate description";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPrompt {
    pub full_name: String,
    pub title: String,
    /// Free-form extra context, e.g. years of experience.
    pub context: Option<String>,
}

pub async fn generate_summary(generator: &dyn TextGenerator, input: &SummaryPrompt) -> String {
    let context = input
        .context
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(NO_CONTEXT);
    let prompt = SUMMARY_PROMPT_TEMPLATE
        .replace("{full_name}", &input.full_name)
        .replace("{title}", &input.title)
        .replace("{context}", context);

    let result = generator
        .complete(Completion {
            system: SUMMARY_SYSTEM,
            prompt: &prompt,
            max_tokens: SUMMARY_MAX_TOKENS,
        })
        .await;
    or_fallback(result, "summary", SUMMARY_EMPTY, SUMMARY_FALLBACK)
}

pub async fn generate_experience_description(
    generator: &dyn TextGenerator,
    position: &str,
    company: &str,
) -> String {
    let prompt = DESCRIPTION_PROMPT_TEMPLATE
        .replace("{position}", position)
        .replace("{company}", company);

    let result = generator
        .complete(Completion {
            system: DESCRIPTION_SYSTEM,
            prompt: &prompt,
            max_tokens: DESCRIPTION_MAX_TOKENS,
        })
        .await;
    or_fallback(result, "description", DESCRIPTION_EMPTY, DESCRIPTION_FALLBACK)
}

fn or_fallback(
    result: Result<String, LlmError>,
    what: &str,
    empty: &str,
    fallback: &str,
) -> String {
    match result {
        Ok(text) => text.trim().to_string(),
        Err(LlmError::EmptyContent) => empty.to_string(),
        Err(e) => {
            error!("Error generating {what}: {e}");
            fallback.to_string()
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::{Completion, LlmError, TextGenerator};

    /// Returns a canned reply (or error) and records every prompt it receives.
    pub struct CannedGenerator {
        pub reply: Result<String, u16>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl CannedGenerator {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn complete(&self, request: Completion<'_>) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(request.prompt.to_string());
            match &self.reply {
                Ok(text) if text.is_empty() => Err(LlmError::EmptyContent),
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "upstream failure".to_string(),
                }),
            }
        }
    }
}
