use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::config::LlmConfig;
use crate::database::models::{ContentStatus, GeneratedContent};
use crate::services::completion::{CompletionProvider, OpenAiClient};

pub const SYSTEM_INSTRUCTION: &str =
    "You are a travel assistant. Generate a detailed day-by-day itinerary.";

const MOCK_INTERESTS: &[&str] = &["Sightseeing", "Local Culture", "Food & Dining", "Shopping"];
const MOCK_PREFERENCES: &[&str] = &["Moderate pace", "Mix of activities", "Local experiences"];

const LIVE_INTERESTS: &[&str] = &["Sightseeing", "Local Culture", "Food & Dining"];
const LIVE_PREFERENCES: &[&str] = &["Moderate pace", "Mix of activities"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Fixed template, no external call.
    Mock,
    Live,
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" | "development" => Ok(GenerationMode::Mock),
            "live" | "production" => Ok(GenerationMode::Live),
            other => Err(format!("unknown generation mode: {}", other)),
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Mock => f.write_str("mock"),
            GenerationMode::Live => f.write_str("live"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Completion provider error: {0}")]
    Provider(String),

    #[error("Completion provider returned an empty response")]
    EmptyResponse,

    #[error("Live generation requested without a completion provider")]
    ProviderMissing,
}

/// Produces itinerary content in the mode chosen at construction.
#[derive(Clone)]
pub struct ContentGenerator {
    mode: GenerationMode,
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl ContentGenerator {
    pub fn mock() -> Self {
        Self {
            mode: GenerationMode::Mock,
            provider: None,
        }
    }

    pub fn live(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            mode: GenerationMode::Live,
            provider: Some(provider),
        }
    }

    pub fn from_config(mode: GenerationMode, llm: &LlmConfig) -> Result<Self, GenerationError> {
        match mode {
            GenerationMode::Mock => Ok(Self::mock()),
            GenerationMode::Live => {
                let api_key = llm.api_key.as_ref().ok_or(GenerationError::ProviderMissing)?;
                let client = OpenAiClient::new(api_key, llm.model.clone(), llm.base_url.clone())?;
                Ok(Self::live(Arc::new(client)))
            }
        }
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub async fn generate(
        &self,
        destination: &str,
        days: i64,
        budget: Option<Decimal>,
    ) -> Result<GeneratedContent, GenerationError> {
        match self.mode {
            GenerationMode::Mock => {
                tracing::debug!(destination, days, "using mock itinerary");
                Ok(mock_itinerary(destination, days))
            }
            GenerationMode::Live => {
                let provider = self.provider.as_ref().ok_or(GenerationError::ProviderMissing)?;
                let prompt = build_prompt(destination, days, budget);
                tracing::debug!(prompt = %prompt, "requesting itinerary from provider");

                let text = provider.complete(SYSTEM_INSTRUCTION, &prompt).await?;
                if text.trim().is_empty() {
                    return Err(GenerationError::EmptyResponse);
                }

                Ok(GeneratedContent {
                    content: text,
                    interests: to_tags(LIVE_INTERESTS),
                    preferences: to_tags(LIVE_PREFERENCES),
                    status: ContentStatus::Completed,
                    day: 1,
                })
            }
        }
    }
}

/// Deterministic stand-in for the provider.
pub fn mock_itinerary(destination: &str, days: i64) -> GeneratedContent {
    let content = format!(
        "Here's your {days}-day itinerary for {destination}:

Day 1:
- Morning: Arrive and check into your hotel
- Afternoon: Walking tour of the city center
- Evening: Welcome dinner at a local restaurant

Day 2:
- Morning: Visit main tourist attractions
- Afternoon: Shopping and local markets
- Evening: Cultural show or performance

[... Additional days would be generated here ...]

Final Day:
- Morning: Last-minute shopping
- Afternoon: Pack and prepare for departure
- Evening: Farewell dinner

Note: This is a mock itinerary for development purposes."
    );

    GeneratedContent {
        content,
        interests: to_tags(MOCK_INTERESTS),
        preferences: to_tags(MOCK_PREFERENCES),
        status: ContentStatus::Completed,
        day: 1,
    }
}

/// A zero budget is left out of the prompt, same as no budget.
pub fn build_prompt(destination: &str, days: i64, budget: Option<Decimal>) -> String {
    let mut prompt = format!("Generate a {}-day itinerary for a trip to {}.", days, destination);
    if let Some(budget) = budget.filter(|b| !b.is_zero()) {
        prompt.push_str(&format!(" Budget: {} USD.", budget.normalize()));
    }
    prompt
}

fn to_tags(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
}
