// src/services/content_service.rs
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::errors::DesignError;
use crate::models::{DEFAULT_TEXT_COLOR, DesignContent, DesignType, GeneratedDesign, PALETTE};
use crate::services::decor_generator;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-2.5-flash";
const CONTENT_LANGUAGE: &str = "Thai";

/// A model that answers a prompt with schema-constrained JSON text.
#[async_trait]
pub trait ContentModel: Send + Sync {
    async fn generate_json(
        &self,
        prompt: &str,
        schema: serde_json::Value,
    ) -> Result<String, DesignError>;
}

pub struct GeminiModel {
    api_key: String,
    client: Client,
}

impl GeminiModel {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ContentModel for GeminiModel {
    async fn generate_json(
        &self,
        prompt: &str,
        schema: serde_json::Value,
    ) -> Result<String, DesignError> {
        let response = self
            .client
            .post(format!(
                "{}/{}:generateContent",
                GEMINI_ENDPOINT, GEMINI_MODEL
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&json!({
                "contents": [{
                    "parts": [{ "text": prompt }]
                }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": schema
                }
            }))
            .send()
            .await
            .map_err(|e| {
                DesignError::ContentGeneration(format!("Gemini request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DesignError::ContentGeneration(format!(
                "Gemini error: {}",
                error_text
            )));
        }

        let result: serde_json::Value = response.json().await.map_err(|e| {
            DesignError::ContentGeneration(format!("Failed to parse Gemini response: {}", e))
        })?;

        // Answers may span several parts; concatenate whatever text came back.
        let text = result["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<String>()
            })
            .unwrap_or_default();

        Ok(text)
    }
}

/// Builds the prompt, calls the model and runs the local randomization pass
/// that turns raw content into a complete design.
pub struct ContentRequestor {
    model: Box<dyn ContentModel>,
}

impl ContentRequestor {
    pub fn new(model: impl ContentModel + 'static) -> Self {
        Self {
            model: Box::new(model),
        }
    }

    pub async fn generate_design(
        &self,
        text: &str,
        design_type: DesignType,
    ) -> Result<GeneratedDesign, DesignError> {
        let prompt = build_prompt(text, design_type);
        let raw = self.model.generate_json(&prompt, response_schema()).await?;

        if raw.trim().is_empty() {
            return Err(DesignError::ContentGeneration(
                "No response from AI".to_string(),
            ));
        }

        let content: DesignContent = serde_json::from_str(&raw).map_err(|e| {
            DesignError::ContentGeneration(format!("Malformed design payload: {}", e))
        })?;

        Ok(finalize_design(content))
    }
}

/// The accent color is drawn from the palette regardless of what the model
/// picked, so repeated generations of the same text still differ visually.
/// Pattern and decorative elements are likewise rolled locally per call.
fn finalize_design(content: DesignContent) -> GeneratedDesign {
    let mut rng = rand::thread_rng();
    GeneratedDesign {
        headline: content.headline,
        subheadline: content.subheadline,
        body_text: content.body_text,
        accent_color: decor_generator::random_accent(&mut rng).to_string(),
        background_color: content.background_color,
        text_color: content
            .text_color
            .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
        emoji_icon: content.emoji_icon,
        layout_style: content.layout_style,
        background_pattern: decor_generator::random_pattern(&mut rng),
        decorative_elements: decor_generator::generate_elements(&mut rng),
        generated_at: chrono::Utc::now(),
    }
}

fn build_prompt(text: &str, design_type: DesignType) -> String {
    format!(
        r#"Act as a senior graphic designer for "PR Quick Design System".
Generate a creative design structure for a "{}" based on the text: "{}".

STRICT DESIGN RULES:
1. Use ONLY these colors for accents/graphics: {}.
2. Background should be White (#FFFFFF), very light Gray (#F8F9FA), or a very light tint of the palette.
3. Select a 'layoutStyle' from: 'minimal', 'bold', 'creative', 'modern'.
4. Ensure 'textColor' has high contrast with the background (usually dark gray or black).
5. Content must be in {}.

Output valid JSON only."#,
        design_type.label(),
        text,
        PALETTE.join(", "),
        CONTENT_LANGUAGE
    )
}

fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "headline": { "type": "STRING" },
            "subheadline": { "type": "STRING" },
            "bodyText": { "type": "STRING" },
            "accentColor": { "type": "STRING" },
            "backgroundColor": { "type": "STRING" },
            "textColor": { "type": "STRING" },
            "emojiIcon": { "type": "STRING" },
            "layoutStyle": {
                "type": "STRING",
                "enum": ["minimal", "bold", "creative", "modern"]
            }
        },
        "required": [
            "headline",
            "subheadline",
            "bodyText",
            "accentColor",
            "backgroundColor",
            "emojiIcon",
            "layoutStyle"
        ]
    })
}
