//! OpenRouter-backed implementation of the gateway traits.
//!
//! Talks to an OpenAI-compatible chat-completions endpoint. Food lookups
//! request a strict JSON-schema response and are parsed into structured
//! records; advice is requested as plain text. Every failure path (missing
//! API key, transport error, non-success status, malformed body) is logged
//! and collapsed into the trait-level sentinel, so callers never see an
//! error type.

use crate::config::GatewayConfig;
use crate::gateway::{AdviceSource, FoodSource, MealAdvice};
use crate::{Error, FoodItem, MacroBundle, Result, UserProfile};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use uuid::Uuid;

// ============================================================================
// Chat-completion wire types
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// A (subset of a) JSON schema node. Recursive so that array-of-object
/// response shapes can be expressed.
#[derive(Clone, Debug, Serialize)]
pub struct JsonSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, JsonSchema>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,
    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,
}

impl JsonSchema {
    fn leaf(schema_type: &str) -> Self {
        JsonSchema {
            schema_type: schema_type.into(),
            properties: None,
            required: Vec::new(),
            items: None,
            additional_properties: None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct JsonSchemaDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    pub schema: JsonSchema,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<JsonSchemaDefinition>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatCompletionResponseMessage {
    pub role: String,
    pub content: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub model: Option<String>,
    pub choices: Vec<ChatCompletionChoice>,
}

// ============================================================================
// Structured food records
// ============================================================================

/// One structured food record as returned by the completion endpoint.
/// All numeric fields are required on success.
#[derive(Clone, Debug, Deserialize)]
pub struct FoodRecord {
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub serving_size: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl From<FoodRecord> for FoodItem {
    fn from(record: FoodRecord) -> Self {
        FoodItem {
            id: Uuid::new_v4(),
            name: record.name,
            brand: record.brand,
            serving_size: record.serving_size,
            macros: MacroBundle {
                calories: record.calories,
                protein_g: record.protein,
                carbs_g: record.carbs,
                fat_g: record.fat,
                water_ml: 0.0,
            },
            is_custom: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    items: Vec<FoodRecord>,
}

// ============================================================================
// Gateway
// ============================================================================

/// HTTP gateway implementing [`FoodSource`] and [`AdviceSource`] against an
/// OpenAI-compatible chat-completions endpoint.
pub struct OpenRouterGateway {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key_env: String,
}

impl OpenRouterGateway {
    /// Build a gateway from configuration. The API key itself is read from
    /// the configured environment variable at request time.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(OpenRouterGateway {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key_env: config.api_key_env.clone(),
        })
    }

    /// Send one completion request and return the first choice's content.
    async fn complete(
        &self,
        prompt: String,
        response_format: Option<ResponseFormat>,
    ) -> Result<String> {
        let api_key = env::var(&self.api_key_env)
            .map_err(|_| Error::Config(format!("API key not set in ${}", self.api_key_env)))?;

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: prompt,
            }],
            response_format,
            temperature: Some(0.4),
            max_tokens: Some(1024),
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .header("X-Title", "macrolog")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Gateway(format!("{status}: {body}")));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Gateway("completion had no choices".into()))
    }

    async fn search_inner(&self, query: &str) -> Result<Vec<FoodItem>> {
        let content = self
            .complete(search_prompt(query), Some(search_response_format()))
            .await?;
        let records = parse_food_records(&content)?;
        Ok(records.into_iter().map(FoodItem::from).collect())
    }

    async fn barcode_inner(&self, code: &str) -> Result<FoodItem> {
        let content = self
            .complete(barcode_prompt(code), Some(barcode_response_format()))
            .await?;
        let record = parse_food_record(&content)?;
        Ok(record.into())
    }
}

#[async_trait]
impl FoodSource for OpenRouterGateway {
    async fn search(&self, query: &str) -> Vec<FoodItem> {
        match self.search_inner(query).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Food search failed for {:?}: {}", query, e);
                Vec::new()
            }
        }
    }

    async fn identify_barcode(&self, code: &str) -> Option<FoodItem> {
        match self.barcode_inner(code).await {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Barcode lookup failed for {:?}: {}", code, e);
                None
            }
        }
    }
}

#[async_trait]
impl AdviceSource for OpenRouterGateway {
    async fn meal_advice(&self, profile: &UserProfile) -> MealAdvice {
        match self.complete(advice_prompt(profile), None).await {
            Ok(text) if !text.trim().is_empty() => MealAdvice::Suggestions(text),
            Ok(_) => {
                tracing::warn!("Advice request returned an empty body");
                MealAdvice::Unavailable
            }
            Err(e) => {
                tracing::warn!("Advice request failed: {}", e);
                MealAdvice::Unavailable
            }
        }
    }
}

// ============================================================================
// Prompts, schemas, parsing
// ============================================================================

pub(crate) fn search_prompt(query: &str) -> String {
    format!(
        "Search for food items matching \"{query}\". Return 3-5 distinct \
         options including common brands if applicable. Estimate macros per \
         standard serving."
    )
}

pub(crate) fn barcode_prompt(code: &str) -> String {
    // Last four characters, not bytes: scan commands accept arbitrary text
    let tail = code
        .char_indices()
        .rev()
        .nth(3)
        .map(|(i, _)| &code[i..])
        .unwrap_or(code);
    format!(
        "Simulate a food product lookup for a packaged food with barcode \
         ending in {tail}. Return the nutritional info per serving."
    )
}

pub(crate) fn advice_prompt(profile: &UserProfile) -> String {
    format!(
        "Give me 3 distinct meal ideas (Breakfast, Lunch, Dinner) for a \
         person with these stats:\nGoal: {:?}\nCalories/day: {}\nDiet: High \
         Protein preferred.\nKeep it brief and appetizing.",
        profile.goal_type, profile.macro_goals.calories
    )
}

fn food_object_schema() -> JsonSchema {
    let mut properties = HashMap::new();
    properties.insert("name".into(), JsonSchema::leaf("string"));
    properties.insert("brand".into(), JsonSchema::leaf("string"));
    properties.insert("serving_size".into(), JsonSchema::leaf("string"));
    properties.insert("calories".into(), JsonSchema::leaf("number"));
    properties.insert("protein".into(), JsonSchema::leaf("number"));
    properties.insert("carbs".into(), JsonSchema::leaf("number"));
    properties.insert("fat".into(), JsonSchema::leaf("number"));

    JsonSchema {
        schema_type: "object".into(),
        properties: Some(properties),
        required: vec![
            "name".into(),
            "serving_size".into(),
            "calories".into(),
            "protein".into(),
            "carbs".into(),
            "fat".into(),
        ],
        items: None,
        additional_properties: Some(false),
    }
}

fn search_response_format() -> ResponseFormat {
    let mut properties = HashMap::new();
    properties.insert(
        "items".into(),
        JsonSchema {
            schema_type: "array".into(),
            properties: None,
            required: Vec::new(),
            items: Some(Box::new(food_object_schema())),
            additional_properties: None,
        },
    );

    ResponseFormat {
        format_type: "json_schema".into(),
        json_schema: Some(JsonSchemaDefinition {
            name: "food_candidates".into(),
            strict: Some(true),
            schema: JsonSchema {
                schema_type: "object".into(),
                properties: Some(properties),
                required: vec!["items".into()],
                items: None,
                additional_properties: Some(false),
            },
        }),
    }
}

fn barcode_response_format() -> ResponseFormat {
    ResponseFormat {
        format_type: "json_schema".into(),
        json_schema: Some(JsonSchemaDefinition {
            name: "food_product".into(),
            strict: Some(true),
            schema: food_object_schema(),
        }),
    }
}

/// Parse a search completion body into food records. Accepts either the
/// schema-shaped `{"items": [...]}` wrapper or a bare array, since models
/// occasionally return the latter.
pub(crate) fn parse_food_records(content: &str) -> Result<Vec<FoodRecord>> {
    if let Ok(payload) = serde_json::from_str::<SearchPayload>(content) {
        return Ok(payload.items);
    }
    let records: Vec<FoodRecord> = serde_json::from_str(content)?;
    Ok(records)
}

pub(crate) fn parse_food_record(content: &str) -> Result<FoodRecord> {
    let record: FoodRecord = serde_json::from_str(content)?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::GoalType;

    #[test]
    fn test_parse_food_records_wrapped() {
        let content = r#"{"items":[
            {"name":"Greek Yogurt","brand":"Fage","serving_size":"170g",
             "calories":90,"protein":18,"carbs":5,"fat":0},
            {"name":"Granola","serving_size":"45g",
             "calories":210,"protein":5,"carbs":32,"fat":7}
        ]}"#;

        let records = parse_food_records(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].brand.as_deref(), Some("Fage"));
        assert_eq!(records[1].brand, None);
        assert_eq!(records[1].calories, 210.0);
    }

    #[test]
    fn test_parse_food_records_bare_array() {
        let content = r#"[{"name":"Banana","serving_size":"1 medium",
            "calories":105,"protein":1.3,"carbs":27,"fat":0.4}]"#;

        let records = parse_food_records(content).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Banana");
    }

    #[test]
    fn test_parse_rejects_missing_required_numeric() {
        let content = r#"{"name":"Mystery Bar","serving_size":"1 bar","calories":200}"#;
        assert!(parse_food_record(content).is_err());
    }

    #[test]
    fn test_record_maps_to_food_item() {
        let record = FoodRecord {
            name: "Protein Bar".into(),
            brand: Some("Quest".into()),
            serving_size: "60g".into(),
            calories: 200.0,
            protein: 21.0,
            carbs: 22.0,
            fat: 8.0,
        };

        let item: FoodItem = record.into();
        assert!(!item.is_custom);
        assert_eq!(item.macros.protein_g, 21.0);
        assert_eq!(item.macros.water_ml, 0.0);
        assert_eq!(item.serving_size, "60g");
    }

    #[test]
    fn test_gateway_items_get_unique_ids() {
        let record = FoodRecord {
            name: "Rice".into(),
            brand: None,
            serving_size: "100g".into(),
            calories: 130.0,
            protein: 2.7,
            carbs: 28.0,
            fat: 0.3,
        };

        let a: FoodItem = record.clone().into();
        let b: FoodItem = record.into();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_barcode_prompt_uses_code_tail() {
        let prompt = barcode_prompt("4006381333931");
        assert!(prompt.contains("3931"));
        assert!(!prompt.contains("4006381333931"));
    }

    #[test]
    fn test_barcode_prompt_short_code() {
        let prompt = barcode_prompt("42");
        assert!(prompt.contains("42"));
    }

    #[test]
    fn test_barcode_prompt_multibyte_input() {
        // Scan commands accept arbitrary text; the tail must split on
        // character boundaries, not bytes
        let prompt = barcode_prompt("a€€");
        assert!(prompt.contains("a€€"));

        let prompt = barcode_prompt("①②③④⑤");
        assert!(prompt.contains("②③④⑤"));
        assert!(!prompt.contains("①②③④⑤"));
    }

    #[test]
    fn test_advice_prompt_carries_goal_and_calories() {
        let mut profile = UserProfile::default();
        profile.goal_type = GoalType::GainMuscle;

        let prompt = advice_prompt(&profile);
        assert!(prompt.contains("GainMuscle"));
        assert!(prompt.contains("2500"));
    }

    #[test]
    fn test_search_schema_requires_all_macros() {
        let format = search_response_format();
        let def = format.json_schema.unwrap();
        assert_eq!(def.schema.required, vec!["items".to_string()]);

        let items = def.schema.properties.unwrap()["items"].clone();
        let food = items.items.unwrap();
        for field in ["name", "serving_size", "calories", "protein", "carbs", "fat"] {
            assert!(food.required.iter().any(|r| r == field), "missing {field}");
        }
        // brand stays optional
        assert!(!food.required.iter().any(|r| r == "brand"));
    }

    #[test]
    fn test_request_serializes_without_empty_fields() {
        let request = ChatCompletionRequest {
            model: "test-model".into(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: "hi".into(),
            }],
            response_format: None,
            temperature: None,
            max_tokens: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("response_format").is_none());
        assert!(json.get("temperature").is_none());
    }
}
