use std::collections::HashMap;
use async_trait::async_trait;
use serde_json::json;

use crate::config::LlmConfig;
use crate::error::{JavadepError, Result};
use super::advisor::{build_prompt, AdviceResponse, RefactorAdvisor};

/// Factory function to create the appropriate advisor based on config
pub fn create_advisor(config: &LlmConfig) -> Result<Box<dyn RefactorAdvisor>> {
    if !config.enabled {
        return Err(JavadepError::Config(
            "LLM integration is disabled".to_string(),
        ));
    }

    match config.provider.as_str() {
        "openai" => Ok(Box::new(OpenAiAdvisor::new(config)?)),
        "ollama" => Ok(Box::new(OllamaAdvisor::new(config))),
        _ => Err(JavadepError::Config(format!(
            "Unsupported LLM provider: {}",
            config.provider
        ))),
    }
}

/// OpenAI chat-completions provider
pub struct OpenAiAdvisor {
    config: LlmConfig,
    client: reqwest::Client,
}

impl OpenAiAdvisor {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.api_key.is_none() {
            return Err(JavadepError::Config(
                "API key required for the OpenAI provider".to_string(),
            ));
        }

        Ok(Self {
            config: config.clone(),
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl RefactorAdvisor for OpenAiAdvisor {
    async fn advise(&self, report: &str) -> Result<AdviceResponse> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| JavadepError::Config("OpenAI API key not set".to_string()))?;

        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.openai.com/v1");

        let payload = json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "user",
                    "content": build_prompt(report)
                }
            ],
            "max_tokens": self.config.max_tokens.unwrap_or(2000),
            "temperature": self.config.temperature.unwrap_or(0.3)
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| JavadepError::Llm(format!("OpenAI API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(JavadepError::Llm(format!(
                "OpenAI API error {}: {}",
                status, error_text
            )));
        }

        let response_data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| JavadepError::Llm(format!("Failed to parse OpenAI response: {}", e)))?;

        let content = response_data["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("Failed to extract content from OpenAI response")
            .to_string();

        let tokens_used = response_data["usage"]["total_tokens"]
            .as_u64()
            .map(|t| t as u32);

        Ok(AdviceResponse {
            content,
            tokens_used,
            metadata: {
                let mut map = HashMap::new();
                map.insert("provider".to_string(), "OpenAI".to_string());
                map.insert("model".to_string(), self.config.model.clone());
                map
            },
        })
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Ollama local provider; no API key required
pub struct OllamaAdvisor {
    config: LlmConfig,
    client: reqwest::Client,
}

impl OllamaAdvisor {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            config: config.clone(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RefactorAdvisor for OllamaAdvisor {
    async fn advise(&self, report: &str) -> Result<AdviceResponse> {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("http://localhost:11434");

        let payload = json!({
            "model": self.config.model,
            "prompt": build_prompt(report),
            "stream": false
        });

        let response = self
            .client
            .post(format!("{}/api/generate", base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| JavadepError::Llm(format!("Ollama request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(JavadepError::Llm(format!(
                "Ollama error {}: {}",
                status, error_text
            )));
        }

        let response_data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| JavadepError::Llm(format!("Failed to parse Ollama response: {}", e)))?;

        let content = response_data["response"]
            .as_str()
            .unwrap_or("Failed to extract content from Ollama response")
            .to_string();

        Ok(AdviceResponse {
            content,
            tokens_used: None,
            metadata: {
                let mut map = HashMap::new();
                map.insert("provider".to_string(), "Ollama".to_string());
                map.insert("model".to_string(), self.config.model.clone());
                map
            },
        })
    }

    fn provider_name(&self) -> &str {
        "Ollama"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
