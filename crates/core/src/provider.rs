use std::fmt;

use serde::{Deserialize, Serialize};

/// LLM providers the price catalog knows how to key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "open_router")]
    OpenRouter,
    #[serde(rename = "dash_scope")]
    DashScope,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "deep_seek")]
    DeepSeek,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "google")]
    Google,
    #[serde(rename = "vllm")]
    Vllm,
    #[serde(rename = "ollama")]
    Ollama,
    #[serde(rename = "transformers")]
    Transformers,
}

impl Provider {
    pub const ALL: [Provider; 9] = [
        Provider::OpenRouter,
        Provider::DashScope,
        Provider::OpenAi,
        Provider::DeepSeek,
        Provider::Anthropic,
        Provider::Google,
        Provider::Vllm,
        Provider::Ollama,
        Provider::Transformers,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::OpenRouter => "open_router",
            Provider::DashScope => "dash_scope",
            Provider::OpenAi => "openai",
            Provider::DeepSeek => "deep_seek",
            Provider::Anthropic => "anthropic",
            Provider::Google => "google",
            Provider::Vllm => "vllm",
            Provider::Ollama => "ollama",
            Provider::Transformers => "transformers",
        }
    }

    /// Case-insensitive match against the provider tags. Unknown input is `None`.
    pub fn parse(value: &str) -> Option<Provider> {
        let value = value.trim();
        Provider::ALL
            .into_iter()
            .find(|provider| provider.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_any_case() {
        assert_eq!(Provider::parse("openai"), Some(Provider::OpenAi));
        assert_eq!(Provider::parse("OPENAI"), Some(Provider::OpenAi));
        assert_eq!(Provider::parse("Open_Router"), Some(Provider::OpenRouter));
        assert_eq!(Provider::parse(" dash_scope "), Some(Provider::DashScope));
    }

    #[test]
    fn parse_rejects_unknown_tags() {
        assert_eq!(Provider::parse(""), None);
        assert_eq!(Provider::parse("azure"), None);
        assert_eq!(Provider::parse("open-router"), None);
    }

    #[test]
    fn tags_round_trip_through_parse() {
        for provider in Provider::ALL {
            assert_eq!(Provider::parse(provider.as_str()), Some(provider));
            assert_eq!(provider.to_string(), provider.as_str());
        }
    }
}
