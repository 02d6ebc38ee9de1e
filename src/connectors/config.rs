use serde::{Deserialize, Serialize};

/// Gemini connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSettings {
    /// Enable/disable calls to the hosted model
    #[serde(default = "GeminiSettings::default_enabled")]
    pub enabled: bool,
    /// Generative Language API base URL
    #[serde(default = "GeminiSettings::default_base_url")]
    pub base_url: String,
    /// Model used for `generateContent`
    #[serde(default = "GeminiSettings::default_model")]
    pub model: String,
    /// HTTP timeout in seconds
    #[serde(default = "GeminiSettings::default_timeout_secs")]
    pub timeout_secs: u64,
    /// API key (from env: GEMINI_API_KEY)
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl GeminiSettings {
    const fn default_enabled() -> bool {
        true
    }

    fn default_base_url() -> String {
        "https://generativelanguage.googleapis.com/v1beta".to_string()
    }

    fn default_model() -> String {
        "gemini-2.0-flash".to_string()
    }

    const fn default_timeout_secs() -> u64 {
        60
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            base_url: Self::default_base_url(),
            model: Self::default_model(),
            timeout_secs: Self::default_timeout_secs(),
            api_key: None,
        }
    }
}
