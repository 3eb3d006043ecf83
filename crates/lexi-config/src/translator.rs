use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_provider() -> String {
    "deepl".to_string()
}

fn default_api_url() -> String {
    "https://api-free.deepl.com/v2/translate".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: default_provider(),
            api_key: String::new(),
            api_url: default_api_url(),
        }
    }
}
