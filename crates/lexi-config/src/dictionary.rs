use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_url() -> String {
    "https://od-api.oxforddictionaries.com".to_string()
}

/// Oxford Dictionaries API credentials.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_key: String,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            url: default_url(),
            app_id: String::new(),
            app_key: String::new(),
        }
    }
}
