use async_trait::async_trait;
use lexi_core::{LanguageError, Translator};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<TranslationItem>,
}

#[derive(Debug, Deserialize)]
struct TranslationItem {
    #[serde(default)]
    detected_source_language: Option<String>,
    text: String,
}

/// DeepL sentence translator for one language pair
#[derive(Clone)]
pub struct DeeplTranslator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    source_lang: String,
    target_lang: String,
}

impl DeeplTranslator {
    pub fn new(
        api_key: String,
        api_url: String,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self::with_client(reqwest::Client::new(), api_key, api_url, source_lang, target_lang)
    }

    pub fn with_client(
        client: reqwest::Client,
        api_key: String,
        api_url: String,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key,
            api_url,
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }
}

#[async_trait]
impl Translator for DeeplTranslator {
    async fn translate(&self, text: &str) -> Result<Vec<String>, LanguageError> {
        if self.api_key.is_empty() {
            return Err(LanguageError::Authentication);
        }

        let source_lang = self.source_lang.to_uppercase();
        let target_lang = self.target_lang.to_uppercase();
        let params = [
            ("text", text),
            ("source_lang", source_lang.as_str()),
            ("target_lang", target_lang.as_str()),
        ];

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .header("Accept", "application/json")
            .form(&params)
            .send()
            .await?;

        let status = response.status();

        if status == 429 {
            return Err(LanguageError::RateLimitExceeded);
        }

        if status == 403 {
            return Err(LanguageError::Authentication);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LanguageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| LanguageError::Parse(e.to_string()))?;

        if let Some(detected) = body
            .translations
            .first()
            .and_then(|t| t.detected_source_language.as_deref())
        {
            tracing::trace!("DeepL detected source language {detected}");
        }

        Ok(body.translations.into_iter().map(|t| t.text).collect())
    }

    fn name(&self) -> &str {
        "DeepL"
    }
}
