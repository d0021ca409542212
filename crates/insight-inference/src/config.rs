//! Inference configuration system.
//!
//! Selects and configures the OCR backend and the reasoner. Configuration can
//! be loaded from:
//! - A TOML file (`INSIGHT_CONFIG`, else ~/.config/insightflow/inference.toml)
//! - Environment variables
//!
//! # Example
//!
//! ```rust,no_run
//! use insight_inference::config::InferenceConfig;
//!
//! // Load from file if present, else from env vars
//! let config = InferenceConfig::load().expect("Failed to load config");
//! let ocr = config.build_ocr_backend().expect("OCR backend");
//! let reasoner = config.build_reasoner().expect("Reasoner");
//! ```
//!
//! ```toml
//! [inference]
//! ocr = "google_vision"
//!
//! [inference.reasoner]
//! base_url = "https://generativelanguage.googleapis.com/v1beta/openai"
//! api_key = "${GEMINI_API_KEY}"
//! fast_model = "gemini-2.0-flash"
//! fallback_model = "gemini-1.5-pro"
//!
//! [inference.google_vision]
//! api_key = "${GOOGLE_VISION_API_KEY}"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use insight_core::defaults;
use insight_core::OcrBackend;

use crate::ocr::{DisabledOcr, GoogleVisionConfig, GoogleVisionOcr, TesseractConfig, TesseractOcr};
use crate::reasoner::{default_configs, Reasoner};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid backend: {0}")]
    InvalidBackend(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing configuration for selected backend: {0}")]
    MissingBackend(String),

    #[error("Failed to initialize backend: {0}")]
    Backend(#[from] insight_core::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// OCR backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OcrBackendKind {
    #[default]
    GoogleVision,
    Tesseract,
    Disabled,
}

impl FromStr for OcrBackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google_vision" | "google" | "vision" => Ok(Self::GoogleVision),
            "tesseract" => Ok(Self::Tesseract),
            "disabled" | "none" | "off" => Ok(Self::Disabled),
            _ => Err(ConfigError::InvalidBackend(s.to_string())),
        }
    }
}

impl fmt::Display for OcrBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoogleVision => write!(f, "google_vision"),
            Self::Tesseract => write!(f, "tesseract"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

fn validate_url(name: &str, url: &str) -> ConfigResult<()> {
    if url.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} base_url cannot be empty",
            name
        )));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{} base_url must start with http:// or https://, got: {}",
            name, url
        )));
    }
    Ok(())
}

/// Reasoner endpoint and model chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonerSettings {
    /// Base URL for the OpenAI-compatible API.
    pub base_url: String,
    /// API key (optional for local endpoints).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model for the first attempt.
    pub fast_model: String,
    /// Model for the second attempt.
    pub fallback_model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ReasonerSettings {
    fn default() -> Self {
        Self {
            base_url: defaults::REASONER_URL.to_string(),
            api_key: None,
            fast_model: defaults::REASONER_FAST_MODEL.to_string(),
            fallback_model: defaults::REASONER_FALLBACK_MODEL.to_string(),
            timeout_seconds: defaults::REASONER_TIMEOUT_SECS,
        }
    }
}

impl ReasonerSettings {
    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_url("Reasoner", &self.base_url)?;

        if self.fast_model.is_empty() {
            return Err(ConfigError::Validation(
                "Reasoner fast_model cannot be empty".to_string(),
            ));
        }

        if self.fallback_model.is_empty() {
            return Err(ConfigError::Validation(
                "Reasoner fallback_model cannot be empty".to_string(),
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "Reasoner timeout_seconds must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Google Vision settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleVisionSettings {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub max_pages: u32,
}

impl Default for GoogleVisionSettings {
    fn default() -> Self {
        Self {
            base_url: defaults::GOOGLE_VISION_URL.to_string(),
            api_key: None,
            timeout_seconds: defaults::OCR_TIMEOUT_SECS,
            max_pages: defaults::PDF_OCR_MAX_PAGES,
        }
    }
}

/// Tesseract settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseractSettings {
    pub language: String,
    pub dpi: u32,
    pub max_pages: u32,
    pub timeout_seconds: u64,
}

impl Default for TesseractSettings {
    fn default() -> Self {
        Self {
            language: defaults::OCR_LANGUAGE.to_string(),
            dpi: defaults::OCR_DPI,
            max_pages: defaults::PDF_OCR_MAX_PAGES,
            timeout_seconds: defaults::EXTRACTION_CMD_TIMEOUT_SECS,
        }
    }
}

/// Main inference configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InferenceConfig {
    /// Which OCR backend to build.
    pub ocr: OcrBackendKind,
    pub reasoner: ReasonerSettings,
    pub google_vision: GoogleVisionSettings,
    pub tesseract: TesseractSettings,
}

impl InferenceConfig {
    /// Get the default config file path.
    ///
    /// Returns: ~/.config/insightflow/inference.toml
    pub fn default_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        path.push("insightflow");
        path.push("inference.toml");
        path
    }

    /// Load configuration from `INSIGHT_CONFIG` or the default path, falling
    /// back to environment variables when no file exists.
    pub fn load() -> ConfigResult<Self> {
        let path = env::var(defaults::ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_config_path());

        if path.exists() {
            info!("Loading inference config from: {}", path.display());
            Self::from_file(&path)
        } else {
            debug!(
                "Config file not found at {}, using environment variables",
                path.display()
            );
            let config = Self::from_env();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text with `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let content = Self::substitute_env_vars(content);

        #[derive(Deserialize)]
        struct TomlRoot {
            #[serde(default)]
            inference: InferenceConfig,
        }

        let root: TomlRoot = toml::from_str(&content)?;
        root.inference.validate()?;
        Ok(root.inference)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let ocr = env::var(defaults::ENV_OCR_BACKEND)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| {
                // Without a key the cloud backend cannot work; fall back to none.
                if env::var(defaults::ENV_GOOGLE_VISION_API_KEY).is_ok() {
                    OcrBackendKind::GoogleVision
                } else {
                    OcrBackendKind::Disabled
                }
            });

        let reasoner = ReasonerSettings {
            base_url: env::var(defaults::ENV_REASONER_BASE_URL)
                .unwrap_or_else(|_| defaults::REASONER_URL.to_string()),
            api_key: env::var(defaults::ENV_REASONER_API_KEY)
                .or_else(|_| env::var(defaults::ENV_GEMINI_API_KEY))
                .ok(),
            fast_model: env::var(defaults::ENV_REASONER_FAST_MODEL)
                .unwrap_or_else(|_| defaults::REASONER_FAST_MODEL.to_string()),
            fallback_model: env::var(defaults::ENV_REASONER_FALLBACK_MODEL)
                .unwrap_or_else(|_| defaults::REASONER_FALLBACK_MODEL.to_string()),
            timeout_seconds: env::var(defaults::ENV_REASONER_TIMEOUT_SECS)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::REASONER_TIMEOUT_SECS),
        };

        let google_vision = GoogleVisionSettings {
            base_url: env::var(defaults::ENV_GOOGLE_VISION_URL)
                .unwrap_or_else(|_| defaults::GOOGLE_VISION_URL.to_string()),
            api_key: env::var(defaults::ENV_GOOGLE_VISION_API_KEY).ok(),
            ..GoogleVisionSettings::default()
        };

        let tesseract = TesseractSettings {
            language: env::var(defaults::ENV_TESSERACT_LANGUAGE)
                .unwrap_or_else(|_| defaults::OCR_LANGUAGE.to_string()),
            dpi: env::var(defaults::ENV_OCR_DPI)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::OCR_DPI),
            ..TesseractSettings::default()
        };

        Self {
            ocr,
            reasoner,
            google_vision,
            tesseract,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.reasoner.validate()?;

        match self.ocr {
            OcrBackendKind::GoogleVision => {
                validate_url("Google Vision", &self.google_vision.base_url)?;
                if self
                    .google_vision
                    .api_key
                    .as_deref()
                    .map_or(true, str::is_empty)
                {
                    return Err(ConfigError::MissingBackend(
                        "google_vision is selected but no api_key is set".to_string(),
                    ));
                }
            }
            OcrBackendKind::Tesseract => {
                if self.tesseract.language.is_empty() {
                    return Err(ConfigError::Validation(
                        "Tesseract language cannot be empty".to_string(),
                    ));
                }
                if self.tesseract.dpi == 0 {
                    return Err(ConfigError::Validation(
                        "Tesseract dpi must be positive".to_string(),
                    ));
                }
            }
            OcrBackendKind::Disabled => {}
        }

        Ok(())
    }

    /// Build the configured OCR backend.
    pub fn build_ocr_backend(&self) -> ConfigResult<Arc<dyn OcrBackend>> {
        let backend: Arc<dyn OcrBackend> = match self.ocr {
            OcrBackendKind::GoogleVision => {
                let api_key = self.google_vision.api_key.clone().ok_or_else(|| {
                    ConfigError::MissingBackend(
                        "google_vision is selected but no api_key is set".to_string(),
                    )
                })?;
                Arc::new(GoogleVisionOcr::new(GoogleVisionConfig {
                    base_url: self.google_vision.base_url.clone(),
                    api_key,
                    timeout_seconds: self.google_vision.timeout_seconds,
                    max_pages: self.google_vision.max_pages,
                })?)
            }
            OcrBackendKind::Tesseract => Arc::new(TesseractOcr::new(TesseractConfig {
                language: self.tesseract.language.clone(),
                dpi: self.tesseract.dpi,
                max_pages: self.tesseract.max_pages,
                timeout_seconds: self.tesseract.timeout_seconds,
            })),
            OcrBackendKind::Disabled => Arc::new(DisabledOcr),
        };

        info!(ocr_backend = %self.ocr, "OCR backend configured");
        Ok(backend)
    }

    /// Build the reasoner with the configured model chain.
    #[cfg(feature = "openai")]
    pub fn build_reasoner(&self) -> ConfigResult<Reasoner> {
        use crate::openai::{OpenAIConfig, OpenAIReasoner};

        let backend = OpenAIReasoner::new(OpenAIConfig {
            base_url: self.reasoner.base_url.clone(),
            api_key: self.reasoner.api_key.clone(),
            timeout_seconds: self.reasoner.timeout_seconds,
            temperature: None,
        })?;

        Ok(Reasoner::new(
            Arc::new(backend),
            default_configs(&self.reasoner.fast_model, &self.reasoner.fallback_model),
        ))
    }

    /// Substitute environment variables in the format ${VAR_NAME}.
    fn substitute_env_vars(content: &str) -> String {
        let Ok(re) = regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
            return content.to_string();
        };
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_substitution_with_value() {
        let content = "api_key = \"${INSIGHT_TEST_SUBSTITUTION_VAR}\"";

        env::set_var("INSIGHT_TEST_SUBSTITUTION_VAR", "test-value");
        let result = InferenceConfig::substitute_env_vars(content);
        env::remove_var("INSIGHT_TEST_SUBSTITUTION_VAR");

        assert_eq!(result, "api_key = \"test-value\"");
    }

    #[test]
    fn test_env_var_substitution_missing() {
        let content = "api_key = \"${NONEXISTENT_INSIGHT_VAR_12345}\"";
        let result = InferenceConfig::substitute_env_vars(content);
        assert_eq!(result, "api_key = \"${NONEXISTENT_INSIGHT_VAR_12345}\"");
    }

    #[test]
    fn test_ocr_backend_kind_from_str() {
        assert_eq!(
            "google_vision".parse::<OcrBackendKind>().unwrap(),
            OcrBackendKind::GoogleVision
        );
        assert_eq!(
            "Tesseract".parse::<OcrBackendKind>().unwrap(),
            OcrBackendKind::Tesseract
        );
        assert_eq!(
            "disabled".parse::<OcrBackendKind>().unwrap(),
            OcrBackendKind::Disabled
        );
        assert!(matches!(
            "azure".parse::<OcrBackendKind>(),
            Err(ConfigError::InvalidBackend(_))
        ));
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
            [inference]
            ocr = "tesseract"

            [inference.reasoner]
            base_url = "http://localhost:11434/v1"
            fast_model = "llama3"
            fallback_model = "qwen2.5"

            [inference.tesseract]
            language = "deu"
            dpi = 200
        "#;

        let config = InferenceConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.ocr, OcrBackendKind::Tesseract);
        assert_eq!(config.reasoner.base_url, "http://localhost:11434/v1");
        assert_eq!(config.reasoner.fast_model, "llama3");
        assert_eq!(config.reasoner.timeout_seconds, defaults::REASONER_TIMEOUT_SECS);
        assert_eq!(config.tesseract.language, "deu");
        assert_eq!(config.tesseract.dpi, 200);
        assert_eq!(config.tesseract.max_pages, defaults::PDF_OCR_MAX_PAGES);
    }

    #[test]
    fn test_google_vision_requires_key() {
        let toml_str = r#"
            [inference]
            ocr = "google_vision"
        "#;
        let err = InferenceConfig::from_toml_str(toml_str).unwrap_err();
        assert!(matches!(err, ConfigError::MissingBackend(_)));
    }

    #[test]
    fn test_invalid_reasoner_url() {
        let toml_str = r#"
            [inference]
            ocr = "disabled"

            [inference.reasoner]
            base_url = "localhost:8080"
        "#;
        let err = InferenceConfig::from_toml_str(toml_str).unwrap_err();
        assert!(err.to_string().contains("must start with http"));
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut config = InferenceConfig {
            ocr: OcrBackendKind::Disabled,
            ..InferenceConfig::default()
        };
        config.reasoner.fallback_model = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let err = InferenceConfig::from_toml_str("[inference\nocr = ").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_serialize_inference_config() {
        let config = InferenceConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        assert!(serialized.contains("ocr = \"google_vision\""));
        assert!(serialized.contains("fast_model"));
    }

    #[test]
    fn test_build_disabled_ocr_backend() {
        let config = InferenceConfig {
            ocr: OcrBackendKind::Disabled,
            ..InferenceConfig::default()
        };
        let backend = config.build_ocr_backend().unwrap();
        assert_eq!(backend.name(), "disabled");
    }

    #[test]
    fn test_build_tesseract_backend() {
        let config = InferenceConfig {
            ocr: OcrBackendKind::Tesseract,
            ..InferenceConfig::default()
        };
        let backend = config.build_ocr_backend().unwrap();
        assert_eq!(backend.name(), "tesseract");
    }

    #[cfg(feature = "openai")]
    #[test]
    fn test_build_reasoner_uses_model_chain() {
        let mut config = InferenceConfig::default();
        config.reasoner.fast_model = "m1".to_string();
        config.reasoner.fallback_model = "m2".to_string();
        let reasoner = config.build_reasoner().unwrap();
        assert_eq!(reasoner.models(), vec!["m1", "m2"]);
        assert_eq!(reasoner.backend_name(), "openai");
    }
}
