//! Classification of error responses from OpenAI-compatible endpoints.

use insight_core::Error;

/// What went wrong with a chat-completions call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAIErrorCode {
    /// Bad or missing credentials. Gemini reports these as
    /// `400 INVALID_ARGUMENT` with "API key not valid".
    AuthenticationError,
    RateLimitExceeded,
    ModelNotFound,
    /// The model refused the `json_schema` response format.
    SchemaRejected,
    ContextLengthExceeded,
    ServerError,
    Unknown,
}

impl OpenAIErrorCode {
    pub fn from_response(status: u16, error_type: &str, message: &str) -> Self {
        let message = message.to_ascii_lowercase();
        match status {
            401 | 403 => Self::AuthenticationError,
            400 if message.contains("api key not valid") => Self::AuthenticationError,
            429 => Self::RateLimitExceeded,
            404 => Self::ModelNotFound,
            _ if error_type == "model_not_found" => Self::ModelNotFound,
            400 if message.contains("response_format") || message.contains("json_schema") => {
                Self::SchemaRejected
            }
            413 => Self::ContextLengthExceeded,
            400 if error_type.contains("context_length") => Self::ContextLengthExceeded,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// Map a classified failure to the core error.
///
/// Credential and model problems are configuration errors; everything else
/// is an inference error. The reasoner moves on to its next model either way.
pub fn to_insight_error(code: OpenAIErrorCode, message: &str) -> Error {
    match code {
        OpenAIErrorCode::AuthenticationError => {
            Error::Config(format!("Authentication failed: {}", message))
        }
        OpenAIErrorCode::ModelNotFound => Error::Config(format!("Model not found: {}", message)),
        OpenAIErrorCode::RateLimitExceeded => {
            Error::Inference(format!("Rate limit exceeded: {}", message))
        }
        OpenAIErrorCode::SchemaRejected => {
            Error::Inference(format!("Structured output rejected: {}", message))
        }
        OpenAIErrorCode::ContextLengthExceeded => {
            Error::Inference(format!("Context too long: {}", message))
        }
        OpenAIErrorCode::ServerError => Error::Inference(format!("Server error: {}", message)),
        OpenAIErrorCode::Unknown => Error::Inference(message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        use OpenAIErrorCode::*;
        let cases = [
            (401, "invalid_api_key", "", AuthenticationError),
            (403, "", "", AuthenticationError),
            (400, "", "API key not valid. Please pass a valid API key.", AuthenticationError),
            (429, "rate_limit_exceeded", "", RateLimitExceeded),
            (404, "", "", ModelNotFound),
            (400, "model_not_found", "", ModelNotFound),
            (400, "", "Invalid response_format: json_schema unsupported", SchemaRejected),
            (400, "context_length_exceeded", "", ContextLengthExceeded),
            (413, "", "", ContextLengthExceeded),
            (503, "", "overloaded", ServerError),
            (418, "im_a_teapot", "", Unknown),
            (400, "invalid_request_error", "bad", Unknown),
        ];
        for (status, error_type, message, expected) in cases {
            assert_eq!(
                OpenAIErrorCode::from_response(status, error_type, message),
                expected,
                "status {} type {:?} message {:?}",
                status,
                error_type,
                message
            );
        }
    }

    #[test]
    fn test_credential_problems_are_config_errors() {
        let err = to_insight_error(OpenAIErrorCode::AuthenticationError, "Invalid key");
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: Authentication failed: Invalid key");

        let err = to_insight_error(OpenAIErrorCode::ModelNotFound, "gemini-9");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_transient_problems_are_inference_errors() {
        for code in [
            OpenAIErrorCode::RateLimitExceeded,
            OpenAIErrorCode::SchemaRejected,
            OpenAIErrorCode::ServerError,
            OpenAIErrorCode::Unknown,
        ] {
            assert!(matches!(to_insight_error(code, "x"), Error::Inference(_)));
        }
    }
}
