//! Prompt templates for the reasoner.
//!
//! Templates use `{{name}}` placeholders filled from a
//! [`NormalizedContentBundle`]:
//!
//! | Placeholder | Value |
//! |---|---|
//! | `{{question}}` | The user's question |
//! | `{{file_type}}` | Caller-declared MIME type (may be empty) |
//! | `{{primary_content}}` | `ocr_text`, `processed_text`, `raw_document` or `none` |
//! | `{{content}}` | The extracted text, or a note about the attachment |

use insight_core::{NormalizedContentBundle, PrimaryContent};

/// Default system instructions for file analysis.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an AI assistant that analyzes the content of \
uploaded files and answers questions about them. Respond with a JSON object matching the \
provided schema.";

/// Default user prompt for file analysis.
pub const DEFAULT_USER_TEMPLATE: &str = "User Question: {{question}}
File Type: {{file_type}}
Primary Content: {{primary_content}}

{{content}}

Instructions:
1. Answer the user's question based on the file content.
2. If the question asks for a visual representation, graph, chart, or image based on data in \
the document, AND the File Type is 'application/pdf' or \
'application/vnd.openxmlformats-officedocument.wordprocessingml.document', then:
   a. Your textual answer should describe what kind of visual would be appropriate or \
summarize the data to be visualized.
   b. Set 'requiresImageGeneration' to true.
   c. Provide a concise 'imageGenerationPrompt' (e.g., \"A bar chart showing sales per \
quarter based on the document's sales data.\").
3. Otherwise set 'requiresImageGeneration' to false and do not provide an \
'imageGenerationPrompt'.
4. Cite sources if applicable (e.g., \"Uploaded Document\").
5. If the extracted text says that processing failed or that no text was found, tell the \
user that instead of guessing at the file's contents.";

/// A system prompt plus a user template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub system: String,
    pub user: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_TEMPLATE)
    }
}

impl PromptTemplate {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Render the user prompt for `bundle`.
    pub fn render(&self, bundle: &NormalizedContentBundle) -> String {
        self.user
            .replace("{{question}}", bundle.question())
            .replace("{{file_type}}", bundle.declared_file_type())
            .replace("{{primary_content}}", bundle.primary().label())
            .replace("{{content}}", &content_block(bundle.primary()))
    }
}

fn content_block(primary: &PrimaryContent) -> String {
    match primary {
        PrimaryContent::OcrText(text) => {
            format!("Text extracted from the uploaded image by OCR:\n{}", text)
        }
        PrimaryContent::ProcessedText(text) => {
            format!("Text extracted from the uploaded file:\n{}", text)
        }
        PrimaryContent::RawDocument(media) => {
            format!("The uploaded file ({}) is attached.", media.mime_type)
        }
        PrimaryContent::None => "No file content is available.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::MediaReference;

    fn bundle(primary: PrimaryContent) -> NormalizedContentBundle {
        NormalizedContentBundle::new("What does it say?", "image/png", true, primary)
    }

    #[test]
    fn test_render_ocr_text() {
        let rendered =
            PromptTemplate::default().render(&bundle(PrimaryContent::OcrText("Hello".into())));
        assert!(rendered.contains("User Question: What does it say?"));
        assert!(rendered.contains("File Type: image/png"));
        assert!(rendered.contains("Primary Content: ocr_text"));
        assert!(rendered.contains("by OCR:\nHello"));
    }

    #[test]
    fn test_render_raw_document() {
        let media = MediaReference::new("text/plain", b"hi".to_vec());
        let rendered = PromptTemplate::default().render(&bundle(PrimaryContent::RawDocument(media)));
        assert!(rendered.contains("Primary Content: raw_document"));
        assert!(rendered.contains("The uploaded file (text/plain) is attached."));
    }

    #[test]
    fn test_render_no_content() {
        let rendered = PromptTemplate::default().render(&bundle(PrimaryContent::None));
        assert!(rendered.contains("Primary Content: none"));
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn test_custom_template() {
        let template = PromptTemplate::new("sys", "{{question}}|{{primary_content}}");
        let rendered = template.render(&bundle(PrimaryContent::ProcessedText("x".into())));
        assert_eq!(rendered, "What does it say?|processed_text");
    }
}
