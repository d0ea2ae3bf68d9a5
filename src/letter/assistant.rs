//! Letter summarization and metadata extraction on top of a content generator.
//!
//! The three operations deliberately differ in how they report failure:
//! - [`LetterAssistant::summarize`] always returns a string, using fixed
//!   fallback messages on failure
//! - [`LetterAssistant::extract_metadata`] returns `None` on failure
//! - [`LetterAssistant::extract_metadata_from_image`] returns the error
//!
//! Every failure is logged before it is swallowed or returned.

use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use tracing::{debug, error, info, warn};

use super::metadata::{DocumentMetadata, LetterMetadata};
use super::prompts;
use crate::config::GeminiConfig;
use crate::llm::{ContentGenerator, GeminiClient, GenerateContentRequest, LlmError, Part};

/// Returned by `summarize` when the model produced no text.
pub const SUMMARY_EMPTY: &str = "Gagal membuat ringkasan.";

/// Returned by `summarize` when the request failed.
pub const SUMMARY_FAILED: &str = "Terjadi kesalahan saat menghubungi AI.";

/// Letter analysis operations backed by Gemini.
///
/// Holds one shared generator handle. When no API key was configured the
/// handle is absent and every operation fails with
/// [`LlmError::MissingApiKey`] (subject to its own reporting policy).
#[derive(Clone)]
pub struct LetterAssistant {
    generator: Option<Arc<dyn ContentGenerator>>,
}

impl LetterAssistant {
    /// Create an assistant around an existing generator.
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// Create an assistant with no generator; every call reports a missing key.
    pub fn unavailable() -> Self {
        Self { generator: None }
    }

    /// Build the Gemini client from configuration.
    ///
    /// A missing key is not an error here: the assistant is created
    /// unavailable and each operation reports the configuration error.
    pub fn from_config(config: &GeminiConfig) -> Self {
        match GeminiClient::new(config) {
            Ok(client) => Self::new(Arc::new(client)),
            Err(e) => {
                warn!("Gemini client not created: {}", e);
                Self::unavailable()
            }
        }
    }

    /// Whether an API key was configured.
    pub fn is_available(&self) -> bool {
        self.generator.is_some()
    }

    fn generator(&self) -> Result<&dyn ContentGenerator, LlmError> {
        self.generator.as_deref().ok_or(LlmError::MissingApiKey)
    }

    /// Summarize a letter into one Indonesian sentence.
    ///
    /// Never fails: an empty reply yields [`SUMMARY_EMPTY`], any error
    /// yields [`SUMMARY_FAILED`].
    pub async fn summarize(&self, content: &str) -> String {
        match self.request_summary(content).await {
            Ok(Some(summary)) => summary,
            Ok(None) => SUMMARY_EMPTY.to_string(),
            Err(e) => {
                error!("Gemini error: {}", e);
                SUMMARY_FAILED.to_string()
            }
        }
    }

    async fn request_summary(&self, content: &str) -> Result<Option<String>, LlmError> {
        let generator = self.generator()?;
        info!("Summarizing letter ({} chars)", content.chars().count());

        let request = GenerateContentRequest::text(prompts::summary_prompt(content));
        let response = generator.generate(&request).await?;

        Ok(response
            .text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }

    /// Extract number, sender, receiver, title and category from letter text.
    ///
    /// Returns `None` on any failure. An empty reply is treated as `{}`
    /// and yields empty metadata.
    pub async fn extract_metadata(&self, content: &str) -> Option<LetterMetadata> {
        match self.request_metadata(content).await {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                error!("Extraction error: {}", e);
                None
            }
        }
    }

    async fn request_metadata(&self, content: &str) -> Result<LetterMetadata, LlmError> {
        let generator = self.generator()?;
        info!(
            "Extracting letter metadata ({} chars)",
            content.chars().count()
        );

        let request = GenerateContentRequest::text(prompts::metadata_prompt(content))
            .with_json_schema(prompts::metadata_schema());
        let response = generator.generate(&request).await?;

        parse_json_reply(response.text())
    }

    /// Analyze a scanned letter and extract seven fields including a
    /// full transcript.
    ///
    /// `data` is the base64-encoded document. Unlike the text operations,
    /// failures are returned to the caller after being logged.
    pub async fn extract_metadata_from_image(
        &self,
        data: &str,
        mime_type: &str,
    ) -> Result<DocumentMetadata, LlmError> {
        match self.request_document_metadata(data, mime_type).await {
            Ok(metadata) => Ok(metadata),
            Err(e) => {
                error!("AI document analysis error: {}", e);
                Err(e)
            }
        }
    }

    async fn request_document_metadata(
        &self,
        data: &str,
        mime_type: &str,
    ) -> Result<DocumentMetadata, LlmError> {
        let generator = self.generator()?;
        info!(
            "Analyzing document ({}, {} base64 bytes)",
            mime_type,
            data.len()
        );

        let request = GenerateContentRequest::from_parts(vec![
            Part::inline_data(data, mime_type),
            Part::text(prompts::document_prompt()),
        ])
        .with_json_schema(prompts::document_schema());
        let response = generator.generate(&request).await?;

        parse_json_reply(response.text())
    }

    /// Read a document from disk and run [`Self::extract_metadata_from_image`].
    ///
    /// The MIME type is sniffed from the content, falling back to the
    /// file extension.
    pub async fn extract_metadata_from_file(
        &self,
        path: &Path,
    ) -> Result<DocumentMetadata, LlmError> {
        let (data, mime_type) = match encode_document(path).await {
            Ok(encoded) => encoded,
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                return Err(e);
            }
        };
        self.extract_metadata_from_image(&data, &mime_type).await
    }
}

/// Parse a JSON reply, treating a missing or empty reply as `{}`.
///
/// A literal `null` reply is not an object and fails with
/// [`LlmError::Parse`].
fn parse_json_reply<T: serde::de::DeserializeOwned>(text: Option<String>) -> Result<T, LlmError> {
    let raw = text.filter(|t| !t.is_empty());
    let raw = raw.as_deref().unwrap_or("{}");
    debug!("Parsing JSON reply ({} bytes)", raw.len());
    Ok(serde_json::from_str(raw)?)
}

/// Read a file and encode it as base64, returning (base64_data, mime_type).
pub async fn encode_document(path: &Path) -> Result<(String, String), LlmError> {
    let bytes = tokio::fs::read(path).await?;
    let mime_type = detect_mime_type(path, &bytes);
    let data = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok((data, mime_type))
}

/// Detect MIME type from content magic bytes, then from the extension.
pub fn detect_mime_type(path: &Path, bytes: &[u8]) -> String {
    infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| {
            mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::GenerateContentResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    enum Reply {
        Text(&'static str),
        Empty,
        Fail,
    }

    /// Generator that returns a canned reply and records requests.
    struct MockGenerator {
        reply: Reply,
        requests: Mutex<Vec<GenerateContentRequest>>,
    }

    impl MockGenerator {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last_request(&self) -> serde_json::Value {
            let requests = self.requests.lock().unwrap();
            serde_json::to_value(requests.last().unwrap()).unwrap()
        }
    }

    #[async_trait]
    impl ContentGenerator for MockGenerator {
        fn model(&self) -> &str {
            "mock-model"
        }

        async fn generate(
            &self,
            request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            match self.reply {
                Reply::Text(text) => Ok(GenerateContentResponse::from_text(text)),
                Reply::Empty => Ok(GenerateContentResponse::default()),
                Reply::Fail => Err(LlmError::Api {
                    status: 503,
                    message: "model overloaded".to_string(),
                }),
            }
        }
    }

    fn assistant(mock: &Arc<MockGenerator>) -> LetterAssistant {
        LetterAssistant::new(mock.clone())
    }

    /// Shared buffer that collects formatted log output.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    /// Collect events at `level` and above on this thread until the guard
    /// is dropped.
    fn capture_logs(level: tracing::Level) -> (LogBuffer, tracing::subscriber::DefaultGuard) {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(level)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    fn capture_errors() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
        capture_logs(tracing::Level::ERROR)
    }

    #[test]
    fn test_availability() {
        assert!(!LetterAssistant::unavailable().is_available());
        assert!(!LetterAssistant::from_config(&GeminiConfig::default()).is_available());
        assert!(assistant(&MockGenerator::new(Reply::Empty)).is_available());

        let configured = GeminiConfig::default().with_api_key("key");
        assert!(LetterAssistant::from_config(&configured).is_available());
    }

    #[tokio::test]
    async fn test_summarize_trims_reply() {
        let mock = MockGenerator::new(Reply::Text("  Surat ini membahas rapat tahunan.\n"));
        let summary = assistant(&mock).summarize("isi surat").await;
        assert_eq!(summary, "Surat ini membahas rapat tahunan.");

        let request = mock.last_request();
        let prompt = request["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("isi surat"));
        assert!(request.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn test_summarize_empty_reply() {
        let mock = MockGenerator::new(Reply::Empty);
        assert_eq!(assistant(&mock).summarize("x").await, SUMMARY_EMPTY);

        let whitespace = MockGenerator::new(Reply::Text("   "));
        assert_eq!(assistant(&whitespace).summarize("x").await, SUMMARY_EMPTY);
    }

    #[tokio::test]
    async fn test_summarize_failure() {
        let mock = MockGenerator::new(Reply::Fail);
        assert_eq!(assistant(&mock).summarize("x").await, SUMMARY_FAILED);
    }

    #[tokio::test]
    async fn test_summarize_failure_logs_error() {
        let (logs, _guard) = capture_errors();
        let mock = MockGenerator::new(Reply::Fail);
        assert_eq!(assistant(&mock).summarize("x").await, SUMMARY_FAILED);

        let output = logs.contents();
        assert!(output.contains("ERROR"), "no error logged: {}", output);
        assert!(output.contains("model overloaded"), "{}", output);
    }

    #[tokio::test]
    async fn test_successful_summary_logs_no_error() {
        let (logs, _guard) = capture_errors();
        let mock = MockGenerator::new(Reply::Text("Ringkas."));
        assert_eq!(assistant(&mock).summarize("x").await, "Ringkas.");
        assert!(logs.contents().is_empty());
    }

    #[tokio::test]
    async fn test_extract_metadata_failure_logs_error() {
        let (logs, _guard) = capture_errors();
        let mock = MockGenerator::new(Reply::Fail);
        assert_eq!(assistant(&mock).extract_metadata("teks").await, None);

        let output = logs.contents();
        assert!(output.contains("ERROR"), "no error logged: {}", output);
        assert!(output.contains("model overloaded"), "{}", output);
    }

    #[tokio::test]
    async fn test_extract_from_image_failure_logs_error() {
        let (logs, _guard) = capture_errors();
        let mock = MockGenerator::new(Reply::Fail);
        let result = assistant(&mock)
            .extract_metadata_from_image("aGVsbG8=", "image/png")
            .await;
        assert!(result.is_err());

        let output = logs.contents();
        assert!(output.contains("ERROR"), "no error logged: {}", output);
        assert!(output.contains("model overloaded"), "{}", output);
    }

    #[tokio::test]
    async fn test_length_logged_in_chars() {
        let (logs, _guard) = capture_logs(tracing::Level::INFO);
        let content = "Perihal: undangan rapat é hadir ✓";
        assert_eq!(content.chars().count(), 33);
        assert_ne!(content.len(), 33);

        let mock = MockGenerator::new(Reply::Text("Ringkas."));
        assistant(&mock).summarize(content).await;
        let mock = MockGenerator::new(Reply::Text("{}"));
        assistant(&mock).extract_metadata(content).await;

        let output = logs.contents();
        assert!(output.contains("Summarizing letter (33 chars)"), "{}", output);
        assert!(output.contains("Extracting letter metadata (33 chars)"), "{}", output);
        assert!(!output.contains(&format!("({} chars)", content.len())), "{}", output);
    }

    #[tokio::test]
    async fn test_null_reply_is_parse_error() {
        let (logs, _guard) = capture_errors();
        let mock = MockGenerator::new(Reply::Text("null"));
        let err = assistant(&mock)
            .extract_metadata_from_image("aGVsbG8=", "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
        assert!(logs.contents().contains("ERROR"));

        assert_eq!(assistant(&mock).extract_metadata("teks").await, None);
    }

    #[tokio::test]
    async fn test_summarize_without_key() {
        let summary = LetterAssistant::unavailable().summarize("x").await;
        assert_eq!(summary, SUMMARY_FAILED);
    }

    #[tokio::test]
    async fn test_extract_metadata() {
        let mock = MockGenerator::new(Reply::Text(
            r#"{"number":"001","sender":"A","receiver":"B","title":"T","category":"Dinas"}"#,
        ));
        let meta = assistant(&mock).extract_metadata("teks").await.unwrap();

        assert_eq!(
            meta,
            LetterMetadata {
                number: Some("001".to_string()),
                sender: Some("A".to_string()),
                receiver: Some("B".to_string()),
                title: Some("T".to_string()),
                category: Some("Dinas".to_string()),
            }
        );

        let request = mock.last_request();
        let config = &request["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(
            config["responseSchema"]["required"],
            json!(["number", "sender", "receiver", "title", "category"])
        );
    }

    #[tokio::test]
    async fn test_extract_metadata_failure_is_none() {
        let mock = MockGenerator::new(Reply::Fail);
        assert_eq!(assistant(&mock).extract_metadata("teks").await, None);

        assert_eq!(LetterAssistant::unavailable().extract_metadata("teks").await, None);
    }

    #[tokio::test]
    async fn test_extract_metadata_empty_reply_is_empty_mapping() {
        let mock = MockGenerator::new(Reply::Empty);
        let meta = assistant(&mock).extract_metadata("teks").await.unwrap();
        assert!(meta.is_empty());
    }

    #[tokio::test]
    async fn test_extract_metadata_malformed_json_is_none() {
        let mock = MockGenerator::new(Reply::Text("not json"));
        assert_eq!(assistant(&mock).extract_metadata("teks").await, None);
    }

    #[tokio::test]
    async fn test_extract_from_image() {
        let reply = r#"{"number":"12/UND/2024","title":"Undangan Rapat","sender":"Dinas Pendidikan","receiver":"Kepala Sekolah","date":"2024-05-02","category":"Undangan","content":"Dengan hormat, ..."}"#;
        let mock = MockGenerator::new(Reply::Text(reply));
        let doc = assistant(&mock)
            .extract_metadata_from_image("aGVsbG8=", "image/jpeg")
            .await
            .unwrap();

        assert_eq!(doc.date.as_deref(), Some("2024-05-02"));
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            serde_json::from_str::<serde_json::Value>(reply).unwrap()
        );

        let request = mock.last_request();
        let parts = &request["contents"][0]["parts"];
        assert_eq!(
            parts[0],
            json!({"inlineData": {"mimeType": "image/jpeg", "data": "aGVsbG8="}})
        );
        assert!(parts[1]["text"].as_str().unwrap().contains("kearsipan"));

        let schema = &request["generationConfig"]["responseSchema"];
        assert_eq!(schema["properties"].as_object().unwrap().len(), 7);
        assert!(schema.get("required").is_none());
    }

    #[tokio::test]
    async fn test_extract_from_image_empty_reply() {
        let mock = MockGenerator::new(Reply::Empty);
        let doc = assistant(&mock)
            .extract_metadata_from_image("aGVsbG8=", "application/pdf")
            .await
            .unwrap();
        assert!(doc.is_empty());
    }

    #[tokio::test]
    async fn test_extract_from_image_propagates_error() {
        let mock = MockGenerator::new(Reply::Fail);
        let err = assistant(&mock)
            .extract_metadata_from_image("aGVsbG8=", "image/png")
            .await
            .unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "model overloaded");
            }
            other => panic!("unexpected error: {}", other),
        }

        let err = LetterAssistant::unavailable()
            .extract_metadata_from_image("aGVsbG8=", "image/png")
            .await
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_concurrent_calls_share_generator() {
        let mock = MockGenerator::new(Reply::Text("Ringkas."));
        let assistant = assistant(&mock);
        let (a, b) = tokio::join!(assistant.summarize("satu"), assistant.summarize("dua"));
        assert_eq!(a, "Ringkas.");
        assert_eq!(b, "Ringkas.");
        assert_eq!(mock.requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_extract_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surat.png");
        // PNG signature is enough for content sniffing
        std::fs::write(&path, b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR").unwrap();

        let mock = MockGenerator::new(Reply::Text(r#"{"title":"Scan"}"#));
        let doc = assistant(&mock).extract_metadata_from_file(&path).await.unwrap();
        assert_eq!(doc.title.as_deref(), Some("Scan"));

        let request = mock.last_request();
        assert_eq!(
            request["contents"][0]["parts"][0]["inlineData"]["mimeType"],
            "image/png"
        );
    }

    #[tokio::test]
    async fn test_extract_from_missing_file() {
        let mock = MockGenerator::new(Reply::Empty);
        let err = assistant(&mock)
            .extract_metadata_from_file(Path::new("/nonexistent/surat.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Io(_)));
        assert!(mock.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn test_detect_mime_type_falls_back_to_extension() {
        assert_eq!(
            detect_mime_type(Path::new("letter.pdf"), b"no magic here"),
            "application/pdf"
        );
        assert_eq!(
            detect_mime_type(Path::new("letter.unknownext"), b"plain"),
            "application/octet-stream"
        );
    }
}
