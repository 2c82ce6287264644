use std::collections::HashMap;
use std::sync::Mutex;

/// The PDF/text extraction collaborator. Returns `None` when the document
/// exists but yields no text (scanned image, empty file); that is an
/// informational zero-reminders outcome upstream, not an error.
#[async_trait::async_trait]
pub trait ITextExtractor: Send + Sync {
    async fn extract_text(&self, document_ref: &str) -> anyhow::Result<Option<String>>;
}

/// Serves canned documents. Stands in for the real extraction service in
/// tests and local runs.
pub struct StubTextExtractor {
    documents: Mutex<HashMap<String, String>>,
}

impl StubTextExtractor {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert_document(&self, document_ref: &str, text: &str) {
        let mut documents = self.documents.lock().unwrap();
        documents.insert(document_ref.to_string(), text.to_string());
    }
}

impl Default for StubTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ITextExtractor for StubTextExtractor {
    async fn extract_text(&self, document_ref: &str) -> anyhow::Result<Option<String>> {
        let documents = self.documents.lock().unwrap();
        Ok(documents.get(document_ref).cloned())
    }
}
