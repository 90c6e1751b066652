//! Document list view logic: the list view model, filtering, and status
//! rendering.

use crate::api::{self, ApiClient};
use crate::types::{Document, DocumentStatus, Result, ViewState};

/// The document list view model: fetched documents plus a search query,
/// with an explicit [`ViewState`] driving rendering.
#[derive(Default)]
pub struct DocumentList {
    state: ViewState<Vec<Document>>,
    query: String,
}

impl DocumentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState<Vec<Document>> {
        &self.state
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Fetches the document list, moving through `Loading` into `Loaded` or
    /// `Failed`.
    pub async fn refresh(&mut self, client: &ApiClient) -> Result<()> {
        self.state = ViewState::Loading;
        let result = api::documents::list(client).await;
        self.apply(result)
    }

    /// Applies a fetch result. Split out from [`refresh`](Self::refresh) so
    /// state transitions are testable without a server.
    pub fn apply(&mut self, result: Result<Vec<Document>>) -> Result<()> {
        match result {
            Ok(docs) => {
                self.state = ViewState::Loaded(docs);
                Ok(())
            }
            Err(e) => {
                self.state = ViewState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Documents matching the current query, in server order.
    pub fn visible(&self) -> Vec<&Document> {
        match &self.state {
            ViewState::Loaded(docs) => filter(docs, &self.query),
            _ => Vec::new(),
        }
    }

    /// Drops a document from the loaded list after a successful delete.
    pub fn remove(&mut self, id: i64) {
        if let ViewState::Loaded(docs) = &mut self.state {
            docs.retain(|doc| doc.id != id);
        }
    }
}

/// Case-insensitive substring filter over title, description, and file name.
/// An empty or whitespace-only query matches everything.
pub fn filter<'a>(documents: &'a [Document], query: &str) -> Vec<&'a Document> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return documents.iter().collect();
    }
    documents
        .iter()
        .filter(|doc| {
            doc.title.to_lowercase().contains(&needle)
                || doc.description.to_lowercase().contains(&needle)
                || doc.file_name.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Human-readable label for a status.
pub fn status_label(status: DocumentStatus) -> &'static str {
    match status {
        DocumentStatus::Processing => "processing",
        DocumentStatus::Indexed => "indexed",
        DocumentStatus::Error => "error",
        DocumentStatus::Deleted => "deleted",
    }
}

/// Terminal glyph for a status, the icon-per-status of the original list view.
pub fn status_glyph(status: DocumentStatus) -> &'static str {
    match status {
        DocumentStatus::Processing => "…",
        DocumentStatus::Indexed => "✓",
        DocumentStatus::Error => "✗",
        DocumentStatus::Deleted => "–",
    }
}

/// `123456` → `"120.6 KB"`. Matches the original list view's rendering.
pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let bytes = bytes as f64;
    if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{} B", bytes as u64)
    }
}
