//! Document and collection endpoints.

use crate::api::ApiClient;
use crate::types::{
    AppError, Collection, CollectionCreate, Document, DocumentUpdate, Result,
};
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};

/// Fields accompanying a document upload.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub title: String,
    pub description: Option<String>,
    pub collection_id: Option<i64>,
    pub files: Vec<PathBuf>,
}

pub async fn list(client: &ApiClient) -> Result<Vec<Document>> {
    client.get("/documents").await
}

pub async fn get(client: &ApiClient, id: i64) -> Result<Document> {
    client.get(&format!("/documents/{}", id)).await
}

/// Uploads one or more files as a new document via multipart form post.
///
/// Selecting zero files is a validation error caught here, before any
/// request goes out.
pub async fn upload(client: &ApiClient, upload: &DocumentUpload) -> Result<Document> {
    if upload.files.is_empty() {
        return Err(AppError::Validation(
            "select at least one file to upload".to_string(),
        ));
    }
    if upload.title.trim().is_empty() {
        return Err(AppError::Validation("a title is required".to_string()));
    }

    let mut form = Form::new().text("title", upload.title.clone());
    if let Some(description) = &upload.description {
        form = form.text("description", description.clone());
    }
    if let Some(collection_id) = upload.collection_id {
        form = form.text("collection_id", collection_id.to_string());
    }
    for path in &upload.files {
        form = form.part("files", file_part(path).await?);
    }

    client.post_multipart("/documents", form).await
}

async fn file_part(path: &Path) -> Result<Part> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Part::bytes(bytes).file_name(name))
}

pub async fn update(client: &ApiClient, id: i64, update: &DocumentUpdate) -> Result<Document> {
    client.put_json(&format!("/documents/{}", id), update).await
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&format!("/documents/{}", id)).await
}

// ============= Collections =============

pub async fn list_collections(client: &ApiClient) -> Result<Vec<Collection>> {
    client.get("/collections").await
}

pub async fn get_collection(client: &ApiClient, id: i64) -> Result<Collection> {
    client.get(&format!("/collections/{}", id)).await
}

pub async fn create_collection(
    client: &ApiClient,
    create: &CollectionCreate,
) -> Result<Collection> {
    client.post_json("/collections", create).await
}

pub async fn update_collection(
    client: &ApiClient,
    id: i64,
    update: &CollectionCreate,
) -> Result<Collection> {
    client.put_json(&format!("/collections/{}", id), update).await
}

pub async fn delete_collection(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&format!("/collections/{}", id)).await
}
