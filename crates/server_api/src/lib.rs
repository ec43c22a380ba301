use shared::{
    domain::Paper,
    error::{ApiError, ErrorCode},
    protocol::{upload_url, UploadForm, UploadReceipt},
};
use storage::{is_pdf, is_safe_stored_name, PaperArchive};
use tracing::info;

pub const MISSING_FORM_DATA: &str = "Missing form data.";
pub const EMPTY_FORM_FIELDS: &str = "All fields are required.";
pub const NOT_A_PDF: &str = "Invalid file type. Only PDFs are allowed.";

#[derive(Clone)]
pub struct ApiContext {
    pub archive: PaperArchive,
}

/// A file part pulled out of an upload request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub async fn list_papers(ctx: &ApiContext) -> Result<Vec<Paper>, ApiError> {
    let stored = ctx.archive.list_papers().await.map_err(internal)?;
    Ok(stored.iter().map(|paper| paper.to_paper()).collect())
}

/// Validates and stores one upload. `file` is `None` when the request had no
/// file part at all.
pub async fn store_upload(
    ctx: &ApiContext,
    form: &UploadForm,
    file: Option<&UploadedFile>,
) -> Result<UploadReceipt, ApiError> {
    let Some(file) = file else {
        return Err(ApiError::validation(MISSING_FORM_DATA));
    };
    if file.filename.is_empty() || form.fields().iter().any(|(_, value)| value.is_empty()) {
        return Err(ApiError::validation(EMPTY_FORM_FIELDS));
    }
    if !is_pdf(&file.filename) {
        return Err(ApiError::validation(NOT_A_PDF));
    }

    let report = ctx
        .archive
        .store_paper(&form.to_tags(), &file.filename, &file.bytes)
        .await
        .map_err(internal)?;
    let stored = report.paper;
    info!(
        stored_filename = %stored.stored_filename,
        uploader = %stored.tags.uploader,
        size_bytes = file.bytes.len(),
        metadata_stamped = report.metadata_stamped,
        "stored uploaded paper"
    );

    Ok(UploadReceipt {
        url: upload_url(&stored.stored_filename),
        stored_filename: stored.stored_filename,
        size_bytes: file.bytes.len() as u64,
        metadata_stamped: report.metadata_stamped,
    })
}

pub async fn load_upload(ctx: &ApiContext, stored_filename: &str) -> Result<Vec<u8>, ApiError> {
    if !is_safe_stored_name(stored_filename) {
        return Err(ApiError::validation("filename must not contain path separators"));
    }
    ctx.archive
        .load_file(stored_filename)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::new(ErrorCode::NotFound, "file not found"))
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::internal(err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
