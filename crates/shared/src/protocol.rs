use serde::{Deserialize, Serialize};

use crate::domain::PaperTags;

pub const PAPERS_ROUTE: &str = "/api/papers";
pub const UPLOADS_ROUTE: &str = "/uploads";
pub const ADMIN_ROUTE: &str = "/admin";
pub const UPLOAD_ROUTE: &str = "/upload";
pub const HEALTHZ_ROUTE: &str = "/healthz";

/// Multipart field names accepted by the upload endpoint, in tag order.
pub const UPLOAD_TEXT_FIELDS: [&str; 7] = [
    "admin_name",
    "class",
    "subject",
    "semester",
    "exam_year",
    "exam_type",
    "medium",
];
pub const UPLOAD_FILE_FIELD: &str = "file";

/// Public path under which a stored paper is served. The name is
/// percent-encoded as a single path segment.
pub fn upload_url(stored_filename: &str) -> String {
    format!("{UPLOADS_ROUTE}/{}", urlencoding::encode(stored_filename))
}

/// Text fields of an upload form, as the admin typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadForm {
    pub admin_name: String,
    pub class_name: String,
    pub subject: String,
    pub semester: String,
    pub exam_year: String,
    pub exam_type: String,
    pub medium: String,
}

impl UploadForm {
    /// Assigns a multipart text field by its wire name. Returns `false` for
    /// names the form does not know.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "admin_name" => &mut self.admin_name,
            "class" => &mut self.class_name,
            "subject" => &mut self.subject,
            "semester" => &mut self.semester,
            "exam_year" => &mut self.exam_year,
            "exam_type" => &mut self.exam_type,
            "medium" => &mut self.medium,
            _ => return false,
        };
        *slot = value;
        true
    }

    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("admin_name", &self.admin_name),
            ("class", &self.class_name),
            ("subject", &self.subject),
            ("semester", &self.semester),
            ("exam_year", &self.exam_year),
            ("exam_type", &self.exam_type),
            ("medium", &self.medium),
        ]
    }

    pub fn to_tags(&self) -> PaperTags {
        PaperTags {
            class_name: self.class_name.clone(),
            subject: self.subject.clone(),
            semester: self.semester.clone(),
            year: self.exam_year.clone(),
            exam_type: self.exam_type.clone(),
            medium: self.medium.clone(),
            uploader: self.admin_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub stored_filename: String,
    pub url: String,
    pub size_bytes: u64,
    /// Whether the tags were also written into the PDF's document info.
    #[serde(default)]
    pub metadata_stamped: bool,
}
