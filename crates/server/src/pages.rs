//! Server-rendered HTML for the admin upload flow.

use shared::protocol::{UploadReceipt, ADMIN_ROUTE, UPLOAD_ROUTE};

const STYLE: &str = "body { font-family: sans-serif; background-color: #1a1a1a; color: #e0e0e0; padding: 40px; } \
h1 { color: #4CAF50; } p { color: #bbb; } label { display: block; margin-top: 12px; } \
input { background: #222; color: #e0e0e0; border: 1px solid #444; padding: 6px; width: 320px; } \
a, button { display: inline-block; margin-top: 20px; padding: 10px 15px; background-color: #4CAF50; \
color: white; text-decoration: none; border: none; border-radius: 4px; }";

const FORM_FIELDS: [(&str, &str); 7] = [
    ("admin_name", "Your name"),
    ("class", "Class"),
    ("subject", "Subject"),
    ("semester", "Semester"),
    ("exam_year", "Exam year"),
    ("exam_type", "Exam type"),
    ("medium", "Medium"),
];

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{}</title><style>{STYLE}</style></head><body>{body}</body></html>",
        escape(title)
    )
}

pub fn upload_form() -> String {
    let inputs: String = FORM_FIELDS
        .iter()
        .map(|(name, label)| {
            format!("<label>{label}<br><input type=\"text\" name=\"{name}\" required></label>")
        })
        .collect();
    page(
        "Upload paper",
        &format!(
            "<h1>Upload a paper</h1>\
             <form action=\"{UPLOAD_ROUTE}\" method=\"post\" enctype=\"multipart/form-data\">\
             {inputs}<label>PDF file<br><input type=\"file\" name=\"file\" accept=\".pdf\" required></label>\
             <button type=\"submit\">Upload</button></form>"
        ),
    )
}

pub fn upload_succeeded(receipt: &UploadReceipt) -> String {
    page(
        "Upload complete",
        &format!(
            "<h1>File Uploaded Successfully!</h1>\
             <p><strong>Saved as:</strong> {}</p>{}\
             <a href=\"{ADMIN_ROUTE}\">Upload another paper</a>",
            escape(&receipt.stored_filename),
            if receipt.metadata_stamped {
                "<p>Metadata has been written directly into the PDF properties.</p>"
            } else {
                ""
            }
        ),
    )
}

pub fn upload_failed(message: &str) -> String {
    page(
        "Upload failed",
        &format!(
            "<h1>{} <a href=\"{ADMIN_ROUTE}\">Please try again.</a></h1>",
            escape(message)
        ),
    )
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_posts_every_field_as_multipart() {
        let html = upload_form();
        assert!(html.contains("enctype=\"multipart/form-data\""));
        for (name, _) in FORM_FIELDS {
            assert!(html.contains(&format!("name=\"{name}\"")), "missing {name}");
        }
        assert!(html.contains("name=\"file\""));

        let names: Vec<_> = FORM_FIELDS.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, shared::protocol::UPLOAD_TEXT_FIELDS);
    }

    #[test]
    fn error_page_escapes_message() {
        let html = upload_failed("<script>");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
