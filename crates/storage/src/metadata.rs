//! Document info stamping for stored PDFs.

use anyhow::{bail, Result};
use lopdf::{Dictionary, Document, Object, StringFormat};
use shared::domain::PaperTags;

/// Rewrites the document info dictionary of `pdf` with the paper's tags and
/// returns the re-serialised file. Existing info entries other than the four
/// written here are kept.
pub fn stamp_metadata(pdf: &[u8], tags: &PaperTags) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(pdf)?;
    if doc.is_encrypted() {
        bail!("encrypted PDFs are stored untouched");
    }

    let mut info = doc
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
        .cloned()
        .unwrap_or_else(|_| Dictionary::new());
    info.set("Author", text_object(&tags.uploader));
    info.set(
        "Title",
        text_object(&format!(
            "{} - {} (Semester {})",
            tags.class_name, tags.subject, tags.semester
        )),
    );
    info.set("Subject", text_object(&tags.subject));
    info.set(
        "Keywords",
        text_object(&format!(
            "{}, {}, Semester {}, {}, {}",
            tags.class_name, tags.year, tags.semester, tags.exam_type, tags.medium
        )),
    );

    let info_id = doc.add_object(info);
    doc.trailer.set("Info", info_id);

    let mut out = Vec::with_capacity(pdf.len());
    doc.save_to(&mut out)?;
    Ok(out)
}

/// PDF text string: a literal for ASCII, UTF-16BE with a byte order mark
/// otherwise.
pub fn text_object(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, StringFormat::Hexadecimal)
}
