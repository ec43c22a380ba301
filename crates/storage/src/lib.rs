use anyhow::{bail, Context, Result};
use regex::Regex;
use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;

use shared::domain::{Paper, PaperTags};
use shared::protocol::upload_url;

pub mod metadata;

/// Stored in place of an uploaded name that has no ASCII left to keep.
pub const FALLBACK_PDF_NAME: &str = "paper.pdf";

/// Filesystem-backed archive of uploaded exam papers.
///
/// A paper's metadata is carried by its stored filename, see
/// [`encode_filename`]. Nothing else is persisted.
#[derive(Debug, Clone)]
pub struct PaperArchive {
    root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPaper {
    pub stored_filename: String,
    pub tags: PaperTags,
    pub original_name: String,
}

/// Result of [`PaperArchive::store_paper`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreReport {
    pub paper: StoredPaper,
    /// Whether the tags were also written into the PDF's document info.
    pub metadata_stamped: bool,
}

impl StoredPaper {
    pub fn to_paper(&self) -> Paper {
        Paper::from_tags(
            self.tags.clone(),
            self.original_name.clone(),
            upload_url(&self.stored_filename),
        )
    }
}

impl PaperArchive {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("failed to create archive directory '{}'", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn health_check(&self) -> Result<()> {
        let metadata = tokio::fs::metadata(&self.root)
            .await
            .with_context(|| format!("archive directory '{}' is unreadable", self.root.display()))?;
        if !metadata.is_dir() {
            bail!("archive root '{}' is not a directory", self.root.display());
        }
        Ok(())
    }

    /// Writes `bytes` under a filename derived from `tags` and the uploaded
    /// name. An existing paper with the same derived name is replaced. The
    /// tags are stamped into the PDF's document info when it parses; a PDF
    /// that cannot be stamped is stored as uploaded.
    pub async fn store_paper(
        &self,
        tags: &PaperTags,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<StoreReport> {
        if !is_pdf(original_filename) {
            bail!("'{original_filename}' is not a PDF");
        }
        let original_name = stored_original_name(original_filename);
        let stored_filename = encode_filename(tags, &original_name);

        let (owned, stamp_tags) = (bytes.to_vec(), tags.clone());
        let stamped = tokio::task::spawn_blocking(move || {
            metadata::stamp_metadata(&owned, &stamp_tags)
        })
        .await
        .map_err(anyhow::Error::from)
        .and_then(|result| result);
        let (contents, metadata_stamped) = match stamped {
            Ok(contents) => (contents, true),
            Err(error) => {
                warn!(%stored_filename, %error, "could not write PDF metadata; storing file as uploaded");
                (bytes.to_vec(), false)
            }
        };

        let path = self.root.join(&stored_filename);
        tokio::fs::write(&path, &contents)
            .await
            .with_context(|| format!("failed to write '{}'", path.display()))?;

        Ok(StoreReport {
            paper: StoredPaper {
                stored_filename,
                tags: sanitized_tags(tags),
                original_name,
            },
            metadata_stamped,
        })
    }

    /// Lists every stored file whose name decodes as a paper, ordered by
    /// stored filename.
    pub async fn list_papers(&self) -> Result<Vec<StoredPaper>> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .with_context(|| format!("failed to read '{}'", self.root.display()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => debug!(?raw, "skipping non UTF-8 filename"),
            }
        }
        names.sort();

        Ok(names
            .into_iter()
            .filter_map(|name| match decode_filename(&name) {
                Some((tags, original_name)) => Some(StoredPaper {
                    stored_filename: name,
                    tags,
                    original_name,
                }),
                None => {
                    debug!(filename = %name, "skipping file without paper tags");
                    None
                }
            })
            .collect())
    }

    pub async fn load_file(&self, stored_filename: &str) -> Result<Option<Vec<u8>>> {
        if !is_safe_stored_name(stored_filename) {
            bail!("refusing to read '{stored_filename}' outside the archive");
        }
        let path = self.root.join(stored_filename);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("failed to read '{}'", path.display())),
        }
    }
}

pub fn is_pdf(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("pdf"))
}

/// A name that resolves to a direct child of the archive root.
pub fn is_safe_stored_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

/// Keeps alphanumerics, spaces, `_` and `-`, then trims trailing whitespace.
pub fn sanitize_tag(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    kept.trim_end().to_string()
}

/// Reduces an uploaded filename to a flat ASCII name safe to join onto the
/// archive root. Accents fold to their base letter; other non-ASCII text is
/// dropped. May return an empty string.
pub fn secure_filename(filename: &str) -> String {
    let folded: String = filename.nfkd().filter(char::is_ascii).collect();
    let flattened = folded.replace(['/', '\\'], " ");
    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    let ascii: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    ascii.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// The uploaded name as it appears after the tag prefix. Falls back to
/// [`FALLBACK_PDF_NAME`] when securing the name loses its `.pdf` extension,
/// so that every stored upload still decodes when listed.
pub fn stored_original_name(original_filename: &str) -> String {
    let secured = secure_filename(original_filename);
    if is_pdf(&secured) {
        secured
    } else {
        FALLBACK_PDF_NAME.to_string()
    }
}

fn sanitized_tags(tags: &PaperTags) -> PaperTags {
    PaperTags {
        class_name: sanitize_tag(&tags.class_name),
        subject: sanitize_tag(&tags.subject),
        semester: sanitize_tag(&tags.semester),
        year: sanitize_tag(&tags.year),
        exam_type: sanitize_tag(&tags.exam_type),
        medium: sanitize_tag(&tags.medium),
        uploader: sanitize_tag(&tags.uploader),
    }
}

/// `[class]_[subject]_[Sem-semester]_[year]_[exam_type]_[medium]_[uploader]_name.pdf`
pub fn encode_filename(tags: &PaperTags, original_name: &str) -> String {
    let tags = sanitized_tags(tags);
    let semester = format!("Sem-{}", tags.semester);
    let prefix = [
        tags.class_name.as_str(),
        tags.subject.as_str(),
        semester.as_str(),
        tags.year.as_str(),
        tags.exam_type.as_str(),
        tags.medium.as_str(),
        tags.uploader.as_str(),
    ]
    .iter()
    .map(|tag| format!("[{tag}]"))
    .collect::<Vec<_>>()
    .join("_");
    format!("{prefix}_{original_name}")
}

fn filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^\[(.*?)\]_\[(.*?)\]_\[(.*?)\]_\[(.*?)\]_\[(.*?)\]_\[(.*?)\]_\[(.*?)\]_(.*\.pdf)",
        )
        .expect("paper filename pattern is valid")
    })
}

pub fn decode_filename(stored_filename: &str) -> Option<(PaperTags, String)> {
    let captures = filename_pattern().captures(stored_filename)?;
    let group = |index: usize| captures.get(index).map_or("", |m| m.as_str()).to_string();
    let tags = PaperTags {
        class_name: group(1),
        subject: group(2),
        semester: group(3).replace("Sem-", ""),
        year: group(4),
        exam_type: group(5),
        medium: group(6),
        uploader: group(7),
    };
    Some((tags, group(8)))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
