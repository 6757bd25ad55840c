//! Client-side file validation, gating an upload action.

use std::path::Path;

use anyhow::{Context, Result};

use crate::util::format_bytes;

use super::kinds::KindRules;

/// A file the user picked for upload: name, browser-style declared MIME
/// type (when known), and contents.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub filename: String,
    pub declared_mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(filename: impl Into<String>, declared_mime: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            declared_mime,
            bytes,
        }
    }

    /// Load a file from disk, deriving the declared type from the
    /// extension the way a browser would.
    pub async fn read(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let declared_mime = mime_from_extension(&filename);
        Ok(Self {
            filename,
            declared_mime,
            bytes,
        })
    }

    /// Magic-byte detection, used when no declared type is available.
    #[must_use]
    pub fn sniffed_mime(&self) -> Option<String> {
        infer::get(&self.bytes).map(|info| info.mime_type().to_string())
    }

    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Outcome of client-side validation. `over_limit` is a soft flag: the
/// upload may still be attempted, the user is just warned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionReport {
    pub accepted: bool,
    pub over_limit: bool,
    pub reason: Option<String>,
}

/// Check a selected file against one kind's rules. Rejected only when the
/// declared MIME type and the filename extension both fail the allow-list
/// (magic-byte sniffing stands in for a missing declared type). Size is
/// never grounds for rejection, only for the `over_limit` flag.
#[must_use]
pub fn validate_selection(file: &SelectedFile, rules: &KindRules) -> SelectionReport {
    if file.filename.is_empty() {
        return SelectionReport {
            accepted: false,
            over_limit: false,
            reason: Some("no file selected".into()),
        };
    }

    let declared = file
        .declared_mime
        .clone()
        .or_else(|| file.sniffed_mime())
        .and_then(|raw| raw.parse::<mime::Mime>().ok());
    let mime_ok = declared
        .as_ref()
        .is_some_and(|m| rules.mime_types.iter().any(|t| t == m.essence_str()));

    let name_lower = file.filename.to_lowercase();
    let ext_ok = rules.extensions.iter().any(|ext| name_lower.ends_with(ext));

    if !mime_ok && !ext_ok {
        return SelectionReport {
            accepted: false,
            over_limit: false,
            reason: Some(format!("unsupported file type: {}", file.filename)),
        };
    }

    let over_limit = file.size_bytes() > rules.soft_max_bytes;
    let reason = over_limit.then(|| {
        format!(
            "{} exceeds the recommended limit of {} ({})",
            file.filename,
            format_bytes(rules.soft_max_bytes),
            format_bytes(file.size_bytes()),
        )
    });

    SelectionReport {
        accepted: true,
        over_limit,
        reason,
    }
}

/// Extension-based MIME lookup for the types this tool traffics in.
#[must_use]
pub fn mime_from_extension(filename: &str) -> Option<String> {
    let ext = filename.rsplit('.').next()?;
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg".into()),
        "png" => Some("image/png".into()),
        "mp3" => Some("audio/mpeg".into()),
        "pdf" => Some("application/pdf".into()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::kinds::{AssetKind, KindRules};

    const MB: usize = 1024 * 1024;

    fn pdf_rules() -> KindRules {
        KindRules::defaults_for(AssetKind::Pdf)
    }

    #[test]
    fn oversized_pdf_is_accepted_but_flagged() {
        let file = SelectedFile::new(
            "report.pdf",
            Some("application/pdf".into()),
            vec![0_u8; 11 * MB],
        );
        let report = validate_selection(&file, &pdf_rules());
        assert!(report.accepted);
        assert!(report.over_limit);
        assert!(report.reason.as_deref().unwrap().contains("10 MB"));
    }

    #[test]
    fn within_limit_pdf_is_clean() {
        let file = SelectedFile::new("a.pdf", Some("application/pdf".into()), vec![0_u8; 1024]);
        let report = validate_selection(&file, &pdf_rules());
        assert!(report.accepted);
        assert!(!report.over_limit);
        assert!(report.reason.is_none());
    }

    #[test]
    fn wrong_type_and_extension_rejects() {
        let file = SelectedFile::new("notes.txt", Some("text/plain".into()), b"hello".to_vec());
        let report = validate_selection(&file, &pdf_rules());
        assert!(!report.accepted);
        assert!(report.reason.as_deref().unwrap().contains("notes.txt"));
    }

    #[test]
    fn matching_extension_alone_is_enough() {
        // Browsers sometimes report an empty or generic type.
        let file = SelectedFile::new("scan.pdf", None, b"%FAKE".to_vec());
        let report = validate_selection(&file, &pdf_rules());
        assert!(report.accepted);
    }

    #[test]
    fn matching_declared_type_alone_is_enough() {
        let file = SelectedFile::new(
            "download",
            Some("application/pdf".into()),
            b"%PDF-1.7".to_vec(),
        );
        let report = validate_selection(&file, &pdf_rules());
        assert!(report.accepted);
    }

    #[test]
    fn sniffing_backs_up_a_missing_declared_type() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        let file = SelectedFile::new("picture", None, png.to_vec());
        let rules = KindRules::defaults_for(AssetKind::Image);
        let report = validate_selection(&file, &rules);
        assert!(report.accepted);
    }

    #[test]
    fn declared_type_with_parameters_still_matches() {
        let file = SelectedFile::new(
            "a.pdf",
            Some("application/pdf; charset=binary".into()),
            vec![1, 2, 3],
        );
        assert!(validate_selection(&file, &pdf_rules()).accepted);
    }

    #[test]
    fn empty_filename_rejects() {
        let file = SelectedFile::new("", None, vec![1]);
        let report = validate_selection(&file, &pdf_rules());
        assert!(!report.accepted);
    }

    #[test]
    fn extension_lookup_covers_the_known_types() {
        assert_eq!(
            mime_from_extension("photo.JPG").as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(
            mime_from_extension("voice.mp3").as_deref(),
            Some("audio/mpeg")
        );
        assert_eq!(mime_from_extension("report.pdf").as_deref(), Some("application/pdf"));
        assert!(mime_from_extension("archive.zip").is_none());
    }
}
