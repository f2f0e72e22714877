//! Output file naming.

use crate::iiif::url::archive_segment;

/// Longest sanitized label kept in a file name.
pub const MAX_LABEL_LEN: usize = 64;

/// Turns free text into a file-name-safe token.
///
/// Keeps ASCII alphanumerics, `-` and `_`; everything else becomes `_`.
/// Runs of `_` collapse, leading and trailing `_` are trimmed, and the
/// result is cut to [`MAX_LABEL_LEN`]. Empty results become `fallback`.
pub fn sanitize(text: &str, fallback: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            c
        } else {
            '_'
        };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches('_');
    // ASCII only past this point, so byte slicing is safe
    let truncated = &trimmed[..trimmed.len().min(MAX_LABEL_LEN)];
    let truncated = truncated.trim_end_matches('_');

    if truncated.is_empty() {
        fallback.to_string()
    } else {
        truncated.to_string()
    }
}

pub fn sanitize_label(label: &str) -> String {
    sanitize(label, "page")
}

/// Identifier of an archive, taken from the last path segment of its URL.
pub fn archive_id(archive_url: &str) -> String {
    sanitize(archive_segment(archive_url).unwrap_or(""), "archive")
}

/// File name of one image: `{archive}_{NNNN}_{label}.{extension}`.
pub fn output_file_name(
    archive_id: &str,
    sequence_index: usize,
    label: &str,
    extension: &str,
) -> String {
    format!(
        "{}_{:04}_{}.{}",
        archive_id,
        sequence_index + 1,
        sanitize_label(label),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("Folio 1r"), "Folio_1r");
        assert_eq!(sanitize_label("  p. 3 / verso  "), "p_3_verso");
        assert_eq!(sanitize_label("plate-IV_a"), "plate-IV_a");
        assert_eq!(sanitize_label("Ölgemälde"), "lgem_lde");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_label(""), "page");
        assert_eq!(sanitize_label("???"), "page");
        assert_eq!(sanitize_label("日本"), "page");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "a".repeat(200);
        assert_eq!(sanitize_label(&long).len(), MAX_LABEL_LEN);

        let edge = format!("{} b", "a".repeat(63));
        assert_eq!(sanitize_label(&edge), "a".repeat(63));
    }

    #[test]
    fn test_archive_id() {
        assert_eq!(archive_id("https://archive.test/details/my book/"), "my_book");
        assert_eq!(
            archive_id("https://archive.test/iiif/b123/manifest.json"),
            "b123"
        );
        assert_eq!(archive_id("https://archive.test/"), "archive");
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name("b123", 0, "Folio 1r", "jpg"),
            "b123_0001_Folio_1r.jpg"
        );
        assert_eq!(
            output_file_name("b123", 41, "", "jpg"),
            "b123_0042_page.jpg"
        );
    }
}
