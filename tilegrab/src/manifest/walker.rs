//! Manifest retrieval and flattening.

use super::schema::{label_text, ManifestSchema};
use super::types::{ImageDescriptor, ManifestError, ParsedManifest, SkipReason, SkippedEntry};
use crate::iiif::url::{manifest_url, normalize_service_url};
use crate::iiif::{AsyncHttpClient, FetchError};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fetches an archive's manifest and flattens it into an ordered list of
/// [`ImageDescriptor`]s.
///
/// Entries without an image-service reference are dropped individually
/// with a warning; a manifest that cannot be fetched or parsed fails the
/// whole run.
pub struct ManifestWalker<C: AsyncHttpClient> {
    client: Arc<C>,
    request_timeout: Duration,
}

impl<C: AsyncHttpClient> ManifestWalker<C> {
    pub fn new(client: Arc<C>, request_timeout: Duration) -> Self {
        Self {
            client,
            request_timeout,
        }
    }

    /// Fetches `{archive_url}/manifest.json` and parses it.
    pub async fn fetch(&self, archive_url: &str) -> Result<ParsedManifest, ManifestError> {
        let url = manifest_url(archive_url);
        debug!(url = %url, "Fetching manifest");

        let body = match tokio::time::timeout(self.request_timeout, self.client.get(&url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.request_timeout)),
        }
        .map_err(|source| ManifestError::Fetch {
            url: url.clone(),
            source,
        })?;

        let document: Value =
            serde_json::from_slice(&body).map_err(|e| ManifestError::Json {
                url: url.clone(),
                message: e.to_string(),
            })?;

        if !document.is_object() {
            return Err(ManifestError::NotAnObject { url });
        }

        let parsed = Self::parse(&document);
        info!(
            url = %url,
            images = parsed.images.len(),
            skipped = parsed.skipped.len(),
            "Manifest parsed"
        );
        Ok(parsed)
    }

    /// Flattens a manifest document. Never fails; an unrecognised or empty
    /// document yields an empty manifest.
    pub fn parse(document: &Value) -> ParsedManifest {
        let Some(schema) = ManifestSchema::detect(document) else {
            warn!("Manifest has no canvases");
            return ParsedManifest::default();
        };

        debug!(
            schema = schema.name(),
            canvases = schema.canvases().len(),
            "Manifest schema detected"
        );

        let mut parsed = ParsedManifest::default();

        for (sequence_index, canvas) in schema.canvases().iter().enumerate() {
            let label = canvas
                .get("label")
                .and_then(label_text)
                .unwrap_or_else(|| format!("page-{}", sequence_index + 1));

            match schema.service_id(canvas) {
                Some(raw) => parsed.images.push(ImageDescriptor {
                    service_base_url: normalize_service_url(raw),
                    label,
                    sequence_index,
                }),
                None => {
                    warn!(
                        sequence_index = sequence_index,
                        label = %label,
                        "Manifest entry has no image service, skipping"
                    );
                    parsed.skipped.push(SkippedEntry {
                        sequence_index,
                        label,
                        reason: SkipReason::MissingService,
                    });
                }
            }
        }

        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iiif::MockHttpClient;
    use serde_json::json;

    type Walker = ManifestWalker<MockHttpClient>;

    #[test]
    fn test_parse_v2_manifest() {
        let doc = json!({ "sequences": [{ "canvases": [
            {
                "label": "Folio 1r",
                "images": [{ "resource": { "service": { "@id": "https://iiif.test/p1/" } } }]
            },
            {
                "images": [{ "resource": { "service": { "@id": "https://iiif.test/p2/info.json" } } }]
            }
        ] }] });

        let parsed = Walker::parse(&doc);

        assert_eq!(
            parsed.images,
            vec![
                ImageDescriptor {
                    service_base_url: "https://iiif.test/p1".into(),
                    label: "Folio 1r".into(),
                    sequence_index: 0,
                },
                ImageDescriptor {
                    service_base_url: "https://iiif.test/p2".into(),
                    label: "page-2".into(),
                    sequence_index: 1,
                },
            ]
        );
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_parse_v3_manifest() {
        let doc = json!({ "items": [{
            "label": { "en": ["Plate 1"] },
            "items": [{ "items": [{ "body": {
                "service": [{ "id": "https://iiif.test/v3/p1", "type": "ImageService3" }]
            } }] }]
        }] });

        let parsed = Walker::parse(&doc);

        assert_eq!(parsed.images.len(), 1);
        assert_eq!(parsed.images[0].label, "Plate 1");
        assert_eq!(parsed.images[0].service_base_url, "https://iiif.test/v3/p1");
    }

    #[test]
    fn test_missing_service_is_skipped_and_indices_kept() {
        let doc = json!({ "items": [
            { "label": "no service", "items": [] },
            { "items": [{ "items": [{ "body": { "service": { "@id": "https://iiif.test/p2" } } }] }] }
        ] });

        let parsed = Walker::parse(&doc);

        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].sequence_index, 0);
        assert_eq!(parsed.skipped[0].label, "no service");
        assert_eq!(parsed.images[0].sequence_index, 1);
    }

    #[test]
    fn test_empty_manifest_is_not_an_error() {
        let parsed = Walker::parse(&json!({ "sequences": [], "items": [] }));
        assert!(parsed.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_appends_manifest_suffix() {
        let mock = Arc::new(MockHttpClient::new());
        mock.route(
            "https://archive.test/details/book/manifest.json",
            br#"{"items": []}"#.to_vec(),
        );
        let walker = ManifestWalker::new(Arc::clone(&mock), Duration::from_secs(5));

        let parsed = walker.fetch("https://archive.test/details/book/").await.unwrap();

        assert!(parsed.is_empty());
        assert_eq!(
            mock.requests(),
            vec!["https://archive.test/details/book/manifest.json".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_fatal() {
        let mock = Arc::new(MockHttpClient::new());
        let walker = ManifestWalker::new(Arc::clone(&mock), Duration::from_secs(5));

        let err = walker.fetch("https://archive.test/missing").await.unwrap_err();
        assert!(matches!(
            err,
            ManifestError::Fetch {
                source: FetchError::Status { status: 404, .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_invalid_json_is_fatal() {
        let mock = Arc::new(MockHttpClient::new());
        mock.route("https://archive.test/a/manifest.json", b"<html>".to_vec());
        let walker = ManifestWalker::new(Arc::clone(&mock), Duration::from_secs(5));

        let err = walker.fetch("https://archive.test/a").await.unwrap_err();
        assert!(matches!(err, ManifestError::Json { .. }));
    }

    #[tokio::test]
    async fn test_non_object_is_fatal() {
        let mock = Arc::new(MockHttpClient::new());
        mock.route("https://archive.test/a/manifest.json", b"[1, 2]".to_vec());
        let walker = ManifestWalker::new(Arc::clone(&mock), Duration::from_secs(5));

        let err = walker.fetch("https://archive.test/a").await.unwrap_err();
        assert!(matches!(err, ManifestError::NotAnObject { .. }));
    }
}
