//! The two manifest shapes we understand.
//!
//! Presentation API 2 manifests nest canvases under `sequences[0].canvases`
//! and reference the image service from `images[0].resource.service`.
//! Presentation API 3 manifests list canvases directly under `items` and
//! reach the service through `items[0].items[0].body.service`, which may be
//! an object or an array.

use serde_json::Value;

/// Canvas container found in a manifest document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManifestSchema<'a> {
    /// `sequences[0].canvases[*]`
    Sequences(&'a [Value]),
    /// `items[*]`
    Items(&'a [Value]),
}

impl<'a> ManifestSchema<'a> {
    /// Picks the non-empty container, preferring `sequences`.
    ///
    /// Returns `None` when neither shape has any canvas.
    pub fn detect(document: &'a Value) -> Option<Self> {
        let sequences = document
            .get("sequences")
            .and_then(|s| s.get(0))
            .and_then(|s| s.get("canvases"))
            .and_then(Value::as_array)
            .filter(|c| !c.is_empty());

        if let Some(canvases) = sequences {
            return Some(ManifestSchema::Sequences(canvases));
        }

        document
            .get("items")
            .and_then(Value::as_array)
            .filter(|c| !c.is_empty())
            .map(|c| ManifestSchema::Items(c))
    }

    pub fn canvases(&self) -> &'a [Value] {
        match self {
            ManifestSchema::Sequences(c) | ManifestSchema::Items(c) => c,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ManifestSchema::Sequences(_) => "sequences",
            ManifestSchema::Items(_) => "items",
        }
    }

    /// Raw image-service identifier of one canvas, if present.
    pub fn service_id(&self, canvas: &'a Value) -> Option<&'a str> {
        let service = match self {
            ManifestSchema::Sequences(_) => canvas
                .get("images")?
                .get(0)?
                .get("resource")?
                .get("service")?,
            ManifestSchema::Items(_) => canvas
                .get("items")?
                .get(0)?
                .get("items")?
                .get(0)?
                .get("body")?
                .get("service")?,
        };

        let service = match service {
            Value::Array(entries) => entries.first()?,
            other => other,
        };

        ["@id", "id"]
            .iter()
            .filter_map(|key| service.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|id| !id.is_empty())
    }
}

/// Extracts a display label from a `label` value.
///
/// Accepts a plain string, a `{"@value": ...}` object, a language map
/// (first value of the first language) or an array of any of these.
pub fn label_text(label: &Value) -> Option<String> {
    let text = match label {
        Value::String(s) => Some(s.clone()),
        Value::Array(values) => values.iter().find_map(label_text),
        Value::Object(map) => match map.get("@value") {
            Some(value) => label_text(value),
            None => map.values().find_map(label_text),
        },
        _ => None,
    }?;

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_prefers_sequences() {
        let doc = json!({
            "sequences": [{ "canvases": [{ "label": "v2" }] }],
            "items": [{ "label": "v3" }]
        });
        let schema = ManifestSchema::detect(&doc).unwrap();
        assert_eq!(schema.name(), "sequences");
        assert_eq!(schema.canvases().len(), 1);
    }

    #[test]
    fn test_detect_falls_back_to_items_when_sequences_empty() {
        let doc = json!({
            "sequences": [{ "canvases": [] }],
            "items": [{ "label": "v3" }]
        });
        assert_eq!(ManifestSchema::detect(&doc).unwrap().name(), "items");
    }

    #[test]
    fn test_detect_empty() {
        assert!(ManifestSchema::detect(&json!({})).is_none());
        assert!(ManifestSchema::detect(&json!({ "items": [] })).is_none());
    }

    #[test]
    fn test_service_id_v2() {
        let doc = json!({ "sequences": [{ "canvases": [{
            "images": [{ "resource": { "service": { "@id": "https://iiif.test/p1" } } }]
        }] }] });
        let schema = ManifestSchema::detect(&doc).unwrap();
        assert_eq!(
            schema.service_id(&schema.canvases()[0]),
            Some("https://iiif.test/p1")
        );
    }

    #[test]
    fn test_service_id_v3_array_with_plain_id() {
        let doc = json!({ "items": [{
            "items": [{ "items": [{ "body": {
                "service": [{ "id": "https://iiif.test/p2", "type": "ImageService3" }]
            } }] }]
        }] });
        let schema = ManifestSchema::detect(&doc).unwrap();
        assert_eq!(
            schema.service_id(&schema.canvases()[0]),
            Some("https://iiif.test/p2")
        );
    }

    #[test]
    fn test_service_id_missing() {
        let doc = json!({ "items": [{ "items": [{ "items": [{ "body": {} }] }] }] });
        let schema = ManifestSchema::detect(&doc).unwrap();
        assert_eq!(schema.service_id(&schema.canvases()[0]), None);
    }

    #[test]
    fn test_label_shapes() {
        assert_eq!(label_text(&json!("Folio 1r")), Some("Folio 1r".into()));
        assert_eq!(
            label_text(&json!({ "@value": "Folio 2", "@language": "en" })),
            Some("Folio 2".into())
        );
        assert_eq!(
            label_text(&json!({ "none": ["p. 3"], "en": ["page 3"] })),
            Some("p. 3".into())
        );
        assert_eq!(
            label_text(&json!([{ "@value": "Plate IV" }])),
            Some("Plate IV".into())
        );
        assert_eq!(label_text(&json!("   ")), None);
        assert_eq!(label_text(&json!(42)), None);
    }
}
