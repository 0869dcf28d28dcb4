//! Downloadable cells.
//!
//! A downloadable cell is first turned into a [`DownloadDescriptor`]; the
//! configured [`DownloadDelivery`] then decides whether the bytes are inlined
//! into the page or fetched from a separate endpoint.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::config::DownloadDelivery;
use crate::error::TableError;
use crate::markup::{Markup, escape};

const JSON_CONTENT_TYPE: &str = "application/json";
const BINARY_CONTENT_TYPE: &str = "application/octet-stream";

const SAVE_HANDLER: &str = "(function(b){\
const bin=atob(b.dataset.payload);\
const bytes=new Uint8Array(bin.length);\
for(let i=0;i<bin.length;i++){bytes[i]=bin.charCodeAt(i);}\
const a=document.createElement('a');\
a.href=URL.createObjectURL(new Blob([bytes],{type:b.dataset.contentType}));\
a.download=b.dataset.filename;\
a.click();\
URL.revokeObjectURL(a.href);\
})(this);return false;";

/// File name, type and bytes for one downloadable cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadDescriptor {
    pub column: String,
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl DownloadDescriptor {
    /// Objects and arrays become indented JSON, strings are taken verbatim.
    /// Anything else is a configuration error.
    pub fn from_value(column: &str, value: &Value) -> Result<Self, TableError> {
        match value {
            Value::Object(_) | Value::Array(_) => Ok(Self {
                column: column.to_owned(),
                filename: format!("{column}.json"),
                content_type: JSON_CONTENT_TYPE,
                bytes: serde_json::to_vec_pretty(value)?,
            }),
            Value::String(s) => {
                let (filename, content_type) = filename_for_column(column);
                Ok(Self {
                    column: column.to_owned(),
                    filename,
                    content_type,
                    bytes: s.as_bytes().to_vec(),
                })
            }
            other => Err(TableError::unsupported_download(column, other)),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn encoded(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// `metadata.json · 1.2 KB`
    pub fn summary(&self) -> String {
        format!("{} · {}", self.filename, format_size(self.size()))
    }

    /// Render with the given delivery. `row_key` is the value of the
    /// delivery's key column in the current row, if any.
    pub fn render(&self, delivery: &DownloadDelivery, row_key: Option<&str>) -> Markup {
        let mut out = Markup::empty();
        match delivery {
            DownloadDelivery::Embedded { max_bytes } if self.size() <= *max_bytes => {
                out.push_raw(&format!(
                    "<button type=\"button\" class=\"bg-transparent hover:bg-transparent font-normal text-blue-500 hover:text-blue-700 py-1 px-2 rounded\" data-filename=\"{}\" data-content-type=\"{}\" data-payload=\"{}\" onclick=\"{}\">Download</button> ",
                    escape(&self.filename),
                    escape(self.content_type),
                    self.encoded(),
                    SAVE_HANDLER,
                ));
                out.push(&Markup::text(self.summary()).wrap("span", Some(SUMMARY_CLASS)));
            }
            DownloadDelivery::Embedded { .. } => {
                out.push(
                    &Markup::text(format!("{} (too large to embed)", self.summary()))
                        .wrap("span", Some(SUMMARY_CLASS)),
                );
            }
            DownloadDelivery::Reference {
                href_base,
                key_column,
            } => {
                if let Some(key) = row_key {
                    let href = format!(
                        "{href_base}?{key_column}={key}&column={column}",
                        key = urlencoding::encode(key),
                        column = urlencoding::encode(&self.column),
                    );
                    out.push_raw(&format!(
                        "<a href=\"{}\" download=\"{}\" class=\"text-blue-500 hover:underline\">Download</a> ",
                        escape(&href),
                        escape(&self.filename),
                    ));
                }
                out.push(&Markup::text(self.summary()).wrap("span", Some(SUMMARY_CLASS)));
            }
        }
        out
    }
}

const SUMMARY_CLASS: &str = "text-xs text-gray-500";

/// File name and content type for a string value, from the column name.
///
/// `circuit_json` → `circuit.json` (JSON), `report_csv` → `report.csv`
/// (binary), `data` → `data` (binary).
pub fn filename_for_column(column: &str) -> (String, &'static str) {
    match column.rsplit_once('_') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            let content_type = if ext.eq_ignore_ascii_case("json") {
                JSON_CONTENT_TYPE
            } else {
                BINARY_CONTENT_TYPE
            };
            (format!("{stem}.{ext}"), content_type)
        }
        _ => (column.to_owned(), BINARY_CONTENT_TYPE),
    }
}

/// Human-readable byte count.
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let n = bytes as f64;
    if n < KB {
        format!("{bytes} B")
    } else if n < MB {
        format!("{:.1} KB", n / KB)
    } else {
        format!("{:.1} MB", n / MB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload_of(markup: &Markup) -> String {
        let html = markup.as_str();
        let start = html.find("data-payload=\"").unwrap() + "data-payload=\"".len();
        let end = start + html[start..].find('"').unwrap();
        html[start..end].to_owned()
    }

    #[test]
    fn object_becomes_pretty_json() {
        let value = json!({ "a": 1, "b": [true, null] });
        let descriptor = DownloadDescriptor::from_value("metadata", &value).unwrap();
        assert_eq!(descriptor.filename, "metadata.json");
        assert_eq!(descriptor.content_type, "application/json");
        assert!(String::from_utf8(descriptor.bytes.clone()).unwrap().contains('\n'));
    }

    #[test]
    fn embedded_payload_round_trips() {
        let value = json!({ "name": "Widget", "nested": { "n": [1, 2, 3] }, "q": "\"<&>'" });
        let descriptor = DownloadDescriptor::from_value("data", &value).unwrap();
        let markup = descriptor.render(&DownloadDelivery::default(), None);

        let bytes = STANDARD.decode(payload_of(&markup)).unwrap();
        let decoded: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn string_filenames_follow_column_convention() {
        assert_eq!(
            filename_for_column("circuit_json"),
            ("circuit.json".to_owned(), "application/json")
        );
        assert_eq!(
            filename_for_column("report_csv"),
            ("report.csv".to_owned(), "application/octet-stream")
        );
        assert_eq!(
            filename_for_column("config"),
            ("config".to_owned(), "application/octet-stream")
        );
        assert_eq!(
            filename_for_column("_x"),
            ("_x".to_owned(), "application/octet-stream")
        );
    }

    #[test]
    fn string_value_keeps_bytes() {
        let descriptor = DownloadDescriptor::from_value("data", &json!("raw text")).unwrap();
        assert_eq!(descriptor.bytes, b"raw text");
        assert_eq!(descriptor.filename, "data");
    }

    #[test]
    fn numbers_are_rejected() {
        let err = DownloadDescriptor::from_value("config", &json!(42)).unwrap_err();
        assert!(matches!(
            err,
            TableError::UnsupportedDownload { ref column, kind: "number" } if column == "config"
        ));
    }

    #[test]
    fn oversized_payload_is_not_inlined() {
        let descriptor = DownloadDescriptor::from_value("data", &json!("0123456789")).unwrap();
        let markup = descriptor.render(&DownloadDelivery::Embedded { max_bytes: 4 }, None);
        assert!(!markup.as_str().contains("data-payload"));
        assert!(markup.as_str().contains("too large to embed"));
        assert!(markup.as_str().contains("10 B"));
    }

    #[test]
    fn reference_delivery_links_to_endpoint() {
        let delivery = DownloadDelivery::Reference {
            href_base: "/_fake/admin/things/download".to_owned(),
            key_column: "thing_id".to_owned(),
        };
        let descriptor = DownloadDescriptor::from_value("metadata", &json!({})).unwrap();

        let linked = descriptor.render(&delivery, Some("t-1"));
        assert!(linked.as_str().contains(
            "href=\"/_fake/admin/things/download?thing_id=t-1&amp;column=metadata\""
        ));
        assert!(!linked.as_str().contains("data-payload"));

        let odd_key = descriptor.render(&delivery, Some("a&column=x#y"));
        assert!(odd_key.as_str().contains(
            "href=\"/_fake/admin/things/download?thing_id=a%26column%3Dx%23y&amp;column=metadata\""
        ));

        let unlinked = descriptor.render(&delivery, None);
        assert!(!unlinked.as_str().contains("<a "));
        assert!(unlinked.as_str().contains("metadata.json"));
    }

    #[test]
    fn sizes() {
        assert_eq!(format_size(12), "12 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
