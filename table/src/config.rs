//! Renderer configuration.

use crate::resource::DEFAULT_RESOURCE_PREFIXES;

/// Columns offered as file downloads unless configured otherwise.
pub const DEFAULT_DOWNLOADABLE_COLUMNS: [&str; 3] = ["data", "metadata", "config"];

/// Path prefix for generated id links.
pub const DEFAULT_LINK_BASE: &str = "/_fake/admin";

/// Largest payload inlined into the page when downloads are embedded.
pub const DEFAULT_MAX_EMBEDDED_BYTES: usize = 1024 * 1024;

/// How the bytes of a downloadable cell reach the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadDelivery {
    /// Base64 payload inside the page, saved by a client-side click handler.
    /// Payloads over `max_bytes` are described but not inlined.
    Embedded { max_bytes: usize },
    /// Link to `<href_base>?<key_column>=<row key>&column=<column>`.
    Reference {
        href_base: String,
        key_column: String,
    },
}

impl Default for DownloadDelivery {
    fn default() -> Self {
        Self::Embedded {
            max_bytes: DEFAULT_MAX_EMBEDDED_BYTES,
        }
    }
}

/// Extra link shown next to an override column's value.
///
/// `{value}` in the template is replaced with the percent-encoded cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxLink {
    pub label: String,
    pub href_template: String,
}

impl AuxLink {
    pub fn href(&self, value: &str) -> String {
        self.href_template
            .replace("{value}", &urlencoding::encode(value))
    }
}

/// A fixed column name that renders its value plus related-listing links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOverride {
    pub column: String,
    pub links: Vec<AuxLink>,
}

impl ColumnOverride {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            links: Vec::new(),
        }
    }

    pub fn link(mut self, label: impl Into<String>, href_template: impl Into<String>) -> Self {
        self.links.push(AuxLink {
            label: label.into(),
            href_template: href_template.into(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub downloadable_columns: Vec<String>,
    pub resource_prefixes: Vec<String>,
    pub overrides: Vec<ColumnOverride>,
    pub link_base: String,
    pub download_delivery: DownloadDelivery,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            downloadable_columns: DEFAULT_DOWNLOADABLE_COLUMNS
                .iter()
                .map(|c| (*c).to_owned())
                .collect(),
            resource_prefixes: DEFAULT_RESOURCE_PREFIXES
                .iter()
                .map(|p| (*p).to_owned())
                .collect(),
            overrides: vec![
                ColumnOverride::new("cache_key")
                    .link(
                        "all",
                        format!("{DEFAULT_LINK_BASE}/cache_entries/list?cache_key={{value}}"),
                    )
                    .link(
                        "hits",
                        format!(
                            "{DEFAULT_LINK_BASE}/cache_entries/list?cache_key={{value}}&is_hit=true"
                        ),
                    ),
            ],
            link_base: DEFAULT_LINK_BASE.to_owned(),
            download_delivery: DownloadDelivery::default(),
        }
    }
}

impl TableConfig {
    pub fn with_downloadable_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.downloadable_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_resource_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resource_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Register an override, replacing any existing one for the same column.
    pub fn with_override(mut self, column_override: ColumnOverride) -> Self {
        self.overrides
            .retain(|existing| existing.column != column_override.column);
        self.overrides.push(column_override);
        self
    }

    pub fn without_overrides(mut self) -> Self {
        self.overrides.clear();
        self
    }

    pub fn with_link_base(mut self, link_base: impl Into<String>) -> Self {
        self.link_base = link_base.into();
        self
    }

    pub fn with_download_delivery(mut self, delivery: DownloadDelivery) -> Self {
        self.download_delivery = delivery;
        self
    }

    pub fn is_downloadable(&self, column: &str) -> bool {
        self.downloadable_columns.iter().any(|c| c == column)
    }

    pub fn override_for(&self, column: &str) -> Option<&ColumnOverride> {
        self.overrides.iter().find(|o| o.column == column)
    }
}
