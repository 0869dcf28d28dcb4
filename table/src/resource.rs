//! Resource paths derived from foreign-key-like column names.
//!
//! `owner_account_id` points at the `accounts` collection and is queried as
//! `account_id`; `thing_ids` points at `things` and is queried as `thing_id`.

/// Ownership prefixes stripped from resource names by default.
pub const DEFAULT_RESOURCE_PREFIXES: [&str; 3] = ["creator_", "owner_", "personal_"];

/// Naive English plural: idempotent on names that already end in `s`.
pub fn pluralize(resource: &str) -> String {
    if resource.ends_with('s') {
        resource.to_owned()
    } else if let Some(stem) = resource.strip_suffix('y') {
        format!("{stem}ies")
    } else {
        format!("{resource}s")
    }
}

/// Strip the first matching ownership prefix, if any.
pub fn remove_resource_prefixes<'a, P: AsRef<str>>(resource: &'a str, prefixes: &[P]) -> &'a str {
    prefixes
        .iter()
        .find_map(|prefix| resource.strip_prefix(prefix.as_ref()))
        .unwrap_or(resource)
}

/// Where an id column's values link to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdTarget {
    /// Collection path segment, e.g. `accounts`.
    pub resource_path: String,
    /// Query field used to look a single item up, e.g. `account_id`.
    pub field: String,
}

impl IdTarget {
    /// Target for a `<name>_id` column holding one id.
    pub fn for_singular<P: AsRef<str>>(column: &str, prefixes: &[P]) -> Option<Self> {
        let base = column.strip_suffix("_id")?;
        Some(Self {
            resource_path: remove_resource_prefixes(&pluralize(base), prefixes).to_owned(),
            field: remove_resource_prefixes(column, prefixes).to_owned(),
        })
    }

    /// Target for a `<name>_ids` column holding a list of ids.
    pub fn for_plural<P: AsRef<str>>(column: &str, prefixes: &[P]) -> Option<Self> {
        let base = column.strip_suffix("_ids")?;
        let singular_column = &column[..column.len() - 1];
        Some(Self {
            resource_path: remove_resource_prefixes(&pluralize(base), prefixes).to_owned(),
            field: remove_resource_prefixes(singular_column, prefixes).to_owned(),
        })
    }

    /// `<base>/<resource_path>/get?<field>=<id>`, with the id percent-encoded.
    pub fn href(&self, base: &str, id: &str) -> String {
        format!(
            "{}/{}/get?{}={}",
            base.trim_end_matches('/'),
            self.resource_path,
            self.field,
            urlencoding::encode(id)
        )
    }
}

/// Shortened id shown as link text: everything before the first `-`, then `...`.
pub fn short_id(id: &str) -> String {
    let head = id.split('-').next().unwrap_or(id);
    format!("{head}...")
}
