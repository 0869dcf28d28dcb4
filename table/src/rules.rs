//! The standard cell rules, in registry order.

use serde_json::Value;

use crate::config::{ColumnOverride, DownloadDelivery};
use crate::download::DownloadDescriptor;
use crate::error::TableError;
use crate::formatter::{Cell, CellRule};
use crate::markup::{Markup, escape};
use crate::record::CellValue;
use crate::resource::{IdTarget, short_id};
use crate::time_ago::{parse_instant, time_ago};

const LINK_CLASS: &str = "text-blue-500 hover:underline";
const SUMMARY_PREVIEW_CHARS: usize = 40;

/// Plain string form of a value: strings unquoted, everything else as JSON.
pub fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Escaped plain rendering of any cell.
pub fn plain(value: &CellValue) -> Markup {
    match value {
        CellValue::Json(value) => Markup::text(plain_text(value)),
        CellValue::Markup(markup) => markup.clone(),
    }
}

fn link(href: &str, text: &str) -> Markup {
    Markup::raw(format!(
        "<a href=\"{}\" class=\"{LINK_CLASS}\">{}</a>",
        escape(href),
        escape(text)
    ))
}

pub struct BooleanRule;

impl CellRule for BooleanRule {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn matches(&self, cell: &Cell<'_>) -> bool {
        matches!(cell.json(), Some(Value::Bool(_)))
    }

    fn render(&self, cell: &Cell<'_>) -> Result<Markup, TableError> {
        Ok(plain(cell.value))
    }
}

pub struct NullRule;

impl CellRule for NullRule {
    fn name(&self) -> &'static str {
        "null"
    }

    fn matches(&self, cell: &Cell<'_>) -> bool {
        matches!(cell.json(), Some(Value::Null))
    }

    fn render(&self, _cell: &Cell<'_>) -> Result<Markup, TableError> {
        Ok(Markup::empty())
    }
}

pub struct MarkupRule;

impl CellRule for MarkupRule {
    fn name(&self) -> &'static str {
        "markup"
    }

    fn matches(&self, cell: &Cell<'_>) -> bool {
        matches!(cell.value, CellValue::Markup(_))
    }

    fn render(&self, cell: &Cell<'_>) -> Result<Markup, TableError> {
        Ok(plain(cell.value))
    }
}

/// Fixed column names that show their value plus related-listing links.
pub struct OverrideRule {
    overrides: Vec<ColumnOverride>,
}

impl OverrideRule {
    pub fn new(overrides: Vec<ColumnOverride>) -> Self {
        Self { overrides }
    }

    fn lookup(&self, column: &str) -> Option<&ColumnOverride> {
        self.overrides.iter().find(|o| o.column == column)
    }
}

impl CellRule for OverrideRule {
    fn name(&self) -> &'static str {
        "override"
    }

    fn matches(&self, cell: &Cell<'_>) -> bool {
        matches!(cell.json(), Some(Value::String(_) | Value::Number(_)))
            && self.lookup(cell.column).is_some()
    }

    fn render(&self, cell: &Cell<'_>) -> Result<Markup, TableError> {
        let raw = cell.json().map(plain_text).unwrap_or_default();
        let mut out = Markup::text(&raw);
        if let Some(column_override) = self.lookup(cell.column) {
            for aux in &column_override.links {
                out.push_raw(" ");
                out.push(&link(&aux.href(&raw), &format!("[{}]", aux.label)));
            }
        }
        Ok(out)
    }
}

/// `<name>_ids` columns holding a list of id strings.
pub struct PluralIdsRule {
    prefixes: Vec<String>,
    link_base: String,
}

impl PluralIdsRule {
    pub fn new(prefixes: Vec<String>, link_base: String) -> Self {
        Self {
            prefixes,
            link_base,
        }
    }
}

impl CellRule for PluralIdsRule {
    fn name(&self) -> &'static str {
        "plural_ids"
    }

    fn matches(&self, cell: &Cell<'_>) -> bool {
        cell.column.ends_with("_ids")
            && matches!(cell.json(), Some(Value::Array(ids)) if ids.iter().all(Value::is_string))
    }

    fn render(&self, cell: &Cell<'_>) -> Result<Markup, TableError> {
        let Some(target) = IdTarget::for_plural(cell.column, &self.prefixes) else {
            return Ok(plain(cell.value));
        };
        let links: Markup = cell
            .json()
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(|id| link(&target.href(&self.link_base, id), &short_id(id)))
            .collect();
        Ok(links.wrap("div", Some("flex flex-col space-y-1")))
    }
}

/// `<name>_id` columns holding one id string.
pub struct SingularIdRule {
    prefixes: Vec<String>,
    link_base: String,
}

impl SingularIdRule {
    pub fn new(prefixes: Vec<String>, link_base: String) -> Self {
        Self {
            prefixes,
            link_base,
        }
    }
}

impl CellRule for SingularIdRule {
    fn name(&self) -> &'static str {
        "singular_id"
    }

    fn matches(&self, cell: &Cell<'_>) -> bool {
        cell.column.ends_with("_id") && matches!(cell.json(), Some(Value::String(_)))
    }

    fn render(&self, cell: &Cell<'_>) -> Result<Markup, TableError> {
        match (
            IdTarget::for_singular(cell.column, &self.prefixes),
            cell.json().and_then(Value::as_str),
        ) {
            (Some(target), Some(id)) => Ok(link(&target.href(&self.link_base, id), &short_id(id))),
            _ => Ok(plain(cell.value)),
        }
    }
}

/// `<name>_at` columns holding an instant.
pub struct TimestampRule;

impl CellRule for TimestampRule {
    fn name(&self) -> &'static str {
        "timestamp"
    }

    fn matches(&self, cell: &Cell<'_>) -> bool {
        if !cell.column.ends_with("_at") {
            return false;
        }
        let parsed = cell.json().is_some_and(|v| parse_instant(v).is_some());
        if !parsed {
            tracing::debug!(column = cell.column, "timestamp column value is not an instant");
        }
        parsed
    }

    fn render(&self, cell: &Cell<'_>) -> Result<Markup, TableError> {
        match cell.json().and_then(parse_instant) {
            Some(instant) => Ok(Markup::text(time_ago(
                instant,
                cell.ctx.now(),
                cell.ctx.timezone(),
            ))
            .wrap("span", Some("tabular-nums"))),
            None => Ok(plain(cell.value)),
        }
    }
}

/// Allow-listed columns offered as file downloads.
pub struct DownloadRule {
    columns: Vec<String>,
    delivery: DownloadDelivery,
}

impl DownloadRule {
    pub fn new(columns: Vec<String>, delivery: DownloadDelivery) -> Self {
        Self { columns, delivery }
    }

    fn row_key(&self, cell: &Cell<'_>) -> Option<String> {
        let DownloadDelivery::Reference { key_column, .. } = &self.delivery else {
            return None;
        };
        match cell.row?.get(key_column)?.as_json()? {
            Value::Null => None,
            value => Some(plain_text(value)),
        }
    }
}

impl CellRule for DownloadRule {
    fn name(&self) -> &'static str {
        "download"
    }

    fn matches(&self, cell: &Cell<'_>) -> bool {
        cell.json().is_some() && self.columns.iter().any(|c| c == cell.column)
    }

    fn render(&self, cell: &Cell<'_>) -> Result<Markup, TableError> {
        let value = cell.json().unwrap_or(&Value::Null);
        let descriptor = DownloadDescriptor::from_value(cell.column, value)?;
        Ok(descriptor.render(&self.delivery, self.row_key(cell).as_deref()))
    }
}

/// Objects and arrays as an expandable JSON preview.
pub struct ObjectRule;

impl CellRule for ObjectRule {
    fn name(&self) -> &'static str {
        "object"
    }

    fn matches(&self, cell: &Cell<'_>) -> bool {
        matches!(cell.json(), Some(Value::Object(_) | Value::Array(_)))
    }

    fn render(&self, cell: &Cell<'_>) -> Result<Markup, TableError> {
        let value = cell.json().unwrap_or(&Value::Null);
        let compact = value.to_string();
        let mut preview: String = compact.chars().take(SUMMARY_PREVIEW_CHARS).collect();
        if preview.len() < compact.len() {
            preview.push_str("...");
        }
        let pretty = serde_json::to_string_pretty(value)?;

        let mut out = Markup::text(preview).wrap("summary", None);
        out.push(&Markup::text(pretty).wrap("pre", None));
        Ok(out.wrap("details", None))
    }
}

pub struct PlainRule;

impl CellRule for PlainRule {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn matches(&self, _cell: &Cell<'_>) -> bool {
        true
    }

    fn render(&self, cell: &Cell<'_>) -> Result<Markup, TableError> {
        Ok(plain(cell.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableConfig;
    use crate::context::RenderContext;
    use crate::formatter::CellFormatter;
    use crate::record::Record;
    use base64::Engine as _;
    use chrono::{Duration, TimeZone, Utc};
    use chrono_tz::Tz;
    use serde_json::json;

    fn ctx() -> RenderContext {
        RenderContext::at(Tz::UTC, Utc.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap())
    }

    fn render(column: &str, value: impl Into<CellValue>) -> Result<String, TableError> {
        let ctx = ctx();
        let value = value.into();
        CellFormatter::default()
            .format(&Cell::new(column, &value, &ctx))
            .map(Markup::into_string)
    }

    #[test]
    fn booleans_ignore_column_name() {
        for column in ["flag", "thing_id", "data", "created_at", "cache_key"] {
            assert_eq!(render(column, json!(true)).unwrap(), "true");
            assert_eq!(render(column, json!(false)).unwrap(), "false");
        }
    }

    #[test]
    fn nulls_are_empty() {
        for column in ["name", "thing_ids", "metadata", "updated_at"] {
            assert_eq!(render(column, json!(null)).unwrap(), "");
        }
    }

    #[test]
    fn markup_passes_through() {
        let out = render("metadata", Markup::raw("<form>x</form>")).unwrap();
        assert_eq!(out, "<form>x</form>");
    }

    #[test]
    fn plural_ids_link_each_id() {
        let out = render("account_ids", json!(["abc-111", "def-222"])).unwrap();
        assert_eq!(out.matches("<a ").count(), 2);
        assert!(out.contains(">abc...</a>"));
        assert!(out.contains(">def...</a>"));
        assert!(out.contains("href=\"/_fake/admin/accounts/get?account_id=abc-111\""));
        assert!(out.starts_with("<div class=\"flex flex-col space-y-1\">"));
    }

    #[test]
    fn plural_ids_with_prefix() {
        let out = render("owner_category_ids", json!(["c-1"])).unwrap();
        assert!(out.contains("href=\"/_fake/admin/categories/get?category_id=c-1\""));
    }

    #[test]
    fn plural_ids_with_non_strings_fall_back_to_object() {
        let out = render("account_ids", json!([1, 2])).unwrap();
        assert!(out.starts_with("<details>"));
    }

    #[test]
    fn singular_id_links() {
        let out = render("creator_report_id", json!("rep-9f")).unwrap();
        assert_eq!(
            out,
            "<a href=\"/_fake/admin/reports/get?report_id=rep-9f\" class=\"text-blue-500 hover:underline\">rep...</a>"
        );
    }

    #[test]
    fn numeric_id_is_plain() {
        assert_eq!(render("thing_id", json!(12)).unwrap(), "12");
    }

    #[test]
    fn override_column_adds_aux_links() {
        let out = render("cache_key", json!("k1")).unwrap();
        assert!(out.starts_with("k1 "));
        assert!(out.contains("href=\"/_fake/admin/cache_entries/list?cache_key=k1\""));
        assert!(
            out.contains("href=\"/_fake/admin/cache_entries/list?cache_key=k1&amp;is_hit=true\"")
        );
    }

    #[test]
    fn timestamps_render_relative_time() {
        let now = ctx().now();
        let ninety = (now - Duration::seconds(90)).to_rfc3339();
        let out = render("created_at", json!(ninety)).unwrap();
        assert!(out.contains("1m ago"), "{out}");
        assert!(out.starts_with("<span class=\"tabular-nums\">"));

        let thirty = (now - Duration::seconds(30)).timestamp_millis();
        let out = render("updated_at", json!(thirty)).unwrap();
        assert!(out.contains("30s ago"), "{out}");
    }

    #[test]
    fn unparseable_timestamp_falls_through() {
        assert_eq!(render("seen_at", json!("never")).unwrap(), "never");
    }

    #[test]
    fn downloadable_object_embeds_json() {
        let value = json!({ "k": [1, 2], "s": "x" });
        let out = render("metadata", value.clone()).unwrap();
        assert!(out.contains(">Download</button>"));

        let start = out.find("data-payload=\"").unwrap() + "data-payload=\"".len();
        let end = start + out[start..].find('"').unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&out[start..end])
            .unwrap();
        assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), value);
    }

    #[test]
    fn downloadable_number_is_fatal() {
        let err = render("config", json!(3.5)).unwrap_err();
        assert!(matches!(err, TableError::UnsupportedDownload { .. }));
    }

    #[test]
    fn reference_download_uses_row_key() {
        let config = TableConfig::default().with_download_delivery(DownloadDelivery::Reference {
            href_base: "/dl".to_owned(),
            key_column: "thing_id".to_owned(),
        });
        let formatter = CellFormatter::new(&config);
        let row = Record::new()
            .with("thing_id", "t-1")
            .with("data", json!({ "a": 1 }));
        let ctx = ctx();
        let value = row.get("data").unwrap();

        let out = formatter
            .format(&Cell::new("data", value, &ctx).in_row(&row))
            .unwrap();
        assert!(out.as_str().contains("href=\"/dl?thing_id=t-1&amp;column=data\""));
    }

    #[test]
    fn objects_get_truncated_summary() {
        let value = json!({ "description": "a fairly long string that goes past forty characters" });
        let out = render("payload", value).unwrap();
        let summary = out
            .split("<summary>")
            .nth(1)
            .and_then(|s| s.split("</summary>").next())
            .unwrap();
        assert!(summary.ends_with("..."));
        assert!(out.contains("<pre>{\n  &quot;description&quot;"));
    }

    #[test]
    fn short_objects_are_not_marked_truncated() {
        let out = render("payload", json!([1, 2])).unwrap();
        assert!(out.contains("<summary>[1,2]</summary>"));
    }

    #[test]
    fn fallback_escapes_text() {
        assert_eq!(render("name", json!("<script>")).unwrap(), "&lt;script&gt;");
        assert_eq!(render("count", json!(42)).unwrap(), "42");
    }
}
