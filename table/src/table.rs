//! Table rendering for record collections and single key/value objects.

use crate::config::TableConfig;
use crate::context::RenderContext;
use crate::error::TableError;
use crate::formatter::{Cell, CellFormatter};
use crate::markup::Markup;
use crate::record::{CellValue, Record};

const TABLE_CLASS: &str =
    "min-w-full divide-y divide-gray-200 bg-white shadow-sm rounded-lg overflow-hidden";
const TH_CLASS: &str =
    "px-4 py-3 bg-gray-50 text-left text-xs font-medium text-gray-500 uppercase tracking-wider";
const KEY_TD_CLASS: &str =
    "px-4 py-2 whitespace-nowrap text-sm text-gray-900 border-b border-gray-100";
const TD_CLASS: &str =
    "px-4 py-2 whitespace-normal text-sm text-gray-600 border-b border-gray-100";
const EMPTY_CLASS: &str =
    "text-center py-8 bg-gray-50 rounded-lg border border-gray-200 text-gray-500";

/// Text of the notice shown instead of a table with no rows.
pub const EMPTY_TABLE_TEXT: &str = "Empty Table";

/// What to render.
#[derive(Debug, Clone, Copy)]
pub enum TableSource<'a> {
    /// One row per record; columns come from the first record.
    Rows(&'a [Record]),
    /// A two-column key/value listing of one record.
    Object(&'a Record),
}

#[derive(Debug, Default)]
pub struct TableRenderer {
    formatter: CellFormatter,
}

impl TableRenderer {
    pub fn new(config: &TableConfig) -> Self {
        Self::with_formatter(CellFormatter::new(config))
    }

    pub fn with_formatter(formatter: CellFormatter) -> Self {
        Self { formatter }
    }

    pub fn formatter(&self) -> &CellFormatter {
        &self.formatter
    }

    pub fn render(&self, source: TableSource<'_>, ctx: &RenderContext) -> Result<Markup, TableError> {
        match source {
            TableSource::Rows(rows) => self.render_rows(rows, ctx),
            TableSource::Object(object) => self.render_object(object, ctx),
        }
    }

    /// Render records as a table, or the empty-state notice when there are none.
    ///
    /// Later records are read with the first record's columns; a column they
    /// lack renders as an empty cell and extra columns are ignored.
    pub fn render_rows(&self, rows: &[Record], ctx: &RenderContext) -> Result<Markup, TableError> {
        let Some(first) = rows.first() else {
            return Ok(empty_state());
        };
        let columns: Vec<&str> = first.columns().collect();

        let header: Markup = columns
            .iter()
            .map(|column| Markup::text(column).wrap("th", Some(TH_CLASS)))
            .collect();

        let mut body = Markup::empty();
        for row in rows {
            let mut tr = Markup::empty();
            for column in &columns {
                let value = row.get(column).unwrap_or(&CellValue::NULL);
                let cell = Cell::new(column, value, ctx).in_row(row);
                tr.push(&self.formatter.format(&cell)?.wrap("td", Some(TD_CLASS)));
            }
            body.push(&tr.wrap("tr", None));
        }

        Ok(table(header, body))
    }

    /// Render one record as `Key` / `Value` rows.
    pub fn render_object(&self, object: &Record, ctx: &RenderContext) -> Result<Markup, TableError> {
        let header: Markup = ["Key", "Value"]
            .iter()
            .map(|h| Markup::text(h).wrap("th", Some(TH_CLASS)))
            .collect();

        let mut body = Markup::empty();
        for (key, value) in object.iter() {
            let cell = Cell::new(key, value, ctx).in_row(object);
            let mut tr = Markup::text(key).wrap("td", Some(KEY_TD_CLASS));
            tr.push(&self.formatter.format(&cell)?.wrap("td", Some(TD_CLASS)));
            body.push(&tr.wrap("tr", Some("hover:bg-gray-50")));
        }

        Ok(table(header, body))
    }
}

fn table(header: Markup, body: Markup) -> Markup {
    let mut inner = header.wrap("tr", None).wrap("thead", None);
    inner.push(&body.wrap("tbody", None));
    inner.wrap("table", Some(TABLE_CLASS))
}

fn empty_state() -> Markup {
    Markup::text(EMPTY_TABLE_TEXT).wrap("div", Some(EMPTY_CLASS))
}
