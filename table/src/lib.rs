//! Generic HTML tables for the debug admin panel.
//!
//! Rows are arbitrary records. How a cell renders depends only on its column
//! name, its value's shape and the render context:
//!
//! - `*_id` / `*_ids` strings link to the referenced resource's `get` page
//! - `*_at` instants render as relative time in the display timezone
//! - allow-listed columns become file downloads
//! - objects collapse into an expandable JSON preview
//!
//! ```
//! use debug_api_table::{Record, RenderContext, TableConfig, TableRenderer};
//! use serde_json::json;
//!
//! let renderer = TableRenderer::new(&TableConfig::default());
//! let rows = vec![Record::new().with("thing_id", "3f2a-11").with("done", json!(true))];
//! let html = renderer.render_rows(&rows, &RenderContext::default()).unwrap();
//! assert!(html.as_str().contains("/_fake/admin/things/get?thing_id=3f2a-11"));
//! ```

pub mod config;
pub mod context;
pub mod download;
pub mod error;
pub mod formatter;
pub mod markup;
pub mod record;
pub mod resource;
pub mod rules;
pub mod table;
pub mod time_ago;

pub use config::{AuxLink, ColumnOverride, DownloadDelivery, TableConfig};
pub use context::{RenderContext, parse_timezone};
pub use download::DownloadDescriptor;
pub use error::TableError;
pub use formatter::{Cell, CellFormatter, CellRule};
pub use markup::Markup;
pub use record::{CellValue, Record};
pub use resource::{pluralize, remove_resource_prefixes};
pub use table::{TableRenderer, TableSource};
pub use time_ago::time_ago;

pub use chrono_tz::Tz;
