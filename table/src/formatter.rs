//! Cell formatting as an ordered registry of rules.
//!
//! Each [`CellRule`] pairs a predicate with a formatter. The first rule whose
//! predicate accepts a cell renders it; a cell no rule accepts is rendered as
//! plain text. New column conventions are added by inserting rules, not by
//! editing existing ones.

use serde_json::Value;

use crate::config::TableConfig;
use crate::context::RenderContext;
use crate::error::TableError;
use crate::markup::Markup;
use crate::record::{CellValue, Record};
use crate::rules;

/// One cell as seen by the rules.
#[derive(Debug, Clone, Copy)]
pub struct Cell<'a> {
    pub column: &'a str,
    pub value: &'a CellValue,
    /// Row the cell belongs to, for rules that need sibling columns.
    pub row: Option<&'a Record>,
    pub ctx: &'a RenderContext,
}

impl<'a> Cell<'a> {
    pub fn new(column: &'a str, value: &'a CellValue, ctx: &'a RenderContext) -> Self {
        Self {
            column,
            value,
            row: None,
            ctx,
        }
    }

    pub fn in_row(mut self, row: &'a Record) -> Self {
        self.row = Some(row);
        self
    }

    /// The JSON value, unless the cell holds pre-rendered markup.
    pub fn json(&self) -> Option<&'a Value> {
        self.value.as_json()
    }
}

pub trait CellRule: Send + Sync {
    /// Stable name used to position other rules relative to this one.
    fn name(&self) -> &'static str;

    fn matches(&self, cell: &Cell<'_>) -> bool;

    fn render(&self, cell: &Cell<'_>) -> Result<Markup, TableError>;
}

pub struct CellFormatter {
    rules: Vec<Box<dyn CellRule>>,
}

impl CellFormatter {
    /// The standard rule set, in order:
    /// boolean, null, markup, override, plural ids, singular id, timestamp,
    /// download, object, plain.
    pub fn new(config: &TableConfig) -> Self {
        Self {
            rules: vec![
                Box::new(rules::BooleanRule),
                Box::new(rules::NullRule),
                Box::new(rules::MarkupRule),
                Box::new(rules::OverrideRule::new(config.overrides.clone())),
                Box::new(rules::PluralIdsRule::new(
                    config.resource_prefixes.clone(),
                    config.link_base.clone(),
                )),
                Box::new(rules::SingularIdRule::new(
                    config.resource_prefixes.clone(),
                    config.link_base.clone(),
                )),
                Box::new(rules::TimestampRule),
                Box::new(rules::DownloadRule::new(
                    config.downloadable_columns.clone(),
                    config.download_delivery.clone(),
                )),
                Box::new(rules::ObjectRule),
                Box::new(rules::PlainRule),
            ],
        }
    }

    /// A formatter with no rules; every cell renders as plain text.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn push(mut self, rule: impl CellRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Insert `rule` ahead of the rule called `before`, or at the end when no
    /// rule has that name.
    pub fn insert_before(mut self, before: &str, rule: impl CellRule + 'static) -> Self {
        let index = self
            .rules
            .iter()
            .position(|r| r.name() == before)
            .unwrap_or(self.rules.len());
        self.rules.insert(index, Box::new(rule));
        self
    }

    /// Remove every rule called `name`.
    pub fn without(mut self, name: &str) -> Self {
        self.rules.retain(|r| r.name() != name);
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn format(&self, cell: &Cell<'_>) -> Result<Markup, TableError> {
        match self.rules.iter().find(|rule| rule.matches(cell)) {
            Some(rule) => rule.render(cell),
            None => Ok(rules::plain(cell.value)),
        }
    }
}

impl Default for CellFormatter {
    fn default() -> Self {
        Self::new(&TableConfig::default())
    }
}

impl std::fmt::Debug for CellFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellFormatter")
            .field("rules", &self.rule_names())
            .finish()
    }
}
