//! In-memory table catalogue built from a Rails schema.
//!
//! ```ruby
//! create_table "users", force: :cascade do |t|
//!   t.string "email", null: false
//!   t.references "account"
//! end
//! ```
//!
//! becomes a [`Catalogue`] holding one [`Table`] (`#1 users`) with two
//! [`Attribute`]s. Identifiers follow declaration order and start at 1.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based table identifier assigned in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(usize);

impl TableId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for TableId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

/// A column declared inside a `create_table` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    /// Column type as written in the schema (`string`, `integer`, `references`, ...).
    pub kind: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }

    /// True for association columns (`t.references` / `t.belongs_to`).
    pub fn is_reference(&self) -> bool {
        matches!(self.kind.as_str(), "references" | "belongs_to")
    }

    /// True for columns the generators add on their own.
    pub fn is_bookkeeping(&self) -> bool {
        matches!(self.name.as_str(), "id" | "created_at" | "updated_at")
    }
}

/// A declared table.
///
/// Tables only come out of a [`Catalogue`], which assigns their ids; they
/// serialize for output but cannot be read back in.
///
/// ```compile_fail
/// let table: schema_to_scaffold::schema::Table =
///     serde_json::from_str(r#"{"id":42,"name":"users","attributes":[]}"#).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    id: TableId,
    pub name: String,
    pub attributes: Vec<Attribute>,
}

impl Table {
    pub fn id(&self) -> TableId {
        self.id
    }
}

/// Ordered, immutable collection of tables parsed from one schema text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalogue {
    tables: Vec<Table>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a table, assigning the next identifier.
    ///
    /// Returns `None` without modifying the catalogue when a table with the
    /// same name is already present.
    pub(crate) fn push(
        &mut self,
        name: impl Into<String>,
        attributes: Vec<Attribute>,
    ) -> Option<TableId> {
        let name = name.into();
        if self.by_name(&name).is_some() {
            return None;
        }
        let id = TableId(self.tables.len() + 1);
        self.tables.push(Table {
            id,
            name,
            attributes,
        });
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Tables in declaration order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Table> {
        self.tables.iter()
    }

    /// All identifiers in declaration order.
    pub fn ids(&self) -> Vec<TableId> {
        self.tables.iter().map(Table::id).collect()
    }

    pub fn get(&self, id: TableId) -> Option<&Table> {
        // Identifiers are contiguous, so the position is id - 1.
        id.0.checked_sub(1).and_then(|idx| self.tables.get(idx))
    }

    pub fn contains(&self, id: TableId) -> bool {
        self.get(id).is_some()
    }

    pub fn by_name(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

impl<'a> IntoIterator for &'a Catalogue {
    type Item = &'a Table;
    type IntoIter = std::slice::Iter<'a, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
