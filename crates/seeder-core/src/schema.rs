//! Static table descriptors.
//!
//! Seeded tables are fixed at compile time, so descriptors are `'static`
//! and cheap to pass around. Column order in a [`TableSpec`] is the order
//! in which every generated [`Row`](crate::Row) lays out its values.

/// Column type as far as the bulk loaders need to know it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Uuid,
    Text,
    Bool,
    Int4,
    Int8,
    Numeric,
    TimestampTz,
}

/// A single column in a table descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub column_type: ColumnType,
}

impl ColumnSpec {
    pub const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self { name, column_type }
    }
}

/// Target table: name plus ordered columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
}

impl TableSpec {
    pub const fn new(name: &'static str, columns: &'static [ColumnSpec]) -> Self {
        Self { name, columns }
    }

    /// Column names in row order.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Column types in row order.
    pub fn column_types(&self) -> Vec<ColumnType> {
        self.columns.iter().map(|c| c.column_type).collect()
    }

    /// Position of a column within a row.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

impl std::fmt::Display for TableSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGETS: TableSpec = TableSpec::new(
        "widgets",
        &[
            ColumnSpec::new("id", ColumnType::Uuid),
            ColumnSpec::new("label", ColumnType::Text),
            ColumnSpec::new("weight", ColumnType::Numeric),
        ],
    );

    #[test]
    fn test_column_lookup() {
        assert_eq!(WIDGETS.column_names(), vec!["id", "label", "weight"]);
        assert_eq!(WIDGETS.column_index("weight"), Some(2));
        assert_eq!(WIDGETS.column_index("missing"), None);
        assert_eq!(WIDGETS.width(), 3);
        assert_eq!(WIDGETS.to_string(), "widgets");
    }
}
