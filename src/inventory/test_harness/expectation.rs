//! Declarative schema contracts
//!
//! A [`SchemaExpectation`] describes one table's intended structure: columns
//! with semantic types, named check and unique constraints, and foreign keys.
//! Contracts are built once per entity (see `contracts`) and never mutated
//! afterwards, so every test for a table observes the same contract.
//!
//! Types are semantic categories, not vendor type tokens: `int4` and
//! `integer` are both [`ColumnType::Integer`], `varchar(100)` is
//! `Text { max_length: Some(100) }`, `numeric(5,2)` is
//! `Decimal { precision: 5, scale: 2 }`, and a Postgres enum compares by its
//! type name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Semantic column type used for expectation/live comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Any integer width
    Integer,
    /// Character data; bounded when `max_length` is set
    Text { max_length: Option<u32> },
    Boolean,
    /// Timestamp with or without time zone
    Timestamp,
    Date,
    /// Any floating-point width
    Float,
    /// Fixed-point numeric; precision AND scale are part of the contract
    Decimal { precision: u32, scale: u32 },
    Uuid,
    /// Enumerated string set, identified by the database type name
    Enum { type_name: String },
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Text { max_length: Some(n) } => write!(f, "text({})", n),
            ColumnType::Text { max_length: None } => write!(f, "text"),
            ColumnType::Boolean => write!(f, "boolean"),
            ColumnType::Timestamp => write!(f, "timestamp"),
            ColumnType::Date => write!(f, "date"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::Decimal { precision, scale } => {
                write!(f, "decimal({},{})", precision, scale)
            }
            ColumnType::Uuid => write!(f, "uuid"),
            ColumnType::Enum { type_name } => write!(f, "enum({})", type_name),
        }
    }
}

/// Expected shape of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnExpectation {
    pub name: String,

    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Columns are NOT NULL unless marked nullable
    #[serde(default)]
    pub nullable: bool,

    /// Server-side default, compared after normalization; `None` means the
    /// default is not part of the contract
    #[serde(default)]
    pub default: Option<String>,
}

impl ColumnExpectation {
    fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            default: None,
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    /// Bounded character column
    pub fn text(name: impl Into<String>, max_length: u32) -> Self {
        Self::new(
            name,
            ColumnType::Text {
                max_length: Some(max_length),
            },
        )
    }

    /// Unbounded character column
    pub fn unbounded_text(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Text { max_length: None })
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Boolean)
    }

    pub fn timestamp(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Timestamp)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Date)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Float)
    }

    pub fn decimal(name: impl Into<String>, precision: u32, scale: u32) -> Self {
        Self::new(name, ColumnType::Decimal { precision, scale })
    }

    pub fn uuid(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Uuid)
    }

    pub fn enumerated(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(
            name,
            ColumnType::Enum {
                type_name: type_name.into(),
            },
        )
    }

    /// Mark the column nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Require a server-side default (compared after normalization).
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Expected foreign key: a constrained column set referencing one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyExpectation {
    pub constrained_columns: BTreeSet<String>,
    pub referenced_table: String,
}

impl fmt::Display for ForeignKeyExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<&str> = self.constrained_columns.iter().map(|c| c.as_str()).collect();
        write!(f, "({}) -> {}", columns.join(", "), self.referenced_table)
    }
}

/// Declarative contract for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaExpectation {
    pub table: String,
    pub columns: Vec<ColumnExpectation>,
    pub check_constraints: BTreeSet<String>,
    pub unique_constraints: BTreeSet<String>,
    pub foreign_keys: Vec<ForeignKeyExpectation>,
}

impl SchemaExpectation {
    pub fn for_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            check_constraints: BTreeSet::new(),
            unique_constraints: BTreeSet::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnExpectation) -> Self {
        self.columns.push(column);
        self
    }

    /// Require a named check constraint (extra live constraints tolerated).
    pub fn check(mut self, name: impl Into<String>) -> Self {
        self.check_constraints.insert(name.into());
        self
    }

    /// Require a named unique constraint (extra live constraints tolerated).
    pub fn unique(mut self, name: impl Into<String>) -> Self {
        self.unique_constraints.insert(name.into());
        self
    }

    /// Require a foreign key from `columns` to `referenced_table`.
    pub fn foreign_key<I, S>(mut self, columns: I, referenced_table: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.foreign_keys.push(ForeignKeyExpectation {
            constrained_columns: columns.into_iter().map(Into::into).collect(),
            referenced_table: referenced_table.into(),
        });
        self
    }

    /// Look up an expected column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnExpectation> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_display() {
        assert_eq!(ColumnType::Integer.to_string(), "integer");
        assert_eq!(
            ColumnType::Text { max_length: Some(100) }.to_string(),
            "text(100)"
        );
        assert_eq!(ColumnType::Text { max_length: None }.to_string(), "text");
        assert_eq!(
            ColumnType::Decimal { precision: 5, scale: 2 }.to_string(),
            "decimal(5,2)"
        );
        assert_eq!(
            ColumnType::Enum { type_name: "status_enum".to_string() }.to_string(),
            "enum(status_enum)"
        );
    }

    #[test]
    fn test_columns_default_to_not_null() {
        let column = ColumnExpectation::integer("id");
        assert!(!column.nullable);
        assert!(column.default.is_none());

        let column = ColumnExpectation::integer("parent_id").nullable();
        assert!(column.nullable);
    }

    #[test]
    fn test_expectation_builder() {
        let expectation = SchemaExpectation::for_table("category")
            .column(ColumnExpectation::integer("id"))
            .column(ColumnExpectation::text("name", 100))
            .check("category_name_length_check")
            .unique("uq_category_slug")
            .foreign_key(["parent_id"], "category");

        assert_eq!(expectation.table, "category");
        assert_eq!(expectation.columns.len(), 2);
        assert!(expectation
            .check_constraints
            .contains("category_name_length_check"));
        assert_eq!(expectation.foreign_keys.len(), 1);
        assert_eq!(
            expectation.foreign_keys[0].to_string(),
            "(parent_id) -> category"
        );
        assert!(expectation.get_column("name").is_some());
        assert!(expectation.get_column("slug").is_none());
    }
}
