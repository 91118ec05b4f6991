//! Live schema introspection
//!
//! Reads one table's actual structure from the PostgreSQL catalog:
//! `information_schema` for existence and columns, `pg_constraint` joins for
//! check constraints, unique constraints, and foreign keys. A
//! [`TableSnapshot`] is recomputed on every query and discarded after one
//! assertion round; migrations may have altered the schema between tests, so
//! nothing is cached. All queries are read-only.

use super::error::HarnessResult;
use super::expectation::ColumnType;
use sqlx::{PgPool, Row};
use std::collections::{BTreeMap, BTreeSet};

/// Live shape of a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSnapshot {
    pub column_type: ColumnType,
    pub nullable: bool,
    /// Normalized server default, if any (casts and quoting stripped)
    pub default: Option<String>,
}

/// Live foreign key: constraint name, constrained column set, target table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeySnapshot {
    pub name: String,
    pub constrained_columns: BTreeSet<String>,
    pub referenced_table: String,
}

/// Everything the validator needs to know about one live table.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    pub table: String,
    pub columns: BTreeMap<String, ColumnSnapshot>,
    pub check_constraints: BTreeSet<String>,
    pub unique_constraints: BTreeSet<String>,
    pub foreign_keys: Vec<ForeignKeySnapshot>,
}

/// Catalog reader for one connection pool.
pub struct SchemaInspector<'a> {
    pool: &'a PgPool,
}

impl<'a> SchemaInspector<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Whether the table exists in the public schema.
    pub async fn table_exists(&self, table: &str) -> HarnessResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                 SELECT 1 FROM information_schema.tables
                 WHERE table_schema = 'public' AND table_name = $1
             )",
        )
        .bind(table)
        .fetch_one(self.pool)
        .await?;
        Ok(exists)
    }

    /// Introspect the full live shape of one table.
    pub async fn snapshot(&self, table: &str) -> HarnessResult<TableSnapshot> {
        Ok(TableSnapshot {
            table: table.to_string(),
            columns: self.columns(table).await?,
            check_constraints: self.constraint_names(table, 'c').await?,
            unique_constraints: self.constraint_names(table, 'u').await?,
            foreign_keys: self.foreign_keys(table).await?,
        })
    }

    async fn columns(&self, table: &str) -> HarnessResult<BTreeMap<String, ColumnSnapshot>> {
        let rows = sqlx::query(
            "SELECT column_name::text,
                    udt_name::text,
                    is_nullable::text,
                    column_default::text,
                    character_maximum_length::int4,
                    numeric_precision::int4,
                    numeric_scale::int4
             FROM information_schema.columns
             WHERE table_schema = 'public' AND table_name = $1
             ORDER BY ordinal_position",
        )
        .bind(table)
        .fetch_all(self.pool)
        .await?;

        let mut columns = BTreeMap::new();
        for row in rows {
            let name: String = row.try_get("column_name")?;
            let udt: String = row.try_get("udt_name")?;
            let is_nullable: String = row.try_get("is_nullable")?;
            let default: Option<String> = row.try_get("column_default")?;
            let char_len: Option<i32> = row.try_get("character_maximum_length")?;
            let precision: Option<i32> = row.try_get("numeric_precision")?;
            let scale: Option<i32> = row.try_get("numeric_scale")?;

            columns.insert(
                name,
                ColumnSnapshot {
                    column_type: semantic_type(&udt, char_len, precision, scale),
                    nullable: is_nullable == "YES",
                    default: default.as_deref().map(normalize_default),
                },
            );
        }
        Ok(columns)
    }

    /// Named constraints of one kind ('c' = check, 'u' = unique).
    async fn constraint_names(
        &self,
        table: &str,
        contype: char,
    ) -> HarnessResult<BTreeSet<String>> {
        let rows = sqlx::query(
            "SELECT con.conname::text
             FROM pg_constraint con
             JOIN pg_class rel ON rel.oid = con.conrelid
             JOIN pg_namespace ns ON ns.oid = rel.relnamespace
             WHERE ns.nspname = 'public'
               AND rel.relname = $1
               AND con.contype::text = $2",
        )
        .bind(table)
        .bind(contype.to_string())
        .fetch_all(self.pool)
        .await?;

        let mut names = BTreeSet::new();
        for row in rows {
            names.insert(row.try_get::<String, _>("conname")?);
        }
        Ok(names)
    }

    async fn foreign_keys(&self, table: &str) -> HarnessResult<Vec<ForeignKeySnapshot>> {
        let rows = sqlx::query(
            "SELECT con.conname::text,
                    att.attname::text,
                    confrel.relname::text AS referenced_table
             FROM pg_constraint con
             JOIN pg_class rel ON rel.oid = con.conrelid
             JOIN pg_class confrel ON confrel.oid = con.confrelid
             JOIN pg_namespace ns ON ns.oid = rel.relnamespace
             JOIN unnest(con.conkey) WITH ORDINALITY AS k(attnum, ord) ON true
             JOIN pg_attribute att ON att.attrelid = rel.oid AND att.attnum = k.attnum
             WHERE ns.nspname = 'public'
               AND rel.relname = $1
               AND con.contype = 'f'
             ORDER BY con.conname, k.ord",
        )
        .bind(table)
        .fetch_all(self.pool)
        .await?;

        let mut keys: BTreeMap<String, ForeignKeySnapshot> = BTreeMap::new();
        for row in rows {
            let name: String = row.try_get("conname")?;
            let column: String = row.try_get("attname")?;
            let referenced: String = row.try_get("referenced_table")?;
            keys.entry(name.clone())
                .or_insert_with(|| ForeignKeySnapshot {
                    name,
                    constrained_columns: BTreeSet::new(),
                    referenced_table: referenced,
                })
                .constrained_columns
                .insert(column);
        }
        Ok(keys.into_values().collect())
    }
}

/// Map a vendor type token to its semantic category.
fn semantic_type(
    udt: &str,
    char_len: Option<i32>,
    precision: Option<i32>,
    scale: Option<i32>,
) -> ColumnType {
    match udt {
        "int2" | "int4" | "int8" => ColumnType::Integer,
        "varchar" | "bpchar" => ColumnType::Text {
            max_length: char_len.map(|n| n as u32),
        },
        "text" => ColumnType::Text { max_length: None },
        "bool" => ColumnType::Boolean,
        "timestamp" | "timestamptz" => ColumnType::Timestamp,
        "date" => ColumnType::Date,
        "float4" | "float8" => ColumnType::Float,
        "numeric" => ColumnType::Decimal {
            precision: precision.unwrap_or(0) as u32,
            scale: scale.unwrap_or(0) as u32,
        },
        "uuid" => ColumnType::Uuid,
        // Anything else is a user-defined type; enums land here
        other => ColumnType::Enum {
            type_name: other.to_string(),
        },
    }
}

/// Normalize a live `column_default` expression for comparison.
///
/// Postgres stores defaults with casts and quoting the contract never wrote:
/// `'oos'::status_enum` should compare equal to `oos`, `false` to `false`.
/// Function-call defaults like `nextval('category_id_seq'::regclass)` are
/// left alone.
fn normalize_default(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_cast = match trimmed.rfind("::") {
        Some(pos) => {
            let suffix = &trimmed[pos + 2..];
            let is_type_name = !suffix.is_empty()
                && suffix
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ');
            if is_type_name {
                &trimmed[..pos]
            } else {
                trimmed
            }
        }
        None => trimmed,
    };
    without_cast
        .trim_matches('\'')
        .to_string()
}
