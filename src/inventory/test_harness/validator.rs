//! Schema validation engine
//!
//! Diffs a live [`TableSnapshot`] against a declarative
//! [`SchemaExpectation`]. The diff functions are pure so the comparison rules
//! are testable without a database; [`SchemaValidator`] wraps them with fresh
//! catalog introspection per assertion round.
//!
//! Every finding carries full identity (table, category, element, expected vs
//! actual) so a failure can be diagnosed without re-running. Check and unique
//! constraints are subset tests: unrelated live constraints are tolerated.
//! Foreign keys are checked one expected key at a time; presence of one key
//! never satisfies an expectation for another.

use super::error::HarnessResult;
use super::expectation::{ColumnExpectation, ForeignKeyExpectation, SchemaExpectation};
use super::inspector::{ColumnSnapshot, ForeignKeySnapshot, SchemaInspector, TableSnapshot};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ============================================================================
// Findings
// ============================================================================

/// Which part of the contract a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectationCategory {
    Table,
    Column,
    CheckConstraint,
    UniqueConstraint,
    ForeignKey,
}

impl fmt::Display for ExpectationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExpectationCategory::Table => "table",
            ExpectationCategory::Column => "column",
            ExpectationCategory::CheckConstraint => "check constraint",
            ExpectationCategory::UniqueConstraint => "unique constraint",
            ExpectationCategory::ForeignKey => "foreign key",
        };
        write!(f, "{}", s)
    }
}

/// One violated expectation, with enough identity to act on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mismatch {
    pub table: String,
    pub category: ExpectationCategory,
    /// Name of the missing or differing element
    pub element: String,
    /// Expected-vs-actual detail
    pub detail: String,
}

impl Mismatch {
    fn new(
        table: &str,
        category: ExpectationCategory,
        element: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            table: table.to_string(),
            category,
            element: element.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} '{}': {}",
            self.table, self.category, self.element, self.detail
        )
    }
}

/// Outcome of validating one table against its contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub table: String,
    /// ISO 8601 timestamp of the assertion round
    pub checked_at: String,
    pub findings: Vec<Mismatch>,
}

impl ValidationReport {
    fn new(table: &str, findings: Vec<Mismatch>) -> Self {
        Self {
            table: table.to_string(),
            checked_at: chrono::Utc::now().to_rfc3339(),
            findings,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Panic with the full finding list unless the report is clean.
    ///
    /// This is the bridge to the test framework: schema mismatches are test
    /// failures, not harness errors.
    pub fn assert_clean(&self) {
        if !self.is_clean() {
            panic!("{}", self.format_text());
        }
    }

    /// Human-readable summary, one line per finding.
    pub fn format_text(&self) -> String {
        if self.is_clean() {
            return format!("table '{}' matches its contract", self.table);
        }
        let mut output = format!(
            "table '{}' violates its contract ({} finding(s)):\n",
            self.table,
            self.findings.len()
        );
        for finding in &self.findings {
            output.push_str(&format!("  - {}\n", finding));
        }
        output
    }

    /// Pretty JSON for machine consumers.
    pub fn format_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            log::error!("Failed to serialize validation report: {}", e);
            "{}".to_string()
        })
    }
}

// ============================================================================
// Pure diff functions
// ============================================================================

/// Compare expected columns field-by-field against the live column map.
///
/// Reports missing columns, semantic type mismatches, nullability flips,
/// default differences, and live columns the contract does not know about.
pub fn diff_columns(
    table: &str,
    expected: &[ColumnExpectation],
    actual: &BTreeMap<String, ColumnSnapshot>,
) -> Vec<Mismatch> {
    let mut findings = Vec::new();

    for column in expected {
        let Some(live) = actual.get(&column.name) else {
            findings.push(Mismatch::new(
                table,
                ExpectationCategory::Column,
                &column.name,
                "expected column is not present in the live schema",
            ));
            continue;
        };

        if live.column_type != column.column_type {
            findings.push(Mismatch::new(
                table,
                ExpectationCategory::Column,
                &column.name,
                format!(
                    "type mismatch: expected {}, found {}",
                    column.column_type, live.column_type
                ),
            ));
        }

        if live.nullable != column.nullable {
            let detail = if column.nullable {
                "expected nullable, found NOT NULL"
            } else {
                "expected NOT NULL, found nullable"
            };
            findings.push(Mismatch::new(
                table,
                ExpectationCategory::Column,
                &column.name,
                detail,
            ));
        }

        if let Some(ref expected_default) = column.default {
            match live.default {
                Some(ref live_default) if live_default == expected_default => {}
                Some(ref live_default) => findings.push(Mismatch::new(
                    table,
                    ExpectationCategory::Column,
                    &column.name,
                    format!(
                        "default mismatch: expected '{}', found '{}'",
                        expected_default, live_default
                    ),
                )),
                None => findings.push(Mismatch::new(
                    table,
                    ExpectationCategory::Column,
                    &column.name,
                    format!("expected default '{}', found none", expected_default),
                )),
            }
        }
    }

    let expected_names: BTreeSet<&str> = expected.iter().map(|c| c.name.as_str()).collect();
    for live_name in actual.keys() {
        if !expected_names.contains(live_name.as_str()) {
            findings.push(Mismatch::new(
                table,
                ExpectationCategory::Column,
                live_name,
                "live column is not part of the contract",
            ));
        }
    }

    findings
}

/// Subset test: every expected check constraint must be present by name.
pub fn diff_check_constraints(
    table: &str,
    expected: &BTreeSet<String>,
    actual: &BTreeSet<String>,
) -> Vec<Mismatch> {
    expected
        .difference(actual)
        .map(|name| {
            Mismatch::new(
                table,
                ExpectationCategory::CheckConstraint,
                name,
                "expected check constraint is not present",
            )
        })
        .collect()
}

/// Subset test: every expected unique constraint must be present by name.
pub fn diff_unique_constraints(
    table: &str,
    expected: &BTreeSet<String>,
    actual: &BTreeSet<String>,
) -> Vec<Mismatch> {
    expected
        .difference(actual)
        .map(|name| {
            Mismatch::new(
                table,
                ExpectationCategory::UniqueConstraint,
                name,
                "expected unique constraint is not present",
            )
        })
        .collect()
}

/// Every expected foreign key must match independently: a live key counts
/// only when its constrained column set AND referenced table both match.
pub fn diff_foreign_keys(
    table: &str,
    expected: &[ForeignKeyExpectation],
    actual: &[ForeignKeySnapshot],
) -> Vec<Mismatch> {
    let mut findings = Vec::new();
    for key in expected {
        let satisfied = actual.iter().any(|live| {
            live.constrained_columns == key.constrained_columns
                && live.referenced_table == key.referenced_table
        });
        if !satisfied {
            findings.push(Mismatch::new(
                table,
                ExpectationCategory::ForeignKey,
                key.to_string(),
                "no live foreign key matches this column set and referenced table",
            ));
        }
    }
    findings
}

/// Diff a full snapshot against a contract.
pub fn diff_table(expectation: &SchemaExpectation, snapshot: &TableSnapshot) -> Vec<Mismatch> {
    let table = expectation.table.as_str();
    let mut findings = diff_columns(table, &expectation.columns, &snapshot.columns);
    findings.extend(diff_check_constraints(
        table,
        &expectation.check_constraints,
        &snapshot.check_constraints,
    ));
    findings.extend(diff_unique_constraints(
        table,
        &expectation.unique_constraints,
        &snapshot.unique_constraints,
    ));
    findings.extend(diff_foreign_keys(
        table,
        &expectation.foreign_keys,
        &snapshot.foreign_keys,
    ));
    findings
}

// ============================================================================
// Validator
// ============================================================================

/// Validates live tables against declarative contracts.
///
/// Each operation introspects the catalog fresh; nothing is cached across
/// assertion rounds.
pub struct SchemaValidator<'a> {
    pool: &'a PgPool,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    fn inspector(&self) -> SchemaInspector<'a> {
        SchemaInspector::new(self.pool)
    }

    /// Whether the table exists at all.
    pub async fn table_exists(&self, table: &str) -> HarnessResult<bool> {
        self.inspector().table_exists(table).await
    }

    /// Column comparison only.
    pub async fn check_columns(
        &self,
        expectation: &SchemaExpectation,
    ) -> HarnessResult<Vec<Mismatch>> {
        let snapshot = self.inspector().snapshot(&expectation.table).await?;
        Ok(diff_columns(
            &expectation.table,
            &expectation.columns,
            &snapshot.columns,
        ))
    }

    /// Check-constraint comparison only.
    pub async fn check_check_constraints(
        &self,
        expectation: &SchemaExpectation,
    ) -> HarnessResult<Vec<Mismatch>> {
        let snapshot = self.inspector().snapshot(&expectation.table).await?;
        Ok(diff_check_constraints(
            &expectation.table,
            &expectation.check_constraints,
            &snapshot.check_constraints,
        ))
    }

    /// Unique-constraint comparison only.
    pub async fn check_unique_constraints(
        &self,
        expectation: &SchemaExpectation,
    ) -> HarnessResult<Vec<Mismatch>> {
        let snapshot = self.inspector().snapshot(&expectation.table).await?;
        Ok(diff_unique_constraints(
            &expectation.table,
            &expectation.unique_constraints,
            &snapshot.unique_constraints,
        ))
    }

    /// Foreign-key comparison only, each expected key checked independently.
    pub async fn check_foreign_keys(
        &self,
        expectation: &SchemaExpectation,
    ) -> HarnessResult<Vec<Mismatch>> {
        let snapshot = self.inspector().snapshot(&expectation.table).await?;
        Ok(diff_foreign_keys(
            &expectation.table,
            &expectation.foreign_keys,
            &snapshot.foreign_keys,
        ))
    }

    /// Run every category against a fresh snapshot.
    ///
    /// A missing table short-circuits with a single table-level finding; the
    /// remaining categories would only produce noise.
    pub async fn validate(
        &self,
        expectation: &SchemaExpectation,
    ) -> HarnessResult<ValidationReport> {
        let inspector = self.inspector();

        if !inspector.table_exists(&expectation.table).await? {
            return Ok(ValidationReport::new(
                &expectation.table,
                vec![Mismatch::new(
                    &expectation.table,
                    ExpectationCategory::Table,
                    &expectation.table,
                    "table does not exist in the live schema",
                )],
            ));
        }

        let snapshot = inspector.snapshot(&expectation.table).await?;
        let findings = diff_table(expectation, &snapshot);
        if findings.is_empty() {
            log::debug!("Table '{}' matches its contract", expectation.table);
        } else {
            log::warn!(
                "Table '{}' has {} contract finding(s)",
                expectation.table,
                findings.len()
            );
        }
        Ok(ValidationReport::new(&expectation.table, findings))
    }
}
