//! Transfer run orchestration: read, dedupe, transform, insert, commit

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::any::AnyArguments;
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Row, Transaction};

use super::report::TransferReport;
use super::transform::transform_row;
use super::types::{SourceRow, TransferSpec, Value};

/// Run one transfer: a full pass over the source result set into the
/// destination table, bounded by a single commit/rollback
///
/// A connection failure on either side is fatal for the run. A per-row
/// transform or insert failure is recorded in the report and the batch
/// continues. The commit happens once at the end, and only if at least
/// one insert occurred.
pub async fn run_transfer(
    source: &AnyPool,
    dest: &AnyPool,
    spec: &TransferSpec,
) -> Result<TransferReport> {
    spec.validate()?;
    let dedupe = spec.dedupe_key();

    let select_sql = format!("SELECT * FROM {}", spec.source_table);
    let rows = sqlx::query(&select_sql)
        .fetch_all(source)
        .await
        .with_context(|| format!("failed to read rows from '{}'", spec.source_table))?;
    log::info!("read {} row(s) from '{}'", rows.len(), spec.source_table);

    let insert_sql = build_insert_sql(spec);
    let probe_sql = format!(
        "SELECT COUNT(*) FROM {} WHERE {} = ?",
        spec.target_table, dedupe.target_column
    );

    let mut report = TransferReport::new();
    // One transaction bounds the run; dedupe probes run on it so rows
    // inserted earlier in the batch are visible to later probes.
    let mut tx = dest
        .begin()
        .await
        .context("failed to open a destination transaction")?;

    for (idx, any_row) in rows.iter().enumerate() {
        let position = idx + 1;
        report.rows_read += 1;

        let row = SourceRow::from_any(any_row);
        let key = row
            .get(&dedupe.source_column)
            .cloned()
            .unwrap_or(Value::Null);
        let key_display = (!key.is_null()).then(|| key.to_string());

        let existing = match count_existing(&mut tx, &probe_sql, &key).await {
            Ok(n) => n,
            Err(err) => {
                report.record_failure(
                    position,
                    key_display,
                    format!("dedupe probe failed: {}", err),
                );
                continue;
            }
        };
        if existing > 0 {
            log::debug!("row {} already present (key {}), skipping", position, key);
            report.rows_skipped += 1;
            continue;
        }

        let transformed = match transform_row(&spec.columns, &row, Utc::now()) {
            Ok(t) => t,
            Err(err) => {
                report.record_failure(position, key_display, err.to_string());
                continue;
            }
        };

        match insert_row(&mut tx, &insert_sql, transformed.values()).await {
            Ok(()) => report.rows_inserted += 1,
            Err(err) => {
                report.record_failure(position, key_display, format!("insert failed: {}", err));
            }
        }
    }

    if report.rows_inserted > 0 {
        tx.commit()
            .await
            .context("failed to commit the destination transaction")?;
    } else {
        tx.rollback()
            .await
            .context("failed to roll back the destination transaction")?;
    }

    Ok(report)
}

/// Parameterized insert in mapping order; identifiers were validated by
/// the spec, values are always bound, never interpolated
fn build_insert_sql(spec: &TransferSpec) -> String {
    let columns = spec.target_columns().join(", ");
    let placeholders = vec!["?"; spec.columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        spec.target_table, columns, placeholders
    )
}

async fn count_existing(
    tx: &mut Transaction<'_, Any>,
    sql: &str,
    key: &Value,
) -> sqlx::Result<i64> {
    let row = bind_value(sqlx::query(sql), key)
        .fetch_one(&mut **tx)
        .await?;
    row.try_get(0)
}

async fn insert_row(
    tx: &mut Transaction<'_, Any>,
    sql: &str,
    values: &[Value],
) -> sqlx::Result<()> {
    let mut query = sqlx::query(sql);
    for value in values {
        query = bind_value(query, value);
    }
    query.execute(&mut **tx).await?;
    Ok(())
}

fn bind_value<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    value: &Value,
) -> Query<'q, Any, AnyArguments<'q>> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Int(i) => query.bind(*i),
        Value::Float(f) => query.bind(*f),
        Value::DateTime(dt) => query.bind(dt.to_rfc3339()),
        Value::String(s) => query.bind(s.clone()),
        Value::Json(v) => query.bind(v.to_string()),
    }
}
