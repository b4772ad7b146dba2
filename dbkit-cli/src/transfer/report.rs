//! Per-run outcome of a transfer

/// One row that failed during the run
#[derive(Debug, Clone)]
pub struct RowFailure {
    /// 1-based position of the row in the source result set
    pub row: usize,
    /// Display form of the row's dedupe key, when one was computed
    pub dedupe_key: Option<String>,
    /// What went wrong
    pub error: String,
}

/// Accumulated outcome of one transfer run
#[derive(Debug, Clone, Default)]
pub struct TransferReport {
    pub rows_read: u64,
    pub rows_skipped: u64,
    pub rows_inserted: u64,
    failures: Vec<RowFailure>,
}

impl TransferReport {
    /// Create an empty report
    pub fn new() -> Self {
        TransferReport::default()
    }

    /// Record a per-row failure without aborting the batch
    pub fn record_failure(&mut self, row: usize, dedupe_key: Option<String>, error: String) {
        self.failures.push(RowFailure {
            row,
            dedupe_key,
            error,
        });
    }

    /// All per-row failures, in source order
    pub fn failures(&self) -> &[RowFailure] {
        &self.failures
    }

    /// Check whether the run completed without any row-level failure
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// The first error encountered, if any
    pub fn first_error(&self) -> Option<&str> {
        self.failures.first().map(|f| f.error.as_str())
    }
}

impl std::fmt::Display for TransferReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "read {} row(s): {} skipped, {} inserted, {} failed",
            self.rows_read,
            self.rows_skipped,
            self.rows_inserted,
            self.failures.len()
        )?;
        for failure in &self.failures {
            write!(f, "\n  row {}", failure.row)?;
            if let Some(key) = &failure.dedupe_key {
                write!(f, " (key {})", key)?;
            }
            write!(f, ": {}", failure.error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_report_summary() {
        let report = TransferReport {
            rows_read: 3,
            rows_skipped: 1,
            rows_inserted: 2,
            ..TransferReport::default()
        };
        assert!(report.is_clean());
        assert_eq!(report.first_error(), None);
        assert_eq!(
            report.to_string(),
            "read 3 row(s): 1 skipped, 2 inserted, 0 failed"
        );
    }

    #[test]
    fn test_failures_listed_in_order() {
        let mut report = TransferReport::new();
        report.rows_read = 3;
        report.rows_inserted = 1;
        report.record_failure(2, Some("2024-03-01".into()), "insert failed".into());
        report.record_failure(3, None, "bad payload".into());

        assert!(!report.is_clean());
        assert_eq!(report.first_error(), Some("insert failed"));
        let rendered = report.to_string();
        assert!(rendered.contains("row 2 (key 2024-03-01): insert failed"));
        assert!(rendered.contains("row 3: bad payload"));
    }
}
