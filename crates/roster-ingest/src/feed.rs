//! Admission feed parsing and programme filtering.
//!
//! The portal scraper leaves one JSON export per admission category, an
//! array of rows. Parsing is deliberately lenient about extra fields so
//! a new export column never breaks ingestion.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// One row of an admission export.
#[derive(Debug, Clone, Deserialize)]
pub struct AdmissionRow {
    pub applicant_id: String,
    pub full_name: String,
    pub programme: String,
}

/// Read an admission export file.
pub async fn read_feed(path: &Path) -> anyhow::Result<Vec<AdmissionRow>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read feed file {}", path.display()))?;

    let rows: Vec<AdmissionRow> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse feed file {}", path.display()))?;

    Ok(rows)
}

/// Check a row against the target programme filter.
///
/// Case-insensitive substring match; an empty filter keeps every row.
pub fn matches_programme(row: &AdmissionRow, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }

    row.programme
        .to_lowercase()
        .contains(&filter.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn row(programme: &str) -> AdmissionRow {
        AdmissionRow {
            applicant_id: "20412345".to_string(),
            full_name: "Ama Mensah".to_string(),
            programme: programme.to_string(),
        }
    }

    #[test]
    fn test_programme_filter_case_insensitive() {
        let r = row("BSc COMPUTER Engineering");
        assert!(matches_programme(&r, "computer engineering"));
        assert!(matches_programme(&r, "Computer"));
        assert!(!matches_programme(&r, "electrical"));
    }

    #[test]
    fn test_empty_filter_keeps_all() {
        assert!(matches_programme(&row("BSc Petroleum Engineering"), ""));
    }

    #[tokio::test]
    async fn test_read_feed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"applicant_id": "20412345", "full_name": "Ama Mensah", "programme": "BSc Computer Engineering", "hall": "Independence"}},
                {{"applicant_id": "20467890", "full_name": "Kofi Boateng", "programme": "BSc Electrical Engineering"}}
            ]"#
        )
        .unwrap();

        let rows = read_feed(file.path()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].applicant_id, "20412345");
        assert_eq!(rows[1].programme, "BSc Electrical Engineering");
    }

    #[tokio::test]
    async fn test_read_feed_missing_file() {
        let result = read_feed(Path::new("/nonexistent/feed.json")).await;
        assert!(result.is_err());
    }
}
