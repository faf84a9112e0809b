//! Helpers for input cleanup, session directories, and log formatting.

use crate::error::DirectoryError;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Fixed subfolder of the destination root that holds every session.
pub const SESSIONS_FOLDER: &str = "web scrapped files";

/// Session directory names are the run's start time at one-second granularity.
pub const SESSION_NAME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Strip surrounding whitespace, then `"` and `'` characters from a
/// user-supplied destination path.
pub fn clean_destination(raw: &str) -> PathBuf {
    PathBuf::from(raw.trim().trim_matches('"').trim_matches('\''))
}

/// Split free-form text into URLs, one per line. Lines are trimmed and blank
/// lines dropped; order is kept.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Percentage of the run completed after `processed` of `total` URLs.
pub fn progress_percent(processed: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    processed as f64 / total as f64 * 100.0
}

/// Create `<root>/web scrapped files/<YYYYMMDD_HHMMSS>/`.
///
/// The sessions folder is created with its parents if missing. The session
/// directory itself must not exist yet: a collision with an earlier run in
/// the same second is an error, so the earlier run's files are never mixed
/// with this one's.
#[instrument(level = "info", skip_all, fields(root = %root.display()))]
pub async fn create_session_dir(
    root: &Path,
    started_at: DateTime<Local>,
) -> Result<PathBuf, DirectoryError> {
    let sessions = root.join(SESSIONS_FOLDER);
    fs::create_dir_all(&sessions)
        .await
        .map_err(|source| DirectoryError {
            path: sessions.clone(),
            source,
        })?;

    let session = sessions.join(started_at.format(SESSION_NAME_FORMAT).to_string());
    fs::create_dir(&session)
        .await
        .map_err(|source| DirectoryError {
            path: session.clone(),
            source,
        })?;

    info!(path = %session.display(), "Created session directory");
    Ok(session)
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 5, 6, 14, 30, 5).unwrap()
    }

    #[test]
    fn test_clean_destination_strips_quotes() {
        assert_eq!(
            clean_destination("  \"C:\\Users\\me\\Desktop\"  "),
            PathBuf::from("C:\\Users\\me\\Desktop")
        );
        assert_eq!(clean_destination("'/tmp/out'"), PathBuf::from("/tmp/out"));
        assert_eq!(clean_destination("/tmp/out"), PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_parse_url_list() {
        let urls = parse_url_list("https://a.example\n\n  https://b.example  \r\nhttps://c.example\n");
        assert_eq!(
            urls,
            vec!["https://a.example", "https://b.example", "https://c.example"]
        );
        assert!(parse_url_list("  \n ").is_empty());
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0, 4), 0.0);
        assert_eq!(progress_percent(1, 4), 25.0);
        assert_eq!(progress_percent(4, 4), 100.0);
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let result = truncate_for_log("ééé", 1);
        assert_eq!(result, "é…(+4 bytes)");
    }

    #[tokio::test]
    async fn test_create_session_dir_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let session = create_session_dir(tmp.path(), fixed_time()).await.unwrap();
        assert_eq!(
            session,
            tmp.path().join("web scrapped files").join("20250506_143005")
        );
        assert!(session.is_dir());
    }

    #[tokio::test]
    async fn test_create_session_dir_collision_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let first = create_session_dir(tmp.path(), fixed_time()).await.unwrap();
        std::fs::write(first.join("table_data_1.csv"), "a,b\n").unwrap();

        let err = create_session_dir(tmp.path(), fixed_time()).await.unwrap_err();
        assert_eq!(err.path, first);
        assert_eq!(
            std::fs::read_to_string(first.join("table_data_1.csv")).unwrap(),
            "a,b\n"
        );
    }

    #[tokio::test]
    async fn test_create_session_dir_under_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        assert!(create_session_dir(&blocker, fixed_time()).await.is_err());
    }
}
