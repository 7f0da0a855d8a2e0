use chrono::{DateTime, SecondsFormat, Utc};

/// Extension given to every stored image, whatever the upstream content type.
pub const IMAGE_EXTENSION: &str = "jpg";

/// Single entry of the image catalog.
///
/// The timestamp is kept as the string that was written, so entries with
/// timestamps we can't parse still survive a load/store cycle. Fields other
/// than `url` and `timestamp` are carried along in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ImageRecord {
    pub url: String,
    pub timestamp: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ImageRecord {
    pub fn new(url: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            timestamp: format_timestamp(captured_at),
            extra: Default::default(),
        }
    }

    /// Parsed capture instant, `None` if the stored string isn't valid
    /// RFC 3339.
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Name of the image file on disk, e.g. `2024-05-01T10:00:00.000Z.jpg`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.timestamp, IMAGE_EXTENSION)
    }
}

/// Formats an instant as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Orders records newest first and keeps at most `count` of them.
///
/// Comparison is done on parsed instants. Records with unparseable
/// timestamps end up after all the others; ties keep their table order.
pub fn newest_first(mut records: Vec<ImageRecord>, count: usize) -> Vec<ImageRecord> {
    records.sort_by_key(|r| std::cmp::Reverse(r.captured_at()));
    records.truncate(count);
    records
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record(url: &str, timestamp: &str) -> ImageRecord {
        ImageRecord {
            url: url.to_string(),
            timestamp: timestamp.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn timestamp_uses_millisecond_utc_format() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 7).unwrap()
            + chrono::Duration::milliseconds(42);
        let rec = ImageRecord::new("http://a/cat.png", at);
        assert_eq!(rec.timestamp, "2024-05-01T10:00:07.042Z");
        assert_eq!(rec.file_name(), "2024-05-01T10:00:07.042Z.jpg");
        assert_eq!(rec.captured_at(), Some(at));
    }

    #[test]
    fn serializes_with_url_then_timestamp() {
        let rec = record("http://a/1", "2024-05-01T10:00:00.000Z");
        assert_eq!(
            serde_json::to_string(&rec).unwrap(),
            r#"{"url":"http://a/1","timestamp":"2024-05-01T10:00:00.000Z"}"#
        );
    }

    #[test]
    fn unknown_fields_are_kept() {
        let raw = r#"{"url":"http://a/1","timestamp":"2024-05-01T10:00:00.000Z","note":"kept"}"#;
        let rec: ImageRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(rec.extra["note"], "kept");
        assert_eq!(serde_json::to_string(&rec).unwrap(), raw);
    }

    #[test]
    fn newest_first_sorts_by_instant_and_truncates() {
        let records = vec![
            record("t1", "2024-05-01T10:00:00.000Z"),
            record("t3", "2024-05-01T12:00:00.000Z"),
            record("t2", "2024-05-01T11:00:00.000Z"),
        ];
        let urls: Vec<_> = newest_first(records, 2)
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(urls, vec!["t3", "t2"]);
    }

    #[test]
    fn newest_first_compares_instants_across_offsets() {
        // 11:30+02:00 is 09:30Z, older than 10:00Z despite sorting later
        // as a string.
        let records = vec![
            record("offset", "2024-05-01T11:30:00.000+02:00"),
            record("utc", "2024-05-01T10:00:00.000Z"),
        ];
        let urls: Vec<_> = newest_first(records, 10)
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(urls, vec!["utc", "offset"]);
    }

    #[test]
    fn unparseable_timestamps_sort_last() {
        let records = vec![
            record("junk", "yesterday"),
            record("old", "2020-01-01T00:00:00.000Z"),
        ];
        let urls: Vec<_> = newest_first(records, 10)
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(urls, vec!["old", "junk"]);
    }

    #[test]
    fn count_larger_than_table_returns_everything() {
        let records = vec![record("only", "2024-05-01T10:00:00.000Z")];
        assert_eq!(newest_first(records, 5).len(), 1);
        assert!(newest_first(vec![], 5).is_empty());
    }
}
