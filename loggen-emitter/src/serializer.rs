use loggen_core::error::Result;
use loggen_core::record::LogRecord;

/// Render one record as a newline-terminated JSON Lines entry.
///
/// The whole line is built in memory, so a failure here never leaves a
/// partial line on disk.
pub fn to_line(record: &LogRecord) -> Result<String> {
    let mut line = serde_json::to_string(record)?;
    line.push('\n');
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LogRecord {
        LogRecord {
            time_local: "17/Oct/2026:09:41:07 +0000".into(),
            remote_addr: "1.2.3.4".into(),
            request_method: "POST".into(),
            request_uri: "/uri".into(),
            referrer: "www.example.org/".into(),
            useragent: "Test-UA".into(),
            host: "say \"hi\"\n".into(),
            bytes_sent: "585".into(),
            status: "200".into(),
            upstream_response_time: "0.010".into(),
            request_time: "0.499".into(),
        }
    }

    #[test]
    fn line_is_single_json_object_with_trailing_newline() {
        let line = to_line(&record()).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1, "embedded newline must be escaped");
        let parsed: LogRecord = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed, record());
    }

    #[test]
    fn keys_appear_in_field_order() {
        let line = to_line(&record()).unwrap();
        let mut last = 0;
        for name in LogRecord::FIELDS {
            let at = line.find(&format!("\"{name}\":")).unwrap();
            assert!(at >= last, "{name} out of order");
            last = at;
        }
        assert!(line.starts_with(r#"{"time_local":"17/Oct/2026:09:41:07 +0000","#));
    }
}
