use serde::{Deserialize, Serialize};

/// `time_local` layout, e.g. `17/Oct/2026:09:41:07 +0200`.
pub const TIME_LOCAL_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One synthesized access-log entry.
///
/// Every value is text, including the numeric-looking ones, so the
/// serialized line carries `"status":"200"` rather than `"status":200`.
/// Field order matches the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub time_local: String,
    pub remote_addr: String,
    pub request_method: String,
    pub request_uri: String,
    pub referrer: String,
    pub useragent: String,
    pub host: String,
    pub bytes_sent: String,
    pub status: String,
    pub upstream_response_time: String,
    pub request_time: String,
}

impl LogRecord {
    /// Serialized key names, in output order.
    pub const FIELDS: [&'static str; 11] = [
        "time_local",
        "remote_addr",
        "request_method",
        "request_uri",
        "referrer",
        "useragent",
        "host",
        "bytes_sent",
        "status",
        "upstream_response_time",
        "request_time",
    ];

    /// Field values paired with their key names, in output order.
    pub fn fields(&self) -> [(&'static str, &str); 11] {
        [
            ("time_local", self.time_local.as_str()),
            ("remote_addr", self.remote_addr.as_str()),
            ("request_method", self.request_method.as_str()),
            ("request_uri", self.request_uri.as_str()),
            ("referrer", self.referrer.as_str()),
            ("useragent", self.useragent.as_str()),
            ("host", self.host.as_str()),
            ("bytes_sent", self.bytes_sent.as_str()),
            ("status", self.status.as_str()),
            ("upstream_response_time", self.upstream_response_time.as_str()),
            ("request_time", self.request_time.as_str()),
        ]
    }

    /// True when no field is empty.
    pub fn is_complete(&self) -> bool {
        self.fields().iter().all(|(_, v)| !v.is_empty())
    }
}
