use std::time::SystemTime;

/// RFC 3339 with whole-second precision. The fixed width keeps the strings
/// lexicographically ordered by time, which the stores rely on for sorting.
pub fn formatted_now() -> String {
    humantime::format_rfc3339_seconds(SystemTime::now()).to_string()
}
