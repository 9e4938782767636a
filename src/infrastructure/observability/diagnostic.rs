const MAX_VISIBLE_CHARS: usize = 600;

/// Prepares subprocess stderr or a remote error body for logging.
///
/// Transcoders print the actual error last, so long output keeps its tail. Credentials that
/// may be echoed back by an endpoint are redacted.
pub fn sanitize_diagnostic(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let char_count = trimmed.chars().count();
    let visible = if char_count > MAX_VISIBLE_CHARS {
        let tail: String = trimmed.chars().skip(char_count - MAX_VISIBLE_CHARS).collect();
        format!("...{} ({} chars total)", tail, char_count)
    } else {
        trimmed.to_string()
    };

    redact_credentials(&visible)
}

fn redact_credentials(text: &str) -> String {
    // Lowercase; matched against an ASCII-lowercased copy whose byte offsets equal the original's.
    const MARKERS: [&str; 4] = ["bearer ", "api_key=", "api-key: ", "token="];

    let mut result = text.to_string();
    for marker in MARKERS {
        let mut search_from = 0;
        while let Some(found) = result.to_ascii_lowercase()[search_from..].find(marker) {
            let value_start = search_from + found + marker.len();
            let value_end = result[value_start..]
                .find(|c: char| c.is_whitespace() || matches!(c, '&' | '"' | '\'' | ','))
                .map(|i| value_start + i)
                .unwrap_or(result.len());
            result.replace_range(value_start..value_end, "[REDACTED]");
            search_from = value_start + "[REDACTED]".len();
        }
    }

    result
}
