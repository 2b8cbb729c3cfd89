//! Field helpers for log lines and diagnostics

/// Truncate a string to at most `max_chars` characters.
///
/// Counts characters, not bytes, so multi-byte text never splits.
///
/// ```
/// use gatecheck::logging::truncate_chars;
///
/// assert_eq!(truncate_chars("hello world", 5), "hello");
/// assert_eq!(truncate_chars("héllo", 2), "hé");
/// assert_eq!(truncate_chars("hi", 10), "hi");
/// ```
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Short one-line preview of model output: first `max_chars` characters
/// with newlines flattened to spaces.
pub fn snippet(s: &str, max_chars: usize) -> String {
    truncate_chars(s, max_chars).replace(['\r', '\n'], " ")
}

/// Mask the value of a `key=` query parameter so URLs can be logged and
/// reported without leaking the credential.
///
/// ```
/// use gatecheck::logging::redact_api_key;
///
/// assert_eq!(
///     redact_api_key("http://h/v1beta/models/m:generateContent?key=secret&alt=json"),
///     "http://h/v1beta/models/m:generateContent?key=***&alt=json"
/// );
/// ```
pub fn redact_api_key(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let params: Vec<String> = query
        .split('&')
        .map(|param| match param.split_once('=') {
            Some(("key", value)) if !value.is_empty() => "key=***".to_string(),
            _ => param.to_string(),
        })
        .collect();

    format!("{}?{}", base, params.join("&"))
}
