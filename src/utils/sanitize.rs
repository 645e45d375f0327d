use ammonia;

/// Clean free-text input using the ammonia library.
///
/// This employs a whitelist-based sanitization strategy: it preserves safe
/// tags while stripping dangerous ones (like <script>, <iframe>) and
/// malicious attributes (like onclick). Applied to every user-supplied
/// free-text field (names, titles, descriptions, districts) before it is
/// persisted, as a fail-safe against stored XSS in any client that renders
/// the data.
pub fn sanitize_text(input: &str) -> String {
    ammonia::clean(input)
}

/// Strip all markup, leaving only text content.
/// Used to derive a plain-text alternative from an HTML email body.
pub fn strip_tags(input: &str) -> String {
    ammonia::Builder::empty().clean(input).to_string()
}
