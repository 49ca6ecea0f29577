/// Normalizes a raw search keyword
///
/// Leading and trailing whitespace is removed and every internal run of
/// whitespace collapses to a single space.
///
/// # Examples
///
/// ```
/// use forum_sweep::url::normalize_keyword;
///
/// assert_eq!(normalize_keyword("  crafting \t\n  gear "), "crafting gear");
/// ```
pub fn normalize_keyword(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
