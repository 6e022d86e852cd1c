//! Page URL construction and page-number parsing

/// Builds the URL for one page of a thread
///
/// Page 1 is the base URL itself; later pages append the suffix and the
/// page number.
///
/// # Examples
///
/// ```
/// use thread_harvest::url::page_url;
///
/// assert_eq!(page_url("https://example.org/t42", 1, "p"), "https://example.org/t42");
/// assert_eq!(page_url("https://example.org/t42", 7, "p"), "https://example.org/t42p7");
/// ```
pub fn page_url(base_url: &str, page: u32, suffix: &str) -> String {
    if page <= 1 {
        base_url.to_string()
    } else {
        format!("{}{}{}", base_url, suffix, page)
    }
}

/// Reads the page number at the end of a pagination link
///
/// Returns the trailing digits of `href` when they directly follow `suffix`,
/// e.g. `/t42p1025` with suffix `p` yields 1025.
pub fn trailing_page_number(href: &str, suffix: &str) -> Option<u32> {
    let href = href.trim();
    let digits_start = href
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;

    let (head, digits) = href.split_at(digits_start);
    if !head.ends_with(suffix) {
        return None;
    }

    digits.parse().ok()
}

/// Finds the number following `word` in a "page X of Y" style text
///
/// The match is case-insensitive and word-based, so for "Sidan 1 av 1025"
/// with word `av` the result is 1025.
pub fn count_after_word(text: &str, word: &str) -> Option<u32> {
    let mut tokens = text.split_whitespace();
    while let Some(token) = tokens.next() {
        if token.eq_ignore_ascii_case(word) {
            let digits: String = tokens
                .next()?
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if let Ok(value) = digits.parse() {
                return Some(value);
            }
        }
    }
    None
}
