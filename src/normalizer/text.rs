//! Whitespace normalization of a single capture

/// Removes blank lines and collapses every whitespace run to one space
///
/// Lines are kept in order and concatenated; a line's terminator counts as
/// whitespace, so the output is a single line. Runs that span a line
/// boundary collapse too, so the result never holds two consecutive
/// whitespace characters.
///
/// # Example
///
/// ```
/// use wiki_corpus::normalize_text;
///
/// assert_eq!(
///     normalize_text("Goku is a Saiyan.\n\n  raised on  Earth.\n"),
///     "Goku is a Saiyan. raised on Earth. "
/// );
/// ```
pub fn normalize_text(raw: &str) -> String {
    let mut clean = String::with_capacity(raw.len());
    let mut in_whitespace = false;

    for line in raw.split_inclusive('\n') {
        if line.trim().is_empty() {
            continue;
        }

        for ch in line.chars() {
            if ch.is_whitespace() {
                if !in_whitespace {
                    clean.push(' ');
                    in_whitespace = true;
                }
            } else {
                clean.push(ch);
                in_whitespace = false;
            }
        }
    }

    clean
}
