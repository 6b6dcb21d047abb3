//! Text normalization applied before chunking.

/// Normalize raw extracted text.
///
/// Collapses whitespace runs to single spaces, trims the ends, drops control
/// and zero-width characters left behind by PDF extraction, and collapses
/// runs of dots to a single dot. Idempotent: normalizing already-normalized
/// text returns it unchanged. Empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !is_artifact(*c)).collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapse_dots(&collapsed)
}

/// Non-whitespace control characters and zero-width marks survive whitespace
/// collapsing, so they are removed up front.
fn is_artifact(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_control() && !c.is_whitespace())
}

fn collapse_dots(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut previous_dot = false;
    for c in text.chars() {
        if c == '.' {
            if !previous_dot {
                output.push(c);
            }
            previous_dot = true;
        } else {
            output.push(c);
            previous_dot = false;
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize("one  two\t\tthree\n\nfour"), "one two three four");
    }

    #[test]
    fn trims_leading_and_trailing_whitespace() {
        assert_eq!(normalize("  padded  "), "padded");
    }

    #[test]
    fn strips_control_and_zero_width_characters() {
        assert_eq!(normalize("a\u{0}b\u{FEFF}c"), "abc");
    }

    #[test]
    fn collapses_dot_runs() {
        assert_eq!(normalize("Broken.... sentence.. here."), "Broken. sentence. here.");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t "), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let messy = "  First line.\n\nSecond\t line...  with\u{0} artifacts  ";
        let once = normalize(messy);
        assert_eq!(normalize(&once), once);
    }
}
