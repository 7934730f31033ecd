//! Sentence-boundary handling for transcript text.
//!
//! A boundary is a terminal mark (`.`, `!`, `?`), optionally followed by
//! closing quotes or brackets, followed by whitespace. Capitalization rewrites
//! the text in place and never changes spacing, so running it over its own
//! output is a no-op.

/// Uppercase the first alphabetic character of each sentence, leaving
/// everything else untouched.
pub fn capitalize_sentences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut capitalize_next = true;
    let mut pending_boundary = false;

    for c in text.chars() {
        if capitalize_next && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            capitalize_next = false;
            pending_boundary = false;
            continue;
        }

        if is_terminal(c) {
            pending_boundary = true;
        } else if c.is_whitespace() {
            if pending_boundary {
                capitalize_next = true;
                pending_boundary = false;
            }
        } else if !is_closing_mark(c) {
            pending_boundary = false;
        }

        out.push(c);
    }

    out
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Closing marks that may trail a terminal without ending the boundary
fn is_closing_mark(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '\u{201d}' | '\u{2019}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_passes_through() {
        assert_eq!(capitalize_sentences(""), "");
    }

    #[test]
    fn test_capitalizes_each_sentence() {
        assert_eq!(
            capitalize_sentences("hello world. how are you? fine!"),
            "Hello world. How are you? Fine!"
        );
    }

    #[test]
    fn test_already_capitalized_is_unchanged() {
        let text = "Hello world. How are you?";
        assert_eq!(capitalize_sentences(text), text);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let text = "it works. really? yes, it does! trust me.";
        let once = capitalize_sentences(text);
        let twice = capitalize_sentences(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_boundary_after_closing_quote() {
        assert_eq!(
            capitalize_sentences("he said \"go.\" then he left."),
            "He said \"go.\" Then he left."
        );
    }

    #[test]
    fn test_abbreviation_like_runs_without_whitespace_are_kept() {
        // No whitespace after the dot means no boundary
        assert_eq!(capitalize_sentences("visit example.com today."), "Visit example.com today.");
    }

    #[test]
    fn test_sentence_starting_with_digits() {
        assert_eq!(
            capitalize_sentences("count them. 42 items remain."),
            "Count them. 42 Items remain."
        );
    }

    #[test]
    fn test_spacing_is_preserved() {
        assert_eq!(
            capitalize_sentences("one.  two.\nthree."),
            "One.  Two.\nThree."
        );
    }
}
