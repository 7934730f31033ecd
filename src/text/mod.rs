use crate::fetch::CaptionFragment;

pub mod sentences;

pub use sentences::capitalize_sentences;

/// Assemble caption fragments into one continuous text blob.
///
/// Fragments are joined in the order given, separated by single spaces, with
/// all internal whitespace runs collapsed. An empty fragment list assembles to
/// an empty string.
pub fn assemble(fragments: &[CaptionFragment]) -> String {
    let mut out = String::new();

    for fragment in fragments {
        let cleaned = clean_fragment_text(&fragment.text);
        for word in cleaned.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
    }

    out
}

/// Strip caption markup from one fragment: bracketed inline cues like
/// `[music]`, `>>` speaker markers, and literal escape sequences that some
/// tracks carry as text.
fn clean_fragment_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;

    for c in text.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }

    out.replace(">>", "")
        .replace("\\n", " ")
        .replace("\\r", " ")
        .replace("\\t", " ")
        .replace("\\b", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(text: &str, start: f64) -> CaptionFragment {
        CaptionFragment::new(text, start, 1.0)
    }

    #[test]
    fn test_assemble_empty_is_empty() {
        assert_eq!(assemble(&[]), "");
    }

    #[test]
    fn test_assemble_joins_in_order_with_single_spaces() {
        let fragments = vec![fragment("hello world", 0.0), fragment("how are you", 1.0)];
        assert_eq!(assemble(&fragments), "hello world how are you");
    }

    #[test]
    fn test_assemble_collapses_whitespace() {
        let fragments = vec![
            fragment("  hello \n world ", 0.0),
            fragment("\tagain", 1.0),
        ];
        assert_eq!(assemble(&fragments), "hello world again");
    }

    #[test]
    fn test_assemble_drops_inline_cues_and_markers() {
        let fragments = vec![
            fragment("[Music]", 0.0),
            fragment(">> SPEAKER: hello [applause] there", 1.0),
        ];
        assert_eq!(assemble(&fragments), "SPEAKER: hello there");
    }

    #[test]
    fn test_assemble_strips_literal_escapes() {
        let fragments = vec![fragment("one\\ntwo\\tthree", 0.0)];
        assert_eq!(assemble(&fragments), "one two three");
    }

    #[test]
    fn test_assemble_skips_whitespace_only_fragments() {
        let fragments = vec![fragment("hello", 0.0), fragment("   ", 1.0), fragment("world", 2.0)];
        assert_eq!(assemble(&fragments), "hello world");
    }
}
