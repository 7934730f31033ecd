/// Split text into whitespace-delimited chunks of at most `max_chars`
/// characters.
///
/// Words are never split: a single word longer than the limit becomes its own
/// oversized chunk. Joining the chunks back with single spaces yields every
/// word of the input in the original order.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();

        if current.is_empty() {
            current.push_str(word);
            current_chars = word_chars;
        } else if current_chars + 1 + word_chars <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_chars += 1 + word_chars;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_chars = word_chars;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(chunk_text("", 100).is_empty());
        assert!(chunk_text("   \n ", 100).is_empty());
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(chunk_text("hello world", 100), vec!["hello world"]);
    }

    #[test]
    fn test_chunks_respect_limit() {
        let text = "alpha beta gamma delta epsilon zeta";
        let chunks = chunk_text(text, 12);

        for chunk in &chunks {
            assert!(chunk.chars().count() <= 12, "chunk too long: {chunk:?}");
        }
    }

    #[test]
    fn test_never_splits_inside_a_word() {
        let text = "one two three four five six seven eight nine ten";
        let words: Vec<&str> = text.split_whitespace().collect();

        for limit in 1..=text.len() {
            let chunks = chunk_text(text, limit);
            let rejoined: Vec<String> = chunks
                .iter()
                .flat_map(|c| c.split_whitespace().map(str::to_string))
                .collect();
            assert_eq!(rejoined, words, "words lost or split at limit {limit}");
        }
    }

    #[test]
    fn test_oversized_word_gets_its_own_chunk() {
        let chunks = chunk_text("hi incomprehensibilities yo", 10);
        assert_eq!(chunks, vec!["hi", "incomprehensibilities", "yo"]);
    }

    #[test]
    fn test_multibyte_words_are_counted_in_chars() {
        // Four 2-char (4-byte) words; a 5-char budget fits two words plus a space
        let chunks = chunk_text("éé éé éé éé", 5);
        assert_eq!(chunks, vec!["éé éé", "éé éé"]);
    }
}
