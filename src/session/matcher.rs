/// Match and strip a trailing done word from an accumulated transcript
///
/// A word matches when the trimmed transcript case-insensitively equals it,
/// or ends with whitespace followed by it. First match in configured order
/// wins. Returns the original-case transcript with the trailing occurrence
/// stripped and re-trimmed, or `None` when no configured word matches.
pub fn match_done_word(transcript: &str, done_words: &[String]) -> Option<String> {
    let trimmed = transcript.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_lowercase();

    for word in done_words {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            continue;
        }

        // Entire utterance is just the done word
        if lowered == word {
            return Some(String::new());
        }

        // Whole-word suffix: preceded by whitespace
        if lowered.ends_with(&word) {
            let prefix = &lowered[..lowered.len() - word.len()];
            if prefix.ends_with(char::is_whitespace) {
                let keep = trimmed
                    .chars()
                    .count()
                    .saturating_sub(word.chars().count());
                let stripped: String = trimmed.chars().take(keep).collect();
                return Some(stripped.trim_end().to_string());
            }
        }
    }

    None
}
