pub trait WordCounter: Send + Sync {
    fn count(&self, text: &str) -> u64;
}

/// Counts runs of non-whitespace characters. Empty and blank text count as zero.
///
/// The ASCII information separators U+001C..=U+001F also split words.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceWordCounter;

impl WordCounter for WhitespaceWordCounter {
    fn count(&self, text: &str) -> u64 {
        text.split(is_separator).filter(|word| !word.is_empty()).count() as u64
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}
