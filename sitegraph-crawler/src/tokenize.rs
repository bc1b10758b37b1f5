/// Split text into raw whitespace-delimited tokens.
///
/// No case folding, punctuation stripping, or stop-word removal: frequency
/// counts downstream are on literal tokens, so `Word`, `word` and `word.`
/// are three different entries.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace_runs() {
        let tokens = tokenize("one  two\tthree\n four");
        assert_eq!(tokens, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn keeps_case_and_punctuation() {
        let tokens = tokenize("Hello, hello HELLO.");
        assert_eq!(tokens, vec!["Hello,", "hello", "HELLO."]);
    }

    #[test]
    fn empty_and_blank_input_yield_nothing() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
    }
}
