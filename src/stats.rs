/// snapshot of typing statistics at a single instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub wpm: u64,
    pub accuracy: u64,
    pub correct_chars: usize,
    pub incorrect_chars: usize,
    pub total_chars: usize,
    pub time_elapsed_secs: u64,
    pub errors: usize,
}

/// Words per minute from whitespace-delimited word tokens.
///
/// This is the word-token proxy, not the 5-chars-per-word convention:
/// it undercounts for text without spaces.
pub fn wpm(input: &str, elapsed_millis: u64) -> u64 {
    if input.is_empty() || elapsed_millis == 0 {
        return 0;
    }
    let words = input.trim().split_whitespace().count();
    let minutes = elapsed_millis as f64 / 60_000.0;
    (words as f64 / minutes).round() as u64
}

/// Percentage of typed characters matching the reference at the same
/// position. Characters typed past the end of the reference count as
/// mismatches. Empty input is vacuously perfect.
pub fn accuracy(input: &str, reference: &str) -> u64 {
    let total = input.chars().count();
    if total == 0 {
        return 100;
    }
    let matches = input
        .chars()
        .zip(reference.chars())
        .filter(|(typed, expected)| typed == expected)
        .count();
    ((matches as f64 / total as f64) * 100.0).round() as u64
}

/// Full statistics snapshot for the given input/reference pair.
/// `elapsed_millis` must already exclude paused time.
pub fn detailed(input: &str, reference: &str, elapsed_millis: u64) -> Stats {
    let reference_len = reference.chars().count();
    let total_chars = input.chars().count();

    let correct_chars = input
        .chars()
        .take(reference_len)
        .zip(reference.chars())
        .filter(|(typed, expected)| typed == expected)
        .count();
    let incorrect_chars = total_chars - correct_chars;

    Stats {
        wpm: wpm(input, elapsed_millis),
        accuracy: accuracy(input, reference),
        correct_chars,
        incorrect_chars,
        total_chars,
        time_elapsed_secs: ((elapsed_millis as f64) / 1000.0).round() as u64,
        errors: incorrect_chars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wpm_empty_input() {
        assert_eq!(wpm("", 60_000), 0);
    }

    #[test]
    fn test_wpm_zero_elapsed() {
        assert_eq!(wpm("hello world", 0), 0);
    }

    #[test]
    fn test_wpm_one_word_one_minute() {
        assert_eq!(wpm("hello", 60_000), 1);
    }

    #[test]
    fn test_wpm_five_words_one_minute() {
        assert_eq!(wpm("a b c d e", 60_000), 5);
    }

    #[test]
    fn test_wpm_two_words_thirty_secs() {
        assert_eq!(wpm("hello world", 30_000), 4);
    }

    #[test]
    fn test_wpm_ignores_surrounding_whitespace() {
        assert_eq!(wpm("  hello world  ", 60_000), 2);
    }

    #[test]
    fn test_wpm_rounds() {
        // 2 words in 90s = 1.33 wpm -> 1
        assert_eq!(wpm("ab cd", 90_000), 1);
        // 2 words in 75s = 1.6 wpm -> 2
        assert_eq!(wpm("ab cd", 75_000), 2);
    }

    #[test]
    fn test_accuracy_empty_input_is_perfect() {
        assert_eq!(accuracy("", "anything at all"), 100);
        assert_eq!(accuracy("", ""), 100);
    }

    #[test]
    fn test_accuracy_all_correct() {
        assert_eq!(accuracy("cat", "cat"), 100);
    }

    #[test]
    fn test_accuracy_partial() {
        // 2 of 3 match -> round(66.67) == 67
        assert_eq!(accuracy("cxt", "cat"), 67);
    }

    #[test]
    fn test_accuracy_all_wrong() {
        assert_eq!(accuracy("xyz", "cat"), 0);
    }

    #[test]
    fn test_accuracy_overflow_counts_as_mismatch() {
        // 2 correct, 2 typed past the end -> 50%
        assert_eq!(accuracy("hiya", "hi"), 50);
    }

    #[test]
    fn test_accuracy_multibyte_positions() {
        assert_eq!(accuracy("héllo", "héllo"), 100);
        assert_eq!(accuracy("hx", "hé"), 50);
    }

    #[test]
    fn test_detailed_counts() {
        let stats = detailed("cxt", "cat", 60_000);
        assert_eq!(stats.correct_chars, 2);
        assert_eq!(stats.incorrect_chars, 1);
        assert_eq!(stats.total_chars, 3);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.accuracy, 67);
    }

    #[test]
    fn test_detailed_overflow_is_incorrect() {
        let stats = detailed("hiya", "hi", 1_000);
        assert_eq!(stats.correct_chars, 2);
        assert_eq!(stats.incorrect_chars, 2);
        assert_eq!(stats.total_chars, 4);
    }

    #[test]
    fn test_detailed_elapsed_rounds_to_seconds() {
        assert_eq!(detailed("a", "a", 1_499).time_elapsed_secs, 1);
        assert_eq!(detailed("a", "a", 1_500).time_elapsed_secs, 2);
        assert_eq!(detailed("a", "a", 0).time_elapsed_secs, 0);
    }

    #[test]
    fn test_detailed_one_word_exactly_one_minute() {
        let stats = detailed("hello", "hello", 60_000);
        assert_eq!(stats.wpm, 1);
        assert_eq!(stats.accuracy, 100);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn test_detailed_empty_everything() {
        let stats = detailed("", "", 0);
        assert_eq!(
            stats,
            Stats {
                accuracy: 100,
                ..Stats::default()
            }
        );
    }
}
