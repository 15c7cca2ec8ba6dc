//! Heuristic mapping of a free-text model reply onto a numbered option.
//!
//! Questions arrive rendered as text, with candidates on lines like
//! `1. Paris`. The model answers in prose, so this module tries a short chain
//! of matchers to recover which option it meant:
//!
//! | Order | Rule | Matches when |
//! |-------|------|--------------|
//! | 1 | [`explicit_number`] | the reply opens a `N.` item whose `N` is an offered label |
//! | 2 | [`exact_phrase`] | an option's full text appears in the reply |
//! | 3 | [`year_substring`] | the reply's first 4-digit run appears in an option |
//! | 4 | [`keyword`] | any word of an option appears in the reply |
//!
//! Every comparison on the reply side is case-insensitive. The keyword rule
//! is a plain substring test, so `cat` matches `concatenate`.
//!
//! Option labels and year runs are ASCII digits only; a label written in
//! another script, such as Arabic-Indic `١.`, is not recognised as an option.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// `<digits>.<optional whitespace><rest of line>`
static OPTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)\.\s*(.*)").unwrap());

static FOUR_DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4}").unwrap());

/// One multiple-choice candidate parsed out of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    /// The digits exactly as written in the question (`"01"` stays `"01"`).
    pub label: String,
    /// Numeric value of `label`.
    pub number: u64,
    /// Everything after the label on the same line, untrimmed.
    pub text: String,
}

impl AnswerOption {
    fn normalized_text(&self) -> String {
        self.text.trim().to_lowercase()
    }
}

/// A matcher receives the parsed options, the raw reply and the lower-cased reply.
type Rule = fn(&[AnswerOption], &str, &str) -> Option<u64>;

const RULES: &[(&str, Rule)] = &[
    ("explicit_number", explicit_number),
    ("exact_phrase", exact_phrase),
    ("year_substring", year_substring),
    ("keyword", keyword),
];

/// Parse every `N. text` occurrence in `query`, in order of appearance.
///
/// Labels whose value does not fit in a `u64` are skipped. Duplicated labels
/// are kept; the first one wins in every rule by scan order.
pub fn parse_options(query: &str) -> Vec<AnswerOption> {
    OPTION_RE
        .captures_iter(query)
        .filter_map(|caps| {
            let label = caps.get(1)?.as_str();
            let number = label.parse::<u64>().ok()?;
            Some(AnswerOption {
                label: label.to_string(),
                number,
                text: caps.get(2).map_or("", |m| m.as_str()).to_string(),
            })
        })
        .collect()
}

/// Recover the option number the model picked, if any.
///
/// # Arguments
///
/// * `query` - The question as sent to the model, including its options
/// * `reasoning` - The model's free-text reply
///
/// # Returns
///
/// The number of one of the options found in `query`, or `None` when the
/// question has no options or no rule matched. Never returns a number that
/// is not offered in `query`.
pub fn extract_answer(query: &str, reasoning: &str) -> Option<u64> {
    let options = parse_options(query);
    if options.is_empty() {
        debug!("No numbered options in query");
        return None;
    }

    let reasoning_lower = reasoning.to_lowercase();
    RULES.iter().find_map(|(name, rule)| {
        let answer = rule(&options, reasoning, &reasoning_lower)?;
        debug!(rule = *name, answer, options = options.len(), "Matched answer");
        Some(answer)
    })
}

/// The first `N.` item in the reply, accepted only if `N` is an offered label.
///
/// `N` is compared in canonical decimal form, so `01.` in the reply picks
/// label `1`, while `1.` in the reply does not pick label `01`.
pub fn explicit_number(options: &[AnswerOption], reasoning: &str, _lower: &str) -> Option<u64> {
    let caps = OPTION_RE.captures(reasoning)?;
    let number = caps.get(1)?.as_str().parse::<u64>().ok()?;
    let canonical = number.to_string();
    options
        .iter()
        .any(|o| o.label == canonical)
        .then_some(number)
}

/// First option whose whole trimmed text occurs in the reply.
pub fn exact_phrase(options: &[AnswerOption], _reasoning: &str, lower: &str) -> Option<u64> {
    options
        .iter()
        .find(|o| lower.contains(o.normalized_text().as_str()))
        .map(|o| o.number)
}

/// First option containing the reply's first run of four digits.
pub fn year_substring(options: &[AnswerOption], _reasoning: &str, lower: &str) -> Option<u64> {
    let year = FOUR_DIGITS_RE.find(lower)?.as_str();
    options
        .iter()
        .find(|o| o.normalized_text().contains(year))
        .map(|o| o.number)
}

/// First option with any whitespace-separated word occurring in the reply.
pub fn keyword(options: &[AnswerOption], _reasoning: &str, lower: &str) -> Option<u64> {
    options
        .iter()
        .find(|o| {
            o.normalized_text()
                .split_whitespace()
                .any(|word| lower.contains(word))
        })
        .map(|o| o.number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> Vec<AnswerOption> {
        pairs
            .iter()
            .map(|(label, text)| AnswerOption {
                label: label.to_string(),
                number: label.parse().unwrap(),
                text: text.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_parse_options_one_per_line() {
        let parsed = parse_options("Which city?\n1. Paris\n2. London\n");
        assert_eq!(parsed, options(&[("1", "Paris"), ("2", "London")]));
    }

    #[test]
    fn test_parse_options_single_line_is_greedy() {
        let parsed = parse_options("Capital of France? 1. Paris 2. Berlin");
        assert_eq!(parsed, options(&[("1", "Paris 2. Berlin")]));
    }

    #[test]
    fn test_parse_options_skips_overflowing_labels() {
        let parsed = parse_options("99999999999999999999999. huge\n3. small");
        assert_eq!(parsed, options(&[("3", "small")]));
    }

    #[test]
    fn test_explicit_number_cross_checked() {
        let query = "Capital?\n1. Paris\n2. London";
        assert_eq!(extract_answer(query, "2. London is the capital"), Some(2));
    }

    #[test]
    fn test_explicit_number_rejects_unlisted() {
        let opts = options(&[("1", "A"), ("2", "B")]);
        assert_eq!(explicit_number(&opts, "5. something", "5. something"), None);
    }

    #[test]
    fn test_unlisted_number_falls_through_to_later_rules() {
        let query = "Pick:\n1. alpha\n2. beta";
        assert_eq!(extract_answer(query, "5. I think beta"), Some(2));
    }

    #[test]
    fn test_explicit_number_compares_canonical_form() {
        let opts = options(&[("1", "x")]);
        assert_eq!(explicit_number(&opts, "01. x", "01. x"), Some(1));

        let padded = options(&[("01", "x")]);
        assert_eq!(explicit_number(&padded, "1. x", "1. x"), None);
    }

    #[test]
    fn test_exact_phrase() {
        let query = "Sky colour?\n1. blue\n2. red";
        assert_eq!(extract_answer(query, "the sky is blue today"), Some(1));
    }

    #[test]
    fn test_exact_phrase_is_case_insensitive() {
        let query = "Sky colour?\n1. Deep Blue\n2. Red";
        assert_eq!(extract_answer(query, "It is DEEP BLUE."), Some(1));
    }

    #[test]
    fn test_year_substring() {
        let query = "When?\n1. founded in 1837\n2. founded in 1900";
        assert_eq!(extract_answer(query, "the institution says 1900"), Some(2));
    }

    #[test]
    fn test_year_substring_takes_first_four_digits_of_longer_run() {
        let opts = options(&[("1", "year 1234")]);
        assert_eq!(year_substring(&opts, "", "code 12345"), Some(1));
    }

    #[test]
    fn test_keyword_is_unanchored_substring() {
        let query = "Animal?\n1. cat";
        assert_eq!(extract_answer(query, "concatenate"), Some(1));
    }

    #[test]
    fn test_keyword_first_option_wins() {
        let opts = options(&[("1", "red apple"), ("2", "green apple")]);
        assert_eq!(keyword(&opts, "", "an apple"), Some(1));
    }

    #[test]
    fn test_no_options_always_none() {
        assert_eq!(extract_answer("What is the capital of France?", "1. Paris"), None);
        assert_eq!(extract_answer("", "anything at all"), None);
    }

    #[test]
    fn test_non_ascii_digit_labels_are_not_options() {
        assert!(parse_options("Capital?\n١. Paris").is_empty());
        assert_eq!(extract_answer("Capital?\n١. Paris", "Paris"), None);
    }

    #[test]
    fn test_no_rule_matches() {
        let query = "Pick:\n1. alpha\n2. beta";
        assert_eq!(extract_answer(query, "no idea"), None);
    }

    #[test]
    fn test_answer_is_always_an_offered_number() {
        let query = "Pick:\n3. alpha\n7. beta";
        for reply in ["1. alpha", "9. beta", "ALPHA", "beta 2020", "zzz"] {
            if let Some(answer) = extract_answer(query, reply) {
                assert!(answer == 3 || answer == 7, "unexpected answer {answer} for {reply}");
            }
        }
    }

    #[test]
    fn test_empty_option_text_matches_any_reply() {
        let query = "Pick:\n2. beta\n1. ";
        assert_eq!(parse_options(query)[1].text, "");
        assert_eq!(extract_answer(query, "nothing relevant"), Some(1));
    }
}
