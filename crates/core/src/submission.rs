use thiserror::Error;

use crate::args::{is_quote_char, parse_quoted_arguments};

pub const MAX_QUOTE_CHARS: usize = 500;

/// Quote text and optional attribution extracted from an `add` command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub quote: String,
    pub author: Option<String>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("quote is {length} characters long (limit {MAX_QUOTE_CHARS})")]
    TooLong { length: usize },
    #[error("quote text is empty")]
    Empty,
}

pub fn resolve_submission(raw: &str) -> Result<Submission, SubmissionError> {
    let mut arguments = parse_quoted_arguments(raw).into_iter();
    let (mut quote, author) = match (arguments.next(), arguments.next()) {
        (Some(quote), author) => (quote, author),
        (None, _) => (legacy_extract(raw).to_owned(), None),
    };

    if quote.trim().is_empty() {
        quote = legacy_extract(raw).to_owned();
    }

    let length = quote.chars().count();
    if length > MAX_QUOTE_CHARS {
        return Err(SubmissionError::TooLong { length });
    }

    let quote = strip_quote_characters(&quote);
    if quote.is_empty() {
        return Err(SubmissionError::Empty);
    }
    let author = author.map(|author| strip_quote_characters(&author)).filter(|a| !a.is_empty());

    Ok(Submission { quote, author })
}

/// Strips one enclosing pair of matching quotes, leaving anything else untouched.
pub fn legacy_extract(text: &str) -> &str {
    const PAIRS: [(char, char); 4] =
        [('"', '"'), ('\'', '\''), ('\u{201C}', '\u{201D}'), ('\u{2018}', '\u{2019}')];

    let text = text.trim();
    for (open, close) in PAIRS {
        if let Some(inner) = text.strip_prefix(open).and_then(|rest| rest.strip_suffix(close)) {
            return inner;
        }
    }
    text
}

pub fn strip_quote_characters(text: &str) -> String {
    text.chars().filter(|ch| !is_quote_char(*ch)).collect::<String>().trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::{
        legacy_extract, resolve_submission, strip_quote_characters, Submission, SubmissionError,
        MAX_QUOTE_CHARS,
    };

    #[test]
    fn quote_and_author_from_two_spans() {
        let submission = resolve_submission(r#""TG is amazing!" "Jane Doe""#).expect("resolves");
        assert_eq!(
            submission,
            Submission { quote: "TG is amazing!".to_owned(), author: Some("Jane Doe".to_owned()) }
        );
    }

    #[test]
    fn unquoted_text_falls_back_to_whole_input() {
        let submission = resolve_submission("no quotes at all").expect("resolves");
        assert_eq!(submission.quote, "no quotes at all");
        assert_eq!(submission.author, None);
    }

    #[test]
    fn single_span_has_no_author() {
        let submission = resolve_submission("\u{201C}Keep going\u{201D}").expect("resolves");
        assert_eq!(submission.quote, "Keep going");
        assert_eq!(submission.author, None);
    }

    #[test]
    fn extra_spans_are_ignored() {
        let submission = resolve_submission(r#""one" "two" "three""#).expect("resolves");
        assert_eq!(submission.quote, "one");
        assert_eq!(submission.author.as_deref(), Some("two"));
    }

    #[test]
    fn cleanup_removes_every_quote_character() {
        let submission = resolve_submission(r#""Don't \"panic\"" "O'Brien""#).expect("resolves");
        assert_eq!(submission.quote, "Dont panic");
        assert_eq!(submission.author.as_deref(), Some("OBrien"));
    }

    #[test]
    fn blank_author_becomes_none() {
        let submission = resolve_submission(r#""ship it" "  ""#).expect("resolves");
        assert_eq!(submission.author, None);
    }

    #[test]
    fn empty_span_falls_back_to_raw_text() {
        let submission = resolve_submission(r#""" tail"#).expect("resolves");
        assert_eq!(submission.quote, "tail");
    }

    #[test]
    fn nothing_but_quotes_is_empty() {
        assert_eq!(resolve_submission(r#""""#), Err(SubmissionError::Empty));
        assert_eq!(resolve_submission("   "), Err(SubmissionError::Empty));
    }

    #[test]
    fn rejects_quotes_over_the_limit() {
        let long = format!("\"{}\"", "a".repeat(MAX_QUOTE_CHARS + 1));
        assert_eq!(
            resolve_submission(&long),
            Err(SubmissionError::TooLong { length: MAX_QUOTE_CHARS + 1 })
        );

        let at_limit = format!("\"{}\"", "é".repeat(MAX_QUOTE_CHARS));
        assert!(resolve_submission(&at_limit).is_ok());
    }

    #[test]
    fn limit_counts_quote_characters_before_cleanup() {
        let padded = format!("\"{}'''\"", "a".repeat(MAX_QUOTE_CHARS - 2));
        assert_eq!(
            resolve_submission(&padded),
            Err(SubmissionError::TooLong { length: MAX_QUOTE_CHARS + 1 })
        );
    }

    #[test]
    fn limit_applies_to_unquoted_text() {
        let unquoted = "b".repeat(MAX_QUOTE_CHARS + 1);
        assert_eq!(
            resolve_submission(&unquoted),
            Err(SubmissionError::TooLong { length: MAX_QUOTE_CHARS + 1 })
        );
        assert!(resolve_submission(&"b".repeat(MAX_QUOTE_CHARS)).is_ok());
    }

    #[test]
    fn legacy_extract_strips_one_matching_pair() {
        assert_eq!(legacy_extract("\"wrapped\""), "wrapped");
        assert_eq!(legacy_extract("'wrapped'"), "wrapped");
        assert_eq!(legacy_extract("\u{201C}wrapped\u{201D}"), "wrapped");
        assert_eq!(legacy_extract("\u{2018}wrapped\u{2019}"), "wrapped");
        assert_eq!(legacy_extract("\"mismatched'"), "\"mismatched'");
        assert_eq!(legacy_extract("\""), "\"");
        assert_eq!(legacy_extract("plain"), "plain");
    }

    #[test]
    fn strip_quote_characters_trims() {
        assert_eq!(strip_quote_characters("  \u{2018}a\u{2019} \"b\"  "), "a b");
    }
}
