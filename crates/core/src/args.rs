//! Quoted-argument parsing for free-form slash-command text.
//!
//! `add "Quote text" "Author"` style input is split into the quoted spans it
//! contains. Straight quotes and the typographic quotes chat clients
//! substitute on the fly are both accepted. Text outside quotes is dropped.

const ESCAPE: char = '\\';

/// The six code points accepted as the start of a quoted span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuoteDelimiter {
    /// `"` (U+0022)
    StraightDouble,
    /// `'` (U+0027)
    StraightSingle,
    /// `“` (U+201C)
    LeftDouble,
    /// `”` (U+201D)
    RightDouble,
    /// `‘` (U+2018)
    LeftSingle,
    /// `’` (U+2019)
    RightSingle,
}

impl QuoteDelimiter {
    pub const ALL: [char; 6] = ['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '"' => Some(Self::StraightDouble),
            '\'' => Some(Self::StraightSingle),
            '\u{201C}' => Some(Self::LeftDouble),
            '\u{201D}' => Some(Self::RightDouble),
            '\u{2018}' => Some(Self::LeftSingle),
            '\u{2019}' => Some(Self::RightSingle),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::StraightDouble => '"',
            Self::StraightSingle => '\'',
            Self::LeftDouble => '\u{201C}',
            Self::RightDouble => '\u{201D}',
            Self::LeftSingle => '\u{2018}',
            Self::RightSingle => '\u{2019}',
        }
    }

    /// The only character that ends a span opened by `self`.
    ///
    /// A right typographic quote is accepted as an opener and then closes on
    /// another right quote. Clients that emit a right quote where a left one
    /// belongs still get their span back.
    pub fn closer(self) -> char {
        match self {
            Self::StraightDouble => '"',
            Self::StraightSingle => '\'',
            Self::LeftDouble | Self::RightDouble => '\u{201D}',
            Self::LeftSingle | Self::RightSingle => '\u{2019}',
        }
    }
}

pub fn is_quote_char(ch: char) -> bool {
    QuoteDelimiter::from_char(ch).is_some()
}

/// Splits `input` into the contents of its quoted spans, in order of appearance.
///
/// Never fails: input without any quote character yields an empty vector, and
/// a span left open at the end of input is returned as if it had been closed.
pub fn parse_quoted_arguments(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut arguments = Vec::new();
    let mut cursor = 0usize;

    loop {
        while cursor < chars.len() && chars[cursor].is_whitespace() {
            cursor += 1;
        }
        if cursor >= chars.len() {
            break;
        }

        let Some(opener) = QuoteDelimiter::from_char(chars[cursor]) else {
            cursor += 1;
            continue;
        };
        cursor += 1;

        let (content, next) = read_span(&chars, cursor, opener.closer());
        arguments.push(content);
        cursor = next;
    }

    arguments
}

/// Reads span content starting at `start` until `closer` or end of input.
/// Returns the content and the cursor position just past the closer.
fn read_span(chars: &[char], start: usize, closer: char) -> (String, usize) {
    let mut content = String::new();
    let mut escaped = false;
    let mut cursor = start;

    while cursor < chars.len() {
        let ch = chars[cursor];
        cursor += 1;

        if escaped {
            content.push(ch);
            escaped = false;
        } else if ch == ESCAPE {
            escaped = true;
        } else if ch == closer {
            return (content, cursor);
        } else {
            content.push(ch);
        }
    }

    (content, cursor)
}

#[cfg(test)]
mod tests {
    use super::{is_quote_char, parse_quoted_arguments, QuoteDelimiter};

    #[test]
    fn input_without_quotes_yields_nothing() {
        assert!(parse_quoted_arguments("").is_empty());
        assert!(parse_quoted_arguments("   ").is_empty());
        assert!(parse_quoted_arguments("no quotes at all").is_empty());
        assert!(parse_quoted_arguments("email me @ jane (maybe)").is_empty());
    }

    #[test]
    fn splits_two_double_quoted_spans() {
        assert_eq!(parse_quoted_arguments(r#""hello" "world""#), vec!["hello", "world"]);
    }

    #[test]
    fn single_quoted_span_is_one_argument() {
        assert_eq!(parse_quoted_arguments("'single quoted'"), vec!["single quoted"]);
    }

    #[test]
    fn escaped_quote_stays_inside_span() {
        assert_eq!(
            parse_quoted_arguments(r#""she said \"hi\"""#),
            vec![r#"she said "hi""#.to_owned()]
        );
    }

    #[test]
    fn escaped_backslash_is_literal() {
        assert_eq!(parse_quoted_arguments(r#""a\\b""#), vec![r"a\b".to_owned()]);
    }

    #[test]
    fn unterminated_span_keeps_its_content() {
        assert_eq!(
            parse_quoted_arguments(r#""no closing quote here"#),
            vec!["no closing quote here"]
        );
    }

    #[test]
    fn trailing_escape_in_unterminated_span_is_dropped() {
        assert_eq!(parse_quoted_arguments("\"abc\\"), vec!["abc"]);
    }

    #[test]
    fn smart_double_quotes_pair_up() {
        assert_eq!(
            parse_quoted_arguments("\u{201C}TG is amazing!\u{201D} \u{201C}Jane Doe\u{201D}"),
            vec!["TG is amazing!", "Jane Doe"]
        );
    }

    #[test]
    fn smart_single_quotes_pair_up() {
        assert_eq!(parse_quoted_arguments("\u{2018}quiet\u{2019}"), vec!["quiet"]);
    }

    #[test]
    fn right_smart_quote_opens_and_closes_a_span() {
        assert_eq!(parse_quoted_arguments("\u{201D}odd but fine\u{201D}"), vec!["odd but fine"]);
    }

    #[test]
    fn straight_double_ignores_other_quote_kinds() {
        assert_eq!(
            parse_quoted_arguments("\"don't \u{201C}stop\u{201D}\""),
            vec!["don't \u{201C}stop\u{201D}"]
        );
    }

    #[test]
    fn left_smart_double_does_not_close_its_own_span() {
        assert_eq!(parse_quoted_arguments("\u{201C}a \u{201C} b\u{201D}"), vec!["a \u{201C} b"]);
    }

    #[test]
    fn unquoted_tokens_between_spans_are_discarded() {
        assert_eq!(
            parse_quoted_arguments(r#"please "first" by (team) "second" thanks"#),
            vec!["first", "second"]
        );
    }

    #[test]
    fn span_content_is_kept_verbatim() {
        assert_eq!(
            parse_quoted_arguments(r#""  spaced @here (ok), yes!  ""#),
            vec!["  spaced @here (ok), yes!  "]
        );
    }

    #[test]
    fn empty_span_produces_empty_argument() {
        assert_eq!(parse_quoted_arguments(r#""" "x""#), vec!["", "x"]);
    }

    #[test]
    fn stray_apostrophe_opens_a_span() {
        assert_eq!(parse_quoted_arguments("it's fine"), vec!["s fine"]);
    }

    #[test]
    fn more_than_two_spans_are_all_returned() {
        assert_eq!(parse_quoted_arguments(r#""a" 'b' "c""#), vec!["a", "b", "c"]);
    }

    #[test]
    fn parsing_is_repeatable() {
        let input = "\u{201C}x\u{201D} 'y' \"z";
        assert_eq!(parse_quoted_arguments(input), parse_quoted_arguments(input));
    }

    #[test]
    fn delimiter_table_is_consistent() {
        for ch in QuoteDelimiter::ALL {
            let delimiter = QuoteDelimiter::from_char(ch).expect("listed delimiter");
            assert_eq!(delimiter.as_char(), ch);
            assert!(is_quote_char(delimiter.closer()));
        }
        assert!(!is_quote_char('`'));
    }
}
