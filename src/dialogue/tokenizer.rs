//! Split a raw dialogue line into words, whitespace runs and `{name}`
//! pictogram markers.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    Whitespace(String),
    Pictogram(String),
}

impl Token {
    /// The substring of the original line this token was cut from.
    pub fn source_text(&self) -> String {
        match self {
            Token::Word(s) | Token::Whitespace(s) => s.clone(),
            Token::Pictogram(name) => format!("{{{name}}}"),
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, Token::Whitespace(_))
    }
}

/// Tokenize `text` left to right. Never fails: unbalanced braces stay part
/// of the surrounding word.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = text;

    while let Some((start, end)) = find_marker(rest) {
        split_words(&rest[..start], &mut tokens);
        tokens.push(Token::Pictogram(rest[start + 1..end].to_string()));
        rest = &rest[end + 1..];
    }
    split_words(rest, &mut tokens);

    tokens
}

/// Byte offsets of the leftmost `{`...`}` pair with a non-empty body that
/// contains no `}`.
fn find_marker(s: &str) -> Option<(usize, usize)> {
    let mut from = 0;
    while let Some(open) = s[from..].find('{').map(|i| from + i) {
        // The body can't contain `}`, so the first `}` after `{` closes it.
        let close = open + 1 + s[open + 1..].find('}')?;
        if close > open + 1 {
            return Some((open, close));
        }
        from = open + 1;
    }
    None
}

/// Split on whitespace runs, keeping the runs as their own tokens.
fn split_words(s: &str, out: &mut Vec<Token>) {
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (i, ch) in s.char_indices() {
        let space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                push_run(&s[start..i], prev, out);
                start = i;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if let Some(space) = in_space {
        push_run(&s[start..], space, out);
    }
}

fn push_run(run: &str, space: bool, out: &mut Vec<Token>) {
    if run.is_empty() {
        return;
    }
    if space {
        out.push(Token::Whitespace(run.to_string()));
    } else {
        out.push(Token::Word(run.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Token {
        Token::Word(s.into())
    }

    fn ws(s: &str) -> Token {
        Token::Whitespace(s.into())
    }

    fn pic(s: &str) -> Token {
        Token::Pictogram(s.into())
    }

    fn rejoin(tokens: &[Token]) -> String {
        tokens.iter().map(Token::source_text).collect()
    }

    #[test]
    fn words_and_pictogram() {
        assert_eq!(
            tokenize("Hi {wave}!"),
            vec![word("Hi"), ws(" "), pic("wave"), word("!")]
        );
    }

    #[test]
    fn whitespace_runs_are_kept_whole() {
        assert_eq!(
            tokenize("a  \tb"),
            vec![word("a"), ws("  \t"), word("b")]
        );
    }

    #[test]
    fn adjacent_markers() {
        assert_eq!(tokenize("{a}{b}"), vec![pic("a"), pic("b")]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn empty_braces_are_literal() {
        assert_eq!(tokenize("x{}y"), vec![word("x{}y")]);
    }

    #[test]
    fn unclosed_brace_is_literal() {
        assert_eq!(tokenize("oops {wave"), vec![word("oops"), ws(" "), word("{wave")]);
    }

    #[test]
    fn body_may_contain_an_open_brace() {
        assert_eq!(tokenize("{{a}"), vec![pic("{a")]);
    }

    #[test]
    fn marker_body_keeps_inner_spaces() {
        assert_eq!(tokenize("{big grin}"), vec![pic("big grin")]);
    }

    #[test]
    fn round_trip_reconstructs_text() {
        for text in [
            "Hi {wave}!",
            "  leading and trailing  ",
            "{a} mid {b}{c} end",
            "Neighbours {affirmative}, you know {intrigued}\nnew line",
            "unicode ünïcödé {😀} ok",
        ] {
            assert_eq!(rejoin(&tokenize(text)), text);
        }
    }
}
