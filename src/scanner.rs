//! Lexical classification of SQL text into rewrite segments.
//!
//! The scanner is an ordered-choice matcher over a byte cursor: at each
//! position it tries, in precedence order, a plain-text run, a free-standing
//! `?` marker, each inert literal form (comments, quoted identifiers, string
//! literals, dollar-quoted literals), and finally a single-character
//! fallback. It never validates SQL; it only decides which spans must not be
//! scanned for placeholders.
//!
//! Each rule is public so the calling layer can match a single construct
//! against a [`Cursor`] without running the whole scan.

use smallvec::SmallVec;

use crate::error::{Result, RewriteError};
use crate::segment::Segment;

/// Segment sequence for one query. Small queries stay on the stack.
pub type Segments<'a> = SmallVec<[Segment<'a>; 8]>;

/// Characters that end a plain-text run: each may introduce a marker, a
/// comment, or a literal form.
const fn is_stop_char(c: char) -> bool {
    matches!(c, '\\' | '?' | '-' | '/' | '"' | '\'' | '$')
}

/// A byte cursor into the query text. Positions are byte offsets and always
/// sit on a character boundary.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Cursor { input, pos: 0 }
    }

    /// Current byte offset into the input.
    #[inline]
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// The unconsumed remainder of the input.
    #[inline]
    #[must_use]
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes and returns the next character.
    #[inline]
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Advances by `bytes`, which must end on a character boundary.
    #[inline]
    fn advance(&mut self, bytes: usize) {
        self.pos += bytes;
        debug_assert!(self.input.is_char_boundary(self.pos));
    }

    #[inline]
    fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    /// The span consumed since `from`.
    #[inline]
    fn span(&self, from: usize) -> &'a str {
        &self.input[from..self.pos]
    }

    /// Consumes a maximal run of non-stop characters.
    fn take_plain_run(&mut self) -> &'a str {
        let start = self.pos;
        match self.rest().find(is_stop_char) {
            Some(i) => self.pos += i,
            None => self.pos = self.input.len(),
        }
        self.span(start)
    }
}

/// Classifies the whole input into an ordered segment sequence.
///
/// Segments cover the input exactly once, in order, with no gaps. Fails if
/// any inert construct is left unterminated or malformed.
pub fn scan(input: &str) -> Result<Segments<'_>> {
    let mut cur = Cursor::new(input);
    let mut segments = Segments::new();

    while !cur.is_eof() {
        let start = cur.pos();

        let run = cur.take_plain_run();
        if !run.is_empty() {
            segments.push(Segment::Text(run));
            continue;
        }

        if cur.peek() == Some('?') {
            cur.bump();
            segments.push(Segment::Placeholder);
            continue;
        }

        if let Some(segment) = any_literal(&mut cur)? {
            segments.push(segment);
            continue;
        }

        // Fallback: a stop character that introduced nothing (lone '\', '-',
        // '/', or '$') passes through as a one-character literal.
        match cur.bump() {
            Some(_) => segments.push(Segment::Literal(cur.span(start))),
            None => {
                return Err(RewriteError::Parse(format!(
                    "scanner made no progress at byte {start}"
                )));
            }
        }
    }

    Ok(segments)
}

/// Matches any inert literal form at the cursor: line comment, block
/// comment, quoted identifier, string literal, or dollar-quoted literal.
///
/// Returns `Ok(None)` if none of them begin here.
pub fn any_literal<'a>(cur: &mut Cursor<'a>) -> Result<Option<Segment<'a>>> {
    if let Some(segment) = line_comment(cur) {
        return Ok(Some(segment));
    }
    if let Some(segment) = block_comment(cur)? {
        return Ok(Some(segment));
    }
    if let Some(segment) = quoted_identifier(cur)? {
        return Ok(Some(segment));
    }
    if let Some(segment) = string_literal(cur)? {
        return Ok(Some(segment));
    }
    dollar_quoted(cur)
}

/// Matches a `--` line comment through the trailing newline (kept if
/// present). Reaching end of input without a newline still terminates the
/// comment, so this rule cannot fail.
pub fn line_comment<'a>(cur: &mut Cursor<'a>) -> Option<Segment<'a>> {
    if !cur.starts_with("--") {
        return None;
    }
    let start = cur.pos();
    cur.advance(2);
    while let Some(c) = cur.bump() {
        if c == '\n' {
            break;
        }
    }
    Some(Segment::Literal(cur.span(start)))
}

/// Matches a `/* ... */` block comment, honoring nesting.
///
/// Nesting is tracked with an explicit depth counter rather than recursion,
/// so adversarially deep comments cannot overflow the stack.
pub fn block_comment<'a>(cur: &mut Cursor<'a>) -> Result<Option<Segment<'a>>> {
    if !cur.starts_with("/*") {
        return Ok(None);
    }
    let start = cur.pos();
    cur.advance(2);
    let mut depth = 1usize;
    while depth > 0 {
        if cur.starts_with("/*") {
            cur.advance(2);
            depth += 1;
        } else if cur.starts_with("*/") {
            cur.advance(2);
            depth -= 1;
        } else if cur.bump().is_none() {
            return Err(RewriteError::UnterminatedComment { offset: start });
        }
    }
    Ok(Some(Segment::Literal(cur.span(start))))
}

/// Matches a `"..."` quoted identifier, where `""` escapes one quote.
///
/// Two-state scan: a quote after a quote continues the body; a quote
/// followed by anything else (or end of input) terminates the identifier.
/// The total count of `"` characters in the span must be even.
pub fn quoted_identifier<'a>(cur: &mut Cursor<'a>) -> Result<Option<Segment<'a>>> {
    if cur.peek() != Some('"') {
        return Ok(None);
    }
    let start = cur.pos();
    cur.bump();
    let mut quotes = 1usize;
    // true when the previous character was a quote that may close the span
    let mut closing = false;
    loop {
        match cur.peek() {
            Some('"') => {
                cur.bump();
                quotes += 1;
                closing = !closing;
            }
            Some(_) if closing => break,
            Some(_) => {
                cur.bump();
            }
            None if closing => break,
            None => {
                return Err(RewriteError::UnterminatedLiteral {
                    construct: "quoted identifier",
                    offset: start,
                });
            }
        }
    }
    if quotes % 2 != 0 {
        return Err(RewriteError::UnterminatedLiteral {
            construct: "quoted identifier",
            offset: start,
        });
    }
    Ok(Some(Segment::Literal(cur.span(start))))
}

/// Matches a `'...'` string literal, where `''` or `\'` escapes one quote.
///
/// Three-state scan: `Other` (default), `Quote` (just saw an unescaped
/// closing candidate), `BackQ` (just saw a backslash, next character is
/// literal). The count of `'` characters minus backslash-escaped ones must
/// be even.
pub fn string_literal<'a>(cur: &mut Cursor<'a>) -> Result<Option<Segment<'a>>> {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Other,
        Quote,
        BackQ,
    }

    if cur.peek() != Some('\'') {
        return Ok(None);
    }
    let start = cur.pos();
    cur.bump();
    let mut quotes = 1usize;
    let mut escaped = 0usize;
    let mut state = State::Other;
    loop {
        match (state, cur.peek()) {
            (State::BackQ, Some(c)) => {
                cur.bump();
                if c == '\'' {
                    quotes += 1;
                    escaped += 1;
                }
                state = State::Other;
            }
            (State::Quote, Some('\'')) => {
                // doubled quote, still inside the literal
                cur.bump();
                quotes += 1;
                state = State::Other;
            }
            (State::Quote, _) => break,
            (State::Other, Some('\\')) => {
                cur.bump();
                state = State::BackQ;
            }
            (State::Other, Some('\'')) => {
                cur.bump();
                quotes += 1;
                state = State::Quote;
            }
            (State::Other, Some(_)) => {
                cur.bump();
            }
            (State::Other | State::BackQ, None) => {
                return Err(RewriteError::UnterminatedLiteral {
                    construct: "string literal",
                    offset: start,
                });
            }
        }
    }
    if (quotes - escaped) % 2 != 0 {
        return Err(RewriteError::UnterminatedLiteral {
            construct: "string literal",
            offset: start,
        });
    }
    Ok(Some(Segment::Literal(cur.span(start))))
}

/// Matches a `$tag$ ... $tag$` dollar-quoted literal.
///
/// The tag runs from the opening `$` to the next `$` and may be empty. A
/// `$` with no second `$` anywhere ahead is not a dollar quote; the rule
/// declines and the character falls through to the one-character fallback.
/// A tag beginning with a digit, or an opening delimiter whose exact
/// closing `$tag$` never reappears, is a hard error.
pub fn dollar_quoted<'a>(cur: &mut Cursor<'a>) -> Result<Option<Segment<'a>>> {
    if cur.peek() != Some('$') {
        return Ok(None);
    }
    let start = cur.pos();
    let rest = cur.rest();
    let Some(tag_len) = rest[1..].find('$') else {
        return Ok(None);
    };
    let tag = &rest[1..1 + tag_len];
    if tag.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return Err(RewriteError::MalformedDollarTag { offset: start });
    }
    let delim = &rest[..tag_len + 2];
    cur.advance(delim.len());
    match cur.rest().find(delim) {
        Some(i) => {
            cur.advance(i + delim.len());
            Ok(Some(Segment::Literal(cur.span(start))))
        }
        None => Err(RewriteError::UnterminatedLiteral {
            construct: "dollar-quoted literal",
            offset: start,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal<'a>(
        rule: impl Fn(&mut Cursor<'a>) -> Result<Option<Segment<'a>>>,
        input: &'a str,
    ) -> Result<Option<(&'a str, usize)>> {
        let mut cur = Cursor::new(input);
        let segment = rule(&mut cur)?;
        Ok(segment.map(|s| (s.content().unwrap(), cur.pos())))
    }

    #[test]
    fn test_line_comment() {
        let mut cur = Cursor::new("-- hello ?\nselect 1");
        let segment = line_comment(&mut cur).unwrap();
        assert_eq!(segment, Segment::Literal("-- hello ?\n"));
        assert_eq!(cur.rest(), "select 1");

        // end of input terminates without a newline
        let mut cur = Cursor::new("-- trailing");
        assert_eq!(line_comment(&mut cur), Some(Segment::Literal("-- trailing")));
        assert!(cur.is_eof());

        // a single hyphen is not a comment
        let mut cur = Cursor::new("- 1");
        assert_eq!(line_comment(&mut cur), None);
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn test_block_comment_nesting() {
        let got = literal(block_comment, "/* a /* b */ c */ after").unwrap();
        assert_eq!(got, Some(("/* a /* b */ c */", 17)));

        assert_eq!(literal(block_comment, "/a").unwrap(), None);

        assert_eq!(
            literal(block_comment, "/* open /* inner */").unwrap_err(),
            RewriteError::UnterminatedComment { offset: 0 }
        );
    }

    #[test]
    fn test_block_comment_deep_nesting() {
        let mut input = String::new();
        for _ in 0..10_000 {
            input.push_str("/*");
        }
        input.push_str("body");
        for _ in 0..10_000 {
            input.push_str("*/");
        }
        let got = literal(block_comment, &input).unwrap();
        assert_eq!(got, Some((input.as_str(), input.len())));
    }

    #[test]
    fn test_quoted_identifier() {
        assert_eq!(
            literal(quoted_identifier, r#""col" rest"#).unwrap(),
            Some((r#""col""#, 5))
        );
        // doubled quote stays inside the identifier
        assert_eq!(
            literal(quoted_identifier, r#""a""b" rest"#).unwrap(),
            Some((r#""a""b""#, 6))
        );
        // terminating quote at end of input
        assert_eq!(literal(quoted_identifier, r#""x""#).unwrap(), Some((r#""x""#, 3)));

        assert_eq!(literal(quoted_identifier, "plain").unwrap(), None);

        assert_eq!(
            literal(quoted_identifier, r#""never closed"#).unwrap_err(),
            RewriteError::UnterminatedLiteral {
                construct: "quoted identifier",
                offset: 0
            }
        );
        // trailing "" is an escape, not a terminator
        assert_eq!(
            literal(quoted_identifier, r#""ab"""#).unwrap_err(),
            RewriteError::UnterminatedLiteral {
                construct: "quoted identifier",
                offset: 0
            }
        );
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(literal(string_literal, "'abc' rest").unwrap(), Some(("'abc'", 5)));
        assert_eq!(literal(string_literal, "''").unwrap(), Some(("''", 2)));
        // doubled-quote escape
        assert_eq!(
            literal(string_literal, "'it''s' rest").unwrap(),
            Some(("'it''s'", 7))
        );
        // backslash escape
        assert_eq!(
            literal(string_literal, r"'it\'s' rest").unwrap(),
            Some((r"'it\'s'", 7))
        );
        // backslash escapes any character, not just quotes
        assert_eq!(
            literal(string_literal, r"'a\\b' rest").unwrap(),
            Some((r"'a\\b'", 6))
        );

        assert_eq!(literal(string_literal, "plain").unwrap(), None);

        assert_eq!(
            literal(string_literal, "'abc").unwrap_err(),
            RewriteError::UnterminatedLiteral {
                construct: "string literal",
                offset: 0
            }
        );
        // backslash swallows the would-be terminator
        assert_eq!(
            literal(string_literal, r"'abc\'").unwrap_err(),
            RewriteError::UnterminatedLiteral {
                construct: "string literal",
                offset: 0
            }
        );
    }

    #[test]
    fn test_dollar_quoted() {
        assert_eq!(
            literal(dollar_quoted, "$$ body ? $$ rest").unwrap(),
            Some(("$$ body ? $$", 12))
        );
        assert_eq!(
            literal(dollar_quoted, "$fn$ body $fn$ rest").unwrap(),
            Some(("$fn$ body $fn$", 14))
        );
        // inner delimiters with a different tag do not close the literal
        assert_eq!(
            literal(dollar_quoted, "$a$ has $b$ inside $a$").unwrap(),
            Some(("$a$ has $b$ inside $a$", 22))
        );

        // a lone '$' with no partner is not a dollar quote
        assert_eq!(literal(dollar_quoted, "$ 3").unwrap(), None);
        assert_eq!(literal(dollar_quoted, "price$").unwrap(), None);

        assert_eq!(
            literal(dollar_quoted, "$1$ x $1$").unwrap_err(),
            RewriteError::MalformedDollarTag { offset: 0 }
        );
        assert_eq!(
            literal(dollar_quoted, "$t$ never closed $other$").unwrap_err(),
            RewriteError::UnterminatedLiteral {
                construct: "dollar-quoted literal",
                offset: 0
            }
        );
    }

    #[test]
    fn test_any_literal_dispatch() {
        assert_eq!(
            literal(any_literal, "-- c\nx").unwrap(),
            Some(("-- c\n", 5))
        );
        assert_eq!(literal(any_literal, "/*c*/x").unwrap(), Some(("/*c*/", 5)));
        assert_eq!(literal(any_literal, "\"i\"x").unwrap(), Some(("\"i\"", 3)));
        assert_eq!(literal(any_literal, "'s'x").unwrap(), Some(("'s'", 3)));
        assert_eq!(literal(any_literal, "$$b$$x").unwrap(), Some(("$$b$$", 5)));
        assert_eq!(literal(any_literal, "select").unwrap(), None);
    }

    #[test]
    fn test_scan_covers_input() {
        let segments = scan("select * from t where a = ? and b = 'x?'").unwrap();
        assert_eq!(
            segments.as_slice(),
            &[
                Segment::Text("select * from t where a = "),
                Segment::Placeholder,
                Segment::Text(" and b = "),
                Segment::Literal("'x?'"),
            ]
        );
    }

    #[test]
    fn test_scan_fallback_characters() {
        let segments = scan(r"a \ b - c / d $ e").unwrap();
        assert_eq!(
            segments.as_slice(),
            &[
                Segment::Text("a "),
                Segment::Literal("\\"),
                Segment::Text(" b "),
                Segment::Literal("-"),
                Segment::Text(" c "),
                Segment::Literal("/"),
                Segment::Text(" d "),
                Segment::Literal("$"),
                Segment::Text(" e"),
            ]
        );
    }

    #[test]
    fn test_scan_multibyte_text() {
        let segments = scan("select 'héllo', ? -- déjà\n").unwrap();
        assert_eq!(
            segments.as_slice(),
            &[
                Segment::Text("select "),
                Segment::Literal("'héllo'"),
                Segment::Text(", "),
                Segment::Placeholder,
                Segment::Text(" "),
                Segment::Literal("-- déjà\n"),
            ]
        );
    }
}
