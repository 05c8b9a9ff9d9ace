/*!
The pattern module compiles the user's raw expressions into a single matcher.

All four dialects are normalized onto the regex crate's syntax before
compilation: fixed strings are escaped wholesale and basic patterns have the
inverted meaning of `? + { } | ( )` rewritten. The word/line/case modifiers
are folded in here as well, so the rest of the engine only ever sees one
compiled value with two operations: "does this line match?" and "where are
the matches?".
*/

use regex::bytes::{Regex, RegexBuilder};

use crate::{Error, Result};

/// The regex syntax family of the user's patterns.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dialect {
    /// POSIX basic regular expressions, where `? + { } | ( )` are literals
    /// unless backslash escaped.
    Basic,
    /// POSIX extended regular expressions.
    Extended,
    /// Fixed strings. Every byte is literal.
    Fixed,
    /// Perl style expressions. Passed to the regex engine unchanged, so the
    /// supported syntax is exactly the regex crate's.
    Perl,
}

/// A builder for a line matcher.
#[derive(Clone, Debug)]
pub struct MatcherBuilder {
    dialect: Dialect,
    ignore_case: bool,
    word_regexp: bool,
    line_regexp: bool,
}

impl Default for MatcherBuilder {
    fn default() -> MatcherBuilder {
        MatcherBuilder {
            dialect: Dialect::Basic,
            ignore_case: false,
            word_regexp: false,
            line_regexp: false,
        }
    }
}

impl MatcherBuilder {
    /// Create a new builder with grep's defaults: the basic dialect and no
    /// modifiers.
    pub fn new() -> MatcherBuilder {
        MatcherBuilder::default()
    }

    /// Set the pattern dialect.
    pub fn dialect(mut self, dialect: Dialect) -> MatcherBuilder {
        self.dialect = dialect;
        self
    }

    /// When enabled, patterns are compiled case insensitively.
    pub fn ignore_case(mut self, yes: bool) -> MatcherBuilder {
        self.ignore_case = yes;
        self
    }

    /// When enabled, each pattern only matches at word boundaries.
    pub fn word_regexp(mut self, yes: bool) -> MatcherBuilder {
        self.word_regexp = yes;
        self
    }

    /// When enabled, each pattern must match an entire line.
    pub fn line_regexp(mut self, yes: bool) -> MatcherBuilder {
        self.line_regexp = yes;
        self
    }

    /// Compile all of the given patterns into one matcher that matches a
    /// line whenever any of the patterns do.
    ///
    /// A malformed pattern yields an error before any searching begins.
    pub fn build(&self, patterns: &[String]) -> Result<Matcher> {
        if patterns.is_empty() {
            return Err(Error::NoPatterns);
        }
        let mut alts = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let translated = match self.dialect {
                Dialect::Fixed => regex::escape(pattern),
                Dialect::Basic => translate_basic(pattern),
                Dialect::Extended | Dialect::Perl => pattern.clone(),
            };
            let mut alt = format!("(?:{})", translated);
            if self.word_regexp {
                alt = format!(r"\b{}\b", alt);
            }
            if self.line_regexp {
                alt = format!(r"\A{}\z", alt);
            }
            alts.push(alt);
        }
        let re = RegexBuilder::new(&alts.join("|"))
            .case_insensitive(self.ignore_case)
            .multi_line(false)
            .build()
            .map_err(Error::Regex)?;
        Ok(Matcher { re: re })
    }
}

/// A compiled matcher over one line of bytes.
///
/// For a fixed configuration a matcher is pure: the same line always yields
/// the same spans.
#[derive(Clone, Debug)]
pub struct Matcher {
    re: Regex,
}

impl Matcher {
    /// Returns true if and only if the line contains at least one match.
    pub fn is_match(&self, line: &[u8]) -> bool {
        self.re.is_match(line)
    }

    /// Returns every match span in the line as `[start, end)` byte
    /// intervals, sorted by start and non-overlapping.
    pub fn find_spans(&self, line: &[u8]) -> Vec<(usize, usize)> {
        self.re.find_iter(line).map(|m| (m.start(), m.end())).collect()
    }
}

/// Rewrites a basic dialect pattern into extended syntax.
///
/// In the basic dialect, `? + { } | ( )` match themselves and only take on
/// their special meaning when preceded by a backslash. This swaps the
/// escaping of exactly those characters and leaves everything else alone.
fn translate_basic(pattern: &str) -> String {
    fn swapped(c: char) -> bool {
        matches!(c, '?' | '+' | '{' | '}' | '|' | '(' | ')')
    }

    let mut out = String::with_capacity(pattern.len() + 4);
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) if swapped(next) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                // A trailing backslash is invalid in every dialect. Leave
                // it for the regex engine to reject.
                None => out.push('\\'),
            }
        } else if swapped(c) {
            out.push('\\');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{Dialect, Matcher, MatcherBuilder};
    use crate::Error;

    fn matcher(dialect: Dialect, pattern: &str) -> Matcher {
        MatcherBuilder::new()
            .dialect(dialect)
            .build(&[pattern.to_string()])
            .unwrap()
    }

    #[test]
    fn translate_basic_swaps_escaping() {
        assert_eq!(super::translate_basic(r"a+b"), r"a\+b");
        assert_eq!(super::translate_basic(r"a\+b"), r"a+b");
        assert_eq!(super::translate_basic(r"(x)"), r"\(x\)");
        assert_eq!(super::translate_basic(r"\(x\)"), r"(x)");
        assert_eq!(super::translate_basic(r"a\.b"), r"a\.b");
        assert_eq!(super::translate_basic(r"x\|y"), r"x|y");
    }

    #[test]
    fn basic_dialect_literals() {
        let m = matcher(Dialect::Basic, "a+b?");
        assert!(m.is_match(b"xa+b?x"));
        assert!(!m.is_match(b"aab"));
    }

    #[test]
    fn basic_dialect_escaped_operators() {
        let m = matcher(Dialect::Basic, r"ab\+");
        assert!(m.is_match(b"abbb"));
        assert!(!m.is_match(b"a"));
    }

    #[test]
    fn fixed_dialect_is_literal() {
        let m = matcher(Dialect::Fixed, "a.c|d");
        assert!(m.is_match(b"xa.c|dx"));
        assert!(!m.is_match(b"abc"));
    }

    #[test]
    fn extended_dialect() {
        let m = matcher(Dialect::Extended, "ab+c|z");
        assert!(m.is_match(b"abbc"));
        assert!(m.is_match(b"z"));
        assert!(!m.is_match(b"ac"));
    }

    #[test]
    fn multiple_patterns_alternate() {
        let m = MatcherBuilder::new()
            .dialect(Dialect::Extended)
            .build(&["foo".to_string(), "bar".to_string()])
            .unwrap();
        assert!(m.is_match(b"xx foo xx"));
        assert!(m.is_match(b"xx bar xx"));
        assert!(!m.is_match(b"xx baz xx"));
    }

    #[test]
    fn word_regexp() {
        let m = MatcherBuilder::new()
            .dialect(Dialect::Extended)
            .word_regexp(true)
            .build(&["foo".to_string()])
            .unwrap();
        assert!(m.is_match(b"a foo b"));
        assert!(!m.is_match(b"afoob"));
    }

    #[test]
    fn line_regexp() {
        let m = MatcherBuilder::new()
            .dialect(Dialect::Extended)
            .line_regexp(true)
            .build(&["fo+".to_string()])
            .unwrap();
        assert!(m.is_match(b"foo"));
        assert!(!m.is_match(b"foox"));
        assert!(!m.is_match(b"xfoo"));
    }

    #[test]
    fn ignore_case() {
        let m = MatcherBuilder::new()
            .dialect(Dialect::Extended)
            .ignore_case(true)
            .build(&["sherlock".to_string()])
            .unwrap();
        assert!(m.is_match(b"SHERLOCK"));
    }

    #[test]
    fn spans_are_sorted_and_in_bounds() {
        let m = matcher(Dialect::Extended, "o");
        let line = b"foo bog";
        let spans = m.find_spans(line);
        assert_eq!(spans, vec![(1, 2), (2, 3), (5, 6)]);
        for (s, e) in spans {
            assert!(s < e && e <= line.len());
        }
    }

    #[test]
    fn malformed_pattern_is_an_error() {
        let err = MatcherBuilder::new()
            .dialect(Dialect::Extended)
            .build(&["a(".to_string()])
            .unwrap_err();
        match err {
            Error::Regex(_) => {}
            err => panic!("unexpected error: {}", err),
        }
    }

    #[test]
    fn no_patterns_is_an_error() {
        let err = MatcherBuilder::new().build(&[]).unwrap_err();
        match err {
            Error::NoPatterns => {}
            err => panic!("unexpected error: {}", err),
        }
    }
}
