//! Regular expressions that remember their source text and flags.

use regex_automata::meta::Regex;
use regex_automata::util::syntax;

/// Flag letters accepted by [`Pattern::new`].
///
/// - `i`: case-insensitive
/// - `m`: `^`/`$` match at line boundaries
/// - `s`: `.` matches `\n`
/// - `x`: ignore whitespace and `#` comments in the source
/// - `U`: swap greedy and lazy quantifiers
/// - `R`: CRLF-aware line anchors
pub const FLAGS: &str = "imsxUR";

/// Error while building a [`Pattern`].
#[derive(Debug)]
pub enum PatternError {
    UnknownFlag(char),
    RepeatedFlag(char),
    Build(Box<regex_automata::meta::BuildError>),
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFlag(c) => write!(f, "unknown pattern flag `{c}`"),
            Self::RepeatedFlag(c) => write!(f, "pattern flag `{c}` given twice"),
            Self::Build(e) => write!(f, "invalid pattern: {e}"),
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Build(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// Compiled regular expression with its source and flag letters.
///
/// Equality compares source and flags, not the compiled automaton.
#[derive(Clone, Debug)]
pub struct Pattern {
    source: String,
    flags: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` with the given flag letters (see [`FLAGS`]).
    pub fn new(source: &str, flags: &str) -> Result<Self, PatternError> {
        let mut config = syntax::Config::new();
        let mut seen = String::with_capacity(flags.len());
        for c in flags.chars() {
            if seen.contains(c) {
                return Err(PatternError::RepeatedFlag(c));
            }
            config = match c {
                'i' => config.case_insensitive(true),
                'm' => config.multi_line(true),
                's' => config.dot_matches_new_line(true),
                'x' => config.ignore_whitespace(true),
                'U' => config.swap_greed(true),
                'R' => config.crlf(true),
                other => return Err(PatternError::UnknownFlag(other)),
            };
            seen.push(c);
        }

        let regex = Regex::builder()
            .syntax(config)
            .build(source)
            .map_err(|e| PatternError::Build(Box::new(e)))?;

        Ok(Self {
            source: source.to_owned(),
            flags: seen,
            regex,
        })
    }

    /// Source text as written, without flags.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Flag letters in the order given.
    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn has_flag(&self, flag: char) -> bool {
        self.flags.contains(flag)
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }

    /// Leftmost-first match, as a byte range into `haystack`.
    pub fn find(&self, haystack: &str) -> Option<std::ops::Range<usize>> {
        self.regex.find(haystack).map(|m| m.range())
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}
