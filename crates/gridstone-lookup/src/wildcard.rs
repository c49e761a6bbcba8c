//! Wildcard pattern matching for text criteria.
//!
//! `*` matches any run of characters (including none), `?` matches exactly
//! one character, and `~` escapes a following `*`, `?` or `~`. A trailing
//! `~` is a literal tilde. Matching is anchored at both ends and
//! case-sensitive; callers fold both sides first.

/// A parsed wildcard pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    tokens: Vec<Token>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnySingle,
    AnyRun,
}

impl WildcardPattern {
    /// Parse a pattern. Consecutive `*` collapse into one run.
    pub fn new(pattern: &str) -> Self {
        let mut tokens = Vec::new();
        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '*' => {
                    if tokens.last() != Some(&Token::AnyRun) {
                        tokens.push(Token::AnyRun);
                    }
                }
                '?' => tokens.push(Token::AnySingle),
                '~' => match chars.peek() {
                    Some(&next) if matches!(next, '*' | '?' | '~') => {
                        chars.next();
                        tokens.push(Token::Literal(next));
                    }
                    _ => tokens.push(Token::Literal('~')),
                },
                other => tokens.push(Token::Literal(other)),
            }
        }
        WildcardPattern { tokens }
    }

    /// True when the whole of `text` matches the pattern.
    pub fn matches(&self, text: &str) -> bool {
        let chars: Vec<char> = text.chars().collect();
        // greedy two-pointer scan: on a mismatch after a run, retry the run
        // one character further along
        let mut t = 0usize;
        let mut c = 0usize;
        let mut backtrack: Option<(usize, usize)> = None;
        while c < chars.len() {
            match self.tokens.get(t) {
                Some(Token::Literal(l)) if *l == chars[c] => {
                    t += 1;
                    c += 1;
                }
                Some(Token::AnySingle) => {
                    t += 1;
                    c += 1;
                }
                Some(Token::AnyRun) => {
                    backtrack = Some((t, c));
                    t += 1;
                }
                _ => match backtrack {
                    Some((bt, bc)) => {
                        t = bt + 1;
                        c = bc + 1;
                        backtrack = Some((bt, bc + 1));
                    }
                    None => return false,
                },
            }
        }
        while self.tokens.get(t) == Some(&Token::AnyRun) {
            t += 1;
        }
        t == self.tokens.len()
    }
}

/// One-shot convenience over [`WildcardPattern`].
pub fn wildcard_match(text: &str, pattern: &str) -> bool {
    WildcardPattern::new(pattern).matches(text)
}
