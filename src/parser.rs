//! Minimal CSS block parser
//!
//! Produces the arena tree the extraction passes walk. This is not a
//! validating CSS parser: selectors, at-rule params and declaration values
//! are kept as raw trimmed strings, comments are skipped, and unknown
//! constructs are carried through untouched. The only hard error is a
//! block left unclosed at end of input.

use tracing::instrument;

use crate::arena::{NodeKind, StyleArena};
use crate::errors::{CriticalError, CriticalResult};

/// Parse a stylesheet into an arena tree.
#[instrument(level = "debug", skip(input))]
pub fn parse_stylesheet(input: &str) -> CriticalResult<StyleArena> {
    let mut arena = StyleArena::new();
    let mut parser = Parser::new(input);
    let root = arena.root();
    parser.parse_block_contents(&mut arena, root, true)?;
    Ok(arena)
}

struct Parser {
    src: Vec<char>,
    pos: usize,
    line: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        if c == '\n' {
            self.line += 1;
        }
        self.pos += 1;
        Some(c)
    }

    fn eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn unclosed(&self) -> CriticalError {
        CriticalError::Parse {
            line: self.line,
            reason: "unclosed block".to_string(),
        }
    }

    fn skip_ws_and_comments(&mut self) {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.bump();
            }
            if self.peek() == Some('/') && self.src.get(self.pos + 1) == Some(&'*') {
                self.bump();
                self.bump();
                while !self.eof() {
                    if self.peek() == Some('*') && self.src.get(self.pos + 1) == Some(&'/') {
                        self.bump();
                        self.bump();
                        break;
                    }
                    self.bump();
                }
            } else {
                return;
            }
        }
    }

    /// Parse nodes until end of input (`top_level`) or a closing brace,
    /// which is left for the caller to consume.
    fn parse_block_contents(
        &mut self,
        arena: &mut StyleArena,
        parent: generational_arena::Index,
        top_level: bool,
    ) -> CriticalResult<()> {
        loop {
            self.skip_ws_and_comments();
            match self.peek() {
                None => return Ok(()),
                Some('}') if !top_level => return Ok(()),
                Some('}') => {
                    // Stray closing brace at top level, skip it
                    self.bump();
                }
                Some('@') => self.parse_at_rule(arena, parent)?,
                Some(_) => match self.next_boundary() {
                    Boundary::OpenBrace => self.parse_rule(arena, parent)?,
                    Boundary::Other => self.parse_declaration(arena, parent),
                },
            }
        }
    }

    /// Decide whether the chunk ahead opens a block (a rule or block
    /// at-rule) or terminates flat (a declaration). Quotes, parens and
    /// brackets hide the characters inside them.
    fn next_boundary(&self) -> Boundary {
        let mut quote: Option<char> = None;
        let mut depth = 0usize;
        for &c in &self.src[self.pos..] {
            if let Some(q) = quote {
                if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => quote = Some(c),
                '(' | '[' => depth += 1,
                ')' | ']' => depth = depth.saturating_sub(1),
                '{' if depth == 0 => return Boundary::OpenBrace,
                ';' | '}' if depth == 0 => return Boundary::Other,
                _ => {}
            }
        }
        Boundary::Other
    }

    /// Consume raw text until one of `stops` at nesting depth zero.
    fn take_until(&mut self, stops: &[char]) -> String {
        let mut out = String::new();
        let mut quote: Option<char> = None;
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            if quote.is_none() && depth == 0 && stops.contains(&c) {
                break;
            }
            match c {
                q if quote == Some(q) => quote = None,
                '"' | '\'' if quote.is_none() => quote = Some(c),
                '(' | '[' if quote.is_none() => depth += 1,
                ')' | ']' if quote.is_none() => depth = depth.saturating_sub(1),
                _ => {}
            }
            out.push(c);
            self.bump();
        }
        out
    }

    fn parse_at_rule(
        &mut self,
        arena: &mut StyleArena,
        parent: generational_arena::Index,
    ) -> CriticalResult<()> {
        self.bump(); // '@'
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let params = self.take_until(&['{', ';', '}']).trim().to_string();
        let idx = arena.append(parent, NodeKind::AtRule { name, params });
        match self.peek() {
            Some('{') => {
                self.bump();
                self.parse_block_contents(arena, idx, false)?;
                if self.bump() != Some('}') {
                    return Err(self.unclosed());
                }
            }
            Some(';') => {
                self.bump();
            }
            _ => {}
        }
        Ok(())
    }

    fn parse_rule(
        &mut self,
        arena: &mut StyleArena,
        parent: generational_arena::Index,
    ) -> CriticalResult<()> {
        let selector = normalize_ws(&self.take_until(&['{']));
        self.bump(); // '{'
        let idx = arena.append(parent, NodeKind::Rule { selector });
        self.parse_block_contents(arena, idx, false)?;
        if self.bump() != Some('}') {
            return Err(self.unclosed());
        }
        Ok(())
    }

    fn parse_declaration(&mut self, arena: &mut StyleArena, parent: generational_arena::Index) {
        let chunk = self.take_until(&[';', '}']);
        if self.peek() == Some(';') {
            self.bump();
        }
        // Anything without a colon is noise (stray semicolon etc.), drop it
        if let Some((prop, value)) = chunk.split_once(':') {
            let prop = prop.trim().to_string();
            let value = value.trim().to_string();
            if !prop.is_empty() {
                arena.append(parent, NodeKind::Declaration { prop, value });
            }
        }
    }
}

enum Boundary {
    OpenBrace,
    Other,
}

/// Collapse internal whitespace runs (selectors spanning lines).
fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
