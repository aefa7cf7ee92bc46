//! Recursive descent recognizer
//!
//! One method per nonterminal, each choosing its production from a single
//! character of lookahead:
//!
//! ```text
//! S -> A C
//! C -> c | ε
//! A -> a B C d | B Q
//! B -> b B | ε
//! Q -> q | ε
//! ```

use std::fmt;
use thiserror::Error;
use tracing::trace;

/// A terminal did not match
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognizeError {
    #[error("Expected '{expected}' at position {position}, found {shown}", shown = describe(.found))]
    Unexpected {
        expected: char,
        found: Option<char>,
        position: usize,
    },
}

fn describe(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("'{}'", c),
        None => "end of input".to_string(),
    }
}

/// Productions applied while recognizing, in the order they were chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Production {
    S,
    CTerminal,
    CEmpty,
    ATerminal,
    AFallback,
    BTerminal,
    BEmpty,
    QTerminal,
    QEmpty,
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Production::S => "S -> A C",
            Production::CTerminal => "C -> c",
            Production::CEmpty => "C -> ε",
            Production::ATerminal => "A -> a B C d",
            Production::AFallback => "A -> B Q",
            Production::BTerminal => "B -> b B",
            Production::BEmpty => "B -> ε",
            Production::QTerminal => "Q -> q",
            Production::QEmpty => "Q -> ε",
        };
        f.write_str(text)
    }
}

/// Recognizer state over one input string
pub struct Recognizer {
    input: Vec<char>,
    position: usize,
    derivation: Vec<Production>,
}

impl Recognizer {
    pub fn new(input: &str) -> Self {
        Recognizer {
            input: input.chars().collect(),
            position: 0,
            derivation: Vec::new(),
        }
    }

    /// Run `S`. `Ok(true)` if it consumed the whole input, `Ok(false)` if
    /// input was left over.
    pub fn parse(&mut self) -> Result<bool, RecognizeError> {
        self.s()?;
        let complete = self.position == self.input.len();
        trace!(position = self.position, complete, "recognizer finished");
        Ok(complete)
    }

    /// Characters consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn derivation(&self) -> &[Production] {
        &self.derivation
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn eat(&mut self, expected: char) -> Result<(), RecognizeError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.position += 1;
                Ok(())
            }
            found => Err(RecognizeError::Unexpected {
                expected,
                found,
                position: self.position,
            }),
        }
    }

    fn apply(&mut self, production: Production) {
        trace!(%production, position = self.position, "apply");
        self.derivation.push(production);
    }

    fn s(&mut self) -> Result<(), RecognizeError> {
        self.apply(Production::S);
        self.a()?;
        self.c()
    }

    fn c(&mut self) -> Result<(), RecognizeError> {
        if self.peek() == Some('c') {
            self.apply(Production::CTerminal);
            self.eat('c')
        } else {
            self.apply(Production::CEmpty);
            Ok(())
        }
    }

    fn a(&mut self) -> Result<(), RecognizeError> {
        if self.peek() == Some('a') {
            self.apply(Production::ATerminal);
            self.eat('a')?;
            self.b()?;
            self.c()?;
            self.eat('d')
        } else {
            // Both B and Q may be empty, so this covers every other lookahead
            self.apply(Production::AFallback);
            self.b()?;
            self.q()
        }
    }

    fn b(&mut self) -> Result<(), RecognizeError> {
        // B -> b B is tail recursive; unrolled so long runs of 'b' don't grow the stack
        while self.peek() == Some('b') {
            self.apply(Production::BTerminal);
            self.eat('b')?;
        }
        self.apply(Production::BEmpty);
        Ok(())
    }

    fn q(&mut self) -> Result<(), RecognizeError> {
        if self.peek() == Some('q') {
            self.apply(Production::QTerminal);
            self.eat('q')
        } else {
            self.apply(Production::QEmpty);
            Ok(())
        }
    }
}

/// Recognize `input` in one call
pub fn recognize(input: &str) -> Result<bool, RecognizeError> {
    Recognizer::new(input).parse()
}
