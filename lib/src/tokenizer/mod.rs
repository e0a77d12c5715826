mod standard;
mod whitespace;

pub use {standard::Standard, whitespace::Whitespace};

use crate::token::Tokens;

/// Tokenizer selection, resolved at construction time.
#[derive(Clone, Debug)]
pub enum Tokenizer {
    Standard(Standard),
    Whitespace(Whitespace),
}

impl Tokenizer {
    pub fn tokenize(&mut self, text: &str) -> Tokens {
        match self {
            Tokenizer::Standard(tokenizer) => tokenizer.tokenize(text),
            Tokenizer::Whitespace(tokenizer) => tokenizer.tokenize(text),
        }
    }
}

pub trait TextTokenizer {
    fn tokenize<T: AsRef<str>>(&mut self, text: T) -> Tokens;
}
