use crate::{
    token::{Token, Tokens},
    tokenizer::TextTokenizer,
};

/// Splits on Unicode whitespace only; punctuation stays attached to
/// its word.
#[derive(Clone, Debug, Default)]
pub struct Whitespace;

impl Whitespace {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextTokenizer for Whitespace {
    fn tokenize<T: AsRef<str>>(&mut self, text: T) -> Tokens {
        text.as_ref().split_whitespace().map(Token::from).collect()
    }
}
