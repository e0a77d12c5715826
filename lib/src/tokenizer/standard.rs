use crate::{
    token::{Token, Tokens},
    tokenizer::TextTokenizer,
};

/// Splits on every non-alphanumeric character, so punctuation embedded
/// in a word ("AC/DC", "don't") yields the same terms whether it came
/// from a stored field or a typed query.
#[derive(Clone, Debug, Default)]
pub struct Standard;

impl Standard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextTokenizer for Standard {
    fn tokenize<T: AsRef<str>>(&mut self, text: T) -> Tokens {
        text.as_ref()
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|part| !part.is_empty())
            .map(Token::from)
            .collect()
    }
}
