use crate::{
    normalizer::TextNormalizer,
    token::{Token, Tokens},
};

#[derive(Clone, Debug, Default)]
pub struct Lowercase;

impl Lowercase {
    pub fn new() -> Self {
        Self
    }
}

impl TextNormalizer for Lowercase {
    fn normalize(&mut self, tokens: &mut Tokens) {
        tokens.iter_mut().for_each(|token| {
            if !token.is_ascii() {
                *token = Token::from(token.to_lowercase());
            } else {
                token.as_mut().make_ascii_lowercase();
            }
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct Uppercase;

impl Uppercase {
    pub fn new() -> Self {
        Self
    }
}

impl TextNormalizer for Uppercase {
    fn normalize(&mut self, tokens: &mut Tokens) {
        tokens.iter_mut().for_each(|token| {
            if !token.is_ascii() {
                *token = Token::from(token.to_uppercase());
            } else {
                token.as_mut().make_ascii_uppercase();
            }
        })
    }
}
