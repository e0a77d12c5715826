use crate::{normalizer::TextNormalizer, token::Tokens};

/// Strips ASCII punctuation from every token and drops tokens that
/// were nothing but punctuation.
#[derive(Clone, Debug, Default)]
pub struct Punctuation;

impl Punctuation {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextNormalizer for Punctuation {
    fn normalize(&mut self, tokens: &mut Tokens) {
        tokens.retain_mut(|token| {
            token.retain(|ch| !ch.is_ascii_punctuation());
            !token.is_empty()
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        normalizer::{punctuation::Punctuation, TextNormalizer},
        tokens,
    };

    #[test]
    fn test_normalizer_punctuation() {
        let mut tokens = tokens!["(live)", "don't", "---", "rock"];
        let mut normalizer = Punctuation::new();
        normalizer.normalize(&mut tokens);
        assert_eq!(tokens, tokens!["live", "dont", "rock"]);
    }
}
