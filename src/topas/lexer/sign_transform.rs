//! Sign merging for number literals
//!
//! logos sees `-5` as `Minus, Value("5")`. Whether that minus is a sign or a
//! subtraction depends on what precedes it, which a regular lexer cannot know.
//! This pass decides it with one token of look-behind:
//!
//! - `4-5`, `4 - 5`: the minus follows an operand or is detached from the
//!   number, so it stays a binary operator.
//! - `4 -5`, `(-5`, `= -5`, `-5` at start: the sign is glued to the number and
//!   does not directly follow an operand, so it becomes part of the literal.
//!
//! The merged token spans both the sign and the digits.

use crate::topas::lexer::tokens::Token;
use std::ops::Range;

/// Merge `+`/`-` signs into the adjacent number literal that follows them
pub fn merge_signs(tokens: Vec<(Token, Range<usize>)>) -> Vec<(Token, Range<usize>)> {
    let mut result: Vec<(Token, Range<usize>)> = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some((token, span)) = iter.next() {
        let sign = match token {
            Token::Plus => Some('+'),
            Token::Minus => Some('-'),
            _ => None,
        };

        if let Some(sign) = sign {
            let glued_to_value = matches!(
                iter.peek(),
                Some((Token::Value(_), next_span)) if next_span.start == span.end
            );
            let binary_position = match result.last() {
                Some((prev, prev_span)) => prev.ends_operand() && prev_span.end == span.start,
                None => false,
            };

            if glued_to_value && !binary_position {
                if let Some((Token::Value(digits), next_span)) = iter.next() {
                    let literal = if sign == '-' {
                        format!("-{}", digits)
                    } else {
                        digits
                    };
                    result.push((Token::Value(literal), span.start..next_span.end));
                    continue;
                }
            }
        }

        result.push((token, span));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topas::lexer::tokenize_with_spans;

    fn merged(source: &str) -> Vec<Token> {
        merge_signs(tokenize_with_spans(source))
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    fn value(text: &str) -> Token {
        Token::Value(text.to_string())
    }

    #[test]
    fn test_leading_sign_is_merged() {
        assert_eq!(merged("-5"), vec![value("-5")]);
        assert_eq!(merged("+5"), vec![value("5")]);
    }

    #[test]
    fn test_subtraction_is_kept() {
        assert_eq!(merged("4-5"), vec![value("4"), Token::Minus, value("5")]);
        assert_eq!(merged("4 - 5"), vec![value("4"), Token::Minus, value("5")]);
    }

    #[test]
    fn test_detached_operand_sign_is_merged() {
        assert_eq!(merged("4 -5"), vec![value("4"), value("-5")]);
    }

    #[test]
    fn test_sign_after_operator_is_merged() {
        assert_eq!(
            merged("a*-5"),
            vec![Token::Name("a".to_string()), Token::Star, value("-5")]
        );
        assert_eq!(merged("(-5"), vec![Token::OpenParen, value("-5")]);
    }

    #[test]
    fn test_merged_span_covers_sign() {
        let tokens = merge_signs(tokenize_with_spans("a = -1.5"));
        assert_eq!(tokens.last(), Some(&(value("-1.5"), 4..8)));
    }
}
