//! Token definitions for parameter expressions
//!
//! Parameter expressions are plain arithmetic: numeric literals, define names, the four
//! basic operators and parentheses. Literals may carry an exponent (`1e-3`, `2.5E2`).
//! The tokens are produced by a logos lexer.
use logos::Logos;

#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum ExprToken {
    #[regex(
        r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?|\.[0-9]+([eE][+-]?[0-9]+)?",
        |lex| lex.slice().to_string()
    )]
    Number(String),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<Result<ExprToken, ()>> {
        ExprToken::lexer(source).collect()
    }

    #[test]
    fn test_numbers_and_operators() {
        assert_eq!(
            lex_all("2+3.5*.5"),
            vec![
                Ok(ExprToken::Number("2".to_string())),
                Ok(ExprToken::Plus),
                Ok(ExprToken::Number("3.5".to_string())),
                Ok(ExprToken::Star),
                Ok(ExprToken::Number(".5".to_string())),
            ]
        );
    }

    #[test]
    fn test_exponent_literals() {
        assert_eq!(
            lex_all("1e-3*2.5E2+.5e1"),
            vec![
                Ok(ExprToken::Number("1e-3".to_string())),
                Ok(ExprToken::Star),
                Ok(ExprToken::Number("2.5E2".to_string())),
                Ok(ExprToken::Plus),
                Ok(ExprToken::Number(".5e1".to_string())),
            ]
        );
        // A bare `e` is not an exponent and stays an identifier
        assert_eq!(
            lex_all("2e"),
            vec![
                Ok(ExprToken::Number("2".to_string())),
                Ok(ExprToken::Ident("e".to_string())),
            ]
        );
    }

    #[test]
    fn test_identifiers_and_whitespace() {
        assert_eq!(
            lex_all(" (len_2 / x) "),
            vec![
                Ok(ExprToken::OpenParen),
                Ok(ExprToken::Ident("len_2".to_string())),
                Ok(ExprToken::Slash),
                Ok(ExprToken::Ident("x".to_string())),
                Ok(ExprToken::CloseParen),
            ]
        );
    }

    #[test]
    fn test_unknown_character_is_an_error() {
        assert!(lex_all("2 % 3").iter().any(|token| token.is_err()));
    }
}
