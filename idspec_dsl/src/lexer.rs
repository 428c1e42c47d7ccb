//! Tokenizer for `.id` sources, built on logos.
//!
//! Comments are real tokens here. The parser splits them out and attaches
//! them to declarations so the formatter never drops them.

use std::fmt;
use std::ops::Range;

use logos::Logos;

use crate::error::ParseError;

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[token("import")]
    Import,
    #[token("type")]
    Type,
    #[token("struct")]
    Struct,
    #[token("union")]
    Union,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("&")]
    Amp,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    /// String literal, quotes and escapes kept verbatim.
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice().to_string())]
    Str(String),

    #[regex(r"//[^\n]*", |lex| lex.slice().trim_end().to_string())]
    Comment(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Import => f.write_str("`import`"),
            Token::Type => f.write_str("`type`"),
            Token::Struct => f.write_str("`struct`"),
            Token::Union => f.write_str("`union`"),
            Token::LBrace => f.write_str("`{`"),
            Token::RBrace => f.write_str("`}`"),
            Token::LBracket => f.write_str("`[`"),
            Token::RBracket => f.write_str("`]`"),
            Token::LParen => f.write_str("`(`"),
            Token::RParen => f.write_str("`)`"),
            Token::Comma => f.write_str("`,`"),
            Token::Colon => f.write_str("`:`"),
            Token::Dot => f.write_str("`.`"),
            Token::Amp => f.write_str("`&`"),
            Token::Ident(name) => write!(f, "identifier `{name}`"),
            Token::Str(_) => f.write_str("string literal"),
            Token::Comment(_) => f.write_str("comment"),
        }
    }
}

/// A token with its byte range in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub span: Range<usize>,
}

/// Tokenize the whole source, failing on the first invalid character.
pub fn tokenize(src: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(src).spanned() {
        match result {
            Ok(token) => tokens.push(Spanned { token, span }),
            Err(()) => {
                let slice = &src[span.clone()];
                let message = if slice.starts_with('"') {
                    "unterminated string literal".to_string()
                } else {
                    format!("unexpected character {slice:?}")
                };
                return Err(ParseError::at(src, span.start, message));
            }
        }
    }
    Ok(tokens)
}
