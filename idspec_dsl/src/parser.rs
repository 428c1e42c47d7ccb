//! Recursive-descent parser for `.id` files.
//!
//! Comments are held aside and attached as the parser moves through the
//! token stream: leading comments go to the next decl or member, a comment
//! on the same line goes to the item it follows, and leftovers become block
//! or module trailing comments.

use crate::ast::{Body, Decl, DeclKind, Member, MemberKind, Module, Param, TypeRef};
use crate::error::ParseError;
use crate::lexer::{Spanned, Token, tokenize};

/// Parse a whole `.id` source into a [`Module`].
pub fn parse(src: &str) -> Result<Module, ParseError> {
    let (comments, tokens): (Vec<_>, Vec<_>) = tokenize(src)?
        .into_iter()
        .partition(|t| matches!(t.token, Token::Comment(_)));
    let module = Parser {
        src,
        tokens,
        comments,
        pos: 0,
        next_comment: 0,
        last_end: 0,
    }
    .parse_module()?;
    tracing::trace!(decls = module.decls().len(), "parsed module");
    Ok(module)
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Spanned>,
    comments: Vec<Spanned>,
    pos: usize,
    next_comment: usize,
    /// End offset of the last consumed token or comment.
    last_end: usize,
}

impl Parser<'_> {
    fn parse_module(mut self) -> Result<Module, ParseError> {
        let mut decls = Vec::new();
        while let Some(next) = self.peek().cloned() {
            let comments = self.take_leading(next.span.start);
            let mut decl = match next.token {
                Token::Import => self.parse_import()?,
                Token::Type => self.parse_type_decl()?,
                other => {
                    let message = format!("expected `import` or `type`, found {other}");
                    return Err(self.error_at(next.span.start, message));
                }
            };
            decl.comments = comments;
            decl.trailing = self.take_trailing();
            decls.push(decl);
        }
        let trailing = self.take_leading(usize::MAX);
        Ok(Module::new(decls, trailing))
    }

    fn parse_import(&mut self) -> Result<Decl, ParseError> {
        self.bump();
        let name = self.expect_ident("import name")?;
        let next = self.next_or_eof("import path")?;
        match next.token {
            Token::Str(path) => Ok(Decl::new(name, DeclKind::Import { path })),
            other => Err(self.error_at(
                next.span.start,
                format!("expected import path, found {other}"),
            )),
        }
    }

    fn parse_type_decl(&mut self) -> Result<Decl, ParseError> {
        self.bump();
        let name = self.expect_ident("type name")?;
        let kind = match self.peek().map(|t| &t.token) {
            Some(Token::Struct) => {
                self.bump();
                DeclKind::Struct(self.parse_body()?)
            }
            Some(Token::Union) => {
                self.bump();
                DeclKind::Union(self.parse_body()?)
            }
            _ => DeclKind::Alias(self.parse_type_ref()?),
        };
        Ok(Decl::new(name, kind))
    }

    fn parse_body(&mut self) -> Result<Body, ParseError> {
        self.expect(&Token::LBrace, "`{`")?;
        let mut members: Vec<Member> = Vec::new();
        loop {
            let next = self.peek().cloned().ok_or_else(|| self.eof_error("`}`"))?;
            if next.token == Token::RBrace {
                let trailing_comments = self.take_leading(next.span.start);
                self.bump();
                return Ok(Body {
                    members,
                    trailing_comments,
                });
            }
            let blank_before = !members.is_empty() && self.blank_line_before(next.span.start);
            let comments = self.take_leading(next.span.start);
            let mut member = self.parse_member()?;
            member.comments = comments;
            member.blank_before = blank_before;
            member.trailing = self.take_trailing();
            members.push(member);
        }
    }

    fn parse_member(&mut self) -> Result<Member, ParseError> {
        let name = self.expect_ident("member name")?;
        let kind = if self.peek().map(|t| &t.token) == Some(&Token::LParen) {
            self.bump();
            let params = self.parse_params()?;
            let ret = if self.type_follows_on_same_line() {
                Some(self.parse_type_ref()?)
            } else {
                None
            };
            MemberKind::Method { params, ret }
        } else {
            MemberKind::Field {
                ty: self.parse_type_ref()?,
            }
        };
        Ok(Member {
            name,
            kind,
            comments: Vec::new(),
            trailing: None,
            blank_before: false,
        })
    }

    /// Parameters after `(`, consuming the closing `)`.
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();
        loop {
            if self.peek().map(|t| &t.token) == Some(&Token::RParen) {
                self.bump();
                return Ok(params);
            }
            let name = self.expect_ident("parameter name or `)`")?;
            let ty = self.parse_type_ref()?;
            params.push(Param { name, ty });
            let next = self.next_or_eof("`,` or `)`")?;
            match next.token {
                Token::Comma => {}
                Token::RParen => return Ok(params),
                other => {
                    let message = format!("expected `,` or `)`, found {other}");
                    return Err(self.error_at(next.span.start, message));
                }
            }
        }
    }

    fn parse_type_ref(&mut self) -> Result<TypeRef, ParseError> {
        let next = self.next_or_eof("type")?;
        match next.token {
            Token::Ident(name) => {
                if self.peek().map(|t| &t.token) == Some(&Token::Dot) {
                    self.bump();
                    let member = self.expect_ident("type name after `.`")?;
                    Ok(TypeRef::Qualified {
                        package: name,
                        name: member,
                    })
                } else {
                    Ok(TypeRef::Named(name))
                }
            }
            Token::LBracket => {
                let inner = self.parse_type_ref()?;
                self.expect(&Token::RBracket, "`]`")?;
                Ok(TypeRef::Array(Box::new(inner)))
            }
            Token::LBrace => {
                let key = self.parse_type_ref()?;
                self.expect(&Token::Colon, "`:`")?;
                let value = self.parse_type_ref()?;
                self.expect(&Token::RBrace, "`}`")?;
                Ok(TypeRef::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            Token::Amp => Ok(TypeRef::Ref(Box::new(self.parse_type_ref()?))),
            other => Err(self.error_at(next.span.start, format!("expected type, found {other}"))),
        }
    }

    fn type_follows_on_same_line(&self) -> bool {
        match self.peek() {
            Some(next) => {
                matches!(
                    next.token,
                    Token::Ident(_) | Token::LBracket | Token::LBrace | Token::Amp
                ) && !self.src[self.last_end..next.span.start].contains('\n')
            }
            None => false,
        }
    }

    // -- comments ---------------------------------------------------------

    /// Take every pending comment that starts before `offset`.
    fn take_leading(&mut self, offset: usize) -> Vec<String> {
        let mut taken = Vec::new();
        while let Some(comment) = self.comments.get(self.next_comment) {
            if comment.span.start >= offset {
                break;
            }
            if let Token::Comment(text) = &comment.token {
                taken.push(text.clone());
            }
            self.last_end = self.last_end.max(comment.span.end);
            self.next_comment += 1;
        }
        taken
    }

    /// Take the next comment if it sits on the same line as the last token.
    fn take_trailing(&mut self) -> Option<String> {
        let comment = self.comments.get(self.next_comment)?;
        if comment.span.start < self.last_end
            || self.src[self.last_end..comment.span.start].contains('\n')
        {
            return None;
        }
        let text = match &comment.token {
            Token::Comment(text) => text.clone(),
            _ => return None,
        };
        self.last_end = comment.span.end;
        self.next_comment += 1;
        Some(text)
    }

    /// Whether a blank line separates the last consumed item from the next
    /// member (or that member's first leading comment).
    fn blank_line_before(&self, token_start: usize) -> bool {
        let first = self
            .comments
            .get(self.next_comment)
            .map(|c| c.span.start)
            .filter(|&start| start < token_start)
            .unwrap_or(token_start);
        let gap = &self.src[self.last_end.min(first)..first];
        gap.matches('\n').count() >= 2
    }

    // -- token plumbing ---------------------------------------------------

    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Spanned> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        self.last_end = token.span.end;
        Some(token)
    }

    fn next_or_eof(&mut self, expected: &str) -> Result<Spanned, ParseError> {
        self.bump().ok_or_else(|| self.eof_error(expected))
    }

    fn expect(&mut self, token: &Token, expected: &str) -> Result<Spanned, ParseError> {
        let next = self.next_or_eof(expected)?;
        if &next.token == token {
            Ok(next)
        } else {
            let message = format!("expected {expected}, found {}", next.token);
            Err(self.error_at(next.span.start, message))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<String, ParseError> {
        let next = self.next_or_eof(expected)?;
        match next.token {
            Token::Ident(name) => Ok(name),
            other => Err(self.error_at(
                next.span.start,
                format!("expected {expected}, found {other}"),
            )),
        }
    }

    fn error_at(&self, offset: usize, message: String) -> ParseError {
        ParseError::at(self.src, offset, message)
    }

    fn eof_error(&self, expected: &str) -> ParseError {
        ParseError::at(
            self.src,
            self.src.len(),
            format!("expected {expected}, found end of file"),
        )
    }
}
