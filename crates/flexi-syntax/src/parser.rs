use crate::ast::{
    AttrNode, AttrValue, Block, BlockStatement, BooleanLiteral, CommentStatement, ConcatPart,
    ConcatStatement, ElementNode, Expression, Hash, HashPair, MustacheStatement, Node, NodeId,
    NumberLiteral, PathExpression, SourcePosition, SourceSpan, StringLiteral, SubExpression,
    Template, TextNode,
};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenWithPos};

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// What ends the content currently being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Until {
    Eof,
    CloseTag,
    CloseBlock,
}

// ── Parser ────────────────────────────────────────────────────────────────

pub struct Parser<'s> {
    lexer: Lexer<'s>,
    template: Template,
}

impl<'s> Parser<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { lexer: Lexer::new(src), template: Template::default() }
    }

    fn span_from(&self, start: SourcePosition) -> SourceSpan {
        SourceSpan::new(start, self.lexer.position())
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.template.alloc(node)
    }

    // ── Document ──────────────────────────────────────────────────────────

    pub fn parse_template(mut self) -> Result<Template, ParseError> {
        let start = self.lexer.position();
        let body = self.parse_content(Until::Eof)?;
        let loc = self.span_from(start);

        let root = self.template.root();
        self.template.replace(root, Node::Program(Block { body, loc }));
        Ok(self.template)
    }

    // ── Content ───────────────────────────────────────────────────────────

    /// Parse sibling nodes until `until` is reached. The terminator itself is
    /// left for the caller to consume.
    fn parse_content(&mut self, until: Until) -> Result<Vec<NodeId>, ParseError> {
        let mut nodes = Vec::new();

        loop {
            if self.lexer.is_eof() {
                return match until {
                    Until::Eof => Ok(nodes),
                    Until::CloseTag => {
                        Err(self.lexer.err("unclosed element, expected closing tag"))
                    }
                    Until::CloseBlock => Err(self.lexer.err("unclosed block, expected {{/…}}")),
                };
            }

            if self.lexer.starts_with("</") {
                if until == Until::CloseTag {
                    return Ok(nodes);
                }
                return Err(self.lexer.err("unexpected closing tag"));
            }
            if self.lexer.starts_with("{{/") || self.lexer.starts_with("{{~/") {
                if until == Until::CloseBlock {
                    return Ok(nodes);
                }
                return Err(self.lexer.err("unexpected block close"));
            }
            if self.lexer.starts_with("{{else") {
                return Err(self.lexer.err("{{else}} blocks are not supported"));
            }

            let node = if self.lexer.starts_with("<!--") {
                self.parse_html_comment()?
            } else if self.lexer.starts_with("{{!") {
                self.parse_mustache_comment()?
            } else if self.lexer.starts_with("{{#") || self.lexer.starts_with("{{~#") {
                self.parse_block()?
            } else if self.lexer.starts_with("{{{") {
                return Err(self.lexer.err("triple-stash mustaches are not supported"));
            } else if self.lexer.starts_with("{{") {
                let mustache = self.parse_mustache()?;
                Node::Mustache(mustache)
            } else if self.at_tag_open() {
                self.parse_element()?
            } else {
                self.parse_text()
            };

            nodes.push(self.alloc(node));
        }
    }

    fn at_tag_open(&self) -> bool {
        self.lexer.peek() == Some('<')
            && matches!(self.lexer.peek_second(), Some(c) if c.is_alphabetic())
    }

    // ── Text ──────────────────────────────────────────────────────────────

    fn parse_text(&mut self) -> Node {
        let start = self.lexer.position();
        let mut chars = String::new();
        while let Some(c) = self.lexer.peek() {
            if self.lexer.starts_with("{{") || self.lexer.starts_with("</") || self.at_tag_open()
                || self.lexer.starts_with("<!--")
            {
                break;
            }
            chars.push(c);
            self.lexer.advance();
        }
        Node::Text(TextNode { chars, loc: self.span_from(start) })
    }

    // ── Comments ──────────────────────────────────────────────────────────

    fn parse_html_comment(&mut self) -> Result<Node, ParseError> {
        let start = self.lexer.position();
        self.lexer.expect("<!--")?;
        let value = self.lexer.take_until("-->")?.to_string();
        Ok(Node::Comment(CommentStatement { value, html: true, loc: self.span_from(start) }))
    }

    fn parse_mustache_comment(&mut self) -> Result<Node, ParseError> {
        let start = self.lexer.position();
        let value = if self.lexer.eat("{{!--") {
            self.lexer.take_until("--}}")?
        } else {
            self.lexer.expect("{{!")?;
            self.lexer.take_until("}}")?
        };
        Ok(Node::Comment(CommentStatement {
            value: value.to_string(),
            html: false,
            loc: self.span_from(start),
        }))
    }

    // ── Element ───────────────────────────────────────────────────────────

    fn parse_element(&mut self) -> Result<Node, ParseError> {
        let start = self.lexer.position();
        self.lexer.expect("<")?;
        let tag = self.lexer.take_while(is_tag_char).to_string();

        let mut attributes = Vec::new();
        let self_closing = loop {
            self.lexer.skip_whitespace();
            if self.lexer.eat("/>") {
                break true;
            }
            if self.lexer.eat(">") {
                break false;
            }
            if self.lexer.is_eof() {
                return Err(self.lexer.err(format!("unclosed start tag <{}>", tag)));
            }
            attributes.push(self.parse_attribute()?);
        };

        let children = if self_closing || VOID_ELEMENTS.contains(&tag.as_str()) {
            Vec::new()
        } else {
            let children = self.parse_content(Until::CloseTag)?;
            self.parse_closing_tag(&tag)?;
            children
        };

        Ok(Node::Element(ElementNode {
            tag,
            attributes,
            children,
            self_closing,
            loc: self.span_from(start),
        }))
    }

    fn parse_closing_tag(&mut self, tag: &str) -> Result<(), ParseError> {
        let at = self.lexer.position();
        self.lexer.expect("</")?;
        let name = self.lexer.take_while(is_tag_char);
        if name != tag {
            return Err(ParseError::new(
                format!("closing tag </{}> does not match <{}>", name, tag),
                at.line,
                at.column,
            ));
        }
        self.lexer.skip_whitespace();
        self.lexer.expect(">")
    }

    // ── Attribute ─────────────────────────────────────────────────────────

    fn parse_attribute(&mut self) -> Result<AttrNode, ParseError> {
        let start = self.lexer.position();
        let name = self.lexer.take_while(is_attr_name_char).to_string();
        if name.is_empty() {
            let found = self.lexer.peek().unwrap_or(' ');
            return Err(self.lexer.err(format!("unexpected {:?} in start tag", found)));
        }

        let value = if self.lexer.eat("=") {
            match self.lexer.peek() {
                Some(quote @ ('"' | '\'')) => self.parse_quoted_value(quote)?,
                Some('{') if self.lexer.starts_with("{{") => {
                    AttrValue::Mustache(self.parse_mustache()?)
                }
                _ => {
                    let value_start = self.lexer.position();
                    let chars = self
                        .lexer
                        .take_while(|c| !c.is_whitespace() && c != '>' && c != '/')
                        .to_string();
                    AttrValue::Text(TextNode { chars, loc: self.span_from(value_start) })
                }
            }
        } else {
            let end = self.lexer.position();
            AttrValue::Text(TextNode { chars: String::new(), loc: SourceSpan::new(end, end) })
        };

        Ok(AttrNode { name, value, loc: self.span_from(start) })
    }

    /// `"text"` yields a text value; any `{{…}}` inside yields a concat.
    fn parse_quoted_value(&mut self, quote: char) -> Result<AttrValue, ParseError> {
        let start = self.lexer.position();
        self.lexer.advance(); // consume opening quote

        let mut parts = Vec::new();
        let mut all_text = String::new();
        let mut text = String::new();
        let mut text_start = self.lexer.position();
        let mut dynamic = false;

        loop {
            match self.lexer.peek() {
                None => return Err(self.lexer.err("unterminated attribute value")),
                Some(c) if c == quote => break,
                Some('{') if self.lexer.starts_with("{{") => {
                    if !text.is_empty() {
                        parts.push(ConcatPart::Text(TextNode {
                            chars: std::mem::take(&mut text),
                            loc: self.span_from(text_start),
                        }));
                    }
                    parts.push(ConcatPart::Mustache(self.parse_mustache()?));
                    text_start = self.lexer.position();
                    dynamic = true;
                }
                Some(c) => {
                    text.push(c);
                    all_text.push(c);
                    self.lexer.advance();
                }
            }
        }

        if !text.is_empty() {
            parts.push(ConcatPart::Text(TextNode { chars: text, loc: self.span_from(text_start) }));
        }
        self.lexer.advance(); // consume closing quote
        let loc = self.span_from(start);

        Ok(if dynamic {
            AttrValue::Concat(ConcatStatement { parts, loc })
        } else {
            AttrValue::Text(TextNode { chars: all_text, loc })
        })
    }

    // ── Mustache ──────────────────────────────────────────────────────────

    fn parse_mustache(&mut self) -> Result<MustacheStatement, ParseError> {
        let start = self.lexer.position();
        self.lexer.expect("{{")?;
        let path = self.expect_path()?;
        let (params, hash) = self.parse_call_args(&Token::Close)?;
        Ok(MustacheStatement { path, params, hash, loc: self.span_from(start) })
    }

    // ── Block ─────────────────────────────────────────────────────────────

    fn parse_block(&mut self) -> Result<Node, ParseError> {
        let start = self.lexer.position();
        if !self.lexer.eat("{{#") {
            self.lexer.expect("{{~#")?;
        }
        let path = self.expect_path()?;
        let (params, hash) = self.parse_call_args(&Token::Close)?;

        let body_start = self.lexer.position();
        let body = self.parse_content(Until::CloseBlock)?;
        let program = Block { body, loc: self.span_from(body_start) };

        let at = self.lexer.position();
        if !self.lexer.eat("{{/") {
            self.lexer.expect("{{~/")?;
        }
        let close = self.expect_path()?;
        if close.original != path.original {
            return Err(ParseError::new(
                format!("{{{{/{}}}}} does not match {{{{#{}}}}}", close.original, path.original),
                at.line,
                at.column,
            ));
        }
        self.expect_close()?;

        Ok(Node::Block(BlockStatement { path, params, hash, program, loc: self.span_from(start) }))
    }

    // ── Expressions ───────────────────────────────────────────────────────

    fn expect_path(&mut self) -> Result<PathExpression, ParseError> {
        let TokenWithPos { token, start, end } = self.lexer.next_expr_token()?;
        match token {
            Token::Path(original) => {
                Ok(PathExpression { original, loc: SourceSpan::new(start, end) })
            }
            tok => Err(ParseError::new(
                format!("expected a path, got {:?}", tok),
                start.line,
                start.column,
            )),
        }
    }

    fn expect_close(&mut self) -> Result<(), ParseError> {
        let TokenWithPos { token, start, .. } = self.lexer.next_expr_token()?;
        if token == Token::Close {
            Ok(())
        } else {
            Err(ParseError::new(
                format!("expected \"}}}}\", got {:?}", token),
                start.line,
                start.column,
            ))
        }
    }

    /// Parse `params* (key=value)*` up to and including `terminator`.
    fn parse_call_args(
        &mut self,
        terminator: &Token,
    ) -> Result<(Vec<Expression>, Option<Hash>), ParseError> {
        let mut params = Vec::new();
        let mut pairs: Vec<HashPair> = Vec::new();
        let mut hash_start = None;

        loop {
            let tok = self.lexer.next_expr_token()?;
            if &tok.token == terminator {
                break;
            }
            match tok.token {
                Token::Key(key) => {
                    let pair_start = tok.start;
                    hash_start.get_or_insert(pair_start);
                    let next = self.lexer.next_expr_token()?;
                    let value = self.parse_expression(next)?;
                    pairs.push(HashPair { key, value, loc: self.span_from(pair_start) });
                }
                _ if !pairs.is_empty() => {
                    return Err(ParseError::new(
                        "positional params must come before hash arguments",
                        tok.start.line,
                        tok.start.column,
                    ));
                }
                _ => params.push(self.parse_expression(tok)?),
            }
        }

        let hash = hash_start.map(|start| {
            let end = pairs.last().map_or(start, |p| p.loc.end);
            Hash { pairs, loc: SourceSpan::new(start, end) }
        });
        Ok((params, hash))
    }

    fn parse_expression(&mut self, tok: TokenWithPos) -> Result<Expression, ParseError> {
        let loc = SourceSpan::new(tok.start, tok.end);
        Ok(match tok.token {
            Token::Path(original) => Expression::Path(PathExpression { original, loc }),
            Token::Str(value) => Expression::StringLiteral(StringLiteral { value, loc }),
            Token::Number(value) => Expression::NumberLiteral(NumberLiteral { value, loc }),
            Token::Bool(value) => Expression::BooleanLiteral(BooleanLiteral { value, loc }),
            Token::LParen => {
                let path = self.expect_path()?;
                let (params, hash) = self.parse_call_args(&Token::RParen)?;
                Expression::SubExpression(SubExpression {
                    path,
                    params,
                    hash,
                    loc: self.span_from(tok.start),
                })
            }
            other => {
                return Err(ParseError::new(
                    format!("expected an expression, got {:?}", other),
                    tok.start.line,
                    tok.start.column,
                ));
            }
        })
    }
}

fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.' | '@')
}

fn is_attr_name_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'' | '<' | '{' | '}')
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Parse template source into a [`Template`].
pub fn parse_str(src: &str) -> Result<Template, ParseError> {
    Parser::new(src).parse_template()
}
