use crate::ast::SourcePosition;
use crate::error::ParseError;

// ── Token ─────────────────────────────────────────────────────────────────

/// A token inside a mustache: `{{path "str" 12 key=value (sub expr)}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Path(String),
    Str(String),
    Number(f64),
    Bool(bool),
    /// A hash key: an identifier immediately followed by `=` (consumed).
    Key(String),
    // Punctuation
    LParen,
    RParen,
    /// `}}`
    Close,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPos {
    pub token: Token,
    pub start: SourcePosition,
    pub end: SourcePosition,
}

// ── Lexer ─────────────────────────────────────────────────────────────────

/// Character cursor over template source.
///
/// Markup is scanned character by character by the parser; expression
/// tokens inside `{{ }}` are produced by [`Lexer::next_expr_token`].
pub struct Lexer<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0, line: 1, column: 0 }
    }

    pub fn position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column)
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    pub fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consume `pat` if the input starts with it.
    pub fn eat(&mut self, pat: &str) -> bool {
        if !self.starts_with(pat) {
            return false;
        }
        for _ in pat.chars() {
            self.advance();
        }
        true
    }

    pub fn expect(&mut self, pat: &str) -> Result<(), ParseError> {
        if self.eat(pat) {
            Ok(())
        } else {
            Err(self.err(format!("expected {:?}", pat)))
        }
    }

    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    /// Consume characters while `pred` holds and return them.
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'s str {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.advance();
        }
        &self.src[start..self.pos]
    }

    /// Consume up to and including `terminator`, returning the text before it.
    pub fn take_until(&mut self, terminator: &str) -> Result<&'s str, ParseError> {
        let start = self.pos;
        let Some(offset) = self.rest().find(terminator) else {
            return Err(self.err(format!("unterminated input, expected {:?}", terminator)));
        };
        while self.pos < start + offset {
            self.advance();
        }
        let text = &self.src[start..self.pos];
        self.eat(terminator);
        Ok(text)
    }

    pub fn err(&self, msg: impl Into<String>) -> ParseError {
        ParseError::new(msg, self.line, self.column)
    }

    // ── Expression tokens ─────────────────────────────────────────────────

    pub fn next_expr_token(&mut self) -> Result<TokenWithPos, ParseError> {
        self.skip_whitespace();
        self.eat("~");
        let start = self.position();

        let ch = match self.peek() {
            None => return Err(self.err("unclosed mustache, expected \"}}\"")),
            Some(c) => c,
        };

        let token = match ch {
            '}' if self.starts_with("}}") => {
                self.eat("}}");
                Token::Close
            }
            '(' => {
                self.advance();
                Token::LParen
            }
            ')' => {
                self.advance();
                Token::RParen
            }
            '"' | '\'' => self.lex_string(ch)?,
            c if c.is_ascii_digit() => self.lex_number()?,
            '-' if matches!(self.peek_second(), Some(c) if c.is_ascii_digit()) => {
                self.lex_number()?
            }
            c if is_path_char(c) => self.lex_path_or_key(),
            other => {
                return Err(self.err(format!("unexpected character {:?} in expression", other)));
            }
        };

        Ok(TokenWithPos { token, start, end: self.position() })
    }

    /// Whether the next expression token is `}}` (after optional `~`).
    pub fn at_close(&mut self) -> bool {
        self.skip_whitespace();
        self.starts_with("}}") || self.starts_with("~}}")
    }

    fn lex_string(&mut self, quote: char) -> Result<Token, ParseError> {
        self.advance(); // consume opening quote
        let mut s = String::new();
        loop {
            match self.advance() {
                None => return Err(self.err("unterminated string literal")),
                Some(c) if c == quote => break,
                Some('\\') => match self.advance() {
                    Some(c) => s.push(c),
                    None => return Err(self.err("unterminated escape sequence")),
                },
                Some(c) => s.push(c),
            }
        }
        Ok(Token::Str(s))
    }

    fn lex_number(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }
        self.take_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') {
            self.advance();
            self.take_while(|c| c.is_ascii_digit());
        }
        let s = &self.src[start..self.pos];
        s.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| self.err(format!("invalid number {:?}", s)))
    }

    fn lex_path_or_key(&mut self) -> Token {
        let word = self.take_while(is_path_char);
        if self.peek() == Some('=') {
            self.advance();
            return Token::Key(word.to_string());
        }
        match word {
            "true" => Token::Bool(true),
            "false" => Token::Bool(false),
            _ => Token::Path(word.to_string()),
        }
    }
}

fn is_path_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '@' | ':' | '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_expr_token().unwrap().token;
            let done = tok == Token::Close;
            out.push(tok);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn expression_tokens() {
        assert_eq!(
            tokens(r#"if this.active "on" -2 key=true (sub 'x')}}"#),
            vec![
                Token::Path("if".into()),
                Token::Path("this.active".into()),
                Token::Str("on".into()),
                Token::Number(-2.0),
                Token::Key("key".into()),
                Token::Bool(true),
                Token::LParen,
                Token::Path("sub".into()),
                Token::Str("x".into()),
                Token::RParen,
                Token::Close,
            ]
        );
    }

    #[test]
    fn tracks_lines_and_columns() {
        let mut lexer = Lexer::new("ab\ncd");
        lexer.take_while(|c| c != 'd');
        assert_eq!(lexer.position(), SourcePosition::new(2, 1));
    }

    #[test]
    fn take_until_consumes_terminator() {
        let mut lexer = Lexer::new(" note -->rest");
        assert_eq!(lexer.take_until("-->").unwrap(), " note ");
        assert_eq!(lexer.rest(), "rest");
    }

    #[test]
    fn unterminated_mustache() {
        let mut lexer = Lexer::new("foo");
        lexer.next_expr_token().unwrap();
        let err = lexer.next_expr_token().unwrap_err();
        assert_eq!((err.line, err.column), (1, 3));
    }
}
