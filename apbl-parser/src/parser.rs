use crate::ast::{
    BinOp, Block, Expr, FunctionCall, FunctionDef, Literal, Parameter, Program, Stmt, TypeTag,
};
use crate::error::SyntaxError;
use crate::lexer::{Token, TokenKind, TokenValue};

mod expr;
mod stmt;

pub type ParseResult<T> = Result<T, SyntaxError>;

/// How many expressions and blocks may enclose each other before parsing gives up.
pub const MAX_NESTING: usize = 128;

pub struct Parser<'a> {
    tokens: &'a [Token],
    /// Index of the current token. Equal to `tokens.len()` once the input is exhausted.
    cursor: usize,
    /// Number of expressions and blocks currently being parsed.
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            cursor: 0,
            depth: 0,
        }
    }
}

impl<'a> Parser<'a> {
    /// Parses the whole token sequence. Every token must belong to a statement.
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        while self.current_token().is_some() {
            let stmt = self.parse_stmt()?;
            tracing::trace!(line = stmt.line(), "parsed statement");
            statements.push(stmt);
        }

        let line = statements.first().map_or(1, Stmt::line);
        Ok(Program { statements, line })
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    fn current_token(&self) -> Option<&'a Token> {
        self.tokens.get(self.cursor)
    }

    fn current_kind(&self) -> Option<TokenKind> {
        self.current_token().map(|token| token.kind)
    }

    /// Kind of the token after the current one.
    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.cursor + 1).map(|token| token.kind)
    }

    /// Advances past the current token and returns it.
    fn next(&mut self) -> Option<&'a Token> {
        let token = self.current_token();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    /// Predicate that tests whether the current token is of kind `kind` and eats it if yes as a
    /// side effect.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current_kind() == Some(kind) {
            self.next(); // eat token
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<&'a Token> {
        match self.current_token() {
            Some(token) if token.kind == kind => {
                self.next();
                Ok(token)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Expects an identifier and returns its name and line.
    fn expect_identifier(&mut self) -> ParseResult<(String, usize)> {
        let token = self.expect(TokenKind::Identifier)?;
        match token.lexeme() {
            Some(name) => Ok((name.to_string(), token.line)),
            None => Err(SyntaxError::unexpected(token)),
        }
    }

    /// Expects a type specifier (`int`, `float`, `string`, `bool`, `date`, `time` or `void`).
    fn expect_type(&mut self) -> ParseResult<(TypeTag, usize)> {
        match self.current_token() {
            Some(token) => match TypeTag::from_token_kind(token.kind) {
                Some(tag) => {
                    self.next();
                    Ok((tag, token.line))
                }
                None => Err(SyntaxError::unexpected(token)),
            },
            None => Err(self.unexpected()),
        }
    }

    /// Runs `f` one nesting level deeper. Fails at the current token once [`MAX_NESTING`] is
    /// reached.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING {
            let (line, column) = match self.current_token() {
                Some(token) => (token.line, token.column),
                None => return Err(self.unexpected()),
            };
            return Err(SyntaxError::TooDeep {
                line,
                column,
                limit: MAX_NESTING,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Builds an unexpected token error for the current token.
    fn unexpected(&self) -> SyntaxError {
        match self.current_token() {
            Some(token) => SyntaxError::unexpected(token),
            None => SyntaxError::UnexpectedEof {
                line: self.tokens.last().map_or(1, |token| token.line),
            },
        }
    }
}

/// Parses `tokens` into a [`Program`].
/// No partial tree is returned on failure.
pub fn parse(tokens: &[Token]) -> ParseResult<Program> {
    let program = Parser::new(tokens).parse_program()?;
    tracing::debug!(
        statements = program.statements.len(),
        tokens = tokens.len(),
        "parsed program"
    );
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    pub(super) fn program(source: &str) -> Program {
        let tokens = tokenize(source).expect("source should lex");
        parse(&tokens).expect("source should parse")
    }

    pub(super) fn syntax_error(source: &str) -> SyntaxError {
        let tokens = tokenize(source).expect("source should lex");
        parse(&tokens).expect_err("source should not parse")
    }

    #[test]
    fn test_empty_program() {
        let empty = program("");
        assert!(empty.statements.is_empty());
        assert_eq!(empty.line, 1);

        assert!(program("$$ just a comment").statements.is_empty());
    }

    #[test]
    fn test_statement_count() {
        let program = program(
            r#"
            int seats = 40.
            string name = "Ada".
            seats = seats - 1.
            function void greet(string who) [
                display(who).
            ]
            greet(name).
            if (seats > 0) [ book(name, seats). ] else [ display("full"). ]
            while (seats < 40) [ seats = seats + 1. ]
            "#,
        );
        assert_eq!(program.statements.len(), 7);
        assert_eq!(program.line, 2);
    }

    #[test]
    fn test_leftover_tokens() {
        // `.` left over after a complete statement
        let error = syntax_error("int x = 1..");
        assert_eq!(error.found_kind(), Some(TokenKind::Eol));

        let error = syntax_error("int x = 1. )");
        assert_eq!(error.found_kind(), Some(TokenKind::RParen));
    }

    #[test]
    fn test_unexpected_eof() {
        let error = syntax_error("int x = 1.\nint y =");
        assert_eq!(error, SyntaxError::UnexpectedEof { line: 2 });
    }

    #[test]
    fn test_independent_parsers() {
        let tokens = tokenize("x = 1. y = 2.").unwrap();
        let first = parse(&tokens).unwrap();
        let second = parse(&tokens).unwrap();
        assert_eq!(first, second);
    }
}
