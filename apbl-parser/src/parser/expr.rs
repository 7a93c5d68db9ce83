use super::*;

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression.
    /// This is equivalent to calling [`Self::parse_expr_bp`] with `min_bp = 0`.
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.nested(|p| p.parse_expr_bp(0)) // 0 to accept any expression
    }

    /// Parses a primary (atom) expression.
    fn parse_primary_expr(&mut self) -> ParseResult<Expr> {
        let kind = match self.current_kind() {
            Some(kind) => kind,
            None => return Err(self.unexpected()),
        };

        match kind {
            TokenKind::Number
            | TokenKind::FloatNum
            | TokenKind::StringLiteral
            | TokenKind::BooleanVal
            | TokenKind::DateVal
            | TokenKind::TimeVal => self.parse_literal_expr(),
            TokenKind::Identifier => self.parse_identifier_or_call_expr(),
            // built-ins are only valid as call targets
            kind if kind.is_builtin() => Ok(Expr::Call(self.parse_function_call()?)),
            TokenKind::LParen => {
                self.next();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Parses an expression with the specified `min_bp`.
    /// To parse any expression use, [`Self::parse_expr`].
    fn parse_expr_bp(&mut self, min_bp: u8) -> ParseResult<Expr> {
        let mut lhs = self.parse_primary_expr()?;
        // Comparisons only ever fold at this level. A second one would chain them.
        let mut compared = false;

        loop {
            let token = match self.current_token() {
                Some(token) => token,
                None => break,
            };
            let binop = (BinOp::from_token_kind(token.kind), token.kind.binop_bp());
            let (op, (l_bp, r_bp)) = match binop {
                (Some(op), Some(bp)) => (op, bp),
                _ => break, // not a valid binop, stop parsing
            };
            if l_bp < min_bp {
                break; // less than the min_bp, stop parsing
            }
            if op.is_comparison() {
                if compared {
                    return Err(self.unexpected());
                }
                compared = true;
            }

            // token is a valid binop
            self.next();

            let rhs = self.parse_expr_bp(r_bp)?;

            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line: token.line,
            }
        }

        Ok(lhs)
    }

    /* Expressions.Literals */
    /// Parses a literal expression.
    fn parse_literal_expr(&mut self) -> ParseResult<Expr> {
        let token = match self.current_token() {
            Some(token) => token,
            None => return Err(self.unexpected()),
        };
        let value = match &token.value {
            TokenValue::Int(val) => Literal::Int(*val),
            TokenValue::Float(val) => Literal::Float(*val),
            TokenValue::Str(val) => Literal::String(val.clone()),
            TokenValue::Bool(val) => Literal::Bool(*val),
            TokenValue::Date(val) => Literal::Date(val.clone()),
            TokenValue::Time(val) => Literal::Time(val.clone()),
            TokenValue::Lexeme(_) => return Err(self.unexpected()),
        };
        self.next(); // eat parsed token
        Ok(Expr::Literal {
            value,
            line: token.line,
        })
    }

    /* Expressions.Identifier */
    /// Parses an identifier or a call expression.
    fn parse_identifier_or_call_expr(&mut self) -> ParseResult<Expr> {
        if self.peek_kind() == Some(TokenKind::LParen) {
            return Ok(Expr::Call(self.parse_function_call()?));
        }

        let (name, line) = self.expect_identifier()?;
        Ok(Expr::Identifier { name, line })
    }

    /// Parses `callable '(' args? ')'`, where `callable` is an identifier or a built-in.
    pub fn parse_function_call(&mut self) -> ParseResult<FunctionCall> {
        let callee = match self.current_token() {
            Some(token) if token.kind == TokenKind::Identifier || token.kind.is_builtin() => token,
            _ => return Err(self.unexpected()),
        };
        let name = match callee.lexeme() {
            Some(name) => name.to_string(),
            None => return Err(SyntaxError::unexpected(callee)),
        };
        self.next();
        self.expect(TokenKind::LParen)?;

        let mut arguments = Vec::new();
        if !self.eat(TokenKind::RParen) {
            loop {
                arguments.push(self.parse_expr()?);

                if self.eat(TokenKind::RParen) {
                    break;
                }
                self.expect(TokenKind::Comma)?;
            }
        }

        Ok(FunctionCall {
            name,
            arguments,
            line: callee.line,
        })
    }
}
