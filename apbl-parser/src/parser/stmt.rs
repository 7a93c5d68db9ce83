use super::*;

impl<'a> Parser<'a> {
    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        let kind = match self.current_kind() {
            Some(kind) => kind,
            None => return Err(self.unexpected()),
        };

        match kind {
            TokenKind::Function => self.parse_function_def(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Identifier if self.peek_kind() == Some(TokenKind::LParen) => {
                self.parse_call_stmt()
            }
            TokenKind::Identifier => self.parse_assignment(),
            kind if kind.is_builtin() => self.parse_call_stmt(),
            kind if TypeTag::from_token_kind(kind).is_some() => self.parse_declaration(),
            _ => Err(self.unexpected()),
        }
    }

    /// Parses `'[' statement* ']'`. The block may be empty.
    pub fn parse_block(&mut self) -> ParseResult<Block> {
        self.nested(|p| {
            let line = p.expect(TokenKind::LBracket)?.line;

            let mut statements = Vec::new();
            while !p.eat(TokenKind::RBracket) {
                statements.push(p.parse_stmt()?);
            }

            Ok(Block { statements, line })
        })
    }

    fn parse_declaration(&mut self) -> ParseResult<Stmt> {
        let (var_type, line) = self.expect_type()?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::Equals)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Eol)?;
        Ok(Stmt::Declaration {
            var_type,
            name,
            value,
            line,
        })
    }

    fn parse_assignment(&mut self) -> ParseResult<Stmt> {
        let (target, line) = self.expect_identifier()?;
        self.expect(TokenKind::Equals)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Eol)?;
        Ok(Stmt::Assignment {
            target,
            value,
            line,
        })
    }

    fn parse_call_stmt(&mut self) -> ParseResult<Stmt> {
        let call = self.parse_function_call()?;
        self.expect(TokenKind::Eol)?;
        Ok(Stmt::Call(call))
    }

    fn parse_function_def(&mut self) -> ParseResult<Stmt> {
        let line = self.expect(TokenKind::Function)?.line;
        let (return_type, _) = self.expect_type()?;
        let (name, _) = self.expect_identifier()?;

        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.eat(TokenKind::RParen) {
            loop {
                let (param_type, line) = self.expect_type()?;
                let (name, _) = self.expect_identifier()?;
                params.push(Parameter {
                    param_type,
                    name,
                    line,
                });

                if self.eat(TokenKind::RParen) {
                    break;
                }
                self.expect(TokenKind::Comma)?;
            }
        }

        let body = self.parse_block()?;

        Ok(Stmt::FunctionDef(FunctionDef {
            return_type,
            name,
            params,
            body,
            line,
        }))
    }

    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        let line = self.expect(TokenKind::If)?.line;
        let condition = self.parse_condition()?;
        let then_block = self.parse_block()?;
        let else_block = if self.eat(TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_block,
            else_block,
            line,
        })
    }

    fn parse_while_stmt(&mut self) -> ParseResult<Stmt> {
        let line = self.expect(TokenKind::While)?.line;
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(Stmt::While {
            condition,
            body,
            line,
        })
    }

    /// Parses the parenthesized condition of `if` and `while`.
    fn parse_condition(&mut self) -> ParseResult<Expr> {
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        Ok(condition)
    }

    fn parse_return_stmt(&mut self) -> ParseResult<Stmt> {
        let line = self.expect(TokenKind::Return)?.line;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Eol)?;
        Ok(Stmt::Return { value, line })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{program, syntax_error};
    use super::*;
    use insta::assert_debug_snapshot;
    use rstest::rstest;

    fn stmt(source: &str) -> Stmt {
        let mut program = program(source);
        assert_eq!(program.statements.len(), 1, "expected a single statement");
        program.statements.remove(0)
    }

    #[test]
    fn test_declaration() {
        assert_debug_snapshot!(stmt("int x = 3 + 4."), @r###"
        Declaration {
            var_type: Int,
            name: "x",
            value: Binary {
                op: Add,
                lhs: Literal {
                    value: Int(
                        3,
                    ),
                    line: 1,
                },
                rhs: Literal {
                    value: Int(
                        4,
                    ),
                    line: 1,
                },
                line: 1,
            },
            line: 1,
        }
        "###);

        let types: Vec<TypeTag> = program(
            "float f = 2.95. string s = \"a\". bool b = True. \
             date d = \"2025-01-31\". time t = \"23:59:59\".",
        )
        .statements
        .into_iter()
        .map(|stmt| match stmt {
            Stmt::Declaration { var_type, .. } => var_type,
            other => panic!("expected declaration, got {:?}", other),
        })
        .collect();
        assert_eq!(
            types,
            vec![TypeTag::Float, TypeTag::String, TypeTag::Bool, TypeTag::Date, TypeTag::Time]
        );
    }

    #[test]
    fn test_assignment() {
        assert_eq!(
            stmt("total = price."),
            Stmt::Assignment {
                target: "total".to_string(),
                value: Expr::Identifier {
                    name: "price".to_string(),
                    line: 1
                },
                line: 1,
            }
        );
    }

    #[test]
    fn test_call_stmt() {
        match stmt("book(\"Ada\", \"2025-06-01\", \"18:00:00\").") {
            Stmt::Call(call) => {
                assert_eq!(call.name, "book");
                assert_eq!(call.arguments.len(), 3);
            }
            other => panic!("expected call, got {:?}", other),
        }
        for builtin in ["gen", "reg", "display"] {
            match stmt(&format!("{}().", builtin)) {
                Stmt::Call(call) => assert_eq!(call.name, builtin),
                other => panic!("expected call, got {:?}", other),
            }
        }
        match stmt("notify(user).") {
            Stmt::Call(call) => assert_eq!(call.name, "notify"),
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_function_def() {
        let def = match stmt(
            "function int add(int a, float b) [\n  return a + b.\n]",
        ) {
            Stmt::FunctionDef(def) => def,
            other => panic!("expected function definition, got {:?}", other),
        };
        assert_eq!(def.return_type, TypeTag::Int);
        assert_eq!(def.name, "add");
        assert_eq!(
            def.params,
            vec![
                Parameter {
                    param_type: TypeTag::Int,
                    name: "a".to_string(),
                    line: 1
                },
                Parameter {
                    param_type: TypeTag::Float,
                    name: "b".to_string(),
                    line: 1
                },
            ]
        );
        assert_eq!(def.body.statements.len(), 1);
        assert_eq!(def.body.statements[0].line(), 2);

        match stmt("function void noop() [ ]") {
            Stmt::FunctionDef(def) => {
                assert!(def.params.is_empty());
                assert!(def.body.statements.is_empty());
            }
            other => panic!("expected function definition, got {:?}", other),
        }
    }

    #[test]
    fn test_if_stmt() {
        match stmt("if (True) [ ]") {
            Stmt::If {
                then_block,
                else_block,
                ..
            } => {
                assert!(then_block.statements.is_empty());
                assert!(else_block.is_none());
            }
            other => panic!("expected if, got {:?}", other),
        }

        match stmt("if (seats >= 1) [ book(user). ] else [ display(\"sold out\"). x = 1. ]") {
            Stmt::If {
                condition,
                then_block,
                else_block,
                ..
            } => {
                assert!(matches!(condition, Expr::Binary { op: BinOp::Ge, .. }));
                assert_eq!(then_block.statements.len(), 1);
                assert_eq!(else_block.map(|block| block.statements.len()), Some(2));
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_blocks() {
        let source = "while (i < 10) [\n  if (i == 5) [\n    return i.\n  ]\n  i = i + 1.\n]";
        match stmt(source) {
            Stmt::While { body, line, .. } => {
                assert_eq!(line, 1);
                assert_eq!(body.statements.len(), 2);
                match &body.statements[0] {
                    Stmt::If { then_block, line, .. } => {
                        assert_eq!(*line, 2);
                        assert_eq!(then_block.statements[0].line(), 3);
                    }
                    other => panic!("expected if, got {:?}", other),
                }
            }
            other => panic!("expected while, got {:?}", other),
        }
    }

    #[test]
    fn test_deeply_nested_blocks() {
        let nest = |depth: usize| format!("{}{}", "if (True) [ ".repeat(depth), "]".repeat(depth));

        let mut innermost = stmt(&nest(100));
        let mut depth = 1;
        while let Stmt::If { mut then_block, .. } = innermost {
            match then_block.statements.pop() {
                Some(inner) => innermost = inner,
                None => break,
            }
            depth += 1;
        }
        assert_eq!(depth, 100);

        assert!(matches!(
            syntax_error(&nest(1000)),
            SyntaxError::TooDeep { line: 1, limit: MAX_NESTING, .. }
        ));
    }

    #[test]
    fn test_return_stmt() {
        assert_eq!(
            stmt("return 0."),
            Stmt::Return {
                value: Expr::Literal {
                    value: Literal::Int(0),
                    line: 1
                },
                line: 1
            }
        );
    }

    #[rstest]
    #[case::missing_terminator("int x = 1", None)]
    #[case::missing_value("int x = .", Some(TokenKind::Eol))]
    #[case::builtin_as_value("int x = book.", Some(TokenKind::Eol))]
    #[case::bare_expression("x + 1.", Some(TokenKind::Plus))]
    #[case::literal_statement("5.", Some(TokenKind::Number))]
    #[case::unclosed_block("if (True) [ x = 1.", None)]
    #[case::missing_condition_parens("if True [ ]", Some(TokenKind::BooleanVal))]
    #[case::else_without_block("if (True) [ ] else x = 1.", Some(TokenKind::Identifier))]
    #[case::untyped_param("function int f(a) [ ]", Some(TokenKind::Identifier))]
    #[case::missing_return_type("function f() [ ]", Some(TokenKind::Identifier))]
    #[case::call_without_terminator("display(x)", None)]
    #[case::reserved_for_future_use("foreach (x) [ ]", Some(TokenKind::Foreach))]
    #[case::break_statement("break.", Some(TokenKind::Break))]
    #[case::logical_operator("if (a and b) [ ]", Some(TokenKind::And))]
    #[case::chained_comparison("bool b = a < b < c.", Some(TokenKind::Lt))]
    fn test_rejected(#[case] source: &str, #[case] found: Option<TokenKind>) {
        assert_eq!(syntax_error(source).found_kind(), found);
    }

    #[test]
    fn test_error_location() {
        let error = syntax_error("int x = 1.\n\nstring s = = 2.");
        assert_eq!(
            error,
            SyntaxError::UnexpectedToken {
                line: 3,
                column: 12,
                kind: TokenKind::Equals,
                value: TokenValue::Lexeme("=".to_string()),
            }
        );
    }
}
