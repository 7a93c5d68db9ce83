//! Indented tree view of an AST.

use apbl_parser::ast::{Block, Expr, Program, Stmt};
use apbl_parser::visitor::{walk_block, walk_expr, walk_program, walk_stmt, Visitor};

/// Renders `program` under a `SYNTAX ANALYSIS` heading, one node per line, two spaces of
/// indentation per level.
pub fn syntax_tree(program: &Program) -> String {
    let mut printer = TreePrinter {
        out: String::from("SYNTAX ANALYSIS\n===============\n\n"),
        depth: 0,
    };
    printer.visit_program(program);
    printer.out
}

struct TreePrinter {
    out: String,
    depth: usize,
}

impl TreePrinter {
    fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    /// Runs `f` one level deeper.
    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }
}

impl<'ast> Visitor<'ast> for TreePrinter {
    fn visit_program(&mut self, program: &'ast Program) {
        self.line("program");
        self.nested(|p| walk_program(p, program));
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::Declaration { var_type, name, .. } => {
                self.line(format!("declaration '{}' : {}", name, var_type))
            }
            Stmt::Assignment { target, .. } => self.line(format!("assignment '{}'", target)),
            Stmt::FunctionDef(def) => {
                self.line(format!("function_def '{}' : {}", def.name, def.return_type));
                self.nested(|p| {
                    for param in &def.params {
                        p.line(format!("parameter '{}' : {}", param.name, param.param_type));
                    }
                });
            }
            Stmt::Call(call) => self.line(format!("function_call '{}'", call.name)),
            Stmt::If {
                condition,
                then_block,
                else_block,
                ..
            } => {
                // branches are labelled, so the generic walk does not apply
                self.line("if");
                self.nested(|p| {
                    p.visit_expr(condition);
                    p.line("then:");
                    p.nested(|p| p.visit_block(then_block));
                    if let Some(else_block) = else_block {
                        p.line("else:");
                        p.nested(|p| p.visit_block(else_block));
                    }
                });
                return;
            }
            Stmt::While { .. } => self.line("while"),
            Stmt::Return { .. } => self.line("return"),
        }
        self.nested(|p| walk_stmt(p, stmt));
    }

    fn visit_block(&mut self, block: &'ast Block) {
        self.line("block");
        self.nested(|p| walk_block(p, block));
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::Literal { value, .. } => self.line(format!("literal = {}", value)),
            Expr::Identifier { name, .. } => self.line(format!("identifier '{}'", name)),
            Expr::Binary { op, .. } => self.line(format!("binary_op [{}]", op)),
            Expr::Call(call) => self.line(format!("function_call '{}'", call.name)),
        }
        self.nested(|p| walk_expr(p, expr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apbl_parser::parse_source;

    fn lines(source: &str) -> Vec<String> {
        let program = parse_source(source).unwrap();
        syntax_tree(&program)
            .lines()
            .skip(3) // heading
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_heading() {
        let program = parse_source("").unwrap();
        assert_eq!(syntax_tree(&program), "SYNTAX ANALYSIS\n===============\n\nprogram\n");
    }

    #[test]
    fn test_declaration_tree() {
        assert_eq!(
            lines("int x = 3 + 4."),
            vec![
                "program",
                "  declaration 'x' : int",
                "    binary_op [+]",
                "      literal = 3",
                "      literal = 4",
            ]
        );
    }

    #[test]
    fn test_function_and_if_tree() {
        let source = r#"
            function void notify(string who, date day) [
                display(who, day).
            ]
            if (seats > 0) [
                book("Ada").
            ] else [
                seats = 0.
            ]
        "#;
        assert_eq!(
            lines(source),
            vec![
                "program",
                "  function_def 'notify' : void",
                "    parameter 'who' : string",
                "    parameter 'day' : date",
                "    block",
                "      function_call 'display'",
                "        identifier 'who'",
                "        identifier 'day'",
                "  if",
                "    binary_op [>]",
                "      identifier 'seats'",
                "      literal = 0",
                "    then:",
                "      block",
                "        function_call 'book'",
                "          literal = Ada",
                "    else:",
                "      block",
                "        assignment 'seats'",
                "          literal = 0",
            ]
        );
    }

    #[test]
    fn test_while_return_tree() {
        assert_eq!(
            lines("while (n < 3) [ ]\nreturn gen(n) * 1.5."),
            vec![
                "program",
                "  while",
                "    binary_op [<]",
                "      identifier 'n'",
                "      literal = 3",
                "    block",
                "  return",
                "    binary_op [*]",
                "      function_call 'gen'",
                "        identifier 'n'",
                "      literal = 1.5",
            ]
        );
    }
}
