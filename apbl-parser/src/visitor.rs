//! Visitor pattern for AST nodes.

use crate::ast::{Block, Expr, FunctionCall, Program, Stmt};

pub trait Visitor<'ast>: Sized {
    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }
    fn visit_block(&mut self, block: &'ast Block) {
        walk_block(self, block);
    }
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
}

/// Iteratively visit all statements in a `Vec<Stmt>`.
macro_rules! visit_stmt_list {
    ($visitor: expr, $body: expr) => {
        for stmt in $body {
            $visitor.visit_stmt(stmt);
        }
    };
}

pub fn walk_program<'ast>(visitor: &mut impl Visitor<'ast>, program: &'ast Program) {
    visit_stmt_list!(visitor, &program.statements);
}

pub fn walk_block<'ast>(visitor: &mut impl Visitor<'ast>, block: &'ast Block) {
    visit_stmt_list!(visitor, &block.statements);
}

fn walk_call<'ast>(visitor: &mut impl Visitor<'ast>, call: &'ast FunctionCall) {
    for arg in &call.arguments {
        visitor.visit_expr(arg);
    }
}

pub fn walk_expr<'ast>(visitor: &mut impl Visitor<'ast>, expr: &'ast Expr) {
    match expr {
        Expr::Literal { .. } => {}
        Expr::Identifier { .. } => {}
        Expr::Binary { lhs, rhs, .. } => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
        Expr::Call(call) => walk_call(visitor, call),
    }
}

pub fn walk_stmt<'ast>(visitor: &mut impl Visitor<'ast>, stmt: &'ast Stmt) {
    match stmt {
        Stmt::Declaration { value, .. } => visitor.visit_expr(value),
        Stmt::Assignment { value, .. } => visitor.visit_expr(value),
        Stmt::FunctionDef(def) => visitor.visit_block(&def.body),
        Stmt::Call(call) => walk_call(visitor, call),
        Stmt::If {
            condition,
            then_block,
            else_block,
            ..
        } => {
            visitor.visit_expr(condition);
            visitor.visit_block(then_block);
            if let Some(else_block) = else_block {
                visitor.visit_block(else_block);
            }
        }
        Stmt::While { condition, body, .. } => {
            visitor.visit_expr(condition);
            visitor.visit_block(body);
        }
        Stmt::Return { value, .. } => visitor.visit_expr(value),
    }
}
