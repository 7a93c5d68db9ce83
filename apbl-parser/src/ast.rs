use crate::lexer::TokenKind;
use serde::Serialize;
use std::fmt;

/// Root of the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "program")]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub line: usize,
}

/// The types a declaration, parameter or function can be annotated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Int,
    Float,
    String,
    Bool,
    Date,
    Time,
    Void,
}

impl TypeTag {
    /// Returns the type named by a type specifier token.
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::IntType => Some(TypeTag::Int),
            TokenKind::FloatType => Some(TypeTag::Float),
            TokenKind::StringType => Some(TypeTag::String),
            TokenKind::BoolType => Some(TypeTag::Bool),
            TokenKind::DateType => Some(TypeTag::Date),
            TokenKind::TimeType => Some(TypeTag::Time),
            TokenKind::Void => Some(TypeTag::Void),
            _ => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::String => "string",
            TypeTag::Bool => "bool",
            TypeTag::Date => "date",
            TypeTag::Time => "time",
            TypeTag::Void => "void",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
}

impl BinOp {
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            TokenKind::Times => Some(BinOp::Mul),
            TokenKind::Divide => Some(BinOp::Div),
            TokenKind::Lt => Some(BinOp::Lt),
            TokenKind::Gt => Some(BinOp::Gt),
            TokenKind::Le => Some(BinOp::Le),
            TokenKind::Ge => Some(BinOp::Ge),
            TokenKind::Eq => Some(BinOp::Eq),
            TokenKind::Neq => Some(BinOp::Ne),
            _ => None,
        }
    }

    /// Comparisons cannot be chained without parentheses.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge | BinOp::Eq | BinOp::Ne
        )
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    /// `YYYY-MM-DD`
    Date(String),
    /// `HH:MM:SS`
    Time(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(val) => write!(f, "{}", val),
            Literal::Float(val) => write!(f, "{:?}", val),
            Literal::Bool(true) => write!(f, "True"),
            Literal::Bool(false) => write!(f, "False"),
            Literal::String(val) | Literal::Date(val) | Literal::Time(val) => f.write_str(val),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expr {
    Literal {
        value: Literal,
        line: usize,
    },
    /// An identifier (e.g. `foo`).
    Identifier {
        name: String,
        line: usize,
    },
    /// A binary expression (e.g. `1+1`).
    #[serde(rename = "binary_op")]
    Binary {
        op: BinOp,
        #[serde(rename = "left")]
        lhs: Box<Expr>,
        #[serde(rename = "right")]
        rhs: Box<Expr>,
        line: usize,
    },
    /// A call expression (e.g. `book(seat, 2)`).
    #[serde(rename = "function_call")]
    Call(FunctionCall),
}

impl Expr {
    /// Source line of the expression. For binary expressions this is the line of the operator.
    pub fn line(&self) -> usize {
        match self {
            Expr::Literal { line, .. }
            | Expr::Identifier { line, .. }
            | Expr::Binary { line, .. } => *line,
            Expr::Call(call) => call.line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    /// Either a user defined function or one of the built-ins (`book`, `gen`, `reg`, `display`).
    pub name: String,
    pub arguments: Vec<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "parameter")]
pub struct Parameter {
    pub param_type: TypeTag,
    pub name: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "block")]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDef {
    pub return_type: TypeTag,
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: Block,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stmt {
    /// `int x = 1.`
    Declaration {
        var_type: TypeTag,
        name: String,
        value: Expr,
        line: usize,
    },
    /// `x = 1.`
    Assignment {
        target: String,
        value: Expr,
        line: usize,
    },
    FunctionDef(FunctionDef),
    /// A call evaluated for its side effects (`display(x).`).
    #[serde(rename = "function_call")]
    Call(FunctionCall),
    If {
        condition: Expr,
        then_block: Block,
        else_block: Option<Block>,
        line: usize,
    },
    While {
        condition: Expr,
        body: Block,
        line: usize,
    },
    Return {
        value: Expr,
        line: usize,
    },
}

impl Stmt {
    pub fn line(&self) -> usize {
        match self {
            Stmt::Declaration { line, .. }
            | Stmt::Assignment { line, .. }
            | Stmt::If { line, .. }
            | Stmt::While { line, .. }
            | Stmt::Return { line, .. } => *line,
            Stmt::FunctionDef(def) => def.line,
            Stmt::Call(call) => call.line,
        }
    }
}
