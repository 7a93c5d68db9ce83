use crate::error::{LexicalError, LexicalErrorKind};
use logos::{Lexer, Logos};
use serde::{Serialize, Serializer};
use std::fmt;

/// The kind of a [`Token`]. Display names are the canonical token names of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // literals
    Number,
    FloatNum,
    StringLiteral,
    BooleanVal,
    DateVal,
    TimeVal,

    // identifiers
    Identifier,

    // operators
    // - assignment
    Equals,
    // - comparison
    Eq,
    Neq,
    Lt,
    Gt,
    Le,
    Ge,
    // - arithmetics
    Plus,
    Minus,
    Times,
    Divide,

    // punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    /// Statement terminator (`.`).
    Eol,

    // keywords
    // - built-in functions
    Book,
    Gen,
    Reg,
    Display,
    // - control flow
    If,
    While,
    Foreach,
    Until,
    Return,
    Break,
    Continue,
    // - data structures
    Array,
    Dictionary,
    Map,
    Set,
    // - types
    IntType,
    FloatType,
    StringType,
    BoolType,
    DateType,
    TimeType,
    Void,
    // - logical
    And,
    Or,
    Not,
    // - other
    Then,
    Else,
    Function,
}

impl TokenKind {
    /// Looks up a reserved word. Returns `None` for plain identifiers.
    pub fn reserved(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "book" => TokenKind::Book,
            "gen" => TokenKind::Gen,
            "reg" => TokenKind::Reg,
            "display" => TokenKind::Display,
            "if" => TokenKind::If,
            "while" => TokenKind::While,
            "foreach" => TokenKind::Foreach,
            "until" => TokenKind::Until,
            "return" => TokenKind::Return,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "array" => TokenKind::Array,
            "dictionary" => TokenKind::Dictionary,
            "map" => TokenKind::Map,
            "set" => TokenKind::Set,
            "int" => TokenKind::IntType,
            "float" => TokenKind::FloatType,
            "string" => TokenKind::StringType,
            "bool" => TokenKind::BoolType,
            "date" => TokenKind::DateType,
            "time" => TokenKind::TimeType,
            "void" => TokenKind::Void,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "then" => TokenKind::Then,
            "else" => TokenKind::Else,
            "function" => TokenKind::Function,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns `true` for the built-in functions that may appear as call targets.
    pub fn is_builtin(&self) -> bool {
        matches!(
            self,
            TokenKind::Book | TokenKind::Gen | TokenKind::Reg | TokenKind::Display
        )
    }

    /// Returns the binary binding power or `None` if invalid binop token.
    /// Binding power `0` is reserved for accepting any expression.
    /// Comparisons have the lowest precedence and do not associate.
    pub fn binop_bp(&self) -> Option<(u8, u8)> {
        match self {
            /* Comparison */
            TokenKind::Eq
            | TokenKind::Neq
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Le
            | TokenKind::Ge => Some((2, 3)),
            /* Additive */
            TokenKind::Plus | TokenKind::Minus => Some((4, 5)),
            /* Multiplicative */
            TokenKind::Times | TokenKind::Divide => Some((6, 7)),
            _ => None,
        }
    }

    /// Canonical upper case name of the token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Number => "NUMBER",
            TokenKind::FloatNum => "FLOAT_NUM",
            TokenKind::StringLiteral => "STRING_LITERAL",
            TokenKind::BooleanVal => "BOOLEAN_VAL",
            TokenKind::DateVal => "DATE_VAL",
            TokenKind::TimeVal => "TIME_VAL",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Equals => "EQUALS",
            TokenKind::Eq => "EQ",
            TokenKind::Neq => "NEQ",
            TokenKind::Lt => "LT",
            TokenKind::Gt => "GT",
            TokenKind::Le => "LE",
            TokenKind::Ge => "GE",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Times => "TIMES",
            TokenKind::Divide => "DIVIDE",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::Comma => "COMMA",
            TokenKind::Eol => "EOL",
            TokenKind::Book => "BOOK",
            TokenKind::Gen => "GEN",
            TokenKind::Reg => "REG",
            TokenKind::Display => "DISPLAY",
            TokenKind::If => "IF",
            TokenKind::While => "WHILE",
            TokenKind::Foreach => "FOREACH",
            TokenKind::Until => "UNTIL",
            TokenKind::Return => "RETURN",
            TokenKind::Break => "BREAK",
            TokenKind::Continue => "CONTINUE",
            TokenKind::Array => "ARRAY",
            TokenKind::Dictionary => "DICTIONARY",
            TokenKind::Map => "MAP",
            TokenKind::Set => "SET",
            TokenKind::IntType => "INT_TYPE",
            TokenKind::FloatType => "FLOAT_TYPE",
            TokenKind::StringType => "STRING_TYPE",
            TokenKind::BoolType => "BOOL_TYPE",
            TokenKind::DateType => "DATE_TYPE",
            TokenKind::TimeType => "TIME_TYPE",
            TokenKind::Void => "VOID",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Then => "THEN",
            TokenKind::Else => "ELSE",
            TokenKind::Function => "FUNCTION",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// The typed payload of a [`Token`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    Int(i64),
    Float(f64),
    /// Contents of a string literal, without the quotes.
    Str(String),
    Bool(bool),
    /// `YYYY-MM-DD`, without the quotes.
    Date(String),
    /// `HH:MM:SS`, without the quotes.
    Time(String),
    /// Identifiers, keywords and punctuation carry their raw lexeme.
    Lexeme(String),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Int(val) => write!(f, "{}", val),
            TokenValue::Float(val) => write!(f, "{:?}", val),
            TokenValue::Bool(true) => write!(f, "True"),
            TokenValue::Bool(false) => write!(f, "False"),
            TokenValue::Str(val)
            | TokenValue::Date(val)
            | TokenValue::Time(val)
            | TokenValue::Lexeme(val) => f.write_str(val),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, in characters.
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, line: usize, column: usize) -> Self {
        Self {
            kind,
            value,
            line,
            column,
        }
    }

    /// Returns the name carried by an identifier or keyword token.
    pub fn lexeme(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Lexeme(lexeme) => Some(lexeme),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Numeric {
    Int(i64),
    Float(f64),
}

/// Raw lexemes as recognized by the state machine, before line tracking and keyword lookup.
#[derive(Debug, Logos, Clone, PartialEq)]
#[logos(error = LexicalErrorKind)]
#[logos(skip r"[ \t\r\f]+|\$\$[^\n]*")]
pub(crate) enum Lexeme {
    // trivia
    #[regex(r"\n+", |lex| lex.slice().len())]
    Newlines(usize),
    #[token("$<", block_comment)]
    BlockComment(usize),

    // literals
    #[regex("[0-9]+", number)]
    Number(Numeric),
    #[regex(r"\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Fraction(f64),
    #[token("True", |_| true)]
    #[token("False", |_| false)]
    BooleanVal(bool),
    #[regex(r#""[0-9]{4}-[0-9]{2}-[0-9]{2}""#, unquote, priority = 10)]
    DateVal(String),
    #[regex(r#""[0-9]{2}:[0-9]{2}:[0-9]{2}""#, unquote, priority = 10)]
    TimeVal(String),
    #[regex(r#""[^"\n]*""#, unquote)]
    StringLiteral(String),
    #[regex(r#""[^"\n]*"#, unterminated_string)]
    UnterminatedString(String),

    // identifiers and reserved words
    #[regex("[A-Za-z_][A-Za-z0-9_]*")]
    Word,

    // operators and punctuation
    #[token("=", |_| TokenKind::Equals)]
    #[token("==", |_| TokenKind::Eq)]
    #[token("!=", |_| TokenKind::Neq)]
    #[token("<", |_| TokenKind::Lt)]
    #[token(">", |_| TokenKind::Gt)]
    #[token("<=", |_| TokenKind::Le)]
    #[token(">=", |_| TokenKind::Ge)]
    #[token("+", |_| TokenKind::Plus)]
    #[token("-", |_| TokenKind::Minus)]
    #[token("*", |_| TokenKind::Times)]
    #[token("/", |_| TokenKind::Divide)]
    #[token("(", |_| TokenKind::LParen)]
    #[token(")", |_| TokenKind::RParen)]
    #[token("[", |_| TokenKind::LBracket)]
    #[token("]", |_| TokenKind::RBracket)]
    #[token(",", |_| TokenKind::Comma)]
    #[token(".", |_| TokenKind::Eol)]
    Punct(TokenKind),
}

impl Lexeme {
    /// Splits a lexeme into the kind and value of the token it produces.
    /// Returns `None` for trivia.
    fn classify(self, slice: &str) -> Option<(TokenKind, TokenValue)> {
        let parts = match self {
            Lexeme::Newlines(_) | Lexeme::BlockComment(_) | Lexeme::UnterminatedString(_) => {
                return None
            }
            Lexeme::Number(Numeric::Int(val)) => (TokenKind::Number, TokenValue::Int(val)),
            Lexeme::Number(Numeric::Float(val)) | Lexeme::Fraction(val) => {
                (TokenKind::FloatNum, TokenValue::Float(val))
            }
            Lexeme::BooleanVal(val) => (TokenKind::BooleanVal, TokenValue::Bool(val)),
            Lexeme::DateVal(val) => (TokenKind::DateVal, TokenValue::Date(val)),
            Lexeme::TimeVal(val) => (TokenKind::TimeVal, TokenValue::Time(val)),
            Lexeme::StringLiteral(val) => (TokenKind::StringLiteral, TokenValue::Str(val)),
            Lexeme::Word => (
                TokenKind::reserved(slice).unwrap_or(TokenKind::Identifier),
                TokenValue::Lexeme(slice.to_string()),
            ),
            Lexeme::Punct(kind) => (kind, TokenValue::Lexeme(slice.to_string())),
        };
        Some(parts)
    }
}

/// Lexes an integer, extending it into a float when a fraction follows directly (`2.95`).
/// A trailing `.` without digits is left for the statement terminator.
fn number(lex: &mut Lexer<Lexeme>) -> Result<Numeric, LexicalErrorKind> {
    let rest = lex.remainder().as_bytes();
    if rest.first() == Some(&b'.') && rest.get(1).map_or(false, u8::is_ascii_digit) {
        let fraction = 1 + rest[1..].iter().take_while(|b| b.is_ascii_digit()).count();
        lex.bump(fraction);
        return lex
            .slice()
            .parse()
            .map(Numeric::Float)
            .map_err(|_| LexicalErrorKind::InvalidCharacter);
    }
    lex.slice()
        .parse()
        .map(Numeric::Int)
        .map_err(|_| LexicalErrorKind::IntegerOutOfRange)
}

fn unquote(lex: &mut Lexer<Lexeme>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

/// A quote that runs into the end of the line. When the quote is glued to a preceding word and
/// only a terminator follows it (`hello".`), the opening quote is the one that went missing.
fn unterminated_string(lex: &mut Lexer<Lexeme>) -> Result<String, LexicalErrorKind> {
    let before = &lex.source()[..lex.span().start];
    let glued = before.chars().next_back().map_or(false, is_word_char);
    let closes_statement = lex.slice()[1..]
        .chars()
        .all(|c| c == '.' || c.is_whitespace());
    if glued && closes_statement {
        Err(LexicalErrorKind::MissingOpeningQuote)
    } else {
        Err(LexicalErrorKind::MissingClosingQuote)
    }
}

/// Skips a `$< ... >$` comment and returns the number of newlines it spans.
fn block_comment(lex: &mut Lexer<Lexeme>) -> Result<usize, LexicalErrorKind> {
    match lex.remainder().find(">$") {
        Some(end) => {
            let newlines = lex.remainder()[..end].matches('\n').count();
            lex.bump(end + 2);
            Ok(newlines)
        }
        None => Err(LexicalErrorKind::UnterminatedComment),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Converts `source` into a sequence of tokens.
/// Lexing stops at the first malformed input.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexicalError> {
    let mut lexer = Lexeme::lexer(source);
    let mut tokens = Vec::new();
    let mut line = 1;
    // Byte offset where the current line starts. Used for columns.
    let mut line_start = 0;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let column = source[line_start..span.start].chars().count() + 1;

        match result {
            Ok(Lexeme::Newlines(count)) => {
                line += count;
                line_start = span.end;
            }
            Ok(Lexeme::BlockComment(count)) => {
                if let Some(last) = lexer.slice().rfind('\n') {
                    line += count;
                    line_start = span.start + last + 1;
                }
            }
            Ok(lexeme) => {
                if let Some((kind, value)) = lexeme.classify(lexer.slice()) {
                    let token = Token::new(kind, value, line, column);
                    tracing::trace!(%token, line, column, "lexed token");
                    tokens.push(token);
                }
            }
            Err(kind) => {
                let value = offending_text(source, span.start, lexer.slice(), kind);
                tracing::debug!(%kind, line, column, %value, "lexical error");
                return Err(LexicalError::new(kind, line, column, value));
            }
        }
    }

    tracing::debug!(tokens = tokens.len(), lines = line, "tokenized source");
    Ok(tokens)
}

/// Picks the source text reported with a lexical error.
fn offending_text(source: &str, start: usize, slice: &str, kind: LexicalErrorKind) -> String {
    match kind {
        LexicalErrorKind::InvalidCharacter => source[start..]
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_default(),
        LexicalErrorKind::MissingOpeningQuote => {
            let before = &source[..start];
            let word_start = before
                .char_indices()
                .rev()
                .take_while(|(_, c)| is_word_char(*c))
                .last()
                .map_or(start, |(i, _)| i);
            source[word_start..start + 1].to_string()
        }
        LexicalErrorKind::UnterminatedComment => "$<".to_string(),
        LexicalErrorKind::MissingClosingQuote | LexicalErrorKind::IntegerOutOfRange => {
            slice.to_string()
        }
    }
}
