//! Whitelisted query expression language.
//!
//! Workers type constraint payloads such as
//! `{'constraints': [{'Level': 'atLeast(3)'}], 'db': 'apartment'}`. This
//! module parses that Python-literal-like syntax without ever executing it:
//! the only things it understands are literals (integers, quoted strings,
//! `True`/`False`, `None`, lists, tuples and dicts) and calls to the
//! predicate constructors listed in [`CONSTRUCTORS`]. Any other call is
//! rejected with [`ExpressionError::UnknownConstructor`].
//!
//! Strings that themselves contain a constructor call (`'atLeast(3)'`) are
//! evaluated when converted into a [`Constraint`].

use thiserror::Error;

use super::constraint::Constraint;
use super::predicate::{self, Predicate};
use super::value::Value;

/// Constructor names accepted in expressions, with their snake_case aliases.
pub const CONSTRUCTORS: &[(&str, Constructor)] = &[
    ("equalTo", Constructor::EqualTo),
    ("is_equal_to", Constructor::EqualTo),
    ("contains", Constructor::Contains),
    ("oneOf", Constructor::OneOf),
    ("is_one_of", Constructor::OneOf),
    ("atLeast", Constructor::AtLeast),
    ("is_at_least", Constructor::AtLeast),
    ("atMost", Constructor::AtMost),
    ("is_at_most", Constructor::AtMost),
    ("allOf", Constructor::AllOf),
    ("contain_all_of", Constructor::AllOf),
    ("anyOf", Constructor::AnyOf),
    ("contain_at_least_one_of", Constructor::AnyOf),
    ("not", Constructor::Not),
    ("is_not", Constructor::Not),
    ("substring", Constructor::Substring),
    ("is_substring", Constructor::Substring),
];

/// The predicate constructors an expression may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constructor {
    EqualTo,
    Contains,
    OneOf,
    AtLeast,
    AtMost,
    AllOf,
    AnyOf,
    Not,
    Substring,
}

impl Constructor {
    pub fn lookup(name: &str) -> Option<Constructor> {
        CONSTRUCTORS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, constructor)| *constructor)
    }
}

/// Errors raised while parsing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected character '{found}' at position {position}")]
    UnexpectedChar { position: usize, found: char },

    #[error("unexpected trailing input at position {position}")]
    TrailingInput { position: usize },

    #[error("'{0}' is not an allowed constructor")]
    UnknownConstructor(String),

    #[error("bad arguments to {constructor}: {reason}")]
    BadArguments { constructor: String, reason: String },

    #[error("unsupported literal: {0}")]
    Unsupported(String),

    #[error("expected {expected}, found {found}")]
    Shape { expected: String, found: String },

    #[error("expression nested deeper than {max} levels")]
    TooDeep { max: usize },
}

impl ExpressionError {
    fn shape(expected: impl Into<String>, found: &Expr) -> Self {
        ExpressionError::Shape {
            expected: expected.into(),
            found: found.kind().to_string(),
        }
    }
}

/// A parsed, evaluated expression.
#[derive(Debug, Clone)]
pub enum Expr {
    Value(Value),
    None,
    List(Vec<Expr>),
    Map(Vec<(String, Expr)>),
    Predicate(Predicate),
}

impl Expr {
    fn kind(&self) -> &'static str {
        match self {
            Expr::Value(_) => "literal",
            Expr::None => "None",
            Expr::List(_) => "list",
            Expr::Map(_) => "map",
            Expr::Predicate(_) => "predicate",
        }
    }

    /// Converts to a plain value; lists convert element-wise.
    pub fn into_value(self) -> Result<Value, ExpressionError> {
        match self {
            Expr::Value(value) => Ok(value),
            Expr::List(items) => items
                .into_iter()
                .map(Expr::into_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            other => Err(ExpressionError::shape("literal", &other)),
        }
    }

    pub fn into_map(self) -> Result<Vec<(String, Expr)>, ExpressionError> {
        match self {
            Expr::Map(entries) => Ok(entries),
            other => Err(ExpressionError::shape("map", &other)),
        }
    }

    pub fn into_list(self) -> Result<Vec<Expr>, ExpressionError> {
        match self {
            Expr::List(items) => Ok(items),
            other => Err(ExpressionError::shape("list", &other)),
        }
    }

    pub fn into_text(self) -> Result<String, ExpressionError> {
        match self {
            Expr::Value(Value::Text(s)) => Ok(s),
            other => Err(ExpressionError::shape("string", &other)),
        }
    }
}

/// Parses and evaluates a complete expression.
pub fn parse(input: &str) -> Result<Expr, ExpressionError> {
    let mut parser = Parser::new(input);
    let expr = parser.expr()?;
    parser.skip_ws();
    if let Some(position) = parser.peek_pos() {
        return Err(ExpressionError::TrailingInput { position });
    }
    Ok(expr)
}

/// Converts an evaluated expression into a field constraint.
///
/// Strings holding a constructor call are evaluated; any other string stays
/// a literal.
pub fn constraint_from_expr(expr: Expr) -> Result<Constraint, ExpressionError> {
    match expr {
        Expr::Predicate(p) => Ok(Constraint::Predicate(p)),
        Expr::Value(value) => constraint_from_value(value),
        other => other.into_value().map(Constraint::Literal),
    }
}

/// Converts a literal into a constraint, evaluating embedded constructor calls.
pub fn constraint_from_value(value: Value) -> Result<Constraint, ExpressionError> {
    match value {
        Value::Text(text) if looks_like_call(&text) => match parse(&text)? {
            Expr::Predicate(p) => Ok(Constraint::Predicate(p)),
            other => Err(ExpressionError::shape("predicate", &other)),
        },
        other => Ok(Constraint::Literal(other)),
    }
}

/// Parses a constraint list: either `[{'Field': value}, ...]` or a single map.
pub fn parse_constraint_list(expr: Expr) -> Result<super::Constraints, ExpressionError> {
    let entries = match expr {
        Expr::Map(entries) => entries,
        Expr::List(items) => {
            let mut entries = Vec::new();
            for item in items {
                entries.extend(item.into_map()?);
            }
            entries
        }
        other => return Err(ExpressionError::shape("constraint list", &other)),
    };
    entries
        .into_iter()
        .map(|(field, expr)| constraint_from_expr(expr).map(|c| (field, c)))
        .collect()
}

/// True for text shaped like `name(` where name is an identifier, optionally
/// dotted. Such text is never treated as a plain literal.
pub fn looks_like_call(text: &str) -> bool {
    let trimmed = text.trim_start();
    let ident_len = trimmed
        .char_indices()
        .take_while(|(i, c)| {
            c.is_ascii_alphabetic() || *c == '_' || (*i > 0 && (c.is_ascii_digit() || *c == '.'))
        })
        .count();
    ident_len > 0 && trimmed[ident_len..].trim_start().starts_with('(')
}

/// Deepest nesting of lists, maps and constructor calls the parser accepts.
pub const MAX_DEPTH: usize = 32;

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.char_indices().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn peek_pos(&self) -> Option<usize> {
        self.chars.get(self.pos).map(|(i, _)| *i)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn unexpected(&self) -> ExpressionError {
        match (self.peek_pos(), self.peek()) {
            (Some(position), Some(found)) => ExpressionError::UnexpectedChar { position, found },
            _ => ExpressionError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ExpressionError> {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expr(&mut self) -> Result<Expr, ExpressionError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExpressionError::TooDeep { max: MAX_DEPTH });
        }
        self.depth += 1;
        let expr = self.nested_expr();
        self.depth -= 1;
        expr
    }

    fn nested_expr(&mut self) -> Result<Expr, ExpressionError> {
        self.skip_ws();
        match self.peek() {
            None => Err(ExpressionError::UnexpectedEnd),
            Some('\'') | Some('"') => self.string().map(|s| Expr::Value(Value::Text(s))),
            Some('[') => self.sequence('[', ']').map(Expr::List),
            Some('(') => self.sequence('(', ')').map(Expr::List),
            Some('{') => self.map(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.word(),
            Some(_) => Err(self.unexpected()),
        }
    }

    fn string(&mut self) -> Result<String, ExpressionError> {
        let quote = self.bump().ok_or(ExpressionError::UnexpectedEnd)?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(ExpressionError::UnexpectedEnd),
                Some('\\') => match self.bump() {
                    None => return Err(ExpressionError::UnexpectedEnd),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Expr, ExpressionError> {
        let mut digits = String::new();
        if self.peek() == Some('-') {
            digits.push('-');
            self.pos += 1;
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '_' {
                if c != '_' {
                    digits.push(c);
                }
                self.pos += 1;
            } else if c == '.' || c == 'e' || c == 'E' {
                return Err(ExpressionError::Unsupported(format!(
                    "non-integer number starting with {}",
                    digits
                )));
            } else {
                break;
            }
        }
        digits
            .parse::<i64>()
            .map(|n| Expr::Value(Value::Int(n)))
            .map_err(|_| ExpressionError::Unsupported(format!("number '{}'", digits)))
    }

    fn identifier(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                name.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        name
    }

    fn word(&mut self) -> Result<Expr, ExpressionError> {
        let name = self.identifier();
        self.skip_ws();
        if self.peek() == Some('(') {
            let constructor = Constructor::lookup(&name)
                .ok_or_else(|| ExpressionError::UnknownConstructor(name.clone()))?;
            let args = self.sequence('(', ')')?;
            return build_predicate(&name, constructor, args).map(Expr::Predicate);
        }
        match name.as_str() {
            "True" | "true" => Ok(Expr::Value(Value::Bool(true))),
            "False" | "false" => Ok(Expr::Value(Value::Bool(false))),
            "None" | "null" => Ok(Expr::None),
            _ => Err(ExpressionError::Unsupported(format!("bare name '{}'", name))),
        }
    }

    fn sequence(&mut self, open: char, close: char) -> Result<Vec<Expr>, ExpressionError> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(items);
            }
            items.push(self.expr()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(c) if c == close => {
                    self.pos += 1;
                    return Ok(items);
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn map(&mut self) -> Result<Expr, ExpressionError> {
        self.expect('{')?;
        let mut entries = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Expr::Map(entries));
            }
            let key = self.expr()?.into_text()?;
            self.expect(':')?;
            let value = self.expr()?;
            entries.push((key, value));
            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {
                    self.pos += 1;
                    return Ok(Expr::Map(entries));
                }
                _ => return Err(self.unexpected()),
            }
        }
    }
}

fn build_predicate(
    name: &str,
    constructor: Constructor,
    args: Vec<Expr>,
) -> Result<Predicate, ExpressionError> {
    let bad = |reason: &str| ExpressionError::BadArguments {
        constructor: name.to_string(),
        reason: reason.to_string(),
    };

    if constructor == Constructor::Not {
        let mut args = args;
        if args.len() != 1 {
            return Err(bad("expected exactly one argument"));
        }
        let inner = match args.remove(0) {
            Expr::Predicate(p) => p,
            Expr::Value(v) => match constraint_from_value(v)? {
                Constraint::Predicate(p) => p,
                Constraint::Literal(v) => predicate::equal_to(v),
            },
            _ => return Err(bad("expected a predicate or literal")),
        };
        return Ok(predicate::not(inner));
    }

    let values = args
        .into_iter()
        .map(Expr::into_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| bad("arguments must be literals"))?;

    let single = |values: Vec<Value>| -> Result<Value, ExpressionError> {
        let mut values = values;
        if values.len() == 1 {
            Ok(values.remove(0))
        } else {
            Err(bad("expected exactly one argument"))
        }
    };
    // A collection constructor takes either one list or several scalars.
    let collection = |values: Vec<Value>| -> Vec<Value> {
        match values.as_slice() {
            [Value::List(items)] => items.clone(),
            _ => values,
        }
    };

    Ok(match constructor {
        Constructor::EqualTo => Predicate::EqualTo(single(values)?),
        Constructor::Contains => Predicate::Contains(single(values)?),
        Constructor::AtLeast => Predicate::AtLeast(single(values)?),
        Constructor::AtMost => Predicate::AtMost(single(values)?),
        Constructor::OneOf => Predicate::OneOf(collection(values)),
        Constructor::AllOf => Predicate::AllOf(collection(values)),
        Constructor::AnyOf => Predicate::AnyOf(collection(values)),
        Constructor::Substring => match single(values)? {
            Value::Text(s) => Predicate::Substring(s),
            _ => return Err(bad("expected a string")),
        },
        Constructor::Not => return Err(bad("expected a predicate")),
    })
}
