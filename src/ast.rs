//! Syntax tree produced by the parser and walked by the interpreter.
//!
//! Every node carries the position of its first token for diagnostics. The
//! `Display` impls pretty-print nodes back to valid source, which backs the
//! driver's `--ast` flag.

use std::fmt;
use std::rc::Rc;

use crate::token::Pos;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    IntLit(i64, Pos),
    FloatLit(f64, Pos),
    StrLit(String, Pos),
    BoolLit(bool, Pos),
    NullLit(Pos),
    ListLit(Vec<Expression>, Pos),
    DictLit(Vec<(Expression, Expression)>, Pos),
    Name(String, Pos),
    Index {
        target: Box<Expression>,
        key: Box<Expression>,
        pos: Pos,
    },
    Attr {
        target: Box<Expression>,
        name: String,
        pos: Pos,
    },
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
        pos: Pos,
    },
    IndexAssign {
        target: Box<Expression>,
        key: Box<Expression>,
        value: Box<Expression>,
        pos: Pos,
    },
    AttrAssign {
        target: Box<Expression>,
        name: String,
        value: Box<Expression>,
        pos: Pos,
    },
}

impl Expression {
    pub fn pos(&self) -> Pos {
        match self {
            Expression::IntLit(_, pos)
            | Expression::FloatLit(_, pos)
            | Expression::StrLit(_, pos)
            | Expression::BoolLit(_, pos)
            | Expression::NullLit(pos)
            | Expression::ListLit(_, pos)
            | Expression::DictLit(_, pos)
            | Expression::Name(_, pos)
            | Expression::Index { pos, .. }
            | Expression::Attr { pos, .. }
            | Expression::Call { pos, .. }
            | Expression::IndexAssign { pos, .. }
            | Expression::AttrAssign { pos, .. } => *pos,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Statement>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let {
        name: String,
        value: Expression,
        pos: Pos,
    },
    Expr(Expression),
    Block(Block),
    If {
        cond: Expression,
        then_block: Block,
        else_branch: Option<Box<Statement>>,
        pos: Pos,
    },
    While {
        cond: Expression,
        body: Block,
        pos: Pos,
    },
    CFor {
        init: Option<Box<Statement>>,
        cond: Option<Expression>,
        post: Option<Expression>,
        body: Block,
        pos: Pos,
    },
    ForOf {
        name: String,
        iterable: Expression,
        body: Block,
        pos: Pos,
    },
    FnDecl(Rc<FnDecl>),
    Return {
        value: Option<Expression>,
        pos: Pos,
    },
    Break {
        pos: Pos,
    },
    Continue {
        pos: Pos,
    },
}

impl Statement {
    pub fn pos(&self) -> Pos {
        match self {
            Statement::Let { pos, .. }
            | Statement::If { pos, .. }
            | Statement::While { pos, .. }
            | Statement::CFor { pos, .. }
            | Statement::ForOf { pos, .. }
            | Statement::Return { pos, .. }
            | Statement::Break { pos }
            | Statement::Continue { pos } => *pos,
            Statement::Expr(expr) => expr.pos(),
            Statement::Block(block) => block.pos,
            Statement::FnDecl(decl) => decl.pos,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// Renders a float so it re-lexes as a float literal (at least one
/// fractional digit, no exponent for integral values).
pub(crate) fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Renders a string as a quoted literal using the recognized escapes.
pub(crate) fn quote_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("\t{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::IntLit(value, _) => write!(f, "{value}"),
            Expression::FloatLit(value, _) => write!(f, "{}", format_float(*value)),
            Expression::StrLit(value, _) => write!(f, "{}", quote_str(value)),
            Expression::BoolLit(value, _) => write!(f, "{value}"),
            Expression::NullLit(_) => write!(f, "null"),
            Expression::ListLit(elems, _) => {
                let rendered = elems
                    .iter()
                    .map(Expression::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "[{rendered}]")
            }
            Expression::DictLit(pairs, _) => {
                let rendered = pairs
                    .iter()
                    .map(|(key, value)| format!("{key}: {value}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{rendered}}}")
            }
            Expression::Name(name, _) => write!(f, "{name}"),
            Expression::Index { target, key, .. } => write!(f, "{target}[{key}]"),
            Expression::Attr { target, name, .. } => write!(f, "{target}.{name}"),
            Expression::Call { callee, args, .. } => {
                let rendered = args
                    .iter()
                    .map(Expression::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{callee}({rendered})")
            }
            Expression::IndexAssign {
                target, key, value, ..
            } => write!(f, "{target}[{key}] = {value}"),
            Expression::AttrAssign {
                target, name, value, ..
            } => write!(f, "{target}.{name} = {value}"),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = vec!["{".to_string()];
        for stmt in &self.stmts {
            lines.push(indent(&stmt.to_string()));
        }
        lines.push("}".to_string());
        write!(f, "{}", lines.join("\n"))
    }
}

impl fmt::Display for FnDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self.params.join(", ");
        write!(f, "fn {}({params}) {}", self.name, self.body)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { name, value, .. } => write!(f, "let {name} = {value};"),
            Statement::Expr(expr) => write!(f, "{expr};"),
            Statement::Block(block) => write!(f, "{block}"),
            Statement::If {
                cond,
                then_block,
                else_branch,
                ..
            } => {
                write!(f, "if ({cond}) {then_block}")?;
                if let Some(else_branch) = else_branch {
                    write!(f, " else {else_branch}")?;
                }
                Ok(())
            }
            Statement::While { cond, body, .. } => write!(f, "while ({cond}) {body}"),
            Statement::CFor {
                init,
                cond,
                post,
                body,
                ..
            } => {
                write!(f, "for (")?;
                match init {
                    Some(stmt) => write!(f, "{stmt}")?,
                    None => write!(f, ";")?,
                }
                match cond {
                    Some(expr) => write!(f, " {expr};")?,
                    None => write!(f, " ;")?,
                }
                if let Some(expr) = post {
                    write!(f, " {expr}")?;
                }
                write!(f, ") {body}")
            }
            Statement::ForOf {
                name,
                iterable,
                body,
                ..
            } => write!(f, "for (let {name} of {iterable}) {body}"),
            Statement::FnDecl(decl) => write!(f, "{decl}"),
            Statement::Return { value, .. } => match value {
                Some(expr) => write!(f, "return {expr};"),
                None => write!(f, "return;"),
            },
            Statement::Break { .. } => write!(f, "break;"),
            Statement::Continue { .. } => write!(f, "continue;"),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .statements
            .iter()
            .map(Statement::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        write!(f, "{rendered}")
    }
}
