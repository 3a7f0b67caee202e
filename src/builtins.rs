//! Fixed registry of built-in functions and per-type methods.
//!
//! Built-ins are seeded into the global frame before execution; methods are
//! resolved by attribute dispatch and invoked through `BoundMethod` values.

use std::io;

use crate::interpreter::env::{Env, EnvRef};
use crate::interpreter::error::RuntimeError;
use crate::interpreter::value::{DictValue, RangeValue, Value};
use crate::token::Pos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Print,
    Input,
    Range,
    Format,
    ParseInt,
    ParseFloat,
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Pow,
    Mod,
    Abs,
    Neg,
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
    And,
    Or,
    Not,
    Len,
}

impl Builtin {
    pub const ALL: [Builtin; 25] = [
        Builtin::Print,
        Builtin::Input,
        Builtin::Range,
        Builtin::Format,
        Builtin::ParseInt,
        Builtin::ParseFloat,
        Builtin::Add,
        Builtin::Sub,
        Builtin::Mul,
        Builtin::Div,
        Builtin::FloorDiv,
        Builtin::Pow,
        Builtin::Mod,
        Builtin::Abs,
        Builtin::Neg,
        Builtin::Lt,
        Builtin::Le,
        Builtin::Eq,
        Builtin::Ne,
        Builtin::Ge,
        Builtin::Gt,
        Builtin::And,
        Builtin::Or,
        Builtin::Not,
        Builtin::Len,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Input => "input",
            Builtin::Range => "range",
            Builtin::Format => "format",
            Builtin::ParseInt => "parse_int",
            Builtin::ParseFloat => "parse_float",
            Builtin::Add => "add",
            Builtin::Sub => "sub",
            Builtin::Mul => "mul",
            Builtin::Div => "div",
            Builtin::FloorDiv => "floor_div",
            Builtin::Pow => "pow",
            Builtin::Mod => "mod",
            Builtin::Abs => "abs",
            Builtin::Neg => "neg",
            Builtin::Lt => "lt",
            Builtin::Le => "le",
            Builtin::Eq => "eq",
            Builtin::Ne => "ne",
            Builtin::Ge => "ge",
            Builtin::Gt => "gt",
            Builtin::And => "and",
            Builtin::Or => "or",
            Builtin::Not => "not",
            Builtin::Len => "len",
        }
    }

    fn arity(self) -> Arity {
        match self {
            Builtin::Print => Arity::AtLeast(0),
            Builtin::Format => Arity::AtLeast(1),
            Builtin::Input => Arity::Between(0, 1),
            Builtin::Range => Arity::Between(1, 3),
            Builtin::ParseInt
            | Builtin::ParseFloat
            | Builtin::Abs
            | Builtin::Neg
            | Builtin::Not
            | Builtin::Len => Arity::Exact(1),
            _ => Arity::Exact(2),
        }
    }

    pub fn check_arity(self, found: usize, pos: Pos) -> Result<(), RuntimeError> {
        let arity = self.arity();
        if arity.accepts(found) {
            return Ok(());
        }
        Err(RuntimeError::ArityMismatch {
            callee: self.name().to_string(),
            expected: arity.describe(),
            found,
            pos,
        })
    }
}

enum Arity {
    Exact(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    fn accepts(&self, found: usize) -> bool {
        match self {
            Arity::Exact(n) => found == *n,
            Arity::Between(min, max) => (*min..=*max).contains(&found),
            Arity::AtLeast(min) => found >= *min,
        }
    }

    fn describe(&self) -> String {
        match self {
            Arity::Exact(n) => n.to_string(),
            Arity::Between(min, max) if *max == min + 1 => format!("{min} or {max}"),
            Arity::Between(min, max) => format!("{min} to {max}"),
            Arity::AtLeast(min) => format!("at least {min}"),
        }
    }
}

/// Standard-stream seam for `print` and `input`; the interpreter provides
/// the concrete streams.
pub trait Io {
    fn print_line(&mut self, line: &str) -> io::Result<()>;
    fn prompt(&mut self, text: &str) -> io::Result<()>;
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

pub fn invoke(
    builtin: Builtin,
    args: Vec<Value>,
    pos: Pos,
    io: &mut dyn Io,
) -> Result<Value, RuntimeError> {
    builtin.check_arity(args.len(), pos)?;
    match builtin {
        Builtin::Print => {
            let line = args
                .iter()
                .map(Value::to_output)
                .collect::<Vec<_>>()
                .join(" ");
            io.print_line(&line)
                .map_err(|e| RuntimeError::value(format!("io error: {e}"), pos))?;
            Ok(Value::Null)
        }
        Builtin::Input => {
            if let Some(prompt) = args.first() {
                io.prompt(&prompt.to_output())
                    .map_err(|e| RuntimeError::value(format!("io error: {e}"), pos))?;
            }
            let line = io
                .read_line()
                .map_err(|e| RuntimeError::value(format!("io error: {e}"), pos))?;
            match line {
                Some(mut line) => {
                    if line.ends_with('\n') {
                        line.pop();
                        if line.ends_with('\r') {
                            line.pop();
                        }
                    }
                    Ok(Value::Str(line))
                }
                None => Err(RuntimeError::value("unexpected end of input", pos)),
            }
        }
        Builtin::Range => builtin_range(&args, pos),
        Builtin::Format => builtin_format(&args, pos),
        Builtin::ParseInt => {
            let text = expect_str(&args[0], "parse_int", pos)?;
            text.trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| RuntimeError::value(format!("invalid integer literal '{text}'"), pos))
        }
        Builtin::ParseFloat => {
            let text = expect_str(&args[0], "parse_float", pos)?;
            text.trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| RuntimeError::value(format!("invalid float literal '{text}'"), pos))
        }
        Builtin::Add | Builtin::Sub | Builtin::Div | Builtin::FloorDiv | Builtin::Pow
        | Builtin::Mod => binary_arithmetic(builtin, &args[0], &args[1], pos),
        Builtin::Mul => builtin_mul(&args[0], &args[1], pos),
        Builtin::Abs => match as_num(&args[0], "abs", pos)? {
            Num::Int(v) => v
                .checked_abs()
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::value("integer overflow", pos)),
            Num::Float(v) => Ok(Value::Float(v.abs())),
        },
        Builtin::Neg => match as_num(&args[0], "neg", pos)? {
            Num::Int(v) => v
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::value("integer overflow", pos)),
            Num::Float(v) => Ok(Value::Float(-v)),
        },
        Builtin::Lt | Builtin::Le | Builtin::Ge | Builtin::Gt => {
            ordering(builtin, &args[0], &args[1], pos)
        }
        Builtin::Eq => Ok(Value::Bool(args[0].eq_value(&args[1]))),
        Builtin::Ne => Ok(Value::Bool(!args[0].eq_value(&args[1]))),
        Builtin::And => {
            // Both operands were already evaluated by the caller; no
            // short-circuit exists in the language.
            let [a, b] = take_two(args);
            Ok(if a.is_truthy() { b } else { a })
        }
        Builtin::Or => {
            let [a, b] = take_two(args);
            Ok(if a.is_truthy() { a } else { b })
        }
        Builtin::Not => Ok(Value::Bool(!args[0].is_truthy())),
        Builtin::Len => builtin_len(&args[0], pos),
    }
}

pub fn seed_globals(env: &EnvRef) {
    for builtin in Builtin::ALL {
        Env::define(env, builtin.name(), Value::Builtin(builtin));
    }
}

fn take_two(mut args: Vec<Value>) -> [Value; 2] {
    let b = args.pop().unwrap_or(Value::Null);
    let a = args.pop().unwrap_or(Value::Null);
    [a, b]
}

enum Num {
    Int(i64),
    Float(f64),
}

fn as_num(value: &Value, operation: &str, pos: Pos) -> Result<Num, RuntimeError> {
    match value {
        Value::Int(v) => Ok(Num::Int(*v)),
        Value::Float(v) => Ok(Num::Float(*v)),
        other => Err(RuntimeError::InvalidOperand {
            operation: operation.to_string(),
            expected: "a number".to_string(),
            got: other.type_name().to_string(),
            pos,
        }),
    }
}

fn expect_str<'a>(value: &'a Value, operation: &str, pos: Pos) -> Result<&'a str, RuntimeError> {
    match value {
        Value::Str(text) => Ok(text),
        other => Err(RuntimeError::InvalidOperand {
            operation: operation.to_string(),
            expected: "a string".to_string(),
            got: other.type_name().to_string(),
            pos,
        }),
    }
}

fn expect_int(value: &Value, operation: &str, pos: Pos) -> Result<i64, RuntimeError> {
    match value {
        Value::Int(v) => Ok(*v),
        other => Err(RuntimeError::InvalidOperand {
            operation: operation.to_string(),
            expected: "an int".to_string(),
            got: other.type_name().to_string(),
            pos,
        }),
    }
}

fn overflow(pos: Pos) -> RuntimeError {
    RuntimeError::value("integer overflow", pos)
}

fn div_by_zero(pos: Pos) -> RuntimeError {
    RuntimeError::value("division by zero", pos)
}

// Floored division/modulo; the remainder takes the sign of the divisor.
fn floor_div_i64(a: i64, b: i64, pos: Pos) -> Result<i64, RuntimeError> {
    let q = a.checked_div(b).ok_or_else(|| overflow(pos))?;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

fn floor_mod_i64(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) { r + b } else { r }
}

fn binary_arithmetic(
    builtin: Builtin,
    lhs: &Value,
    rhs: &Value,
    pos: Pos,
) -> Result<Value, RuntimeError> {
    let name = builtin.name();
    let (a, b) = (as_num(lhs, name, pos)?, as_num(rhs, name, pos)?);

    // Int×Int stays Int; any Float operand promotes both.
    if let (Num::Int(a), Num::Int(b)) = (&a, &b) {
        let (a, b) = (*a, *b);
        let result = match builtin {
            Builtin::Add => a.checked_add(b).ok_or_else(|| overflow(pos))?,
            Builtin::Sub => a.checked_sub(b).ok_or_else(|| overflow(pos))?,
            Builtin::Div => {
                if b == 0 {
                    return Err(div_by_zero(pos));
                }
                a.checked_div(b).ok_or_else(|| overflow(pos))?
            }
            Builtin::FloorDiv => {
                if b == 0 {
                    return Err(div_by_zero(pos));
                }
                floor_div_i64(a, b, pos)?
            }
            Builtin::Mod => {
                if b == 0 {
                    return Err(div_by_zero(pos));
                }
                floor_mod_i64(a, b)
            }
            Builtin::Pow => {
                if b < 0 {
                    return Ok(Value::Float((a as f64).powf(b as f64)));
                }
                let exp = u32::try_from(b).map_err(|_| overflow(pos))?;
                a.checked_pow(exp).ok_or_else(|| overflow(pos))?
            }
            _ => return Err(RuntimeError::value("unsupported arithmetic", pos)),
        };
        return Ok(Value::Int(result));
    }

    let a = match a {
        Num::Int(v) => v as f64,
        Num::Float(v) => v,
    };
    let b = match b {
        Num::Int(v) => v as f64,
        Num::Float(v) => v,
    };
    let result = match builtin {
        Builtin::Add => a + b,
        Builtin::Sub => a - b,
        Builtin::Div => {
            if b == 0.0 {
                return Err(div_by_zero(pos));
            }
            a / b
        }
        Builtin::FloorDiv => {
            if b == 0.0 {
                return Err(div_by_zero(pos));
            }
            (a / b).floor()
        }
        Builtin::Mod => {
            if b == 0.0 {
                return Err(div_by_zero(pos));
            }
            a - b * (a / b).floor()
        }
        Builtin::Pow => a.powf(b),
        _ => return Err(RuntimeError::value("unsupported arithmetic", pos)),
    };
    Ok(Value::Float(result))
}

fn builtin_mul(lhs: &Value, rhs: &Value, pos: Pos) -> Result<Value, RuntimeError> {
    // Replication forms: list-times-int and str-times-int, int on either
    // side. Everything else is numeric multiplication.
    let replication = match (lhs, rhs) {
        (Value::List(values), Value::Int(count)) | (Value::Int(count), Value::List(values)) => {
            Some((Value::List(values.clone()), *count))
        }
        (Value::Str(text), Value::Int(count)) | (Value::Int(count), Value::Str(text)) => {
            Some((Value::Str(text.clone()), *count))
        }
        _ => None,
    };
    if let Some((base, count)) = replication {
        let count = usize::try_from(count.max(0)).map_err(|_| overflow(pos))?;
        return Ok(match base {
            Value::List(values) => {
                let snapshot = values.borrow().clone();
                let mut result = Vec::with_capacity(snapshot.len().saturating_mul(count));
                for _ in 0..count {
                    result.extend(snapshot.iter().cloned());
                }
                Value::list(result)
            }
            Value::Str(text) => Value::Str(text.repeat(count)),
            _ => base,
        });
    }

    let name = Builtin::Mul.name();
    let (a, b) = (as_num(lhs, name, pos)?, as_num(rhs, name, pos)?);
    match (a, b) {
        (Num::Int(a), Num::Int(b)) => a
            .checked_mul(b)
            .map(Value::Int)
            .ok_or_else(|| overflow(pos)),
        (a, b) => {
            let a = match a {
                Num::Int(v) => v as f64,
                Num::Float(v) => v,
            };
            let b = match b {
                Num::Int(v) => v as f64,
                Num::Float(v) => v,
            };
            Ok(Value::Float(a * b))
        }
    }
}

fn ordering(builtin: Builtin, lhs: &Value, rhs: &Value, pos: Pos) -> Result<Value, RuntimeError> {
    use std::cmp::Ordering;

    let order = match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (a, b) => {
            let promote = |value: &Value| match value {
                Value::Int(v) => Some(*v as f64),
                Value::Float(v) => Some(*v),
                _ => None,
            };
            let (Some(a), Some(b)) = (promote(a), promote(b)) else {
                return Err(RuntimeError::InvalidOperand {
                    operation: builtin.name().to_string(),
                    expected: "two numbers or two strings".to_string(),
                    got: format!("{} and {}", lhs.type_name(), rhs.type_name()),
                    pos,
                });
            };
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
    };
    let result = match builtin {
        Builtin::Lt => order == Ordering::Less,
        Builtin::Le => order != Ordering::Greater,
        Builtin::Ge => order != Ordering::Less,
        _ => order == Ordering::Greater,
    };
    Ok(Value::Bool(result))
}

fn builtin_range(args: &[Value], pos: Pos) -> Result<Value, RuntimeError> {
    let mut bounds = [0i64; 3];
    for (slot, arg) in bounds.iter_mut().zip(args) {
        *slot = expect_int(arg, "range", pos)?;
    }
    let (start, stop, step) = match args.len() {
        1 => (0, bounds[0], 1),
        2 => (bounds[0], bounds[1], 1),
        _ => (bounds[0], bounds[1], bounds[2]),
    };
    if step == 0 {
        return Err(RuntimeError::value("range step must not be zero", pos));
    }
    Ok(Value::Range(RangeValue { start, stop, step }))
}

fn builtin_format(args: &[Value], pos: Pos) -> Result<Value, RuntimeError> {
    let template = expect_str(&args[0], "format", pos)?;
    let mut result = String::with_capacity(template.len());
    let mut parts = template.split("{}");
    let mut next_arg = args.iter().skip(1);

    if let Some(first) = parts.next() {
        result.push_str(first);
    }
    for part in parts {
        let arg = next_arg
            .next()
            .ok_or_else(|| RuntimeError::value("format: not enough arguments", pos))?;
        result.push_str(&arg.to_output());
        result.push_str(part);
    }
    Ok(Value::Str(result))
}

fn builtin_len(value: &Value, pos: Pos) -> Result<Value, RuntimeError> {
    let len = match value {
        Value::List(values) => values.borrow().len(),
        Value::Dict(entries) => entries.borrow().len(),
        Value::Str(text) => text.chars().count(),
        Value::Range(range) => range.len(),
        other => {
            return Err(RuntimeError::InvalidOperand {
                operation: "len".to_string(),
                expected: "a list, dict, str, or range".to_string(),
                got: other.type_name().to_string(),
                pos,
            });
        }
    };
    Ok(Value::Int(len as i64))
}

/// Per-type methods reachable through attribute dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    ListIndex,
    ListCount,
    ListPush,
    ListPop,
    ListLength,
    DictKeys,
    DictValues,
    DictHas,
    DictRemove,
    DictLength,
    StrSplit,
    StrLength,
    StrUpper,
    StrLower,
    StrReplace,
}

impl Method {
    pub fn lookup(receiver: &Value, name: &str) -> Option<Method> {
        let method = match (receiver, name) {
            (Value::List(_), "index") => Method::ListIndex,
            (Value::List(_), "count") => Method::ListCount,
            (Value::List(_), "push") => Method::ListPush,
            (Value::List(_), "pop") => Method::ListPop,
            (Value::List(_), "length") => Method::ListLength,
            (Value::Dict(_), "keys") => Method::DictKeys,
            (Value::Dict(_), "values") => Method::DictValues,
            (Value::Dict(_), "has") => Method::DictHas,
            (Value::Dict(_), "remove") => Method::DictRemove,
            (Value::Dict(_), "length") => Method::DictLength,
            (Value::Str(_), "split") => Method::StrSplit,
            (Value::Str(_), "length") => Method::StrLength,
            (Value::Str(_), "upper") => Method::StrUpper,
            (Value::Str(_), "lower") => Method::StrLower,
            (Value::Str(_), "replace") => Method::StrReplace,
            _ => return None,
        };
        Some(method)
    }

    pub fn name(self) -> &'static str {
        match self {
            Method::ListIndex => "index",
            Method::ListCount => "count",
            Method::ListPush => "push",
            Method::ListPop => "pop",
            Method::ListLength | Method::DictLength | Method::StrLength => "length",
            Method::DictKeys => "keys",
            Method::DictValues => "values",
            Method::DictHas => "has",
            Method::DictRemove => "remove",
            Method::StrSplit => "split",
            Method::StrUpper => "upper",
            Method::StrLower => "lower",
            Method::StrReplace => "replace",
        }
    }

    fn arity(self) -> Arity {
        match self {
            Method::ListPop
            | Method::ListLength
            | Method::DictKeys
            | Method::DictValues
            | Method::DictLength
            | Method::StrLength
            | Method::StrUpper
            | Method::StrLower => Arity::Exact(0),
            Method::StrReplace => Arity::Exact(2),
            _ => Arity::Exact(1),
        }
    }
}

fn expect_list_receiver<'a>(
    receiver: &'a Value,
    method: Method,
    pos: Pos,
) -> Result<&'a std::rc::Rc<std::cell::RefCell<Vec<Value>>>, RuntimeError> {
    match receiver {
        Value::List(values) => Ok(values),
        other => Err(receiver_mismatch(other, method, "a list", pos)),
    }
}

fn expect_dict_receiver<'a>(
    receiver: &'a Value,
    method: Method,
    pos: Pos,
) -> Result<&'a std::rc::Rc<std::cell::RefCell<DictValue>>, RuntimeError> {
    match receiver {
        Value::Dict(entries) => Ok(entries),
        other => Err(receiver_mismatch(other, method, "a dict", pos)),
    }
}

fn expect_str_receiver<'a>(
    receiver: &'a Value,
    method: Method,
    pos: Pos,
) -> Result<&'a str, RuntimeError> {
    match receiver {
        Value::Str(text) => Ok(text),
        other => Err(receiver_mismatch(other, method, "a str", pos)),
    }
}

fn receiver_mismatch(got: &Value, method: Method, expected: &str, pos: Pos) -> RuntimeError {
    RuntimeError::InvalidOperand {
        operation: method.name().to_string(),
        expected: expected.to_string(),
        got: got.type_name().to_string(),
        pos,
    }
}

pub fn call_method(
    method: Method,
    receiver: &Value,
    args: Vec<Value>,
    pos: Pos,
) -> Result<Value, RuntimeError> {
    let arity = method.arity();
    if !arity.accepts(args.len()) {
        return Err(RuntimeError::ArityMismatch {
            callee: format!("{}.{}", receiver.type_name(), method.name()),
            expected: arity.describe(),
            found: args.len(),
            pos,
        });
    }

    match method {
        Method::ListIndex => {
            let values = expect_list_receiver(receiver, method, pos)?;
            let needle = &args[0];
            let position = values
                .borrow()
                .iter()
                .position(|value| value.eq_value(needle));
            match position {
                Some(index) => Ok(Value::Int(index as i64)),
                None => Err(RuntimeError::value(
                    format!("{} is not in list", needle.repr()),
                    pos,
                )),
            }
        }
        Method::ListCount => {
            let values = expect_list_receiver(receiver, method, pos)?;
            let needle = &args[0];
            let count = values
                .borrow()
                .iter()
                .filter(|value| value.eq_value(needle))
                .count();
            Ok(Value::Int(count as i64))
        }
        Method::ListPush => {
            let values = expect_list_receiver(receiver, method, pos)?;
            let mut args = args;
            values.borrow_mut().push(args.pop().unwrap_or(Value::Null));
            Ok(Value::Null)
        }
        Method::ListPop => {
            let values = expect_list_receiver(receiver, method, pos)?;
            let popped = values.borrow_mut().pop();
            popped.ok_or(RuntimeError::PopFromEmptyList { pos })
        }
        Method::ListLength => {
            let values = expect_list_receiver(receiver, method, pos)?;
            let len = values.borrow().len();
            Ok(Value::Int(len as i64))
        }
        Method::DictKeys => {
            let entries = expect_dict_receiver(receiver, method, pos)?;
            let keys = entries.borrow().keys();
            Ok(Value::list(keys))
        }
        Method::DictValues => {
            let entries = expect_dict_receiver(receiver, method, pos)?;
            let values = entries.borrow().values();
            Ok(Value::list(values))
        }
        Method::DictHas => {
            let entries = expect_dict_receiver(receiver, method, pos)?;
            let key = &args[0];
            if !key.is_hashable() {
                return Err(RuntimeError::UnhashableKey {
                    type_name: key.type_name().to_string(),
                    pos,
                });
            }
            let present = entries.borrow().contains(key);
            Ok(Value::Bool(present))
        }
        Method::DictRemove => {
            let entries = expect_dict_receiver(receiver, method, pos)?;
            let key = &args[0];
            if !key.is_hashable() {
                return Err(RuntimeError::UnhashableKey {
                    type_name: key.type_name().to_string(),
                    pos,
                });
            }
            let removed = entries.borrow_mut().remove(key);
            removed.ok_or_else(|| RuntimeError::KeyMissing {
                key: key.repr(),
                pos,
            })
        }
        Method::DictLength => {
            let entries = expect_dict_receiver(receiver, method, pos)?;
            let len = entries.borrow().len();
            Ok(Value::Int(len as i64))
        }
        Method::StrSplit => {
            let text = expect_str_receiver(receiver, method, pos)?;
            let separator = expect_str(&args[0], "split", pos)?;
            if separator.is_empty() {
                return Err(RuntimeError::value("empty separator", pos));
            }
            let parts = text
                .split(separator)
                .map(|part| Value::Str(part.to_string()))
                .collect();
            Ok(Value::list(parts))
        }
        Method::StrLength => {
            let text = expect_str_receiver(receiver, method, pos)?;
            Ok(Value::Int(text.chars().count() as i64))
        }
        Method::StrUpper => {
            let text = expect_str_receiver(receiver, method, pos)?;
            Ok(Value::Str(text.to_uppercase()))
        }
        Method::StrLower => {
            let text = expect_str_receiver(receiver, method, pos)?;
            Ok(Value::Str(text.to_lowercase()))
        }
        Method::StrReplace => {
            let text = expect_str_receiver(receiver, method, pos)?;
            let from = expect_str(&args[0], "replace", pos)?;
            let to = expect_str(&args[1], "replace", pos)?;
            Ok(Value::Str(text.replace(from, to)))
        }
    }
}
