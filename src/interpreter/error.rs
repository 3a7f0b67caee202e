use thiserror::Error;

use crate::token::Pos;

/// Typed runtime failures. Every message is a single-line diagnostic of the
/// form `<Kind>: <detail> (<line>:<col>)`, ready for the driver to print.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("NameError: undefined variable '{name}' ({pos})")]
    UndefinedVariable { name: String, pos: Pos },

    #[error("ArityError: {callee} expected {expected} argument(s), got {found} ({pos})")]
    ArityMismatch {
        callee: String,
        expected: String,
        found: usize,
        pos: Pos,
    },

    #[error("TypeError: value of type {type_name} is not callable ({pos})")]
    NotCallable { type_name: String, pos: Pos },

    #[error("TypeError: cannot iterate over value of type {type_name} ({pos})")]
    NotIterable { type_name: String, pos: Pos },

    #[error("TypeError: value of type {type_name} does not support indexing ({pos})")]
    NotIndexable { type_name: String, pos: Pos },

    #[error("TypeError: value of type {type_name} does not support item assignment ({pos})")]
    NoItemAssignment { type_name: String, pos: Pos },

    #[error("TypeError: unhashable dict key of type {type_name} ({pos})")]
    UnhashableKey { type_name: String, pos: Pos },

    #[error("TypeError: {operation} expected {expected}, got {got} ({pos})")]
    InvalidOperand {
        operation: String,
        expected: String,
        got: String,
        pos: Pos,
    },

    #[error("IndexError: index {index} out of range for length {len} ({pos})")]
    IndexOutOfRange { index: i64, len: usize, pos: Pos },

    #[error("IndexError: pop from empty list ({pos})")]
    PopFromEmptyList { pos: Pos },

    #[error("KeyError: {key} ({pos})")]
    KeyMissing { key: String, pos: Pos },

    #[error("AttrError: no attribute '{attribute}' on value of type {type_name} ({pos})")]
    UnknownAttribute {
        attribute: String,
        type_name: String,
        pos: Pos,
    },

    #[error("AttrError: cannot set attribute '{attribute}' on value of type {type_name} ({pos})")]
    CannotSetAttribute {
        attribute: String,
        type_name: String,
        pos: Pos,
    },

    #[error("ValueError: {message} ({pos})")]
    Value { message: String, pos: Pos },

    #[error("CtrlFlowError: break outside of loop ({pos})")]
    BreakOutsideLoop { pos: Pos },

    #[error("CtrlFlowError: continue outside of loop ({pos})")]
    ContinueOutsideLoop { pos: Pos },

    #[error("CtrlFlowError: return outside of function ({pos})")]
    ReturnOutsideFunction { pos: Pos },
}

impl RuntimeError {
    pub(crate) fn value(message: impl Into<String>, pos: Pos) -> Self {
        RuntimeError::Value {
            message: message.into(),
            pos,
        }
    }
}
