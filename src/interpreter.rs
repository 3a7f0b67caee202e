//! Tree-walking evaluator.
//!
//! Execution pipeline:
//! run -> hoist top-level fn declarations -> exec_statement per top-level
//! statement -> eval_expression -> call_value (function bodies re-enter
//! exec_statements). Control flow propagates as a small sum type rather than
//! any non-local escape; loops absorb Break/Continue and calls absorb Return.

use std::io::{self, BufRead, Write};
use std::rc::Rc;

use crate::ast::{Block, Expression, Program, Statement};
use crate::builtins::{self, Io, Method};
use crate::token::Pos;

pub mod env;
pub mod error;
pub mod value;

use env::{Env, EnvRef};
use error::RuntimeError;
use value::{DictValue, Function, Value};

/// Outcome of a statement: either fall through or a transfer that unwinds
/// until a loop or call catches it.
enum Flow {
    Normal,
    Break(Pos),
    Continue(Pos),
    Return(Value, Pos),
}

pub struct Interpreter<R, W> {
    input: R,
    output: W,
}

/// Runs a program against real standard streams.
pub fn evaluate(program: &Program) -> Result<(), RuntimeError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Interpreter::new(stdin.lock(), stdout.lock()).run(program)
}

impl<R: BufRead, W: Write> Io for Interpreter<R, W> {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.output, "{text}")?;
        self.output.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        Ok((read > 0).then_some(line))
    }
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        let globals = Env::global();
        builtins::seed_globals(&globals);

        // Hoisting pre-pass: top-level fn declarations bind before any
        // statement executes, capturing the global frame.
        for statement in &program.statements {
            if let Statement::FnDecl(decl) = statement {
                let function = Function {
                    decl: Rc::clone(decl),
                    env: Rc::clone(&globals),
                };
                Env::define(&globals, &decl.name, Value::Function(Rc::new(function)));
            }
        }

        for statement in &program.statements {
            // Already bound by the hoisting pass.
            if matches!(statement, Statement::FnDecl(_)) {
                continue;
            }
            match self.exec_statement(statement, &globals)? {
                Flow::Normal => {}
                Flow::Break(pos) => return Err(RuntimeError::BreakOutsideLoop { pos }),
                Flow::Continue(pos) => return Err(RuntimeError::ContinueOutsideLoop { pos }),
                Flow::Return(_, pos) => return Err(RuntimeError::ReturnOutsideFunction { pos }),
            }
        }
        Ok(())
    }

    fn exec_statements(&mut self, stmts: &[Statement], env: &EnvRef) -> Result<Flow, RuntimeError> {
        for statement in stmts {
            match self.exec_statement(statement, env)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_block(&mut self, block: &Block, env: &EnvRef) -> Result<Flow, RuntimeError> {
        let child = Env::child(env);
        self.exec_statements(&block.stmts, &child)
    }

    fn exec_statement(&mut self, statement: &Statement, env: &EnvRef) -> Result<Flow, RuntimeError> {
        match statement {
            Statement::Let { name, value, .. } => {
                let value = self.eval_expression(value, env)?;
                Env::define(env, name, value);
                Ok(Flow::Normal)
            }
            Statement::Expr(expr) => {
                self.eval_expression(expr, env)?;
                Ok(Flow::Normal)
            }
            Statement::Block(block) => self.exec_block(block, env),
            Statement::If {
                cond,
                then_block,
                else_branch,
                ..
            } => {
                if self.eval_expression(cond, env)?.is_truthy() {
                    self.exec_block(then_block, env)
                } else if let Some(else_branch) = else_branch {
                    self.exec_statement(else_branch, env)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Statement::While { cond, body, .. } => {
                while self.eval_expression(cond, env)?.is_truthy() {
                    match self.exec_block(body, env)? {
                        Flow::Normal | Flow::Continue(_) => {}
                        Flow::Break(_) => break,
                        ret @ Flow::Return(..) => return Ok(ret),
                    }
                }
                Ok(Flow::Normal)
            }
            Statement::CFor {
                init,
                cond,
                post,
                body,
                ..
            } => {
                // The initializer's bindings live in a frame scoped to the
                // whole loop.
                let loop_env = Env::child(env);
                if let Some(init) = init {
                    self.exec_statement(init, &loop_env)?;
                }
                loop {
                    let proceed = match cond {
                        Some(expr) => self.eval_expression(expr, &loop_env)?.is_truthy(),
                        None => true,
                    };
                    if !proceed {
                        break;
                    }
                    match self.exec_block(body, &loop_env)? {
                        // continue still reaches the post expression
                        Flow::Normal | Flow::Continue(_) => {}
                        Flow::Break(_) => break,
                        ret @ Flow::Return(..) => return Ok(ret),
                    }
                    if let Some(post) = post {
                        self.eval_expression(post, &loop_env)?;
                    }
                }
                Ok(Flow::Normal)
            }
            Statement::ForOf {
                name,
                iterable,
                body,
                pos,
            } => {
                let value = self.eval_expression(iterable, env)?;
                if let Value::Range(range) = &value {
                    for item in range.iter() {
                        match self.for_of_iteration(name, Value::Int(item), body, env)? {
                            Flow::Normal | Flow::Continue(_) => {}
                            Flow::Break(_) => break,
                            ret @ Flow::Return(..) => return Ok(ret),
                        }
                    }
                    return Ok(Flow::Normal);
                }

                let items: Vec<Value> = match &value {
                    Value::List(values) => values.borrow().clone(),
                    Value::Dict(entries) => entries.borrow().keys(),
                    Value::Str(text) => {
                        text.chars().map(|c| Value::Str(c.to_string())).collect()
                    }
                    other => {
                        return Err(RuntimeError::NotIterable {
                            type_name: other.type_name().to_string(),
                            pos: *pos,
                        });
                    }
                };
                for item in items {
                    match self.for_of_iteration(name, item, body, env)? {
                        Flow::Normal | Flow::Continue(_) => {}
                        Flow::Break(_) => break,
                        ret @ Flow::Return(..) => return Ok(ret),
                    }
                }
                Ok(Flow::Normal)
            }
            Statement::FnDecl(decl) => {
                let function = Function {
                    decl: Rc::clone(decl),
                    env: Rc::clone(env),
                };
                Env::define(env, &decl.name, Value::Function(Rc::new(function)));
                Ok(Flow::Normal)
            }
            Statement::Return { value, pos } => {
                let value = match value {
                    Some(expr) => self.eval_expression(expr, env)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value, *pos))
            }
            Statement::Break { pos } => Ok(Flow::Break(*pos)),
            Statement::Continue { pos } => Ok(Flow::Continue(*pos)),
        }
    }

    /// The loop variable gets a fresh frame per iteration, so closures
    /// declared in the body capture distinct bindings.
    fn for_of_iteration(
        &mut self,
        name: &str,
        item: Value,
        body: &Block,
        env: &EnvRef,
    ) -> Result<Flow, RuntimeError> {
        let iter_env = Env::child(env);
        Env::define(&iter_env, name, item);
        self.exec_statements(&body.stmts, &iter_env)
    }

    fn eval_expression(&mut self, expr: &Expression, env: &EnvRef) -> Result<Value, RuntimeError> {
        match expr {
            Expression::IntLit(value, _) => Ok(Value::Int(*value)),
            Expression::FloatLit(value, _) => Ok(Value::Float(*value)),
            Expression::StrLit(value, _) => Ok(Value::Str(value.clone())),
            Expression::BoolLit(value, _) => Ok(Value::Bool(*value)),
            Expression::NullLit(_) => Ok(Value::Null),
            Expression::ListLit(elems, _) => {
                let mut values = Vec::with_capacity(elems.len());
                for elem in elems {
                    values.push(self.eval_expression(elem, env)?);
                }
                Ok(Value::list(values))
            }
            Expression::DictLit(pairs, _) => {
                let mut entries = DictValue::new();
                for (key_expr, value_expr) in pairs {
                    let key = self.eval_expression(key_expr, env)?;
                    if !key.is_hashable() {
                        return Err(RuntimeError::UnhashableKey {
                            type_name: key.type_name().to_string(),
                            pos: key_expr.pos(),
                        });
                    }
                    let value = self.eval_expression(value_expr, env)?;
                    entries.insert(key, value);
                }
                Ok(Value::dict(entries))
            }
            Expression::Name(name, pos) => {
                Env::lookup(env, name).ok_or_else(|| RuntimeError::UndefinedVariable {
                    name: name.clone(),
                    pos: *pos,
                })
            }
            Expression::Index { target, key, pos } => {
                let target = self.eval_expression(target, env)?;
                let key = self.eval_expression(key, env)?;
                get_item(&target, &key, *pos)
            }
            Expression::Attr { target, name, pos } => {
                let target = self.eval_expression(target, env)?;
                get_attr(&target, name, *pos)
            }
            Expression::Call { callee, args, pos } => {
                // Callee first, then arguments left to right.
                let callee = self.eval_expression(callee, env)?;
                let mut evaluated = Vec::with_capacity(args.len());
                for arg in args {
                    evaluated.push(self.eval_expression(arg, env)?);
                }
                self.call_value(callee, evaluated, *pos)
            }
            Expression::IndexAssign {
                target,
                key,
                value,
                pos,
            } => {
                let target = self.eval_expression(target, env)?;
                let key = self.eval_expression(key, env)?;
                let value = self.eval_expression(value, env)?;
                set_item(&target, key, value.clone(), *pos)?;
                Ok(value)
            }
            Expression::AttrAssign {
                target,
                name,
                value,
                pos,
            } => {
                let target = self.eval_expression(target, env)?;
                let value = self.eval_expression(value, env)?;
                match &target {
                    Value::Dict(entries) => {
                        entries
                            .borrow_mut()
                            .insert(Value::Str(name.clone()), value.clone());
                        Ok(value)
                    }
                    other => Err(RuntimeError::CannotSetAttribute {
                        attribute: name.clone(),
                        type_name: other.type_name().to_string(),
                        pos: *pos,
                    }),
                }
            }
        }
    }

    fn call_value(
        &mut self,
        callee: Value,
        args: Vec<Value>,
        pos: Pos,
    ) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(function) => {
                let params = &function.decl.params;
                if args.len() != params.len() {
                    return Err(RuntimeError::ArityMismatch {
                        callee: function.decl.name.clone(),
                        expected: params.len().to_string(),
                        found: args.len(),
                        pos,
                    });
                }
                let call_env = Env::child(&function.env);
                for (param, arg) in params.iter().zip(args) {
                    Env::define(&call_env, param, arg);
                }
                match self.exec_statements(&function.decl.body.stmts, &call_env)? {
                    Flow::Normal => Ok(Value::Null),
                    Flow::Return(value, _) => Ok(value),
                    Flow::Break(pos) => Err(RuntimeError::BreakOutsideLoop { pos }),
                    Flow::Continue(pos) => Err(RuntimeError::ContinueOutsideLoop { pos }),
                }
            }
            Value::Builtin(builtin) => builtins::invoke(builtin, args, pos, self),
            Value::BoundMethod { receiver, method } => {
                builtins::call_method(method, &receiver, args, pos)
            }
            other => Err(RuntimeError::NotCallable {
                type_name: other.type_name().to_string(),
                pos,
            }),
        }
    }
}

fn index_int(key: &Value, pos: Pos) -> Result<i64, RuntimeError> {
    match key {
        Value::Int(index) => Ok(*index),
        other => Err(RuntimeError::InvalidOperand {
            operation: "index".to_string(),
            expected: "an int".to_string(),
            got: other.type_name().to_string(),
            pos,
        }),
    }
}

// Negative indices count from the end.
fn normalize_index(index: i64, len: usize, pos: Pos) -> Result<usize, RuntimeError> {
    let adjusted = if index < 0 { index + len as i64 } else { index };
    if adjusted < 0 || adjusted >= len as i64 {
        return Err(RuntimeError::IndexOutOfRange { index, len, pos });
    }
    Ok(adjusted as usize)
}

fn get_item(target: &Value, key: &Value, pos: Pos) -> Result<Value, RuntimeError> {
    match target {
        Value::List(values) => {
            let values = values.borrow();
            let index = normalize_index(index_int(key, pos)?, values.len(), pos)?;
            Ok(values[index].clone())
        }
        Value::Dict(entries) => {
            if !key.is_hashable() {
                return Err(RuntimeError::UnhashableKey {
                    type_name: key.type_name().to_string(),
                    pos,
                });
            }
            entries
                .borrow()
                .get(key)
                .cloned()
                .ok_or_else(|| RuntimeError::KeyMissing {
                    key: key.repr(),
                    pos,
                })
        }
        Value::Str(text) => {
            let chars: Vec<char> = text.chars().collect();
            let index = normalize_index(index_int(key, pos)?, chars.len(), pos)?;
            Ok(Value::Str(chars[index].to_string()))
        }
        other => Err(RuntimeError::NotIndexable {
            type_name: other.type_name().to_string(),
            pos,
        }),
    }
}

fn set_item(target: &Value, key: Value, value: Value, pos: Pos) -> Result<(), RuntimeError> {
    match target {
        Value::List(values) => {
            let mut values = values.borrow_mut();
            let index = normalize_index(index_int(&key, pos)?, values.len(), pos)?;
            values[index] = value;
            Ok(())
        }
        Value::Dict(entries) => {
            if !key.is_hashable() {
                return Err(RuntimeError::UnhashableKey {
                    type_name: key.type_name().to_string(),
                    pos,
                });
            }
            entries.borrow_mut().insert(key, value);
            Ok(())
        }
        other => Err(RuntimeError::NoItemAssignment {
            type_name: other.type_name().to_string(),
            pos,
        }),
    }
}

/// `target.name`: a dict entry under that key wins, then the per-type
/// method table.
fn get_attr(target: &Value, name: &str, pos: Pos) -> Result<Value, RuntimeError> {
    if let Value::Dict(entries) = target {
        if let Some(value) = entries.borrow().get(&Value::Str(name.to_string())) {
            return Ok(value.clone());
        }
    }
    if let Some(method) = Method::lookup(target, name) {
        return Ok(Value::BoundMethod {
            receiver: Box::new(target.clone()),
            method,
        });
    }
    Err(RuntimeError::UnknownAttribute {
        attribute: name.to_string(),
        type_name: target.type_name().to_string(),
        pos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn run_capture(src: &str, input: &str) -> (Result<(), RuntimeError>, String) {
        let tokens = crate::lexer::tokenize(src).expect("tokenize should succeed");
        let program = crate::parser::parse_tokens(tokens).expect("parse should succeed");
        let mut output = Vec::new();
        let result = {
            let mut interpreter =
                Interpreter::new(io::Cursor::new(input.as_bytes().to_vec()), &mut output);
            interpreter.run(&program)
        };
        (result, String::from_utf8(output).expect("utf8 output"))
    }

    fn run(src: &str) -> String {
        let (result, output) = run_capture(src, "");
        result.expect("program should succeed");
        output
    }

    fn run_err(src: &str) -> RuntimeError {
        let (result, _) = run_capture(src, "");
        result.expect_err("program should fail")
    }

    #[test]
    fn fibonacci_with_recursion_and_return() {
        let src = indoc! {r#"
            fn fib(n) {
                if (lt(n, 2)) { return n; }
                return add(fib(sub(n, 1)), fib(sub(n, 2)));
            }
            print(fib(10));
        "#};
        assert_eq!(run(src), "55\n");
    }

    #[test]
    fn list_replication_and_count() {
        let src = indoc! {r#"
            let a = mul([false], 3);
            a[1] = true;
            print(a.count(true));
        "#};
        assert_eq!(run(src), "1\n");
    }

    #[test]
    fn for_of_over_string_yields_chars() {
        assert_eq!(run(r#"for (let c of "abc") { print(c); }"#), "a\nb\nc\n");
    }

    #[test]
    fn for_of_over_dict_yields_keys_in_insertion_order() {
        let src = r#"let d = {"x": 1, "y": 2}; for (let k of d) { print(k); }"#;
        assert_eq!(run(src), "x\ny\n");
    }

    #[test]
    fn top_level_functions_are_hoisted() {
        assert_eq!(run("print(g()); fn g(){ return 42; }"), "42\n");
    }

    #[test]
    fn mutual_recursion_through_hoisting() {
        let src = indoc! {r#"
            print(is_even(10));
            fn is_even(n) {
                if (eq(n, 0)) { return true; }
                return is_odd(sub(n, 1));
            }
            fn is_odd(n) {
                if (eq(n, 0)) { return false; }
                return is_even(sub(n, 1));
            }
        "#};
        assert_eq!(run(src), "true\n");
    }

    #[test]
    fn nested_function_declarations_are_not_hoisted() {
        let src = indoc! {r#"
            fn outer() {
                inner();
                fn inner() { print("inner"); }
            }
            outer();
        "#};
        let err = run_err(src);
        assert!(matches!(err, RuntimeError::UndefinedVariable { ref name, .. } if name == "inner"));
    }

    #[test]
    fn break_outside_loop_is_a_ctrl_flow_error() {
        let err = run_err("break;");
        let message = err.to_string();
        assert!(message.contains("CtrlFlowError"));
        assert!(message.contains("(1:1)"));
    }

    #[test]
    fn continue_and_return_outside_their_context_fail() {
        assert!(run_err("continue;").to_string().contains("CtrlFlowError"));
        assert!(run_err("return 1;").to_string().contains("CtrlFlowError"));
        // A break inside a function body but outside any loop escapes the
        // call, not the enclosing loop of the caller.
        let src = indoc! {r#"
            fn f() { break; }
            while (true) { f(); }
        "#};
        assert!(run_err(src).to_string().contains("CtrlFlowError"));
    }

    #[test]
    fn block_bindings_do_not_leak() {
        let src = indoc! {r#"
            { let hidden = 1; }
            print(hidden);
        "#};
        let err = run_err(src);
        assert!(matches!(err, RuntimeError::UndefinedVariable { ref name, .. } if name == "hidden"));
    }

    #[test]
    fn let_shadows_outer_bindings_inside_blocks() {
        let src = indoc! {r#"
            let x = 1;
            {
                let x = 2;
                print(x);
            }
            print(x);
        "#};
        assert_eq!(run(src), "2\n1\n");
    }

    #[test]
    fn closures_capture_their_declaration_frame() {
        let src = indoc! {r#"
            let out = [];
            {
                let secret = 7;
                fn reveal() { return secret; }
                out.push(reveal);
            }
            print(out[0]());
        "#};
        assert_eq!(run(src), "7\n");
    }

    #[test]
    fn for_of_closures_see_distinct_loop_bindings() {
        let src = indoc! {r#"
            let fns = [];
            for (let i of range(3)) {
                fn get() { return i; }
                fns.push(get);
            }
            print(fns[0](), fns[1](), fns[2]());
        "#};
        assert_eq!(run(src), "0 1 2\n");
    }

    #[test]
    fn equality_semantics() {
        let src = indoc! {r#"
            fn f() { return 1; }
            fn g() { return 1; }
            print(eq(1, 1.0));
            print(eq([1, 2], [1, 2]));
            print(eq(f, f), eq(f, g));
        "#};
        assert_eq!(run(src), "true\ntrue\ntrue false\n");
    }

    #[test]
    fn lists_alias_on_assignment() {
        let src = indoc! {r#"
            let a = [1, 2];
            let b = a;
            b[0] = 9;
            print(a);
        "#};
        assert_eq!(run(src), "[9, 2]\n");
    }

    #[test]
    fn while_loop_with_break_and_continue() {
        let src = indoc! {r#"
            let seen = [];
            let n = [0];
            while (true) {
                n[0] = add(n[0], 1);
                if (eq(n[0], 3)) { continue; }
                if (gt(n[0], 5)) { break; }
                seen.push(n[0]);
            }
            print(seen);
        "#};
        assert_eq!(run(src), "[1, 2, 4, 5]\n");
    }

    #[test]
    fn c_for_runs_post_even_after_continue() {
        let src = indoc! {r#"
            let log = [];
            for (let c = [0]; lt(c[0], 3); c[0] = add(c[0], 1)) {
                log.push(c[0]);
                continue;
            }
            print(log);
        "#};
        assert_eq!(run(src), "[0, 1, 2]\n");
    }

    #[test]
    fn c_for_break_skips_post_and_missing_cond_is_true() {
        let src = indoc! {r#"
            for (;;) { break; }
            print("done");
        "#};
        assert_eq!(run(src), "done\n");
    }

    #[test]
    fn c_for_initializer_scopes_to_the_loop() {
        let src = indoc! {r#"
            for (let i = [0]; lt(i[0], 1); i[0] = add(i[0], 1)) { }
            print(i);
        "#};
        let err = run_err(src);
        assert!(matches!(err, RuntimeError::UndefinedVariable { ref name, .. } if name == "i"));
    }

    #[test]
    fn for_of_over_range_with_step() {
        assert_eq!(
            run("for (let i of range(5, 0, -2)) { print(i); }"),
            "5\n3\n1\n"
        );
        assert_eq!(run("for (let i of range(2, 2)) { print(i); }"), "");
    }

    #[test]
    fn for_of_rejects_non_iterables() {
        let err = run_err("for (let x of 5) { }");
        assert!(err.to_string().contains("cannot iterate over value of type int"));
    }

    #[test]
    fn dict_attribute_reads_prefer_entries_over_methods() {
        let src = indoc! {r#"
            let d = {"x": 1};
            print(d.x);
            let shadowed = {"keys": 9};
            print(shadowed.keys);
            print(d.keys());
        "#};
        assert_eq!(run(src), "1\n9\n[\"x\"]\n");
    }

    #[test]
    fn dict_attribute_assignment_inserts_entries() {
        let src = indoc! {r#"
            let d = {};
            d.x = 1;
            d.x = 2;
            print(d, d.has("x"));
        "#};
        assert_eq!(run(src), "{\"x\": 2} true\n");
    }

    #[test]
    fn attribute_errors() {
        assert!(run_err("print([1].missing);").to_string().contains("AttrError"));
        let err = run_err("let n = 5; n.x = 1;");
        assert!(err.to_string().contains("AttrError: cannot set attribute 'x'"));
    }

    #[test]
    fn indexing_semantics() {
        let src = indoc! {r#"
            let a = [10, 20, 30];
            print(a[0], a[-1]);
            print("abc"[1], "abc"[-3]);
            let d = {1: "one"};
            print(d[1.0]);
        "#};
        assert_eq!(run(src), "10 30\nb a\none\n");
    }

    #[test]
    fn index_errors() {
        let err = run_err("let a = [1]; print(a[2]);");
        assert!(err.to_string().contains("IndexError: index 2 out of range for length 1"));
        let err = run_err("let a = [1]; a[-2] = 0;");
        assert!(err.to_string().contains("IndexError"));
        let err = run_err("let a = [1]; print(a[\"0\"]);");
        assert!(err.to_string().contains("TypeError: index expected an int"));
        let err = run_err("print(5[0]);");
        assert!(err.to_string().contains("does not support indexing"));
        let err = run_err("\"abc\"[0] = \"x\";");
        assert!(err.to_string().contains("does not support item assignment"));
    }

    #[test]
    fn dict_key_errors() {
        let err = run_err(r#"let d = {}; print(d["missing"]);"#);
        assert!(err.to_string().contains("KeyError: \"missing\""));
        let err = run_err("let d = {}; d[[1]] = 2;");
        assert!(err.to_string().contains("unhashable dict key of type list"));
        let err = run_err("let d = {[1]: 2};");
        assert!(err.to_string().contains("unhashable dict key of type list"));
    }

    #[test]
    fn callee_evaluates_before_arguments() {
        let (result, output) = run_capture(r#"missing(print("side"));"#, "");
        let err = result.expect_err("expected name error");
        assert!(matches!(err, RuntimeError::UndefinedVariable { ref name, .. } if name == "missing"));
        assert_eq!(output, "");
    }

    #[test]
    fn arity_mismatches() {
        let err = run_err("fn f(a) { } f();");
        assert_eq!(
            err.to_string(),
            "ArityError: f expected 1 argument(s), got 0 (1:13)"
        );
        let err = run_err("abs(1, 2);");
        assert!(err.to_string().contains("ArityError: abs"));
        let err = run_err("[1].push();");
        assert!(err.to_string().contains("ArityError: list.push"));
    }

    #[test]
    fn calling_a_non_callable_fails() {
        let err = run_err("let x = 1; x();");
        assert!(err.to_string().contains("TypeError: value of type int is not callable"));
    }

    #[test]
    fn function_without_return_yields_null() {
        let src = indoc! {r#"
            fn nothing() { }
            fn early() { return; }
            print(nothing(), early());
        "#};
        assert_eq!(run(src), "null null\n");
    }

    #[test]
    fn print_formats_values() {
        let src = indoc! {r#"
            print(1, 2.0, "raw", true, null);
            print([1, "a", [true]], {"k": 1.5});
            print(div(1.0, 2));
        "#};
        assert_eq!(
            run(src),
            "1 2.0 raw true null\n[1, \"a\", [true]] {\"k\": 1.5}\n0.5\n"
        );
    }

    #[test]
    fn and_or_evaluate_both_operands() {
        let src = indoc! {r#"
            fn loud(v) { print("evaluated"); return v; }
            print(or(true, loud(false)));
        "#};
        assert_eq!(run(src), "evaluated\ntrue\n");
    }

    #[test]
    fn input_reads_lines_and_strips_newline() {
        let (result, output) = run_capture(
            indoc! {r#"
                let name = input();
                print(name.upper());
                let second = input("? ");
                print(second);
            "#},
            "rocket\nagain\n",
        );
        result.expect("program should succeed");
        assert_eq!(output, "ROCKET\n? again\n");
    }

    #[test]
    fn input_at_end_of_stream_is_a_value_error() {
        let (result, _) = run_capture("input();", "");
        let err = result.expect_err("expected value error");
        assert!(err.to_string().contains("ValueError: unexpected end of input"));
    }

    #[test]
    fn string_methods_compose() {
        let src = indoc! {r#"
            let parts = "a,b,c".split(",");
            print(parts.length(), parts[2]);
            print("Hello".lower().replace("l", ""));
        "#};
        assert_eq!(run(src), "3 c\nheo\n");
    }

    #[test]
    fn len_builtin_counts_all_container_kinds() {
        let src = indoc! {r#"
            print(len([1, 2]), len({"a": 1}), len("héllo"), len(range(4)));
        "#};
        assert_eq!(run(src), "2 1 5 4\n");
    }

    #[test]
    fn format_builtin_is_reachable_from_programs() {
        assert_eq!(
            run(r#"print(format("{}: {}", "n", add(1, 1)));"#),
            "n: 2\n"
        );
    }

    #[test]
    fn else_if_chains_pick_the_first_truthy_branch() {
        let src = indoc! {r#"
            fn describe(n) {
                if (lt(n, 0)) { return "negative"; }
                else if (eq(n, 0)) { return "zero"; }
                else { return "positive"; }
            }
            print(describe(-1), describe(0), describe(3));
        "#};
        assert_eq!(run(src), "negative zero positive\n");
    }

    #[test]
    fn runtime_errors_carry_positions() {
        let err = run_err("let x = 1;\nprint(missing);");
        assert!(err.to_string().contains("(2:7)"));
    }
}
