#![allow(dead_code)]
use std::fs;

use liftoff::ast::Program;
use liftoff::{lexer, parser};

pub const WORKLOADS: [(&str, &str); 2] = [
    ("fib", "tests/programs/bench_fib/program.rk"),
    ("loop_sum", "tests/programs/loop_sum/program.rk"),
];

pub fn workloads() -> [(&'static str, &'static str); 2] {
    WORKLOADS
}

pub fn load_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|err| panic!("read {path}: {err}"))
}

pub fn load_program(path: &str) -> Program {
    let source = load_source(path);
    let tokens = lexer::tokenize(&source).unwrap_or_else(|err| panic!("tokenize {path}: {err}"));
    parser::parse_tokens(tokens).unwrap_or_else(|err| panic!("parse {path}: {err}"))
}
