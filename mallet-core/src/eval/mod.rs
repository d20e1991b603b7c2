// mallet-core - Trampolined evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Evaluator for mallet expressions.
//!
//! `Interpreter::eval` runs a loop over an (expression, environment) pair.
//! Special forms in tail position and closure application reassign the pair
//! and go round again instead of recursing, so tail calls run in constant
//! native stack. Only genuinely nested evaluation (arguments, conditions,
//! non-final body forms) recurses, and that is bounded by
//! `InterpreterConfig::max_eval_depth`. Nested calls run on a stack that
//! grows on demand, so the bound holds whatever the host thread's stack size.
//!
//! Frames may be collected at every closure tail call. Each active `eval`
//! keeps its environment and expression rooted, and evaluated values not
//! yet bound sit on the interpreter's pending stack.

pub mod apply;
pub mod special_forms;

pub use apply::{NativeFnImpl, make_native_fn};

use mallet_parser::{FrameId, MalletVal};
use tracing::trace;

use crate::error::{Error, Result};
use crate::interpreter::Interpreter;

use apply::apply_native;
use special_forms::SpecialForm;

/// Grow the stack when less than this remains.
const STACK_RED_ZONE: usize = 1024 * 1024;

/// Size of each stack segment allocated on growth.
const STACK_SEGMENT: usize = 8 * 1024 * 1024;

/// Outcome of one evaluation step.
pub(crate) enum Step {
    /// Evaluation finished with this value
    Return(MalletVal),
    /// Continue the loop with a new expression and environment
    TailCall(MalletVal, FrameId),
}

impl Interpreter {
    /// Evaluate `expr` in the environment `env`.
    pub fn eval(&mut self, expr: &MalletVal, env: FrameId) -> Result<MalletVal> {
        self.enter(expr.clone(), env)?;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
            self.eval_loop(expr.clone(), env)
        });
        self.leave();
        result
    }

    fn eval_loop(&mut self, mut expr: MalletVal, mut env: FrameId) -> Result<MalletVal> {
        loop {
            let items = match &expr {
                MalletVal::List(items) if !items.is_empty() => items.clone(),
                _ => return self.eval_structural(&expr, env),
            };

            if let Some(MalletVal::Symbol(head)) = items.front()
                && let Some(form) = SpecialForm::from_symbol(head)
            {
                let args: Vec<MalletVal> = items.iter().skip(1).cloned().collect();
                match self.eval_special_form(form, &args, env)? {
                    Step::Return(val) => return Ok(val),
                    Step::TailCall(next, next_env) => {
                        trace!(form = form.name(), "tail call");
                        self.retarget(next_env, next.clone());
                        expr = next;
                        env = next_env;
                        continue;
                    }
                }
            }

            let mut evaluated = self.eval_each(&items, env)?.into_iter();
            let Some(func) = evaluated.next() else {
                return Err(Error::Internal("empty application form".into()));
            };
            let args: Vec<MalletVal> = evaluated.collect();
            match func {
                MalletVal::NativeFn(f) => return apply_native(self, &f, &args),
                MalletVal::Fn(f) => {
                    let fn_env = self.arena.bind(f.env(), f.params(), args)?;
                    // Root the closure itself while its body runs
                    self.retarget(fn_env, MalletVal::Fn(f.clone()));
                    self.maybe_collect();

                    let Some((last, init)) = f.body().split_last() else {
                        return Ok(MalletVal::Nil);
                    };
                    for form in init {
                        self.eval(form, fn_env)?;
                    }
                    trace!("tail call into closure");
                    expr = last.clone();
                    env = fn_env;
                    self.retarget(env, expr.clone());
                }
                other => return Err(Error::NotApplicable(other.to_string())),
            }
        }
    }

    /// Evaluate a non-list (or empty list) expression: symbols are looked
    /// up, vectors and maps evaluate their contents, everything else is
    /// returned as is.
    fn eval_structural(&mut self, expr: &MalletVal, env: FrameId) -> Result<MalletVal> {
        match expr {
            MalletVal::Symbol(sym) => self.arena.get(env, sym),
            MalletVal::Vector(items) => Ok(MalletVal::vector(self.eval_each(items, env)?)),
            MalletVal::Map(flat) => {
                // Keys stay verbatim, values are evaluated
                let values = self.eval_each(flat.iter().skip(1).step_by(2), env)?;
                let out = flat
                    .iter()
                    .step_by(2)
                    .zip(values)
                    .flat_map(|(k, v)| [k.clone(), v])
                    .collect();
                Ok(MalletVal::Map(out))
            }
            _ => Ok(expr.clone()),
        }
    }

    /// Evaluate forms in order, returning the value of the last (Nil for
    /// none). Used where the last form is not in tail position.
    pub(crate) fn eval_body(&mut self, body: &[MalletVal], env: FrameId) -> Result<MalletVal> {
        let mut result = MalletVal::Nil;
        for form in body {
            result = self.eval(form, env)?;
        }
        Ok(result)
    }
}
