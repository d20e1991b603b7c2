// mallet-core - Special forms
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Special forms for the mallet evaluator.
//!
//! Each handler receives the form's arguments (everything after the head
//! symbol) and either finishes with a value or hands the evaluator an
//! expression to continue with in tail position.

use mallet_parser::{FrameId, MalletFn, MalletVal, Symbol};

use super::Step;
use crate::error::{Error, Result};
use crate::interpreter::Interpreter;
use crate::quasiquote::quasiquote;

/// The forms the evaluator handles itself rather than by application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialForm {
    Def,
    Let,
    Do,
    If,
    Fn,
    Quote,
    QuasiquoteExpand,
    Quasiquote,
}

impl SpecialForm {
    pub fn from_symbol(sym: &Symbol) -> Option<Self> {
        Some(match sym.name() {
            "def!" => SpecialForm::Def,
            "let*" => SpecialForm::Let,
            "do" => SpecialForm::Do,
            "if" => SpecialForm::If,
            "fn*" => SpecialForm::Fn,
            "quote" => SpecialForm::Quote,
            "quasiquoteexpand" => SpecialForm::QuasiquoteExpand,
            "quasiquote" => SpecialForm::Quasiquote,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            SpecialForm::Def => "def!",
            SpecialForm::Let => "let*",
            SpecialForm::Do => "do",
            SpecialForm::If => "if",
            SpecialForm::Fn => "fn*",
            SpecialForm::Quote => "quote",
            SpecialForm::QuasiquoteExpand => "quasiquoteexpand",
            SpecialForm::Quasiquote => "quasiquote",
        }
    }
}

impl Interpreter {
    pub(crate) fn eval_special_form(
        &mut self,
        form: SpecialForm,
        args: &[MalletVal],
        env: FrameId,
    ) -> Result<Step> {
        match form {
            SpecialForm::Def => self.eval_def(args, env),
            SpecialForm::Let => self.eval_let(args, env),
            SpecialForm::Do => self.eval_do(args, env),
            SpecialForm::If => self.eval_if(args, env),
            SpecialForm::Fn => eval_fn(args, env),
            SpecialForm::Quote => {
                let [quoted] = args else {
                    return Err(Error::syntax("quote", "requires exactly 1 argument"));
                };
                Ok(Step::Return(quoted.clone()))
            }
            SpecialForm::QuasiquoteExpand => {
                let [template] = args else {
                    return Err(Error::syntax("quasiquoteexpand", "requires exactly 1 argument"));
                };
                Ok(Step::Return(quasiquote(template)))
            }
            SpecialForm::Quasiquote => {
                let [template] = args else {
                    return Err(Error::syntax("quasiquote", "requires exactly 1 argument"));
                };
                Ok(Step::TailCall(quasiquote(template), env))
            }
        }
    }

    /// (def! name expr)
    fn eval_def(&mut self, args: &[MalletVal], env: FrameId) -> Result<Step> {
        let [name, expr] = args else {
            return Err(Error::syntax("def!", "requires a name and a value"));
        };
        let MalletVal::Symbol(sym) = name else {
            return Err(Error::syntax(
                "def!",
                format!("name must be a symbol, got {}", name.type_name()),
            ));
        };

        let val = self.eval(expr, env)?;
        self.arena.set(env, sym.clone(), val.clone())?;
        Ok(Step::Return(val))
    }

    /// (let* [name expr ...] body...)
    fn eval_let(&mut self, args: &[MalletVal], env: FrameId) -> Result<Step> {
        let Some((bindings, body)) = args.split_first() else {
            return Err(Error::syntax("let*", "requires a binding list"));
        };
        let Some(bindings) = bindings.as_seq() else {
            return Err(Error::syntax(
                "let*",
                format!("bindings must be a list or vector, got {}", bindings.type_name()),
            ));
        };
        if bindings.len() % 2 != 0 {
            return Err(Error::syntax("let*", "requires an even number of binding forms"));
        }

        let let_env = self.arena.alloc(Some(env));
        let pairs: Vec<MalletVal> = bindings.iter().cloned().collect();
        for pair in pairs.chunks(2) {
            let MalletVal::Symbol(sym) = &pair[0] else {
                return Err(Error::syntax(
                    "let*",
                    format!("binding name must be a symbol, got {}", pair[0].type_name()),
                ));
            };
            // Each binding is visible to the expressions after it
            let val = self.eval(&pair[1], let_env)?;
            self.arena.set(let_env, sym.clone(), val)?;
        }

        self.eval_tail_body(body, let_env)
    }

    /// (do forms...)
    fn eval_do(&mut self, args: &[MalletVal], env: FrameId) -> Result<Step> {
        self.eval_tail_body(args, env)
    }

    /// (if test then else?)
    fn eval_if(&mut self, args: &[MalletVal], env: FrameId) -> Result<Step> {
        if args.len() < 2 || args.len() > 3 {
            return Err(Error::syntax("if", "requires 2 or 3 arguments"));
        }

        let test = self.eval(&args[0], env)?;
        if test.is_truthy() {
            Ok(Step::TailCall(args[1].clone(), env))
        } else if let Some(otherwise) = args.get(2) {
            Ok(Step::TailCall(otherwise.clone(), env))
        } else {
            Ok(Step::Return(MalletVal::Nil))
        }
    }

    /// Evaluate all but the last form for effect and continue with the last.
    fn eval_tail_body(&mut self, body: &[MalletVal], env: FrameId) -> Result<Step> {
        let Some((last, init)) = body.split_last() else {
            return Ok(Step::Return(MalletVal::Nil));
        };
        for form in init {
            self.eval(form, env)?;
        }
        Ok(Step::TailCall(last.clone(), env))
    }
}

/// (fn* (params...) body...)
fn eval_fn(args: &[MalletVal], env: FrameId) -> Result<Step> {
    let Some((params, body)) = args.split_first() else {
        return Err(Error::syntax("fn*", "requires a parameter list"));
    };
    let Some(params) = params.as_seq() else {
        return Err(Error::syntax(
            "fn*",
            format!("parameters must be a list or vector, got {}", params.type_name()),
        ));
    };

    let params = params
        .iter()
        .map(|p| match p {
            MalletVal::Symbol(sym) => Ok(sym.clone()),
            other => Err(Error::syntax(
                "fn*",
                format!("parameter must be a symbol, got {}", other.type_name()),
            )),
        })
        .collect::<Result<Vec<Symbol>>>()?;

    Ok(Step::Return(MalletVal::Fn(MalletFn::new(
        params,
        body.to_vec(),
        env,
    ))))
}
