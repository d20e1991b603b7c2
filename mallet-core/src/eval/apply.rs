// mallet-core - Function application
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Function application for mallet.

use std::any::Any;
use std::rc::Rc;

use mallet_parser::{MalletNativeFn, MalletVal};

use crate::error::{Error, Result};
use crate::interpreter::Interpreter;

/// Type alias for native function signature.
pub type NativeFnImpl = dyn Fn(&mut Interpreter, &[MalletVal]) -> Result<MalletVal>;

impl Interpreter {
    /// Apply a function to already-evaluated arguments.
    ///
    /// Closure bodies run through the trampoline, so tail calls inside them
    /// do not grow the native stack.
    pub fn apply(&mut self, func: &MalletVal, args: Vec<MalletVal>) -> Result<MalletVal> {
        match func {
            MalletVal::NativeFn(f) => apply_native(self, f, &args),
            MalletVal::Fn(f) => self.with_rooted([func.clone()], |interp| {
                let fn_env = interp.arena.bind(f.env(), f.params(), args)?;
                interp.eval_body(f.body(), fn_env)
            }),
            other => Err(Error::NotApplicable(other.to_string())),
        }
    }
}

/// Apply a native function.
pub(crate) fn apply_native(
    interp: &mut Interpreter,
    func: &MalletNativeFn,
    args: &[MalletVal],
) -> Result<MalletVal> {
    let f = func
        .func()
        .downcast_ref::<Rc<NativeFnImpl>>()
        .ok_or_else(|| Error::Internal("Native function has invalid type".into()))?
        .clone();
    interp.with_rooted(args.iter().cloned(), |interp| f(interp, args))
}

/// Create a native function value.
pub fn make_native_fn(
    name: &'static str,
    func: impl Fn(&mut Interpreter, &[MalletVal]) -> Result<MalletVal> + 'static,
) -> MalletNativeFn {
    let func_rc: Rc<NativeFnImpl> = Rc::new(func);
    let func_any: Rc<dyn Any> = Rc::new(func_rc);
    MalletNativeFn::new(name, func_any)
}
