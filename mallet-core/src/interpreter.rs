// mallet-core - Interpreter session
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The interpreter session: frame arena, root environment, configuration and
//! the collaborators primitives reach for (output sink and file reader).
//!
//! Every evaluation entry point takes `&mut Interpreter`; there is no global
//! interpreter state.

use std::io::{self, Write};

use mallet_parser::{FrameId, MalletVal, Parser, Symbol};
use tracing::{debug, trace};

use crate::builtins::register_builtins;
use crate::env::EnvArena;
use crate::error::{Error, Result};
use crate::eval::make_native_fn;

/// Default bound on nested (non-tail) evaluation.
pub const DEFAULT_MAX_EVAL_DEPTH: usize = 2_000;

/// Default live-frame count that triggers the first collection.
pub const DEFAULT_GC_THRESHOLD: usize = 10_000;

/// Definitions written in mallet itself, evaluated once per session.
const PRELUDE: &str = r#"
(def! load-file (fn* (f) (eval (read-string (str "(do " (slurp f) "\nnil)")))))
"#;

/// Tunable limits for an interpreter session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Deepest nesting of non-tail evaluation before `Error::RecursionLimit`
    pub max_eval_depth: usize,
    /// Live frames tolerated before a top-level collection runs
    pub gc_threshold: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_eval_depth: DEFAULT_MAX_EVAL_DEPTH,
            gc_threshold: DEFAULT_GC_THRESHOLD,
        }
    }
}

impl InterpreterConfig {
    #[must_use]
    pub fn with_max_eval_depth(mut self, depth: usize) -> Self {
        self.max_eval_depth = depth;
        self
    }

    #[must_use]
    pub fn with_gc_threshold(mut self, threshold: usize) -> Self {
        self.gc_threshold = threshold;
        self
    }
}

/// Source of file contents for `slurp`.
pub trait SourceReader {
    fn read_to_string(&self, path: &str) -> io::Result<String>;
}

/// Reads files from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn read_to_string(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// An `eval` call in progress: the frame it runs in and the expression (or
/// closure) it is working through.
#[derive(Debug)]
struct ActiveEval {
    env: FrameId,
    held: MalletVal,
}

/// An interpreter session.
///
/// # Examples
///
/// ```
/// use mallet_core::Interpreter;
/// use mallet_parser::MalletVal;
///
/// let mut interp = Interpreter::new().unwrap();
/// interp.eval_str("(def! inc (fn* (x) (+ x 1)))").unwrap();
/// assert_eq!(interp.eval_str("(inc 41)").unwrap(), MalletVal::int(42));
/// ```
pub struct Interpreter {
    pub(crate) arena: EnvArena,
    root: FrameId,
    config: InterpreterConfig,
    /// One entry per `eval` call in progress, innermost last
    active: Vec<ActiveEval>,
    /// Evaluated values not yet bound anywhere (arguments being built,
    /// arguments of a running native)
    pending: Vec<MalletVal>,
    next_gc: usize,
    output: Box<dyn Write>,
    reader: Box<dyn SourceReader>,
}

impl Interpreter {
    /// Create a session with the default configuration, writing to stdout.
    pub fn new() -> Result<Self> {
        Self::with_config(InterpreterConfig::default())
    }

    /// Create a session with the given limits.
    pub fn with_config(config: InterpreterConfig) -> Result<Self> {
        let mut arena = EnvArena::new();
        let root = arena.alloc(None);
        let next_gc = config.gc_threshold;

        let mut interp = Interpreter {
            arena,
            root,
            config,
            active: Vec::new(),
            pending: Vec::new(),
            next_gc,
            output: Box::new(io::stdout()),
            reader: Box::new(FsReader),
        };

        register_builtins(&mut interp)?;
        interp.set_argv(Vec::new())?;
        for form in Parser::parse_all_str(PRELUDE)? {
            interp.eval(&form, root)?;
        }
        Ok(interp)
    }

    /// Replace the sink that `prn` and `println` write to.
    #[must_use]
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Replace the file reader used by `slurp`.
    #[must_use]
    pub fn with_file_reader(mut self, reader: impl SourceReader + 'static) -> Self {
        self.reader = Box::new(reader);
        self
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// The session's root environment.
    pub fn root_env(&self) -> FrameId {
        self.root
    }

    pub fn arena(&self) -> &EnvArena {
        &self.arena
    }

    /// Bind `name` in the root environment.
    pub fn define(&mut self, name: &str, val: MalletVal) -> Result<()> {
        self.arena.set(self.root, Symbol::new(name), val)
    }

    /// Bind a native function under `name` in the root environment.
    pub fn define_native(
        &mut self,
        name: &'static str,
        func: impl Fn(&mut Interpreter, &[MalletVal]) -> Result<MalletVal> + 'static,
    ) -> Result<()> {
        self.define(name, MalletVal::NativeFn(make_native_fn(name, func)))
    }

    /// Bind `*ARGV*` to a list of the given strings.
    pub fn set_argv(&mut self, args: Vec<String>) -> Result<()> {
        let argv = args.into_iter().map(MalletVal::string).collect();
        self.define("*ARGV*", MalletVal::list(argv))
    }

    /// Evaluate one top-level form in the root environment.
    pub fn eval_top_level(&mut self, form: &MalletVal) -> Result<MalletVal> {
        self.maybe_collect();
        debug!(form = %form, "eval");
        let root = self.root;
        self.eval(form, root)
    }

    /// Read and evaluate every form in `source`, returning the last result
    /// (Nil when the source holds no forms).
    pub fn eval_str(&mut self, source: &str) -> Result<MalletVal> {
        let mut parser = Parser::new(source);
        let mut result = MalletVal::Nil;
        while let Some(form) = parser.parse()? {
            result = self.eval_top_level(&form)?;
        }
        Ok(result)
    }

    /// Read, evaluate and print: the readable form of the last result.
    pub fn rep(&mut self, source: &str) -> Result<String> {
        Ok(self.eval_str(source)?.printed(true).to_string())
    }

    /// Free every frame unreachable from the root environment or from an
    /// evaluation in progress. Returns the number of frames freed.
    ///
    /// Function values held outside the session (for example a closure
    /// returned by `eval_str`) are not roots; applying one whose frame was
    /// freed fails with `Error::StaleFrame`.
    pub fn collect_garbage(&mut self) -> usize {
        let mut frames = Vec::with_capacity(self.active.len() + 1);
        frames.push(self.root);
        let mut values = self.pending.clone();
        for active in &self.active {
            frames.push(active.env);
            values.push(active.held.clone());
        }

        let freed = self.arena.collect_from(&frames, &values);
        self.next_gc = self
            .config
            .gc_threshold
            .max(self.arena.live_frames().saturating_mul(2));
        freed
    }

    /// Collect once live frames pass the current threshold. Safe wherever
    /// every value still needed is bound, held by an active evaluation or
    /// pending.
    pub(crate) fn maybe_collect(&mut self) {
        if self.arena.live_frames() > self.next_gc {
            self.collect_garbage();
        }
    }

    /// Write `text` and a newline to the output sink.
    pub(crate) fn write_line(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)
            .and_then(|()| self.output.flush())
            .map_err(|e| Error::Io {
                path: "<output>".to_string(),
                message: e.to_string(),
            })
    }

    /// Read a whole file through the session's reader.
    pub(crate) fn read_source(&self, path: &str) -> Result<String> {
        trace!(path, "reading file");
        self.reader.read_to_string(path).map_err(|e| Error::Io {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Number of `eval` calls in progress.
    pub fn depth(&self) -> usize {
        self.active.len()
    }

    pub(crate) fn enter(&mut self, held: MalletVal, env: FrameId) -> Result<()> {
        if self.active.len() >= self.config.max_eval_depth {
            return Err(Error::RecursionLimit(self.config.max_eval_depth));
        }
        self.active.push(ActiveEval { env, held });
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.active.pop();
    }

    /// Point the innermost evaluation at a new environment and value after
    /// a tail call.
    pub(crate) fn retarget(&mut self, env: FrameId, held: MalletVal) {
        if let Some(active) = self.active.last_mut() {
            active.env = env;
            active.held = held;
        }
    }

    /// Keep `vals` reachable while `f` runs.
    pub(crate) fn with_rooted<T>(
        &mut self,
        vals: impl IntoIterator<Item = MalletVal>,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let base = self.pending.len();
        self.pending.extend(vals);
        let result = f(self);
        self.pending.truncate(base);
        result
    }

    /// Evaluate each of `items` in `env` in order, keeping every result
    /// rooted until all are done.
    pub(crate) fn eval_each<'a>(
        &mut self,
        items: impl IntoIterator<Item = &'a MalletVal>,
        env: FrameId,
    ) -> Result<Vec<MalletVal>> {
        let base = self.pending.len();
        for item in items {
            match self.eval(item, env) {
                Ok(val) => self.pending.push(val),
                Err(e) => {
                    self.pending.truncate(base);
                    return Err(e);
                }
            }
        }
        Ok(self.pending.split_off(base))
    }
}
