// mallet-core - Environment frames for lexical scoping
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Environment frames for variable bindings with lexical scoping.
//!
//! Frames live in an [`EnvArena`] and are addressed by [`FrameId`] handles.
//! Closures capture a handle, not the frame, so a frame may be shared by any
//! number of closures and by its child frames. Reclaiming frames is the job
//! of [`EnvArena::collect`], a mark-and-sweep pass run from explicit roots.
//!
//! # Examples
//!
//! ```
//! use mallet_core::EnvArena;
//! use mallet_parser::{MalletVal, Symbol};
//!
//! let mut arena = EnvArena::new();
//! let root = arena.alloc(None);
//! arena.set(root, Symbol::new("x"), MalletVal::int(42)).unwrap();
//!
//! // A child frame sees its parent's bindings
//! let child = arena.alloc(Some(root));
//! assert_eq!(arena.get(child, &Symbol::new("x")).unwrap(), MalletVal::int(42));
//!
//! // ...and can shadow them without touching the parent
//! arena.set(child, Symbol::new("x"), MalletVal::int(100)).unwrap();
//! assert_eq!(arena.get(root, &Symbol::new("x")).unwrap(), MalletVal::int(42));
//! ```

use std::collections::{HashMap, HashSet};

use mallet_parser::{FrameId, MalletVal, Symbol};
use tracing::debug;

use crate::error::{AritySpec, Error, Result};

/// One scope: its own bindings plus an optional enclosing frame.
#[derive(Debug, Default)]
pub struct Frame {
    bindings: HashMap<Symbol, MalletVal>,
    outer: Option<FrameId>,
}

impl Frame {
    pub fn outer(&self) -> Option<FrameId> {
        self.outer
    }

    /// Look up a binding in this frame only.
    pub fn lookup_local(&self, sym: &Symbol) -> Option<&MalletVal> {
        self.bindings.get(sym)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    frame: Option<Frame>,
}

/// Owner of every environment frame in an interpreter session.
#[derive(Debug, Default)]
pub struct EnvArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl EnvArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an empty frame enclosed by `outer`.
    pub fn alloc(&mut self, outer: Option<FrameId>) -> FrameId {
        let frame = Frame {
            bindings: HashMap::new(),
            outer,
        };
        self.live += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.frame = Some(frame);
            return FrameId::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            frame: Some(frame),
        });
        FrameId::new(index, 0)
    }

    /// Allocate a frame enclosed by `outer` binding each parameter to the
    /// argument at the same position.
    pub fn bind(&mut self, outer: FrameId, params: &[Symbol], args: Vec<MalletVal>) -> Result<FrameId> {
        if params.len() != args.len() {
            return Err(Error::ArityError {
                expected: AritySpec::Exact(params.len()),
                got: args.len(),
                name: None,
            });
        }
        // Validate before allocating so a stale outer never leaks a slot
        self.frame(outer)?;

        let id = self.alloc(Some(outer));
        let frame = self.frame_mut(id)?;
        for (param, arg) in params.iter().zip(args) {
            frame.bindings.insert(param.clone(), arg);
        }
        Ok(id)
    }

    /// Bind `sym` in `id` itself, replacing any existing binding there.
    pub fn set(&mut self, id: FrameId, sym: Symbol, val: MalletVal) -> Result<()> {
        self.frame_mut(id)?.bindings.insert(sym, val);
        Ok(())
    }

    /// Find the nearest frame, starting at `id` and following outer links,
    /// that binds `sym`.
    pub fn find(&self, id: FrameId, sym: &Symbol) -> Result<Option<FrameId>> {
        let mut current = Some(id);
        while let Some(frame_id) = current {
            let frame = self.frame(frame_id)?;
            if frame.bindings.contains_key(sym) {
                return Ok(Some(frame_id));
            }
            current = frame.outer;
        }
        Ok(None)
    }

    /// Resolve `sym` through the chain starting at `id`.
    pub fn get(&self, id: FrameId, sym: &Symbol) -> Result<MalletVal> {
        let mut current = Some(id);
        while let Some(frame_id) = current {
            let frame = self.frame(frame_id)?;
            if let Some(val) = frame.bindings.get(sym) {
                return Ok(val.clone());
            }
            current = frame.outer;
        }
        Err(Error::SymbolNotFound(sym.clone()))
    }

    pub fn frame(&self, id: FrameId) -> Result<&Frame> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.frame.as_ref())
            .ok_or(Error::StaleFrame)
    }

    fn frame_mut(&mut self, id: FrameId) -> Result<&mut Frame> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.frame.as_mut())
            .ok_or(Error::StaleFrame)
    }

    /// True when `id` still refers to a live frame.
    pub fn contains(&self, id: FrameId) -> bool {
        self.frame(id).is_ok()
    }

    /// Number of frames currently allocated.
    pub fn live_frames(&self) -> usize {
        self.live
    }

    /// Free every frame not reachable from `roots`. Returns the number of
    /// frames freed.
    ///
    /// Reachability follows outer links and the values bound in each frame:
    /// closures keep their captured frame alive, and atoms and sequences are
    /// traced through their contents.
    pub fn collect(&mut self, roots: &[FrameId]) -> usize {
        self.collect_from(roots, &[])
    }

    /// Like [`collect`](Self::collect), with extra root values that are not
    /// bound in any frame (arguments and expressions still in use).
    pub fn collect_from(&mut self, roots: &[FrameId], values: &[MalletVal]) -> usize {
        let marked = self.mark(roots, values);

        let mut freed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.frame.is_some() && !marked[index] {
                slot.frame = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
                freed += 1;
            }
        }
        self.live -= freed;

        debug!(freed, live = self.live, "collected environment frames");
        freed
    }

    fn mark(&self, roots: &[FrameId], root_values: &[MalletVal]) -> Vec<bool> {
        let mut marked = vec![false; self.slots.len()];
        let mut frames: Vec<FrameId> = roots.to_vec();
        let mut values: Vec<MalletVal> = root_values.to_vec();
        let mut seen_atoms: HashSet<usize> = HashSet::new();

        loop {
            while let Some(val) = values.pop() {
                match val {
                    MalletVal::Fn(f) => {
                        frames.push(f.env());
                        // Built code can embed function values in a body
                        values.extend(f.body().iter().cloned());
                    }
                    MalletVal::Atom(a) => {
                        if seen_atoms.insert(a.addr()) {
                            values.push(a.deref());
                        }
                    }
                    MalletVal::List(items) | MalletVal::Vector(items) | MalletVal::Map(items) => {
                        values.extend(items.iter().cloned());
                    }
                    _ => {}
                }
            }

            let Some(id) = frames.pop() else {
                break;
            };
            let Ok(frame) = self.frame(id) else {
                continue;
            };
            if marked[id.index()] {
                continue;
            }
            marked[id.index()] = true;

            if let Some(outer) = frame.outer {
                frames.push(outer);
            }
            values.extend(frame.bindings.values().cloned());
        }
        marked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Symbol {
        Symbol::new(name)
    }

    #[test]
    fn test_lookup_through_chain() {
        let mut arena = EnvArena::new();
        let root = arena.alloc(None);
        arena.set(root, sym("a"), MalletVal::int(1)).unwrap();
        let mid = arena.alloc(Some(root));
        let leaf = arena.alloc(Some(mid));

        assert_eq!(arena.get(leaf, &sym("a")).unwrap(), MalletVal::int(1));
        assert_eq!(arena.find(leaf, &sym("a")).unwrap(), Some(root));
        assert_eq!(arena.find(leaf, &sym("zz")).unwrap(), None);
    }

    #[test]
    fn test_missing_symbol() {
        let mut arena = EnvArena::new();
        let root = arena.alloc(None);
        let err = arena.get(root, &sym("nope")).unwrap_err();
        assert!(matches!(err, Error::SymbolNotFound(s) if s.name() == "nope"));
    }

    #[test]
    fn test_set_overwrites_local_only() {
        let mut arena = EnvArena::new();
        let root = arena.alloc(None);
        arena.set(root, sym("x"), MalletVal::int(1)).unwrap();
        let child = arena.alloc(Some(root));
        arena.set(child, sym("x"), MalletVal::int(2)).unwrap();
        arena.set(child, sym("x"), MalletVal::int(3)).unwrap();

        assert_eq!(arena.get(child, &sym("x")).unwrap(), MalletVal::int(3));
        assert_eq!(arena.get(root, &sym("x")).unwrap(), MalletVal::int(1));
        assert_eq!(arena.frame(child).unwrap().len(), 1);
    }

    #[test]
    fn test_bind_pairs_params_and_args() {
        let mut arena = EnvArena::new();
        let root = arena.alloc(None);
        let f = arena
            .bind(root, &[sym("a"), sym("b")], vec![MalletVal::int(1), MalletVal::int(2)])
            .unwrap();
        assert_eq!(arena.get(f, &sym("b")).unwrap(), MalletVal::int(2));
        assert_eq!(arena.frame(f).unwrap().outer(), Some(root));
    }

    #[test]
    fn test_bind_arity_mismatch() {
        let mut arena = EnvArena::new();
        let root = arena.alloc(None);
        let err = arena.bind(root, &[sym("a")], vec![]).unwrap_err();
        assert!(matches!(
            err,
            Error::ArityError {
                expected: AritySpec::Exact(1),
                got: 0,
                ..
            }
        ));
        assert_eq!(arena.live_frames(), 1);
    }

    #[test]
    fn test_collect_frees_unreachable() {
        let mut arena = EnvArena::new();
        let root = arena.alloc(None);
        let orphan = arena.alloc(Some(root));
        assert_eq!(arena.live_frames(), 2);

        assert_eq!(arena.collect(&[root]), 1);
        assert_eq!(arena.live_frames(), 1);
        assert!(!arena.contains(orphan));
        assert!(matches!(arena.get(orphan, &sym("x")), Err(Error::StaleFrame)));
    }

    #[test]
    fn test_recycled_slot_rejects_old_handle() {
        let mut arena = EnvArena::new();
        let root = arena.alloc(None);
        let old = arena.alloc(Some(root));
        arena.collect(&[root]);
        let new = arena.alloc(Some(root));

        assert_eq!(old.index(), new.index());
        assert_ne!(old.generation(), new.generation());
        assert!(arena.set(old, sym("x"), MalletVal::Nil).is_err());
        assert!(arena.contains(new));
    }

    #[test]
    fn test_closure_keeps_frame_alive() {
        use mallet_parser::MalletFn;

        let mut arena = EnvArena::new();
        let root = arena.alloc(None);
        let captured = arena.alloc(Some(root));
        arena.set(captured, sym("n"), MalletVal::int(7)).unwrap();
        let f = MalletFn::new(vec![], vec![MalletVal::Symbol(sym("n"))], captured);
        arena.set(root, sym("f"), MalletVal::Fn(f)).unwrap();

        assert_eq!(arena.collect(&[root]), 0);
        assert_eq!(arena.get(captured, &sym("n")).unwrap(), MalletVal::int(7));
    }

    #[test]
    fn test_atom_contents_are_traced() {
        use mallet_parser::MalletFn;

        let mut arena = EnvArena::new();
        let root = arena.alloc(None);
        let captured = arena.alloc(Some(root));
        let f = MalletVal::Fn(MalletFn::new(vec![], vec![], captured));
        let cell = MalletVal::atom(MalletVal::vector(vec![f]));
        arena.set(root, sym("cell"), cell).unwrap();

        assert_eq!(arena.collect(&[root]), 0);
        assert!(arena.contains(captured));
    }

    #[test]
    fn test_collect_from_root_values() {
        use mallet_parser::MalletFn;

        let mut arena = EnvArena::new();
        let root = arena.alloc(None);
        let held = arena.alloc(Some(root));
        let dropped = arena.alloc(Some(root));
        let args = [MalletVal::list(vec![MalletVal::Fn(MalletFn::new(vec![], vec![], held))])];

        assert_eq!(arena.collect_from(&[root], &args), 1);
        assert!(arena.contains(held));
        assert!(!arena.contains(dropped));
    }

    #[test]
    fn test_self_referential_atom_terminates() {
        let mut arena = EnvArena::new();
        let root = arena.alloc(None);
        let cell = MalletVal::atom(MalletVal::Nil);
        if let MalletVal::Atom(a) = &cell {
            a.reset(cell.clone());
        }
        arena.set(root, sym("cell"), cell).unwrap();
        assert_eq!(arena.collect(&[root]), 0);
    }
}
