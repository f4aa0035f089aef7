//! Killer-move table: depth -> up to two actions that recently produced a
//! cutoff at that depth, promoted to the front of move ordering the next
//! time the same depth is searched.

use std::collections::HashMap;

const MAX_KILLERS_PER_DEPTH: usize = 2;

pub struct KillerTable<M> {
    by_depth: HashMap<u32, Vec<M>>,
}

impl<M: Copy + Eq> KillerTable<M> {
    pub fn new() -> Self {
        KillerTable { by_depth: HashMap::new() }
    }

    pub fn get(&self, depth: u32) -> &[M] {
        self.by_depth.get(&depth).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn push(&mut self, depth: u32, action: M) {
        let killers = self.by_depth.entry(depth).or_default();
        if killers.contains(&action) {
            return;
        }
        killers.insert(0, action);
        killers.truncate(MAX_KILLERS_PER_DEPTH);
    }

    pub fn clear(&mut self) {
        self.by_depth.clear();
    }
}

impl<M: Copy + Eq> Default for KillerTable<M> {
    fn default() -> Self {
        Self::new()
    }
}
