//! Bounded wildcards (`? extends T`, `? super T`) have no direct equivalent in
//! the target language; each one is bound to a synthetic type parameter of
//! its holder (`__T1`, `__T2`, ...).

use j2ts_common::conventions::WILDCARD_NAME_PREFIX;
use j2ts_common::{EntityId, Wildcard, WildcardBound, WildcardId};
use rustc_hash::FxHashMap;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardBinding {
    /// Declaration that receives the synthetic type parameter.
    pub holder: EntityId,
    pub wildcard: WildcardId,
    /// 1-based position in the holder's binding list.
    pub ordinal: usize,
    pub bound: WildcardBound,
}

impl WildcardBinding {
    pub fn name(&self) -> String {
        format!("{WILDCARD_NAME_PREFIX}{}", self.ordinal)
    }
}

#[derive(Debug, Default)]
pub struct WildcardBinder {
    bindings: FxHashMap<EntityId, Vec<WildcardBinding>>,
    names: FxHashMap<WildcardId, String>,
}

impl WildcardBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a wildcard to the next synthetic type parameter of `holder`.
    ///
    /// Unbounded wildcards are left alone and yield `None`. Registering the
    /// same wildcard again appends a new binding and renames it.
    pub fn register(&mut self, holder: EntityId, wildcard: &Wildcard) -> Option<String> {
        if wildcard.bound == WildcardBound::Unbounded {
            return None;
        }
        let list = self.bindings.entry(holder).or_default();
        let binding = WildcardBinding {
            holder,
            wildcard: wildcard.id,
            ordinal: list.len() + 1,
            bound: wildcard.bound,
        };
        let name = binding.name();
        trace!(holder = holder.0, wildcard = wildcard.id.0, name = %name, "wildcard bound");
        list.push(binding);
        self.names.insert(wildcard.id, name.clone());
        Some(name)
    }

    pub fn name_of(&self, wildcard: WildcardId) -> Option<&str> {
        self.names.get(&wildcard).map(String::as_str)
    }

    pub fn bindings_of(&self, holder: EntityId) -> &[WildcardBinding] {
        self.bindings.get(&holder).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
#[path = "../tests/wildcards.rs"]
mod tests;
