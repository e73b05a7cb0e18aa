//! Token value resolution.
//!
//! Each token follows its reference chain, falls back to the overlay and then
//! the literal value, and finally runs its transforms. A chain that loops back
//! onto itself contributes an empty value at the point the loop is detected.
//! Chains are walked iteratively and resolved values are memoized per run, so
//! a result never depends on which token was resolved first.

use crate::token::{Token, TokenStore};
use crate::transform::TransformRegistry;
use serde::Serialize;
use std::collections::HashSet;

/// A token with its final value, ready for substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedToken {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<String>>,
    pub priority: i64,
}

impl ResolvedToken {
    #[must_use]
    pub fn is_scoped(&self) -> bool {
        self.scope.is_some()
    }
}

/// Resolves every token in the store and returns them in replacement order:
/// descending priority, ties kept in declaration order.
#[must_use]
pub fn resolve_all(store: &TokenStore, registry: &TransformRegistry) -> Vec<ResolvedToken> {
    let mut resolver = Resolver::new(store, registry);
    let mut resolved: Vec<ResolvedToken> = store
        .tokens()
        .iter()
        .enumerate()
        .map(|(position, token)| {
            let value = resolver.value_of(position);
            tracing::debug!(token = %token.name, value = %value, "resolved token");
            ResolvedToken {
                name: token.name.clone(),
                value,
                scope: token.scope.clone(),
                priority: token.priority,
            }
        })
        .collect();

    // stable, so equal priorities keep declaration order
    resolved.sort_by(|a, b| b.priority.cmp(&a.priority));
    resolved
}

/// Resolves a single token by name, or `None` if no such token exists
#[must_use]
pub fn resolve_one(store: &TokenStore, registry: &TransformRegistry, name: &str) -> Option<String> {
    let position = store.position(name)?;
    Some(Resolver::new(store, registry).value_of(position))
}

// How a reference chain stopped being followed
enum ChainEnd {
    /// Missing reference, unknown target, or an already resolved target
    Inherit(Option<String>),
    /// The chain points back at the token at this chain index
    Cycle(usize),
}

struct Resolver<'a> {
    store: &'a TokenStore,
    registry: &'a TransformRegistry,
    // values whose result does not depend on where resolution started
    memo: Vec<Option<String>>,
    // members of a detected reference cycle
    cyclic: Vec<bool>,
}

impl<'a> Resolver<'a> {
    fn new(store: &'a TokenStore, registry: &'a TransformRegistry) -> Self {
        Self {
            store,
            registry,
            memo: vec![None; store.len()],
            cyclic: vec![false; store.len()],
        }
    }

    fn value_of(&mut self, start: usize) -> String {
        if let Some(value) = &self.memo[start] {
            return value.clone();
        }

        // A cached cycle member holds the value seen when entering the cycle
        // at that member, which is wrong for walks starting inside the cycle.
        let use_memo = !self.cyclic[start];

        // each token has at most one reference, so the chain is a simple path
        let mut chain = vec![start];
        let mut on_chain = HashSet::from([start]);
        let end = loop {
            let token = &self.store.tokens()[chain[chain.len() - 1]];
            let Some(reference) = token.reference.as_deref() else {
                break ChainEnd::Inherit(None);
            };
            let Some(target) = self.store.position(reference) else {
                tracing::debug!(token = %token.name, reference, "reference not found");
                break ChainEnd::Inherit(None);
            };
            if use_memo && let Some(value) = &self.memo[target] {
                break ChainEnd::Inherit(Some(value.clone()));
            }
            if on_chain.contains(&target) {
                tracing::warn!(token = %token.name, reference, "reference cycle detected");
                let index = chain.iter().position(|&p| p == target).unwrap_or(0);
                break ChainEnd::Cycle(index);
            }
            chain.push(target);
            on_chain.insert(target);
        };

        // Tokens after the cycle entry would see the cycle at a different
        // point when resolved on their own, so only earlier ones are cached.
        let (mut inherited, cacheable) = match end {
            ChainEnd::Inherit(value) => (value, chain.len()),
            ChainEnd::Cycle(index) => {
                for &member in &chain[index..] {
                    self.cyclic[member] = true;
                }
                (None, index + 1)
            }
        };

        for (index, &position) in chain.iter().enumerate().rev() {
            let value = self.finish(position, inherited.take());
            if index < cacheable {
                self.memo[position] = Some(value.clone());
            }
            inherited = Some(value);
        }

        inherited.unwrap_or_default()
    }

    // Picks the first non-empty of inherited value, overlay and literal, then
    // runs the token's transforms.
    fn finish(&self, position: usize, inherited: Option<String>) -> String {
        let token: &Token = &self.store.tokens()[position];

        let base = inherited
            .filter(|value| !value.is_empty())
            .or_else(|| {
                self.store
                    .overlay_value(token.overlay_key())
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| token.literal_value.clone());

        self.registry.apply_all(token.transforms.as_slice(), &base)
    }
}
