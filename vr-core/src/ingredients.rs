//! Ingredient set algebra
//!
//! Computes a swarm's new ingredient list from its current list and the
//! operator's add/remove/replace request. Ingredients are compared by resource
//! URI.

use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngredientError {
    #[error("can't add and remove the same ingredients during a single run: {}", .0.join(", "))]
    Overlap(Vec<String>),

    #[error("replacing ingredients is mutually exclusive with adding or removing them")]
    Exclusive,
}

/// Keep `current` in order, append new members of `add`, then drop `remove`.
///
/// `add` is only de-duplicated against `current`, not against itself.
pub fn assemble<S: AsRef<str>>(
    current: &[S],
    add: &[S],
    remove: &[S],
) -> Result<Vec<String>, IngredientError> {
    check_disjoint(add, remove)?;

    let mut assembled: Vec<String> = current.iter().map(|s| s.as_ref().to_string()).collect();
    for item in add {
        let item = item.as_ref();
        if !current.iter().any(|c| c.as_ref() == item) {
            assembled.push(item.to_string());
        }
    }
    assembled.retain(|item| !remove.iter().any(|r| r.as_ref() == item.as_str()));
    Ok(assembled)
}

/// Fails with [`IngredientError::Overlap`] when `add` and `remove` share members.
///
/// Shared members are listed once each, in the order they first appear in `add`.
pub fn check_disjoint<S: AsRef<str>>(add: &[S], remove: &[S]) -> Result<(), IngredientError> {
    let mut seen = HashSet::new();
    let shared: Vec<String> = add
        .iter()
        .map(|a| a.as_ref())
        .filter(|a: &&str| remove.iter().any(|r| r.as_ref() == *a))
        .filter(|a| seen.insert(*a))
        .map(str::to_string)
        .collect();
    if shared.is_empty() {
        Ok(())
    } else {
        Err(IngredientError::Overlap(shared))
    }
}

/// What the operator asked to do with ingredient lists
///
/// Generic over the ingredient representation so the same shape carries raw
/// command-line tokens and resolved resource URIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientEdit<T> {
    Unchanged,
    Modify { add: Vec<T>, remove: Vec<T> },
    Replace(Vec<T>),
}

impl<T> IngredientEdit<T> {
    /// Validate the three ingredient flags together.
    pub fn from_flags(add: Vec<T>, remove: Vec<T>, replace: Vec<T>) -> Result<Self, IngredientError> {
        match (add.is_empty() && remove.is_empty(), replace.is_empty()) {
            (false, false) => Err(IngredientError::Exclusive),
            (true, false) => Ok(IngredientEdit::Replace(replace)),
            (false, true) => Ok(IngredientEdit::Modify { add, remove }),
            (true, true) => Ok(IngredientEdit::Unchanged),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, IngredientEdit::Unchanged)
    }
}

impl<T> Default for IngredientEdit<T> {
    fn default() -> Self {
        IngredientEdit::Unchanged
    }
}

impl<T: AsRef<str>> IngredientEdit<T> {
    /// New ingredient list for one swarm, or `None` when it stays as is.
    pub fn apply(&self, current: &[String]) -> Result<Option<Vec<String>>, IngredientError> {
        match self {
            IngredientEdit::Unchanged => Ok(None),
            IngredientEdit::Replace(list) => {
                Ok(Some(list.iter().map(|s| s.as_ref().to_string()).collect()))
            }
            IngredientEdit::Modify { add, remove } => {
                let add: Vec<String> = add.iter().map(|s| s.as_ref().to_string()).collect();
                let remove: Vec<String> = remove.iter().map(|s| s.as_ref().to_string()).collect();
                assemble(current, &add, &remove).map(Some)
            }
        }
    }
}
