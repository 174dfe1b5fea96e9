use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::cursor::{signed, Cursor};
use crate::error::WorkflowError;
use crate::index::IntoIndex;
use crate::reflow::{self, Reflow, ReflowSelection, RuleSet, RuleSetId};
use crate::source::Source;

static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

/// A cursor over a [`Source`] whose moves can be intercepted by rule sets.
///
/// The workflow owns every rule set created through it and consults at most
/// one of them, the active set, on each move. Rules see the workflow as it is
/// before the move; they cannot change it.
pub struct Workflow<T> {
    source: Source<T>,
    ordering: Vec<String>,
    index: Option<usize>,
    owner: u64,
    rule_sets: Vec<RuleSet<T>>,
    names: HashMap<String, RuleSetId>,
    active: Option<RuleSetId>,
}

impl<T: fmt::Debug> fmt::Debug for Workflow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("source", &self.source)
            .field("index", &self.index)
            .field("rule_sets", &self.rule_sets)
            .field("active", &self.active)
            .finish()
    }
}

impl<T> Default for Workflow<T> {
    fn default() -> Self {
        Workflow::new(Source::default())
    }
}

impl<T> Workflow<T> {
    /// Start at the first index, or empty when the source has no items.
    pub fn new(source: impl Into<Source<T>>) -> Self {
        let source = source.into();
        let ordering = source.keys();
        let mut workflow = Workflow {
            source,
            ordering,
            index: None,
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
            rule_sets: Vec::new(),
            names: HashMap::new(),
            active: None,
        };
        workflow.index = workflow.first_index();
        workflow
    }

    pub fn source(&self) -> &Source<T> {
        &self.source
    }

    /// Replace the source and clamp the current index into its bounds.
    ///
    /// Clamping does not consult the active rule set.
    pub fn set_source(&mut self, source: impl Into<Source<T>>) {
        self.source = source.into();
        self.ordering = self.source.keys();
        self.index = self.clamp(signed(self.index));
        debug!(len = self.len(), index = ?self.index, "workflow source replaced");
    }

    pub fn ordering(&self) -> &[String] {
        &self.ordering
    }

    /// Ordering key at `index`, such as a step name for mapping sources.
    pub fn key_at(&self, index: isize) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|pos| self.ordering.get(pos))
            .map(String::as_str)
    }

    pub fn size(&self) -> usize {
        self.len()
    }

    /// Request a move to `requested`, running the active rule set.
    ///
    /// Input without an integer reading is ignored and the index is kept.
    pub fn set_index(&mut self, requested: impl IntoIndex) {
        match requested.into_index() {
            Some(requested) => self.move_to(requested),
            None => trace!("ignoring index request without an integer reading"),
        }
    }

    /// Item at `index` without falling back; unbounded lookups are errors.
    pub fn item_at(&self, index: isize) -> Result<&T, WorkflowError> {
        self.peek_item(index)
            .ok_or(WorkflowError::IndexOutOfBounds {
                index,
                len: self.len(),
            })
    }

    /// Create an empty rule set and make it the active one.
    pub fn reflow(&mut self) -> &mut RuleSet<T> {
        self.create_rule_set(None)
    }

    /// Like [`Workflow::reflow`], and register the set under `name` for
    /// [`Workflow::reflow_with`]. A set previously registered under `name`
    /// stays owned by the workflow but can only be selected by id.
    pub fn reflow_named(&mut self, name: impl Into<String>) -> &mut RuleSet<T> {
        self.create_rule_set(Some(name.into()))
    }

    /// Select the active rule set by name, by id, or none.
    ///
    /// An unknown name or an id from another workflow leaves no set active.
    pub fn reflow_with(&mut self, selection: impl Into<ReflowSelection>) -> &mut Self {
        self.active = match selection.into() {
            ReflowSelection::Named(name) => {
                let found = self.names.get(&name).copied();
                if found.is_none() {
                    warn!(name = %name, "no rule set registered under name");
                }
                found
            }
            ReflowSelection::Set(id) => {
                if self.owns(id) {
                    Some(id)
                } else {
                    warn!(?id, "rule set belongs to another workflow");
                    None
                }
            }
            ReflowSelection::Raw => None,
        };
        self
    }

    /// Add a rule to the active rule set, creating an unnamed one if none is
    /// active.
    pub fn rule<F>(&mut self, rule: F) -> &mut RuleSet<T>
    where
        F: FnMut(isize, Option<&T>, &Workflow<T>) -> Reflow + 'static,
    {
        let id = match self.active {
            Some(id) => id,
            None => self.reflow().id(),
        };
        self.rule_sets[id.slot].rule(rule)
    }

    pub fn active_rule_set(&self) -> Option<&RuleSet<T>> {
        self.active.and_then(|id| self.rule_set(id))
    }

    pub fn rule_set(&self, id: RuleSetId) -> Option<&RuleSet<T>> {
        if self.owns(id) {
            self.rule_sets.get(id.slot)
        } else {
            None
        }
    }

    pub fn rule_set_mut(&mut self, id: RuleSetId) -> Option<&mut RuleSet<T>> {
        if self.owns(id) {
            self.rule_sets.get_mut(id.slot)
        } else {
            None
        }
    }

    pub fn rule_set_named(&self, name: &str) -> Option<&RuleSet<T>> {
        self.names.get(name).and_then(|&id| self.rule_set(id))
    }

    fn create_rule_set(&mut self, name: Option<String>) -> &mut RuleSet<T> {
        let id = RuleSetId {
            owner: self.owner,
            slot: self.rule_sets.len(),
        };
        if let Some(name) = &name {
            self.names.insert(name.clone(), id);
        }
        trace!(?id, name = name.as_deref(), "rule set created");
        self.active = Some(id);
        self.rule_sets.push(RuleSet::new(id, name));
        &mut self.rule_sets[id.slot]
    }

    fn owns(&self, id: RuleSetId) -> bool {
        id.owner == self.owner && id.slot < self.rule_sets.len()
    }

    fn clamp(&self, index: isize) -> Option<usize> {
        let last = self.last_index()?;
        Some(usize::try_from(index).map_or(0, |pos| pos.min(last)))
    }

    fn resolve(&mut self, id: RuleSetId, requested: isize) -> isize {
        let Some(set) = self.rule_sets.get_mut(id.slot) else {
            return requested;
        };
        // Rules only see a shared workflow, so nothing can touch the set's
        // rules while they are out.
        let mut rules = mem::take(&mut set.rules);
        let resolved = reflow::resolve(&mut rules, self, requested);
        self.rule_sets[id.slot].rules = rules;
        resolved
    }
}

impl<T: Serialize> Workflow<T> {
    /// `<source> | <index> | <current item>`, each JSON encoded.
    ///
    /// An empty workflow reports index `-1` and no current item.
    pub fn to_diagnostic_string(&self) -> Result<String, WorkflowError> {
        let source = serde_json::to_string(&self.source)?;
        let current = self
            .current()
            .map(|item| serde_json::to_string(item))
            .transpose()?
            .unwrap_or_default();
        Ok(format!("{source} | {} | {current}", signed(self.index)))
    }
}

impl<T: Serialize> fmt::Display for Workflow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_diagnostic_string().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl<T> Cursor for Workflow<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.ordering.len()
    }

    fn index(&self) -> Option<usize> {
        self.index
    }

    fn peek_item(&self, index: isize) -> Option<&T> {
        usize::try_from(index)
            .ok()
            .and_then(|pos| self.source.get(pos))
    }

    fn move_to(&mut self, requested: isize) {
        let resolved = match self.active {
            Some(id) => self.resolve(id, requested),
            None => requested,
        };
        self.index = self.clamp(resolved);
        trace!(requested, resolved, index = ?self.index, "index committed");
    }
}
