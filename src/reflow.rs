use std::fmt;

use tracing::trace;

use crate::cursor::{signed, Cursor};
use crate::workflow::Workflow;

/// A rule's answer to a requested move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reflow {
    /// No opinion; older rules are consulted.
    Pass,
    /// Move to this index instead. Still subject to clamping.
    To(isize),
    /// Refuse the move; the cursor stays where it is.
    Reject,
}

/// Scan results read as verdicts: a found position redirects, nothing found
/// refuses the move.
impl From<Option<usize>> for Reflow {
    fn from(found: Option<usize>) -> Self {
        match found {
            Some(index) => Reflow::To(signed(Some(index))),
            None => Reflow::Reject,
        }
    }
}

impl From<isize> for Reflow {
    fn from(index: isize) -> Self {
        Reflow::To(index)
    }
}

/// An index-rewriting rule.
///
/// `workflow` is the cursor the rule is attached to, as it is before the move.
/// Rule set introspection through it reports the sets as registered, including
/// the one being resolved. Closures of the same shape are rules, so a rule may
/// keep state between calls.
pub trait Rule<T> {
    fn reflow(&mut self, requested: isize, item: Option<&T>, workflow: &Workflow<T>) -> Reflow;
}

impl<T, F> Rule<T> for F
where
    F: FnMut(isize, Option<&T>, &Workflow<T>) -> Reflow,
{
    fn reflow(&mut self, requested: isize, item: Option<&T>, workflow: &Workflow<T>) -> Reflow {
        self(requested, item, workflow)
    }
}

/// Handle to a rule set owned by one [`Workflow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSetId {
    pub(crate) owner: u64,
    pub(crate) slot: usize,
}

/// Which rule set a workflow consults on every move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflowSelection {
    Named(String),
    Set(RuleSetId),
    /// No interception.
    Raw,
}

impl From<&str> for ReflowSelection {
    fn from(name: &str) -> Self {
        ReflowSelection::Named(name.to_string())
    }
}

impl From<String> for ReflowSelection {
    fn from(name: String) -> Self {
        ReflowSelection::Named(name)
    }
}

impl From<RuleSetId> for ReflowSelection {
    fn from(id: RuleSetId) -> Self {
        ReflowSelection::Set(id)
    }
}

impl From<Option<RuleSetId>> for ReflowSelection {
    fn from(id: Option<RuleSetId>) -> Self {
        id.map_or(ReflowSelection::Raw, ReflowSelection::Set)
    }
}

/// An ordered stack of rules. The most recently added rule is consulted
/// first, so it can shadow older rules without removing them.
pub struct RuleSet<T> {
    id: RuleSetId,
    name: Option<String>,
    // Counted apart from `rules`, which are lent out while a move resolves.
    len: usize,
    pub(crate) rules: Vec<Box<dyn Rule<T>>>,
}

impl<T> fmt::Debug for RuleSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("rules", &self.len)
            .finish()
    }
}

impl<T> RuleSet<T> {
    pub(crate) fn new(id: RuleSetId, name: Option<String>) -> Self {
        RuleSet {
            id,
            name,
            len: 0,
            rules: Vec::new(),
        }
    }

    pub fn id(&self) -> RuleSetId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add a rule with precedence over every rule already in the set.
    pub fn rule<F>(&mut self, rule: F) -> &mut Self
    where
        F: FnMut(isize, Option<&T>, &Workflow<T>) -> Reflow + 'static,
    {
        self.with_rule(rule)
    }

    /// Add a rule that only has an opinion when `fixed` is requested.
    ///
    /// `fixed` may lie outside the current bounds; the source can change.
    pub fn rule_at<F>(&mut self, fixed: isize, mut rule: F) -> &mut Self
    where
        F: FnMut(isize, Option<&T>, &Workflow<T>) -> Reflow + 'static,
    {
        self.rule(move |requested, item, workflow| {
            if requested == fixed {
                rule(requested, item, workflow)
            } else {
                Reflow::Pass
            }
        })
    }

    pub fn with_rule<R: Rule<T> + 'static>(&mut self, rule: R) -> &mut Self {
        self.rules.push(Box::new(rule));
        self.len += 1;
        self
    }
}

/// Rewrite `requested` through `rules`, newest first.
///
/// A rejection yields the workflow's current index. If no rule has an opinion
/// the request passes through unchanged.
pub(crate) fn resolve<T>(
    rules: &mut [Box<dyn Rule<T>>],
    workflow: &Workflow<T>,
    requested: isize,
) -> isize {
    let item = workflow.peek_item(requested);
    for (position, rule) in rules.iter_mut().enumerate().rev() {
        match rule.reflow(requested, item, workflow) {
            Reflow::Pass => {}
            Reflow::To(index) => {
                trace!(rule = position, requested, index, "rule redirected move");
                return index;
            }
            Reflow::Reject => {
                trace!(rule = position, requested, "rule rejected move");
                return signed(workflow.index());
            }
        }
    }
    requested
}
