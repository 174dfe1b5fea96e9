//! A steerable cursor over an ordered collection.
//!
//! A [`Workflow`] tracks the current position in a sequence, a keyed mapping
//! or a count. Every move goes through the active [`RuleSet`], whose rules may
//! redirect or refuse it before the result is clamped into bounds.
//!
//! ```
//! use reflow::{Cursor, Reflow, Workflow};
//!
//! let mut workflow = Workflow::new(vec![3, 4, 5, 6, 7, 8]);
//! workflow.reflow().rule_at(2, |_, _, _| Reflow::To(3));
//!
//! workflow.set_index(2);
//! assert_eq!(workflow.index(), Some(3));
//! assert_eq!(workflow.current(), Some(&6));
//! ```

pub use cursor::{Cursor, Direction};
pub use error::WorkflowError;
pub use index::IntoIndex;
pub use reflow::{Reflow, ReflowSelection, Rule, RuleSet, RuleSetId};
pub use source::Source;
pub use workflow::Workflow;

mod cursor;
mod error;
mod index;
mod reflow;
mod source;
mod workflow;
