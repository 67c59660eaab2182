//! Insertion-position policy shared by content markers and render containers.
//!
//! | `prepend` | `replace-container` | position      | content order |
//! |-----------|---------------------|---------------|---------------|
//! | no        | no                  | `beforeend`   | forward       |
//! | yes       | no                  | `afterbegin`  | reversed      |
//! | no        | yes                 | `beforebegin` | forward       |
//! | yes       | yes                 | `afterend`    | reversed      |
//!
//! With `replace-container` the container is detached once every piece is inserted.

use html::{Dom, InsertPosition, NodeId};

pub const PREPEND_MARKER: &str = "prepend";
pub const REPLACE_MARKER: &str = "replace-container";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InsertPlan {
    pub position: InsertPosition,
    pub replace: bool,
}

pub(crate) fn position_for(prepend: bool, replace: bool) -> InsertPosition {
    match (prepend, replace) {
        (false, false) => InsertPosition::BeforeEnd,
        (true, false) => InsertPosition::AfterBegin,
        (false, true) => InsertPosition::BeforeBegin,
        (true, true) => InsertPosition::AfterEnd,
    }
}

/// Reads (and strips) the container's markers, OR-ed with the caller's overrides.
pub(crate) fn read_insert_plan(
    dom: &mut Dom,
    container: NodeId,
    prepend_override: bool,
    replace_override: bool,
) -> InsertPlan {
    let prepend = dom.remove_attribute(container, PREPEND_MARKER) || prepend_override;
    let replace = dom.remove_attribute(container, REPLACE_MARKER) || replace_override;
    InsertPlan {
        position: position_for(prepend, replace),
        replace,
    }
}

impl InsertPlan {
    /// Detaches the container when the plan replaces it.
    pub(crate) fn finish(self, dom: &mut Dom, container: NodeId) {
        if self.replace {
            log::trace!(target: "template.engine", "replacing container {container:?}");
            dom.detach(container);
        }
    }
}
