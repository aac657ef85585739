//! Grid surfaces
//!
//! A surface is whatever holds the live sheet: a hosted spreadsheet adapter
//! or the in-memory sheet used for previews and tests. Surfaces apply plan
//! edits one at a time, in order.

mod memory;

pub use memory::*;

use crate::core::ScreenerResult;
use crate::layout::{GridEdit, LayoutPlan};

/// Target of layout plan edits
pub trait GridSurface {
    /// Apply a single edit
    fn apply(&mut self, edit: &GridEdit) -> ScreenerResult<()>;
}

/// Apply every edit of `plan` in order, stopping at the first failure.
///
/// A failed plan leaves the surface partially edited; hosts with
/// transactions should wrap the call in one.
pub fn apply_plan<S: GridSurface + ?Sized>(surface: &mut S, plan: &LayoutPlan) -> ScreenerResult<()> {
    for (i, edit) in plan.edits().iter().enumerate() {
        if let Err(e) = surface.apply(edit) {
            tracing::error!("Edit {} of {} failed ({:?}): {}", i + 1, plan.len(), edit, e);
            return Err(e);
        }
    }
    tracing::debug!("Applied {}", plan.summary());
    Ok(())
}
