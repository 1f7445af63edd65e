//! Display position → row identity
//!
//! Every focus or edit raised against the rendered table carries a display
//! position. It must go through here before it reaches the store, otherwise
//! an edit under an active query lands on the wrong row.

use crate::model::{CellAddress, Column, StableIndex};
use crate::search::DisplayOrder;

/// Row identity shown at `position`, or `None` when out of range
pub fn resolve(position: usize, order: &DisplayOrder) -> Option<StableIndex> {
    order.get(position)
}

/// Resolve a display position and column into a cell address
pub fn cell_at(position: usize, column: Column, order: &DisplayOrder) -> Option<CellAddress> {
    resolve(position, order).map(|id| CellAddress::new(id, column))
}
