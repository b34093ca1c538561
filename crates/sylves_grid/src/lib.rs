//! Grid kernel for Sylves-C: cell types, bounds, per-topology grids, and
//! generic pathfinding cores over a uniform `Grid` abstraction.
//!
//! Square, hex, triangle, and cube grids (plus their vertical prisms) all
//! implement the same [`grid::Grid`] trait, so the pathfinding cores in
//! [`pathfind`] and the coordinate math in [`bound`] work identically
//! regardless of which topology a caller constructs.

pub mod bound;
pub mod cell;
pub mod cell_type;
pub mod conversions;
pub mod error;
pub mod grid;
pub mod grids;
pub mod math;
pub mod modifiers;
pub mod pathfind;
pub mod pqueue;
pub mod shape;

pub use bound::Bound;
pub use cell::{Cell, CellPath, Step};
pub use cell_type::CellType;
pub use error::{GridError, GridResult};
pub use grid::{Grid, Mesh, RaycastHit};
pub use modifiers::{BijectionGrid, MaskGrid, TransformGrid};
