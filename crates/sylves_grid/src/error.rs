//! The closed error set surfaced to callers (spec §6-§7).
//!
//! Most per-cell operations (`try_move`, `find_cell`) already have a
//! natural `Option` shape and stay that way; `GridError` is reserved for
//! operations with a named failure mode that isn't simply "this cell
//! doesn't exist" — bound construction, buffer sizing, and the
//! pathfinding cores. `NullPointer` has no referent in safe Rust and is
//! dropped; every other variant is kept.

/// Stable error codes shared across the grid kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("invalid argument")]
    InvalidArgument,
    #[error("out of memory")]
    OutOfMemory,
    #[error("cell coordinates are out of bounds")]
    OutOfBounds,
    #[error("cell is not a member of this grid")]
    CellNotInGrid,
    #[error("operation requires a finite grid but this grid is infinite")]
    InfiniteGrid,
    #[error("invalid internal state")]
    InvalidState,
    #[error("no path exists between the requested cells")]
    PathNotFound,
    #[error("supplied buffer is too small to hold the result")]
    BufferTooSmall,
    #[error("operation is not implemented for this grid")]
    NotImplemented,
    #[error("operation requires a bounded grid but this grid is unbounded")]
    Unbounded,
    #[error("I/O error")]
    Io,
    #[error("operation is not supported for this grid or cell type")]
    NotSupported,
}

pub type GridResult<T> = Result<T, GridError>;
