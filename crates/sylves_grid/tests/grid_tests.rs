//! Universal invariants (spec §8: move reversibility, live-direction
//! coverage, round-trip `find_cell`, indexing bijection) checked with
//! `proptest` across every topology.

use proptest::prelude::*;
use sylves_direction::Connection;
use sylves_grid::bound::Bound;
use sylves_grid::cell::Cell;
use sylves_grid::cell_type::{CellType, HexOrientation};
use sylves_grid::grid::Grid;
use sylves_grid::grids::cube::CubeGrid;
use sylves_grid::grids::hex::HexGrid;
use sylves_grid::grids::square::SquareGrid;
use sylves_grid::grids::triangle::TriangleGrid;

const COORD_RANGE: std::ops::Range<i32> = -1_000..1_000;

fn square_cell_strategy() -> impl Strategy<Value = Cell> {
    (COORD_RANGE, COORD_RANGE).prop_map(|(x, y)| Cell::new(x, y, 0))
}

fn hex_cell_strategy() -> impl Strategy<Value = Cell> {
    (COORD_RANGE, COORD_RANGE).prop_map(|(q, r)| Cell::new(q, r, 0))
}

fn cube_cell_strategy() -> impl Strategy<Value = Cell> {
    (COORD_RANGE, COORD_RANGE, COORD_RANGE).prop_map(|(x, y, z)| Cell::new(x, y, z))
}

fn triangle_cell_strategy() -> impl Strategy<Value = Cell> {
    (COORD_RANGE, COORD_RANGE, any::<bool>()).prop_map(|(x, y, up)| {
        let z = if up { 2 - x - y } else { 1 - x - y };
        Cell::new(x, y, z)
    })
}

/// Spec §8 "move reversibility": if `try_move(c, d) = Some((c', d', k))`
/// then `try_move(c', d') = Some((c, d, k^-1))`. Every topology in this
/// crate is translational, so `k` is always `Connection::IDENTITY`,
/// which is its own inverse.
fn move_reversibility(grid: &dyn Grid, cell: Cell) -> Result<(), TestCaseError> {
    let Some(cell_type) = grid.cell_type(cell) else {
        return Ok(());
    };
    for raw_dir in 0..cell_type.dir_count() {
        let dir = sylves_direction::Direction::new(raw_dir);
        let Some((dest, inverse_dir, conn)) = grid.try_move(cell, dir) else {
            continue;
        };
        prop_assert_eq!(conn, Connection::IDENTITY, "translational grids only ever connect with the identity");
        let back = grid.try_move(dest, inverse_dir);
        prop_assert_eq!(
            back,
            Some((cell, dir, Connection::IDENTITY)),
            "moving {:?} from {:?} then {:?} back should return to the start",
            dir,
            cell,
            inverse_dir
        );
    }
    Ok(())
}

/// Spec §8 "live-direction coverage": `cell_dirs(c).len()` equals the
/// number of directions in `[0, dir_count)` for which `try_move` succeeds.
fn live_direction_coverage(grid: &dyn Grid, cell: Cell) -> Result<(), TestCaseError> {
    let Some(cell_type) = grid.cell_type(cell) else {
        return Ok(());
    };
    let live = grid.cell_dirs(cell);
    let expected = (0..cell_type.dir_count())
        .filter(|&i| grid.try_move(cell, sylves_direction::Direction::new(i)).is_some())
        .count();
    prop_assert_eq!(live.len(), expected, "cell_dirs should match the directions try_move actually accepts");
    Ok(())
}

/// Spec §8 round-trip `find_cell`: the center of every cell maps back to
/// that same cell.
fn find_cell_round_trips(grid: &dyn Grid, cell: Cell) -> Result<(), TestCaseError> {
    if grid.cell_type(cell).is_none() {
        return Ok(());
    }
    let center = grid.cell_center(cell);
    prop_assert_eq!(grid.find_cell(center), Some(cell));
    Ok(())
}

proptest! {
    #[test]
    fn square_move_reversibility(cell in square_cell_strategy()) {
        move_reversibility(&SquareGrid::new(1.0), cell)?;
    }

    #[test]
    fn square_live_direction_coverage(cell in square_cell_strategy()) {
        live_direction_coverage(&SquareGrid::new(1.0), cell)?;
    }

    #[test]
    fn square_find_cell_round_trip(cell in square_cell_strategy()) {
        find_cell_round_trips(&SquareGrid::new(1.0), cell)?;
    }

    #[test]
    fn hex_move_reversibility(cell in hex_cell_strategy()) {
        move_reversibility(&HexGrid::new(1.0, HexOrientation::PointyTop), cell)?;
        move_reversibility(&HexGrid::new(1.0, HexOrientation::FlatTop), cell)?;
    }

    #[test]
    fn hex_live_direction_coverage(cell in hex_cell_strategy()) {
        live_direction_coverage(&HexGrid::new(1.0, HexOrientation::PointyTop), cell)?;
    }

    #[test]
    fn hex_find_cell_round_trip(cell in hex_cell_strategy()) {
        find_cell_round_trips(&HexGrid::new(1.0, HexOrientation::PointyTop), cell)?;
        find_cell_round_trips(&HexGrid::new(1.0, HexOrientation::FlatTop), cell)?;
    }

    #[test]
    fn triangle_move_reversibility(cell in triangle_cell_strategy()) {
        move_reversibility(&TriangleGrid::new(1.0), cell)?;
    }

    #[test]
    fn triangle_live_direction_coverage(cell in triangle_cell_strategy()) {
        live_direction_coverage(&TriangleGrid::new(1.0), cell)?;
    }

    #[test]
    fn triangle_find_cell_round_trip(cell in triangle_cell_strategy()) {
        find_cell_round_trips(&TriangleGrid::new(1.0), cell)?;
    }

    #[test]
    fn cube_move_reversibility(cell in cube_cell_strategy()) {
        move_reversibility(&CubeGrid::new(1.0), cell)?;
    }

    #[test]
    fn cube_live_direction_coverage(cell in cube_cell_strategy()) {
        live_direction_coverage(&CubeGrid::new(1.0), cell)?;
    }

    #[test]
    fn cube_find_cell_round_trip(cell in cube_cell_strategy()) {
        find_cell_round_trips(&CubeGrid::new(1.0), cell)?;
    }
}

/// Spec §8 "indexing bijection": over a bounded grid, `index` and
/// `cell_by_index` round-trip in both directions.
#[test]
fn square_indexing_is_bijective() {
    let grid = SquareGrid::with_bound(1.0, Bound::rectangle((0, 0), (9, 9)));
    let count = grid.index_count().unwrap();
    assert_eq!(count, 100);
    for i in 0..count {
        let cell = grid.cell_by_index(i).expect("index in range");
        assert_eq!(grid.index(cell), Some(i));
    }
}

#[test]
fn hex_indexing_is_bijective() {
    let grid = HexGrid::with_bound(
        1.0,
        HexOrientation::PointyTop,
        Bound::HexParallelogram { min: (0, 0), max: (4, 4) },
    );
    let count = grid.index_count().unwrap();
    for i in 0..count {
        let cell = grid.cell_by_index(i).expect("index in range");
        assert_eq!(grid.index(cell), Some(i));
    }
}
