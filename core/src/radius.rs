//! Pure Chebyshev-radius enumeration over the cell grid.
//!
//! Every reach computation in the engine funnels through these helpers so
//! that iteration order stays deterministic: the square neighborhood
//! `[x - r, x + r] x [y - r, y + r]` is visited in row-major order (rows
//! outermost, columns ascending within each row). Set semantics do not
//! depend on the order, but reproducible test expectations do.

use crate::Cell;

/// Enumerates every cell within Chebyshev radius `radius` of `root`.
///
/// The returned iterator is a pure function of its inputs: it is finite,
/// restartable, and carries no hidden state. A radius of zero yields only
/// the root cell. Coordinates that would fall outside the representable
/// `i32` range are skipped rather than wrapped.
pub fn cells_in_radius(root: Cell, radius: u32) -> impl Iterator<Item = Cell> {
    let radius = i64::from(radius);
    let root_x = i64::from(root.x());
    let root_y = i64::from(root.y());

    (root_y - radius..=root_y + radius).flat_map(move |y| {
        (root_x - radius..=root_x + radius).filter_map(move |x| {
            let x = i32::try_from(x).ok()?;
            let y = i32::try_from(y).ok()?;
            Some(Cell::new(x, y))
        })
    })
}

/// Enumerates the cells within radius `radius` of `root` that satisfy
/// `predicate`, preserving the row-major order of [`cells_in_radius`].
pub fn cells_in_radius_matching<P>(
    root: Cell,
    radius: u32,
    mut predicate: P,
) -> impl Iterator<Item = Cell>
where
    P: FnMut(Cell) -> bool,
{
    cells_in_radius(root, radius).filter(move |cell| predicate(*cell))
}

#[cfg(test)]
mod tests {
    use super::{cells_in_radius, cells_in_radius_matching};
    use crate::Cell;

    #[test]
    fn radius_zero_yields_only_the_root() {
        let cells: Vec<Cell> = cells_in_radius(Cell::new(3, -4), 0).collect();
        assert_eq!(cells, vec![Cell::new(3, -4)]);
    }

    #[test]
    fn radius_one_enumerates_the_square_in_row_major_order() {
        let cells: Vec<Cell> = cells_in_radius(Cell::new(0, 0), 1).collect();
        assert_eq!(
            cells,
            vec![
                Cell::new(-1, -1),
                Cell::new(0, -1),
                Cell::new(1, -1),
                Cell::new(-1, 0),
                Cell::new(0, 0),
                Cell::new(1, 0),
                Cell::new(-1, 1),
                Cell::new(0, 1),
                Cell::new(1, 1),
            ]
        );
    }

    #[test]
    fn every_enumerated_cell_lies_within_the_chebyshev_radius() {
        let root = Cell::new(-7, 11);
        for cell in cells_in_radius(root, 3) {
            assert!(root.chebyshev_distance(cell) <= 3);
        }
        assert_eq!(cells_in_radius(root, 3).count(), 49);
    }

    #[test]
    fn iterator_is_restartable() {
        let first: Vec<Cell> = cells_in_radius(Cell::new(2, 2), 2).collect();
        let second: Vec<Cell> = cells_in_radius(Cell::new(2, 2), 2).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn predicate_filters_without_reordering() {
        let cells: Vec<Cell> =
            cells_in_radius_matching(Cell::new(0, 0), 1, |cell| cell.y() == 0).collect();
        assert_eq!(
            cells,
            vec![Cell::new(-1, 0), Cell::new(0, 0), Cell::new(1, 0)]
        );
    }

    #[test]
    fn coordinates_beyond_the_representable_range_are_skipped() {
        let root = Cell::new(i32::MIN, i32::MAX);
        let cells: Vec<Cell> = cells_in_radius(root, 1).collect();
        // Half of the 3x3 square falls outside i32 and is clipped away.
        assert_eq!(cells.len(), 4);
        for cell in cells {
            assert!(root.chebyshev_distance(cell) <= 1);
        }
    }
}
