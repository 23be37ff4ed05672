/*
 * Copyright (c) 2022 Frank Fischer <frank-fischer@shadow-soft.de>
 *
 * This program is free software: you can redistribute it and/or
 * modify it under the terms of the GNU General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful, but
 * WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
 * General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see  <http://www.gnu.org/licenses/>
 */

//! Closed paths through the basis of an assignment matrix.
//!
//! The basic cells of an assignment matrix are the edges of a bipartite
//! graph whose nodes are the rows and the columns of the matrix. If the
//! basis is a spanning tree of this graph, adding a non-basic cell
//! `(i, j)` closes exactly one cycle: the edge `(i, j)` together with
//! the tree path from row `i` to column `j`.
//!
//! The path is found by an iterative depth-first search with an explicit
//! stack, so no recursion depth limits apply for large matrices.

use crate::matrix::{Line, Matrix, Position};
use log::trace;

/// Find the cycle closed by the cell `start`.
///
/// The returned sequence begins with `start` followed by basic cells such
/// that consecutive cells alternately share a row and a column, the first
/// move being horizontal (within the row of `start`). The last cell is in
/// the column of `start`, so the sequence describes a closed path of even
/// length of at least 4. Cells at even positions gain flow when the
/// solution is improved along the cycle, cells at odd positions lose flow.
///
/// Returns `None` if there is no such cycle, i.e. if row and column of
/// `start` are not connected by basic cells (which can only happen for
/// a degenerate basis that is not a spanning tree).
///
/// # Example
///
/// ```
/// use rs_transport::{cycle, initial, Position, TransportProblem};
///
/// let p = TransportProblem::new(
///     vec![vec![0, 2, 1], vec![2, 1, 5], vec![2, 4, 3]],
///     vec![6, 7, 7],
///     vec![5, 5, 10],
/// ).unwrap();
/// let x = initial::northwest_corner(&p);
/// let c = cycle::find_cycle(&x, Position::new(0, 2)).unwrap();
/// assert_eq!(
///     c,
///     vec![Position::new(0, 2), Position::new(0, 1), Position::new(1, 1), Position::new(1, 2)]
/// );
/// ```
pub fn find_cycle<F>(x: &Matrix<F>, start: Position) -> Option<Vec<Position>> {
    if start.row >= x.rows() || start.col >= x.cols() {
        return None;
    }

    let target = Line::Col(start.col);
    let mut row_seen = vec![false; x.rows()];
    let mut col_seen = vec![false; x.cols()];
    row_seen[start.row] = true;

    // Each stack entry is a node of the bipartite graph and the index of
    // the next neighbor to be scanned. The path contains `start` and the
    // cells (edges) leading to each node on the stack except the root.
    let mut stack = vec![(Line::Row(start.row), 0)];
    let mut path = vec![start];

    while let Some(top) = stack.last_mut() {
        let node = top.0;
        let len = match node {
            Line::Row(_) => x.cols(),
            Line::Col(_) => x.rows(),
        };

        let mut next = None;
        while top.1 < len {
            let k = top.1;
            top.1 += 1;
            let (p, nb) = match node {
                Line::Row(i) => (Position::new(i, k), Line::Col(k)),
                Line::Col(j) => (Position::new(k, j), Line::Row(k)),
            };
            let seen = match nb {
                Line::Row(i) => row_seen[i],
                Line::Col(j) => col_seen[j],
            };
            if !seen && p != start && x[p].is_basic {
                next = Some((p, nb));
                break;
            }
        }

        match next {
            Some((p, nb)) => {
                match nb {
                    Line::Row(i) => row_seen[i] = true,
                    Line::Col(j) => col_seen[j] = true,
                }
                path.push(p);
                if nb == target {
                    trace!("Cycle through {} of length {}", start, path.len());
                    return Some(path);
                }
                stack.push((nb, 0));
            }
            None => {
                // dead end, backtrack
                stack.pop();
                if !stack.is_empty() {
                    path.pop();
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::find_cycle;
    use crate::{initial, Matrix, Position, TransportProblem};

    fn positions(cells: &[(usize, usize)]) -> Vec<Position> {
        cells.iter().map(|&p| Position::from(p)).collect()
    }

    #[test]
    fn test_long_cycle() {
        let p = TransportProblem::new(
            vec![vec![8, 6, 10, 9], vec![9, 12, 13, 7], vec![14, 9, 16, 5]],
            vec![150, 175, 275],
            vec![200, 100, 150, 150],
        )
        .unwrap();
        let x = initial::northwest_corner(&p);
        // the search must backtrack from the dead end in column 2
        assert_eq!(
            find_cycle(&x, Position::new(0, 3)),
            Some(positions(&[(0, 3), (0, 0), (1, 0), (1, 2), (2, 2), (2, 3)]))
        );
        assert_eq!(
            find_cycle(&x, Position::new(2, 1)),
            Some(positions(&[(2, 1), (2, 2), (1, 2), (1, 1)]))
        );
    }

    #[test]
    fn test_cycle_alternates() {
        let p = TransportProblem::new(
            vec![vec![3, 1, 7, 4], vec![2, 6, 5, 9], vec![8, 3, 3, 2], vec![4, 4, 6, 1]],
            vec![30, 25, 20, 25],
            vec![20, 30, 25, 25],
        )
        .unwrap();
        let x = initial::northwest_corner(&p);
        for (q, c) in x.iter() {
            if c.is_basic {
                continue;
            }
            let cycle = find_cycle(&x, q).unwrap();
            assert!(cycle.len() >= 4);
            assert_eq!(cycle.len() % 2, 0);
            for k in 0..cycle.len() {
                let a = cycle[k];
                let b = cycle[(k + 1) % cycle.len()];
                if k % 2 == 0 {
                    assert_eq!(a.row, b.row);
                } else {
                    assert_eq!(a.col, b.col);
                }
                if k > 0 {
                    assert!(x[a].is_basic);
                }
            }
        }
    }

    #[test]
    fn test_disconnected() {
        let p = TransportProblem::new(vec![vec![4, 8], vec![3, 4]], vec![2, 3], vec![3, 2]).unwrap();
        let mut x = Matrix::from_problem(&p);
        x[(0, 1)].quantity = 2;
        x[(0, 1)].is_basic = true;
        x[(1, 0)].quantity = 3;
        x[(1, 0)].is_basic = true;
        assert_eq!(find_cycle(&x, Position::new(1, 1)), None);
        assert_eq!(find_cycle(&x, Position::new(5, 1)), None);
    }
}
