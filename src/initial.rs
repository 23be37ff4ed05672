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

//! Methods computing an initial basic feasible solution.
//!
//! All methods are deterministic, do not modify the problem and return a
//! fresh assignment matrix whose row and column totals equal the supply
//! and demand of the problem. Every cell with positive quantity is basic.
//! Cells with zero quantity may be basic, too, if supply and demand are
//! exhausted at the same time.

use crate::matrix::{Line, Matrix, Position};
use crate::problem::TransportProblem;
use log::{debug, trace};
use num_traits::NumAssign;
use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// The available methods for computing an initial solution.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum InitialMethod {
    /// Northwest-corner rule.
    NorthwestCorner,
    /// Minimum-cost (least cost) method.
    MinimumCost,
    /// Vogel's approximation method.
    Vogel,
}

impl InitialMethod {
    /// Compute the initial solution of `problem` with this method.
    pub fn solve<F>(self, problem: &TransportProblem<F>) -> Matrix<F>
    where
        F: NumAssign + PartialOrd + Copy,
    {
        match self {
            InitialMethod::NorthwestCorner => northwest_corner(problem),
            InitialMethod::MinimumCost => minimum_cost(problem),
            InitialMethod::Vogel => vogel(problem),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            InitialMethod::NorthwestCorner => "northwest corner rule",
            InitialMethod::MinimumCost => "minimum cost method",
            InitialMethod::Vogel => "Vogel's approximation method",
        }
    }
}

impl fmt::Display for InitialMethod {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.name())
    }
}

/// Remaining supply and demand while building an initial solution.
struct Remaining<F> {
    supply: Vec<F>,
    demand: Vec<F>,
}

impl<F> Remaining<F>
where
    F: NumAssign + PartialOrd + Copy,
{
    fn new(problem: &TransportProblem<F>) -> Self {
        Remaining {
            supply: problem.supply().to_vec(),
            demand: problem.demand().to_vec(),
        }
    }

    /// Ship as much as possible through `(i, j)` and make the cell basic.
    fn assign(&mut self, x: &mut Matrix<F>, i: usize, j: usize) {
        let q = min(self.supply[i], self.demand[j]);
        let cell = &mut x[(i, j)];
        cell.quantity = q;
        cell.is_basic = true;
        self.supply[i] -= q;
        self.demand[j] -= q;
        trace!("Assign cell {}", Position::new(i, j));
    }
}

fn min<F: PartialOrd>(a: F, b: F) -> F {
    if b < a {
        b
    } else {
        a
    }
}

/// Compute an initial solution with the northwest-corner rule.
///
/// Starting at the upper left cell, the maximal possible quantity is
/// assigned to the current cell. If the supply of the current row is
/// exhausted the rule moves down, otherwise it moves right. Costs are not
/// taken into account.
///
/// # Example
///
/// ```
/// use rs_transport::{initial, TransportProblem};
///
/// let p = TransportProblem::new(
///     vec![vec![0, 2, 1], vec![2, 1, 5], vec![2, 4, 3]],
///     vec![6, 7, 7],
///     vec![5, 5, 10],
/// ).unwrap();
/// let x = initial::northwest_corner(&p);
/// assert!(x.is_feasible_for(&p));
/// assert_eq!(x.num_basic(), 5);
/// assert_eq!(x.total_cost(), 42);
/// ```
pub fn northwest_corner<F>(problem: &TransportProblem<F>) -> Matrix<F>
where
    F: NumAssign + PartialOrd + Copy,
{
    let mut x = Matrix::from_problem(problem);
    let mut rem = Remaining::new(problem);

    let (mut i, mut j) = (0, 0);
    while i < problem.rows() && j < problem.cols() {
        rem.assign(&mut x, i, j);
        if rem.supply[i].is_zero() {
            i += 1;
        } else {
            j += 1;
        }
    }

    x
}

/// Compute an initial solution with the minimum-cost method.
///
/// The cells are visited in order of increasing cost (ties in row-major
/// order) and each cell whose row and column still have remaining supply
/// and demand receives the maximal possible quantity.
pub fn minimum_cost<F>(problem: &TransportProblem<F>) -> Matrix<F>
where
    F: NumAssign + PartialOrd + Copy,
{
    let mut x = Matrix::from_problem(problem);
    let mut rem = Remaining::new(problem);

    let mut cells = x.iter().map(|(p, c)| (p, c.cost())).collect::<Vec<_>>();
    // stable sort keeps row-major order among equal costs
    cells.sort_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    for (p, _) in cells {
        if rem.supply[p.row] > F::zero() && rem.demand[p.col] > F::zero() {
            rem.assign(&mut x, p.row, p.col);
        }
    }

    x
}

/// Compute an initial solution with Vogel's approximation method.
///
/// In each step the penalty of every remaining row and column is
/// computed, i.e. the difference between its two smallest remaining
/// costs (or the single remaining cost). The line with the largest
/// penalty is selected, rows before columns and lower indices first on
/// ties, and its cheapest remaining cell receives the maximal possible
/// quantity. Rows with exhausted supply and columns with exhausted
/// demand are removed.
///
/// # Example
///
/// ```
/// use rs_transport::{initial, TransportProblem};
///
/// let p = TransportProblem::new(
///     vec![vec![8, 6, 10, 9], vec![9, 12, 13, 7], vec![14, 9, 16, 5]],
///     vec![150, 175, 275],
///     vec![200, 100, 150, 150],
/// ).unwrap();
/// let x = initial::vogel(&p);
/// assert!(x.is_feasible_for(&p));
/// assert_eq!(x.total_cost(), 5075);
/// ```
pub fn vogel<F>(problem: &TransportProblem<F>) -> Matrix<F>
where
    F: NumAssign + PartialOrd + Copy,
{
    debug!("Vogel's approximation on {}x{} problem", problem.rows(), problem.cols());
    let mut x = Matrix::from_problem(problem);
    let mut rem = Remaining::new(problem);

    let mut row_done = vec![false; problem.rows()];
    let mut col_done = vec![false; problem.cols()];

    while !row_done.iter().all(|&d| d) && !col_done.iter().all(|&d| d) {
        let mut selected: Option<(F, Line)> = None;

        let rows = (0..problem.rows()).filter(|&i| !row_done[i]).map(Line::Row);
        let cols = (0..problem.cols()).filter(|&j| !col_done[j]).map(Line::Col);
        for line in rows.chain(cols) {
            let pen = match penalty(&x, line, &row_done, &col_done) {
                Some(pen) => pen,
                None => continue,
            };
            if selected.map(|(best, _)| pen > best).unwrap_or(true) {
                selected = Some((pen, line));
            }
        }

        let line = match selected {
            Some((_, line)) => line,
            None => break,
        };

        let p = match cheapest(&x, line, &row_done, &col_done) {
            Some(p) => p,
            None => break,
        };

        rem.assign(&mut x, p.row, p.col);
        if rem.supply[p.row].is_zero() {
            row_done[p.row] = true;
        }
        if rem.demand[p.col].is_zero() {
            col_done[p.col] = true;
        }
    }

    x
}

/// Iterate over the costs of the cells of `line` that have not been removed.
fn available<'a, F>(
    x: &'a Matrix<F>,
    line: Line,
    row_done: &'a [bool],
    col_done: &'a [bool],
) -> impl Iterator<Item = (Position, F)> + 'a
where
    F: NumAssign + PartialOrd + Copy,
{
    x.line(line)
        .filter(move |(p, _)| !row_done[p.row] && !col_done[p.col])
        .map(|(p, c)| (p, c.cost()))
}

/// The Vogel penalty of a line.
fn penalty<F>(x: &Matrix<F>, line: Line, row_done: &[bool], col_done: &[bool]) -> Option<F>
where
    F: NumAssign + PartialOrd + Copy,
{
    let mut first: Option<F> = None;
    let mut second: Option<F> = None;
    for (_, c) in available(x, line, row_done, col_done) {
        match first {
            Some(f) if c >= f => {
                if second.map(|s| c < s).unwrap_or(true) {
                    second = Some(c);
                }
            }
            _ => {
                second = first;
                first = Some(c);
            }
        }
    }

    match (first, second) {
        (Some(f), Some(s)) => Some(s - f),
        (Some(f), None) => Some(f),
        _ => None,
    }
}

/// The first cheapest remaining cell of a line.
fn cheapest<F>(x: &Matrix<F>, line: Line, row_done: &[bool], col_done: &[bool]) -> Option<Position>
where
    F: NumAssign + PartialOrd + Copy,
{
    let mut best: Option<(Position, F)> = None;
    for (p, c) in available(x, line, row_done, col_done) {
        if best.map(|(_, b)| c < b).unwrap_or(true) {
            best = Some((p, c));
        }
    }
    best.map(|(p, _)| p)
}

#[cfg(test)]
mod tests {
    use super::{minimum_cost, northwest_corner, vogel, InitialMethod};
    use crate::{Matrix, TransportProblem};

    fn quantities(x: &Matrix<i32>) -> Vec<Vec<i32>> {
        (0..x.rows()).map(|i| (0..x.cols()).map(|j| x[(i, j)].quantity).collect()).collect()
    }

    fn basis(x: &Matrix<i32>) -> Vec<(usize, usize)> {
        x.basic_cells().map(|p| (p.row, p.col)).collect()
    }

    fn distribution() -> TransportProblem<i32> {
        TransportProblem::new(
            vec![vec![8, 6, 10, 9], vec![9, 12, 13, 7], vec![14, 9, 16, 5]],
            vec![150, 175, 275],
            vec![200, 100, 150, 150],
        )
        .unwrap()
    }

    #[test]
    fn test_northwest_corner() {
        let p = distribution();
        let x = northwest_corner(&p);
        assert!(x.is_feasible_for(&p));
        assert_eq!(
            quantities(&x),
            vec![vec![150, 0, 0, 0], vec![50, 100, 25, 0], vec![0, 0, 125, 150]]
        );
        assert_eq!(basis(&x), vec![(0, 0), (1, 0), (1, 1), (1, 2), (2, 2), (2, 3)]);
        assert_eq!(x.total_cost(), 5925);
    }

    #[test]
    fn test_northwest_corner_degenerate() {
        // supply and demand are exhausted at the same time
        let p = TransportProblem::new(vec![vec![1, 2], vec![3, 4]], vec![5, 5], vec![5, 5]).unwrap();
        let x = northwest_corner(&p);
        assert_eq!(quantities(&x), vec![vec![5, 0], vec![0, 5]]);
        assert_eq!(basis(&x), vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_minimum_cost() {
        let p = distribution();
        let x = minimum_cost(&p);
        assert!(x.is_feasible_for(&p));
        assert_eq!(
            quantities(&x),
            vec![vec![50, 100, 0, 0], vec![150, 0, 25, 0], vec![0, 0, 125, 150]]
        );
        assert_eq!(x.num_basic(), 6);
        assert_eq!(x.total_cost(), 5425);
    }

    #[test]
    fn test_minimum_cost_ties() {
        let p = TransportProblem::new(vec![vec![0, 2, 1], vec![2, 1, 5], vec![2, 4, 3]], vec![6, 7, 7], vec![5, 5, 10])
            .unwrap();
        let x = minimum_cost(&p);
        assert_eq!(quantities(&x), vec![vec![5, 0, 1], vec![0, 5, 2], vec![0, 0, 7]]);
        assert_eq!(x.total_cost(), 37);
    }

    #[test]
    fn test_vogel() {
        let p = distribution();
        let x = vogel(&p);
        assert!(x.is_feasible_for(&p));
        assert_eq!(
            quantities(&x),
            vec![vec![25, 0, 125, 0], vec![175, 0, 0, 0], vec![0, 100, 25, 150]]
        );
        assert_eq!(basis(&x), vec![(0, 0), (0, 2), (1, 0), (2, 1), (2, 2), (2, 3)]);
        assert_eq!(x.total_cost(), 5075);
    }

    #[test]
    fn test_vogel_row_before_column() {
        // row 1 and column 1 both have the largest penalty 7, the row wins
        let p = TransportProblem::new(
            vec![vec![1, 1, 8], vec![1, 8, 8], vec![9, 9, 7]],
            vec![30, 45, 15],
            vec![25, 15, 50],
        )
        .unwrap();
        let x = vogel(&p);
        assert!(x.is_feasible_for(&p));
        assert_eq!(quantities(&x), vec![vec![0, 15, 15], vec![25, 0, 20], vec![0, 0, 15]]);
        assert_eq!(basis(&x), vec![(0, 1), (0, 2), (1, 0), (1, 2), (2, 2)]);
        assert_eq!(x.total_cost(), 425);
    }

    #[test]
    fn test_method_dispatch() {
        let p = distribution();
        assert_eq!(InitialMethod::NorthwestCorner.solve(&p), northwest_corner(&p));
        assert_eq!(InitialMethod::MinimumCost.solve(&p), minimum_cost(&p));
        assert_eq!(InitialMethod::Vogel.solve(&p), vogel(&p));
        assert_eq!(InitialMethod::Vogel.to_string(), "Vogel's approximation method");
    }

    #[test]
    fn test_input_unchanged() {
        let p = distribution();
        let q = p.clone();
        for &method in &[InitialMethod::NorthwestCorner, InitialMethod::MinimumCost, InitialMethod::Vogel] {
            method.solve(&p);
        }
        assert_eq!(p, q);
    }
}
