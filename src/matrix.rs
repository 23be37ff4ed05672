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

//! Assignment matrices.
//!
//! An assignment matrix stores for each pair `(i, j)` of origin and
//! destination the unit cost, the currently shipped quantity and whether
//! the cell belongs to the current basis. Matrices have value semantics:
//! cloning a matrix yields an independent snapshot.

use crate::error::{Error, Result};
use crate::problem::TransportProblem;
use either::Either;
use num_traits::{NumAssign, Zero};
use std::fmt;
use std::ops::{Index, IndexMut};

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// A position `(row, col)` in an assignment matrix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "({}, {})", self.row + 1, self.col + 1)
    }
}

/// A single entry of an assignment matrix.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Cell<F> {
    cost: F,
    /// The number of units shipped through this cell.
    pub quantity: F,
    /// Whether the cell is a basic variable.
    pub is_basic: bool,
}

impl<F> Cell<F>
where
    F: Zero + Copy,
{
    /// An empty, non-basic cell.
    pub fn new(cost: F) -> Self {
        Cell {
            cost,
            quantity: F::zero(),
            is_basic: false,
        }
    }

    pub fn with_quantity(cost: F, quantity: F, is_basic: bool) -> Self {
        Cell {
            cost,
            quantity,
            is_basic,
        }
    }

    /// The unit cost of this cell.
    pub fn cost(&self) -> F {
        self.cost
    }
}

/// A row or a column of a matrix.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Line {
    Row(usize),
    Col(usize),
}

/// A dense `rows x cols` matrix of [`Cell`]s stored in row-major order.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Matrix<F> {
    rows: usize,
    cols: usize,
    cells: Vec<Cell<F>>,
}

impl<F> Matrix<F>
where
    F: NumAssign + PartialOrd + Copy,
{
    /// Create the empty assignment matrix of a problem.
    ///
    /// All cells carry the problem's costs, zero quantity and are
    /// non-basic.
    pub fn from_problem(problem: &TransportProblem<F>) -> Self {
        Matrix {
            rows: problem.rows(),
            cols: problem.cols(),
            cells: problem
                .costs()
                .iter()
                .flat_map(|row| row.iter().map(|&c| Cell::new(c)))
                .collect(),
        }
    }

    /// Create a matrix from its rows.
    ///
    /// Returns an error if the rows do not have equal length.
    pub fn from_cells(rows: Vec<Vec<Cell<F>>>) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut cells = Vec::with_capacity(nrows * ncols);
        for row in rows {
            if row.len() != ncols {
                return Err(Error::DimensionMismatch {
                    expected: (nrows, ncols),
                    got: (nrows, row.len()),
                });
            }
            cells.extend(row);
        }
        Ok(Matrix {
            rows: nrows,
            cols: ncols,
            cells,
        })
    }

    /// Sum of the quantities in row `i`.
    pub fn row_total(&self, i: usize) -> F {
        self.line(Line::Row(i)).fold(F::zero(), |acc, (_, c)| acc + c.quantity)
    }

    /// Sum of the quantities in column `j`.
    pub fn col_total(&self, j: usize) -> F {
        self.line(Line::Col(j)).fold(F::zero(), |acc, (_, c)| acc + c.quantity)
    }

    /// Return `true` if this matrix ships exactly the supply and demand of `problem`.
    pub fn is_feasible_for(&self, problem: &TransportProblem<F>) -> bool {
        self.shape() == (problem.rows(), problem.cols())
            && self.cells.iter().all(|c| c.quantity >= F::zero())
            && (0..self.rows).all(|i| self.row_total(i) == problem.supply()[i])
            && (0..self.cols).all(|j| self.col_total(j) == problem.demand()[j])
    }

    /// The total cost `sum c_ij * x_ij` of the assignment.
    pub fn total_cost(&self) -> F {
        self.cells.iter().fold(F::zero(), |acc, c| acc + c.cost * c.quantity)
    }
}

impl<F> Matrix<F> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The pair `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&Cell<F>> {
        if i < self.rows && j < self.cols {
            Some(&self.cells[i * self.cols + j])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut Cell<F>> {
        if i < self.rows && j < self.cols {
            Some(&mut self.cells[i * self.cols + j])
        } else {
            None
        }
    }

    /// Iterate over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell<F>)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(k, c)| (Position::new(k / cols, k % cols), c))
    }

    /// Iterate over the cells of a single row or column.
    pub fn line(&self, line: Line) -> impl Iterator<Item = (Position, &Cell<F>)> + '_ {
        match line {
            Line::Row(i) => Either::Left((0..self.cols).map(move |j| (Position::new(i, j), &self[(i, j)]))),
            Line::Col(j) => Either::Right((0..self.rows).map(move |i| (Position::new(i, j), &self[(i, j)]))),
        }
    }

    /// Iterate over the positions of all basic cells in row-major order.
    pub fn basic_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.iter().filter(|(_, c)| c.is_basic).map(|(p, _)| p)
    }

    /// The number of basic cells.
    pub fn num_basic(&self) -> usize {
        self.cells.iter().filter(|c| c.is_basic).count()
    }
}

impl<F> Index<(usize, usize)> for Matrix<F> {
    type Output = Cell<F>;

    fn index(&self, (i, j): (usize, usize)) -> &Cell<F> {
        assert!(i < self.rows && j < self.cols, "Invalid position ({}, {})", i, j);
        &self.cells[i * self.cols + j]
    }
}

impl<F> IndexMut<(usize, usize)> for Matrix<F> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Cell<F> {
        assert!(i < self.rows && j < self.cols, "Invalid position ({}, {})", i, j);
        &mut self.cells[i * self.cols + j]
    }
}

impl<F> Index<Position> for Matrix<F> {
    type Output = Cell<F>;

    fn index(&self, p: Position) -> &Cell<F> {
        &self[(p.row, p.col)]
    }
}

impl<F> IndexMut<Position> for Matrix<F> {
    fn index_mut(&mut self, p: Position) -> &mut Cell<F> {
        &mut self[(p.row, p.col)]
    }
}

/// The total cost `sum c_ij * x_ij` of an assignment matrix.
pub fn total_cost<F>(matrix: &Matrix<F>) -> F
where
    F: NumAssign + PartialOrd + Copy,
{
    matrix.total_cost()
}
