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

//! Errors reported by this crate.

use crate::matrix::Position;
use std::io;

/// Error when constructing, reading or solving a transportation problem.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The problem data violates one of the problem invariants.
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),
    /// An assignment matrix does not match the size of the problem.
    #[error("Dimension mismatch: expected {expected:?} matrix, got {got:?}")]
    DimensionMismatch { expected: (usize, usize), got: (usize, usize) },
    /// The costs of an assignment matrix differ from the problem's costs.
    #[error("Cost mismatch: cell {0} has a different cost than the problem")]
    CostMismatch(Position),
    #[error("Format error on line {line}: {msg}")]
    Format { line: usize, msg: String },
    #[error("Data error on line {line}: {msg}")]
    Data { line: usize, msg: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
