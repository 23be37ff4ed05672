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

//! Solvers for the balanced transportation problem.
//!
//! A transportation problem ships goods from origins with given supply
//! to destinations with given demand at minimal total cost. This crate
//! provides
//!
//! - the problem data [`TransportProblem`] and assignment matrices [`Matrix`],
//! - three methods computing an initial basic feasible solution
//!   ([`northwest_corner`], [`minimum_cost`] and [`vogel`]),
//! - the multiplier method ([`Modi`], [`optimize`]) improving an initial
//!   solution to an optimal one, optionally recording a step-by-step
//!   trace of all iterations.
//!
//! # Example
//!
//! ```
//! use rs_transport::{optimize, InitialMethod, TransportProblem};
//!
//! let p = TransportProblem::new(
//!     vec![vec![8, 6, 10, 9], vec![9, 12, 13, 7], vec![14, 9, 16, 5]],
//!     vec![150, 175, 275],
//!     vec![200, 100, 150, 150],
//! ).unwrap();
//!
//! let x = InitialMethod::MinimumCost.solve(&p);
//! assert_eq!(x.total_cost(), 5425);
//!
//! let sol = optimize(&p, &x, InitialMethod::MinimumCost, true).unwrap();
//! assert!(sol.is_optimal());
//! assert_eq!(sol.matrix.total_cost(), 5075);
//! ```

pub mod error;
pub use self::error::{Error, Result};

pub mod problem;
pub use self::problem::TransportProblem;

pub mod matrix;
pub use self::matrix::{total_cost, Cell, Line, Matrix, Position};

// # Algorithms

pub mod cycle;
pub mod initial;
pub use self::initial::{minimum_cost, northwest_corner, vogel, InitialMethod};

pub mod modi;
pub use self::modi::{optimize, Modi, Multipliers, Solution, SolutionState};

pub mod trace;
pub use self::trace::{NoTrace, Step, StepData, StepKind, TraceSink};

// # Input and output

pub mod text;
