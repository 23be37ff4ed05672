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

//! The multiplier method (MODI, modified distribution method).
//!
//! Starting from a basic feasible solution the method repeatedly
//!
//! 1. computes multipliers `u_i` (rows) and `v_j` (columns) with
//!    `u_i + v_j = c_ij` for all basic cells, where `u_0 = 0`,
//! 2. computes the evaluation values `u_i + v_j - c_ij` of all non-basic
//!    cells,
//! 3. stops if no evaluation value is positive (the solution is optimal)
//!    and otherwise selects the cell with the largest value as entering
//!    cell,
//! 4. ships the largest possible quantity `theta` around the cycle closed
//!    by the entering cell, which removes one cell from the basis.
//!
//! The method is the transportation simplex method, a specialization of
//! the network simplex method to complete bipartite graphs.

use crate::cycle::find_cycle;
use crate::error::{Error, Result};
use crate::initial::InitialMethod;
use crate::matrix::{Matrix, Position};
use crate::problem::TransportProblem;
use crate::trace::{NoTrace, Step, StepData, TraceSink};
use log::{debug, trace, warn};
use num_traits::{NumAssign, Signed};
use std::fmt::Debug;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// The default maximal number of iterations of [`Modi`].
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// The default maximal number of propagation rounds for the multipliers.
pub const DEFAULT_MAX_PROPAGATION_ROUNDS: usize = 1000;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum SolutionState {
    /// Unknown state, the problem has not been solved, yet
    Unknown,
    /// The solution is optimal
    Optimal,
    /// The iteration limit has been reached before optimality could be
    /// shown, e.g. due to cycling
    IterationLimit,
    /// The basis does not admit an improving cycle
    DegenerateBasis,
}

/// The dual multipliers of a basis.
///
/// Entries are `None` if they could not be determined because the basis
/// is not connected.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Multipliers<F> {
    pub u: Vec<Option<F>>,
    pub v: Vec<Option<F>>,
}

impl<F> Multipliers<F>
where
    F: NumAssign + Copy,
{
    /// Return `true` if all multipliers are known.
    pub fn is_complete(&self) -> bool {
        self.u.iter().chain(self.v.iter()).all(Option::is_some)
    }

    /// The value of `u_i`, unknown values count as 0.
    pub fn u_value(&self, i: usize) -> F {
        self.u[i].unwrap_or_else(F::zero)
    }

    /// The value of `v_j`, unknown values count as 0.
    pub fn v_value(&self, j: usize) -> F {
        self.v[j].unwrap_or_else(F::zero)
    }
}

/// The result of [`optimize`].
#[derive(Clone, Debug)]
pub struct Solution<F> {
    /// The final assignment.
    pub matrix: Matrix<F>,
    /// The recorded steps, empty if no trace was requested.
    pub trace: Vec<Step<F>>,
    pub state: SolutionState,
    /// The number of basis changes.
    pub iterations: usize,
}

impl<F> Solution<F> {
    pub fn is_optimal(&self) -> bool {
        self.state == SolutionState::Optimal
    }
}

/// The multiplier method.
pub struct Modi<'a, F> {
    problem: &'a TransportProblem<F>,

    /// The maximal number of iterations.
    ///
    /// Each iteration performs an optimality test and possibly a basis
    /// change. The default is [`DEFAULT_MAX_ITERATIONS`].
    pub max_iterations: usize,
    /// The maximal number of rounds when propagating multipliers.
    pub max_propagation_rounds: usize,
    /// The (evaluation) value to be considered zero. Defaults to `F::zero()`.
    ///
    /// A non-basic cell is only chosen as entering cell if its
    /// evaluation value is larger than this value. For floating-point
    /// types something like `1e-9` should be used.
    pub zero: F,
    /// Whether disconnected (degenerate) bases are completed.
    ///
    /// If `true` (the default) and some multipliers cannot be determined,
    /// the cheapest non-basic cell linking a row or column with known
    /// multiplier to one with unknown multiplier is added to the basis
    /// with quantity zero, until all multipliers are known. If `false`
    /// unknown multipliers are treated as zero.
    pub complete_basis: bool,

    niter: usize,
    solution_state: SolutionState,
}

impl<'a, F> Modi<'a, F>
where
    F: NumAssign + Signed + PartialOrd + Copy + Debug,
{
    pub fn new(problem: &'a TransportProblem<F>) -> Self {
        Modi {
            problem,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_propagation_rounds: DEFAULT_MAX_PROPAGATION_ROUNDS,
            zero: F::zero(),
            complete_basis: true,
            niter: 0,
            solution_state: SolutionState::Unknown,
        }
    }

    pub fn problem(&self) -> &'a TransportProblem<F> {
        self.problem
    }

    /// The number of basis changes of the latest computation.
    pub fn num_iterations(&self) -> usize {
        self.niter
    }

    /// Return the solution state of the latest computation.
    pub fn solution_state(&self) -> SolutionState {
        self.solution_state
    }

    /// Optimize the initial solution `initial`.
    ///
    /// `method` is the method that computed the initial solution, it is
    /// only used for the trace. If `generate_trace` is `true` all steps
    /// are recorded in the returned solution.
    pub fn solve(&mut self, initial: &Matrix<F>, method: InitialMethod, generate_trace: bool) -> Result<Solution<F>> {
        let mut trace = Vec::new();
        let matrix = if generate_trace {
            self.solve_with(initial, method, &mut trace)?
        } else {
            self.solve_with(initial, method, &mut NoTrace)?
        };
        Ok(Solution {
            matrix,
            trace,
            state: self.solution_state,
            iterations: self.niter,
        })
    }

    /// Optimize the initial solution `initial` and report all steps to `sink`.
    ///
    /// Returns the final assignment matrix. The input matrix is not
    /// modified. If the returned matrix is not optimal,
    /// [`Modi::solution_state`] tells why.
    pub fn solve_with<S>(&mut self, initial: &Matrix<F>, method: InitialMethod, sink: &mut S) -> Result<Matrix<F>>
    where
        S: TraceSink<F>,
    {
        let expected = (self.problem.rows(), self.problem.cols());
        if initial.shape() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                got: initial.shape(),
            });
        }

        if let Some((p, _)) = initial
            .iter()
            .find(|&(p, c)| c.cost() != *self.problem.cost(p.row, p.col))
        {
            return Err(Error::CostMismatch(p));
        }

        self.niter = 0;
        self.solution_state = SolutionState::Unknown;

        let mut x = initial.clone();

        if sink.is_enabled() {
            sink.record(Step {
                iteration: 0,
                title: "Initial solution".to_string(),
                description: format!(
                    "The initial solution has been computed with the {}. It is now tested for optimality with the multiplier method.",
                    method
                ),
                matrix: x.clone(),
                data: StepData::InitialSolution { method },
            });
        }

        for iteration in 1..=self.max_iterations {
            let multipliers = self.compute_multipliers(&mut x);
            trace!("Iteration {}: u = {:?}, v = {:?}", iteration, multipliers.u, multipliers.v);
            if sink.is_enabled() {
                sink.record(Step {
                    iteration,
                    title: format!("Iteration {}: compute multipliers", iteration),
                    description: "Starting with u1 = 0 the multipliers ui (rows) and vj (columns) are chosen such that ui + vj equals the cost of every basic cell.".to_string(),
                    matrix: x.clone(),
                    data: StepData::ComputeMultipliers {
                        multipliers: multipliers.clone(),
                    },
                });
            }

            let values = evaluations(&x, &multipliers);
            if sink.is_enabled() {
                sink.record(Step {
                    iteration,
                    title: format!("Iteration {}: evaluate non-basic cells", iteration),
                    description: "For every non-basic cell the value ui + vj - cij is computed. A positive value means that shipping through this cell reduces the total cost.".to_string(),
                    matrix: x.clone(),
                    data: StepData::ComputeNonBasicValues { values: values.clone() },
                });
            }

            let entering = self.entering_cell(&values);
            if sink.is_enabled() {
                let description = match entering {
                    Some(p) => format!(
                        "The cell {} has the largest positive value, so the solution is not optimal and the cell enters the basis.",
                        p
                    ),
                    None => "No non-basic cell has a positive value, so the solution is optimal.".to_string(),
                };
                sink.record(Step {
                    iteration,
                    title: match entering {
                        Some(_) => format!("Iteration {}: solution not optimal", iteration),
                        None => format!("Iteration {}: optimal solution found", iteration),
                    },
                    description,
                    matrix: x.clone(),
                    data: StepData::OptimalityCheck { entering },
                });
            }

            let entering = match entering {
                Some(p) => p,
                None => {
                    debug!("Optimal after {} basis changes, cost {:?}", self.niter, x.total_cost());
                    self.solution_state = SolutionState::Optimal;
                    return Ok(x);
                }
            };

            let cycle = match find_cycle(&x, entering) {
                Some(cycle) => cycle,
                None => {
                    warn!("No cycle through entering cell {}, basis is degenerate", entering);
                    self.solution_state = SolutionState::DegenerateBasis;
                    return Ok(x);
                }
            };

            let (theta, leaving) = max_shift(&x, &cycle);

            if sink.is_enabled() {
                sink.record(Step {
                    iteration,
                    title: format!("Iteration {}: improve solution", iteration),
                    description: format!(
                        "The cell {} closes a cycle of {} cells. The quantity theta is added to the cells at even positions and subtracted from the cells at odd positions. The cell {} leaves the basis.",
                        entering,
                        cycle.len(),
                        leaving
                    ),
                    matrix: x.clone(),
                    data: StepData::ImproveSolution {
                        entering,
                        cycle: cycle.clone(),
                        theta,
                        leaving,
                    },
                });
            }

            x = shift(&x, &cycle, theta, leaving);
            self.niter += 1;
            debug!(
                "Iteration {}: entering {}, leaving {}, theta {:?}, cost {:?}",
                iteration,
                entering,
                leaving,
                theta,
                x.total_cost()
            );
        }

        warn!("Iteration limit {} reached", self.max_iterations);
        self.solution_state = SolutionState::IterationLimit;
        Ok(x)
    }

    /// Compute the multipliers, completing the basis if necessary.
    fn compute_multipliers(&self, x: &mut Matrix<F>) -> Multipliers<F> {
        let mut m = Multipliers {
            u: vec![None; x.rows()],
            v: vec![None; x.cols()],
        };
        if let Some(u0) = m.u.first_mut() {
            *u0 = Some(F::zero());
        }

        loop {
            propagate(x, &mut m, self.max_propagation_rounds);
            if m.is_complete() {
                break;
            }

            if !self.complete_basis {
                debug!("Multipliers incomplete, using zero for unknown values");
                break;
            }

            // cheapest cell linking a known and an unknown multiplier
            let mut link: Option<(Position, F)> = None;
            for (p, c) in x.iter() {
                if !c.is_basic
                    && m.u[p.row].is_some() != m.v[p.col].is_some()
                    && link.map(|(_, cost)| c.cost() < cost).unwrap_or(true)
                {
                    link = Some((p, c.cost()));
                }
            }

            match link {
                Some((p, _)) => {
                    debug!("Complete degenerate basis with cell {}", p);
                    x[p].is_basic = true;
                }
                None => break,
            }
        }

        m
    }

    /// The non-basic cell with the largest positive evaluation value.
    fn entering_cell(&self, values: &[Vec<Option<F>>]) -> Option<Position> {
        let mut best = self.zero;
        let mut entering = None;
        for (i, row) in values.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                if let Some(value) = *value {
                    if value > best {
                        best = value;
                        entering = Some(Position::new(i, j));
                    }
                }
            }
        }
        entering
    }
}

/// Compute the multipliers of the basis of `x` without modifying it.
///
/// The multipliers satisfy `u_i + v_j = c_ij` for all basic cells with
/// `u_0 = 0`. They are determined by repeatedly solving the equation of
/// a basic cell with exactly one known multiplier, until nothing changes
/// anymore or `max_rounds` passes have been done. Multipliers of rows and
/// columns not connected to row 0 remain unknown.
pub fn multipliers<F>(x: &Matrix<F>, max_rounds: usize) -> Multipliers<F>
where
    F: NumAssign + Copy,
{
    let mut m = Multipliers {
        u: vec![None; x.rows()],
        v: vec![None; x.cols()],
    };
    if let Some(u0) = m.u.first_mut() {
        *u0 = Some(F::zero());
    }
    propagate(x, &mut m, max_rounds);
    m
}

fn propagate<F>(x: &Matrix<F>, m: &mut Multipliers<F>, max_rounds: usize)
where
    F: NumAssign + Copy,
{
    for _ in 0..max_rounds {
        let mut changed = false;
        for p in x.basic_cells() {
            let c = x[p].cost();
            match (m.u[p.row], m.v[p.col]) {
                (Some(u), None) => {
                    m.v[p.col] = Some(c - u);
                    changed = true;
                }
                (None, Some(v)) => {
                    m.u[p.row] = Some(c - v);
                    changed = true;
                }
                _ => (),
            }
        }
        if !changed {
            break;
        }
    }
}

/// The evaluation values `u_i + v_j - c_ij` of all non-basic cells.
///
/// Basic cells get `None`. Unknown multipliers count as zero.
pub fn evaluations<F>(x: &Matrix<F>, m: &Multipliers<F>) -> Vec<Vec<Option<F>>>
where
    F: NumAssign + Copy,
{
    let mut values = vec![vec![None; x.cols()]; x.rows()];
    for (p, c) in x.iter() {
        if !c.is_basic {
            values[p.row][p.col] = Some(m.u_value(p.row) + m.v_value(p.col) - c.cost());
        }
    }
    values
}

/// The quantity that can be shifted around `cycle` and the leaving cell.
///
/// This is the minimal quantity of the cells at odd positions, the
/// leaving cell is the first cell at which the minimum is attained.
fn max_shift<F>(x: &Matrix<F>, cycle: &[Position]) -> (F, Position)
where
    F: NumAssign + PartialOrd + Copy,
{
    let mut theta = x[cycle[1]].quantity;
    let mut leaving = cycle[1];
    for &p in cycle.iter().skip(3).step_by(2) {
        if x[p].quantity < theta {
            theta = x[p].quantity;
            leaving = p;
        }
    }
    (theta, leaving)
}

/// Return a copy of `x` with `theta` shifted around `cycle`.
///
/// Only `leaving` leaves the basis, other cells dropping to zero stay
/// basic (degenerate).
fn shift<F>(x: &Matrix<F>, cycle: &[Position], theta: F, leaving: Position) -> Matrix<F>
where
    F: NumAssign + Copy,
{
    let mut y = x.clone();
    for (k, &p) in cycle.iter().enumerate() {
        let cell = &mut y[p];
        if k % 2 == 0 {
            cell.quantity += theta;
            cell.is_basic = true;
        } else {
            cell.quantity -= theta;
        }
    }
    y[leaving].is_basic = false;
    y
}

/// Optimize an initial solution of `problem` with the multiplier method.
///
/// This is a convenience wrapper around [`Modi`] with default settings.
///
/// # Example
///
/// ```
/// use rs_transport::{initial, optimize, InitialMethod, TransportProblem};
///
/// let p = TransportProblem::new(
///     vec![vec![8, 6, 10, 9], vec![9, 12, 13, 7], vec![14, 9, 16, 5]],
///     vec![150, 175, 275],
///     vec![200, 100, 150, 150],
/// ).unwrap();
/// let x = initial::northwest_corner(&p);
/// let sol = optimize(&p, &x, InitialMethod::NorthwestCorner, false).unwrap();
/// assert!(sol.is_optimal());
/// assert_eq!(sol.iterations, 2);
/// assert_eq!(sol.matrix.total_cost(), 5075);
/// ```
pub fn optimize<F>(
    problem: &TransportProblem<F>,
    initial: &Matrix<F>,
    method: InitialMethod,
    generate_trace: bool,
) -> Result<Solution<F>>
where
    F: NumAssign + Signed + PartialOrd + Copy + Debug,
{
    Modi::new(problem).solve(initial, method, generate_trace)
}
