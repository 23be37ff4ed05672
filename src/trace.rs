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

//! Step-by-step traces of the multiplier method.
//!
//! The optimizer reports every phase of every iteration to a
//! [`TraceSink`]. A trace is meant for explaining the method, e.g. by a
//! front end rendering each step, and is not needed for solving. The
//! default sink [`NoTrace`] discards all steps, in which case no matrix
//! snapshots are taken at all.

use crate::initial::InitialMethod;
use crate::matrix::{Matrix, Position};
use crate::modi::Multipliers;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// The phase of the method a step belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum StepKind {
    InitialSolution,
    ComputeMultipliers,
    ComputeNonBasicValues,
    OptimalityCheck,
    ImproveSolution,
}

/// Phase specific data of a step.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum StepData<F> {
    /// The initial solution and the method that computed it.
    InitialSolution { method: InitialMethod },
    /// The multipliers `u` (rows) and `v` (columns).
    ComputeMultipliers { multipliers: Multipliers<F> },
    /// The evaluation values `u_i + v_j - c_ij` of the non-basic cells
    /// (`None` for basic cells).
    ComputeNonBasicValues { values: Vec<Vec<Option<F>>> },
    /// The result of the optimality test, `None` if the solution is optimal.
    OptimalityCheck { entering: Option<Position> },
    /// A basis change along a cycle.
    ImproveSolution {
        entering: Position,
        cycle: Vec<Position>,
        theta: F,
        leaving: Position,
    },
}

/// A single recorded step.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Step<F> {
    /// The iteration, 0 for the initial solution.
    pub iteration: usize,
    pub title: String,
    pub description: String,
    /// Snapshot of the assignment matrix when the step was recorded.
    pub matrix: Matrix<F>,
    pub data: StepData<F>,
}

impl<F> Step<F> {
    pub fn kind(&self) -> StepKind {
        match self.data {
            StepData::InitialSolution { .. } => StepKind::InitialSolution,
            StepData::ComputeMultipliers { .. } => StepKind::ComputeMultipliers,
            StepData::ComputeNonBasicValues { .. } => StepKind::ComputeNonBasicValues,
            StepData::OptimalityCheck { .. } => StepKind::OptimalityCheck,
            StepData::ImproveSolution { .. } => StepKind::ImproveSolution,
        }
    }
}

/// Receiver of trace steps.
pub trait TraceSink<F> {
    /// Return `false` if recorded steps are discarded anyway.
    ///
    /// The optimizer does not build steps for disabled sinks.
    fn is_enabled(&self) -> bool {
        true
    }

    fn record(&mut self, step: Step<F>);
}

impl<F> TraceSink<F> for Vec<Step<F>> {
    fn record(&mut self, step: Step<F>) {
        self.push(step)
    }
}

/// A sink ignoring all steps.
#[derive(Clone, Copy, Default, Debug)]
pub struct NoTrace;

impl<F> TraceSink<F> for NoTrace {
    fn is_enabled(&self) -> bool {
        false
    }

    fn record(&mut self, _step: Step<F>) {}
}
