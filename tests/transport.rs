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

use std::collections::HashMap;
use std::error::Error;
use std::fs::read_dir;
use std::path::Path;

use approx::assert_relative_eq;
use rs_transport::modi::{evaluations, multipliers, DEFAULT_MAX_PROPAGATION_ROUNDS};
use rs_transport::{initial, optimize, text};
use rs_transport::{InitialMethod, Matrix, Modi, SolutionState, StepData, TransportProblem};

const METHODS: [InitialMethod; 3] = [
    InitialMethod::NorthwestCorner,
    InitialMethod::MinimumCost,
    InitialMethod::Vogel,
];

fn instances() -> Result<Vec<(String, TransportProblem<i64>, i64)>, Box<dyn Error>> {
    let mut values = HashMap::new();
    for entry in read_dir(Path::new("tests/tp"))? {
        let entry = entry?;
        if entry.path().extension().map(|ext| ext == "sol").unwrap_or(false) {
            let (value, _) = text::read_solution_from_file::<i64>(&entry.path().to_string_lossy())?;
            if let Some(file_stem) = entry.path().file_stem().map(|s| s.to_string_lossy().to_string()) {
                values.insert(file_stem, value);
            }
        }
    }

    let mut instances = Vec::new();
    for entry in read_dir(Path::new("tests/tp"))? {
        let entry = entry?;
        if entry.path().extension().map(|ext| ext == "tp").unwrap_or(false) {
            let problem = text::read_from_file::<i64>(&entry.path().to_string_lossy())?;
            let name = entry
                .path()
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            match values.get(&name) {
                Some(&value) => instances.push((name, problem, value)),
                None => panic!("Can't find solution file for {:?}", entry.path()),
            }
        }
    }
    instances.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(instances)
}

fn assert_feasible(x: &Matrix<i64>, p: &TransportProblem<i64>) {
    for i in 0..p.rows() {
        assert_eq!(x.row_total(i), p.supply()[i]);
    }
    for j in 0..p.cols() {
        assert_eq!(x.col_total(j), p.demand()[j]);
    }
    assert!(x.iter().all(|(_, c)| c.quantity >= 0));
    assert!(x.iter().all(|(_, c)| c.quantity == 0 || c.is_basic));
}

#[test]
fn test_optimal_values() -> Result<(), Box<dyn Error>> {
    let instances = instances()?;
    assert_eq!(instances.len(), 6);

    for (name, p, value) in &instances {
        for &method in &METHODS {
            let x = method.solve(p);
            assert_feasible(&x, p);

            let sol = optimize(p, &x, method, false)?;
            assert_eq!(sol.state, SolutionState::Optimal, "{} with {}", name, method);
            assert_eq!(sol.matrix.total_cost(), *value, "{} with {}", name, method);
            assert_feasible(&sol.matrix, p);
            assert_eq!(sol.matrix.num_basic(), p.rows() + p.cols() - 1);
        }
    }

    Ok(())
}

#[test]
fn test_optimality_certificate() -> Result<(), Box<dyn Error>> {
    for (_, p, _) in instances()? {
        for &method in &METHODS {
            let sol = optimize(&p, &method.solve(&p), method, false)?;
            assert!(sol.is_optimal());

            let m = multipliers(&sol.matrix, DEFAULT_MAX_PROPAGATION_ROUNDS);
            assert!(m.is_complete());
            for p in sol.matrix.basic_cells() {
                assert_eq!(m.u_value(p.row) + m.v_value(p.col), sol.matrix[p].cost());
            }
            for row in evaluations(&sol.matrix, &m) {
                assert!(row.into_iter().flatten().all(|value| value <= 0));
            }
        }
    }

    Ok(())
}

#[test]
fn test_monotonic_improvement() -> Result<(), Box<dyn Error>> {
    for (name, p, _) in instances()? {
        for &method in &METHODS {
            let sol = optimize(&p, &method.solve(&p), method, true)?;
            let costs = sol
                .trace
                .iter()
                .filter(|step| match step.data {
                    StepData::InitialSolution { .. } | StepData::ImproveSolution { .. } => true,
                    _ => false,
                })
                .map(|step| step.matrix.total_cost())
                .chain(Some(sol.matrix.total_cost()))
                .collect::<Vec<_>>();
            assert_eq!(costs.len(), sol.iterations + 2);
            for w in costs.windows(2) {
                assert!(w[1] <= w[0], "{} with {}: {:?}", name, method, costs);
            }
        }
    }

    Ok(())
}

#[test]
fn test_idempotent() -> Result<(), Box<dyn Error>> {
    for (_, p, _) in instances()? {
        let sol = optimize(&p, &initial::northwest_corner(&p), InitialMethod::NorthwestCorner, false)?;
        let again = optimize(&p, &sol.matrix, InitialMethod::NorthwestCorner, false)?;
        assert!(again.is_optimal());
        assert_eq!(again.iterations, 0);
        assert_eq!(again.matrix, sol.matrix);
    }

    Ok(())
}

#[test]
fn test_northwest_corner_scenario() {
    let p = TransportProblem::new(vec![vec![0, 2, 1], vec![2, 1, 5], vec![2, 4, 3]], vec![6, 7, 7], vec![5, 5, 10])
        .unwrap();
    let x = initial::northwest_corner(&p);
    let sol = optimize(&p, &x, InitialMethod::NorthwestCorner, true).unwrap();
    assert!(sol.is_optimal());
    assert_eq!(sol.matrix.total_cost(), 33);

    let thetas = sol
        .trace
        .iter()
        .filter_map(|step| match &step.data {
            StepData::ImproveSolution {
                entering, theta, cycle, ..
            } => Some((*entering, *theta, cycle.len())),
            _ => None,
        })
        .map(|(p, theta, len)| ((p.row, p.col), theta, len))
        .collect::<Vec<_>>();
    assert_eq!(thetas, vec![((0, 2), 1, 4), ((1, 0), 2, 4)]);
}

#[test]
fn test_minimum_cost_scenario() {
    let p = TransportProblem::new(
        vec![vec![8, 6, 10, 9], vec![9, 12, 13, 7], vec![14, 9, 16, 5]],
        vec![150, 175, 275],
        vec![200, 100, 150, 150],
    )
    .unwrap();
    let x = initial::minimum_cost(&p);
    assert!(x.is_feasible_for(&p));

    let mut modi = Modi::new(&p);
    let sol = modi.solve(&x, InitialMethod::MinimumCost, false).unwrap();
    assert!(sol.is_optimal());
    assert!(modi.num_iterations() < modi.max_iterations);
    assert_eq!(sol.matrix.total_cost(), 5075);
}

#[test]
fn test_tie_scenario() {
    let p = TransportProblem::new(vec![vec![1, 2], vec![3, 4]], vec![5, 5], vec![5, 5]).unwrap();
    for &method in &METHODS {
        let sol = optimize(&p, &method.solve(&p), method, false).unwrap();
        assert!(sol.is_optimal());
        assert_eq!(sol.iterations, 0);
        assert_eq!(sol.matrix.total_cost(), 25);
    }
}

#[test]
fn test_floating_point() {
    let p = TransportProblem::new(
        vec![vec![8.0, 6.0, 10.0, 9.0], vec![9.0, 12.0, 13.0, 7.0], vec![14.0, 9.0, 16.0, 5.0]],
        vec![15.0, 17.5, 27.5],
        vec![20.0, 10.0, 15.0, 15.0],
    )
    .unwrap();

    for &method in &METHODS {
        let mut modi = Modi::new(&p);
        modi.zero = 1e-9;
        let sol = modi.solve(&method.solve(&p), method, false).unwrap();
        assert!(sol.is_optimal());
        assert_relative_eq!(sol.matrix.total_cost(), 507.5, epsilon = 1e-9);
    }
}
