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

//! The data of a transportation problem instance.

use crate::error::{Error, Result};
use num_traits::Signed;
use std::borrow::Cow;
#[cfg(feature = "serialize")]
use std::convert::TryFrom;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// A balanced transportation problem.
///
/// The problem consists of `m` origins with a given supply, `n`
/// destinations with a given demand and the unit cost `c_ij` of shipping
/// from origin `i` to destination `j`. The instance is immutable once
/// it has been constructed by [`TransportProblem::new`], which ensures
///
/// - there are at least two origins and two destinations,
/// - the cost matrix is rectangular with size `m x n`,
/// - no cost, supply or demand value is negative,
/// - total supply equals total demand.
///
/// # Example
///
/// ```
/// use rs_transport::TransportProblem;
///
/// let p = TransportProblem::new(
///     vec![vec![0, 2, 1], vec![2, 1, 5], vec![2, 4, 3]],
///     vec![6, 7, 7],
///     vec![5, 5, 10],
/// ).unwrap();
/// assert_eq!(p.rows(), 3);
/// assert_eq!(p.total_supply(), 20);
/// assert_eq!(p.origin_label(1), "O2");
///
/// assert!(TransportProblem::new(vec![vec![1, 2], vec![3, 4]], vec![5, 5], vec![5, 6]).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serialize",
    serde(
        try_from = "RawProblem<F>",
        bound(deserialize = "F: serde::Deserialize<'de> + Signed + PartialOrd + Copy")
    )
)]
pub struct TransportProblem<F> {
    costs: Vec<Vec<F>>,
    supply: Vec<F>,
    demand: Vec<F>,
    origin_labels: Option<Vec<String>>,
    destination_labels: Option<Vec<String>>,
}

impl<F> TransportProblem<F>
where
    F: Signed + PartialOrd + Copy,
{
    /// Create a new problem and check its invariants.
    pub fn new(costs: Vec<Vec<F>>, supply: Vec<F>, demand: Vec<F>) -> Result<Self> {
        let rows = supply.len();
        let cols = demand.len();

        if rows < 2 || cols < 2 {
            return Err(Error::InvalidProblem(format!(
                "at least 2 origins and 2 destinations required, got {}x{}",
                rows, cols
            )));
        }

        if costs.len() != rows {
            return Err(Error::InvalidProblem(format!(
                "cost matrix has {} rows, but there are {} origins",
                costs.len(),
                rows
            )));
        }

        for (i, row) in costs.iter().enumerate() {
            if row.len() != cols {
                return Err(Error::InvalidProblem(format!(
                    "cost row {} has {} entries, but there are {} destinations",
                    i + 1,
                    row.len(),
                    cols
                )));
            }
            if let Some(j) = row.iter().position(|c| c.is_negative()) {
                return Err(Error::InvalidProblem(format!("negative cost at ({}, {})", i + 1, j + 1)));
            }
        }

        if let Some(i) = supply.iter().position(|s| s.is_negative()) {
            return Err(Error::InvalidProblem(format!("negative supply at origin {}", i + 1)));
        }

        if let Some(j) = demand.iter().position(|d| d.is_negative()) {
            return Err(Error::InvalidProblem(format!("negative demand at destination {}", j + 1)));
        }

        let total_supply = supply.iter().fold(F::zero(), |acc, &s| acc + s);
        let total_demand = demand.iter().fold(F::zero(), |acc, &d| acc + d);
        if total_supply != total_demand {
            return Err(Error::InvalidProblem(
                "unbalanced problem, total supply differs from total demand".to_string(),
            ));
        }

        Ok(TransportProblem {
            costs,
            supply,
            demand,
            origin_labels: None,
            destination_labels: None,
        })
    }

    /// Attach display names to the origins and destinations.
    pub fn with_labels(mut self, origins: Vec<String>, destinations: Vec<String>) -> Result<Self> {
        if origins.len() != self.rows() || destinations.len() != self.cols() {
            return Err(Error::InvalidProblem(format!(
                "expected {} origin and {} destination labels, got {} and {}",
                self.rows(),
                self.cols(),
                origins.len(),
                destinations.len()
            )));
        }
        self.origin_labels = Some(origins);
        self.destination_labels = Some(destinations);
        Ok(self)
    }

    /// Total supply, which equals total demand.
    pub fn total_supply(&self) -> F {
        self.supply.iter().fold(F::zero(), |acc, &s| acc + s)
    }
}

/// The unchecked fields of a deserialized problem.
#[cfg(feature = "serialize")]
#[derive(Deserialize)]
struct RawProblem<F> {
    costs: Vec<Vec<F>>,
    supply: Vec<F>,
    demand: Vec<F>,
    origin_labels: Option<Vec<String>>,
    destination_labels: Option<Vec<String>>,
}

#[cfg(feature = "serialize")]
impl<F> TryFrom<RawProblem<F>> for TransportProblem<F>
where
    F: Signed + PartialOrd + Copy,
{
    type Error = Error;

    fn try_from(raw: RawProblem<F>) -> Result<Self> {
        let problem = TransportProblem::new(raw.costs, raw.supply, raw.demand)?;
        match (raw.origin_labels, raw.destination_labels) {
            (Some(origins), Some(destinations)) => problem.with_labels(origins, destinations),
            (None, None) => Ok(problem),
            _ => Err(Error::InvalidProblem(
                "labels must be given for both origins and destinations".to_string(),
            )),
        }
    }
}

impl<F> TransportProblem<F> {
    /// The number of origins.
    pub fn rows(&self) -> usize {
        self.supply.len()
    }

    /// The number of destinations.
    pub fn cols(&self) -> usize {
        self.demand.len()
    }

    pub fn costs(&self) -> &[Vec<F>] {
        &self.costs
    }

    pub fn cost(&self, i: usize, j: usize) -> &F {
        &self.costs[i][j]
    }

    pub fn supply(&self) -> &[F] {
        &self.supply
    }

    pub fn demand(&self) -> &[F] {
        &self.demand
    }

    /// The name of origin `i`, `O<i+1>` if no labels have been given.
    pub fn origin_label(&self, i: usize) -> Cow<str> {
        match &self.origin_labels {
            Some(labels) => Cow::Borrowed(labels[i].as_str()),
            None => Cow::Owned(format!("O{}", i + 1)),
        }
    }

    /// The name of destination `j`, `D<j+1>` if no labels have been given.
    pub fn destination_label(&self, j: usize) -> Cow<str> {
        match &self.destination_labels {
            Some(labels) => Cow::Borrowed(labels[j].as_str()),
            None => Cow::Owned(format!("D{}", j + 1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TransportProblem;
    use crate::Error;

    #[test]
    fn test_invalid() {
        let err = TransportProblem::new(vec![vec![1, 2]], vec![5], vec![2, 3]);
        assert!(matches!(err, Err(Error::InvalidProblem(_))));

        let err = TransportProblem::new(vec![vec![1, 2], vec![3]], vec![2, 3], vec![2, 3]);
        assert!(matches!(err, Err(Error::InvalidProblem(_))));

        let err = TransportProblem::new(vec![vec![1, -2], vec![3, 4]], vec![2, 3], vec![2, 3]);
        assert!(matches!(err, Err(Error::InvalidProblem(_))));

        let err = TransportProblem::new(vec![vec![1, 2], vec![3, 4]], vec![-2, 7], vec![2, 3]);
        assert!(matches!(err, Err(Error::InvalidProblem(_))));

        let err = TransportProblem::new(vec![vec![1, 2], vec![3, 4]], vec![2, 3], vec![2, 4]);
        assert!(matches!(err, Err(Error::InvalidProblem(_))));
    }

    #[test]
    fn test_labels() {
        let p = TransportProblem::new(vec![vec![1, 2], vec![3, 4]], vec![5, 5], vec![4, 6]).unwrap();
        assert_eq!(p.origin_label(0), "O1");
        assert_eq!(p.destination_label(1), "D2");

        let p = p
            .with_labels(
                vec!["Bremen".to_string(), "Hamburg".to_string()],
                vec!["Berlin".to_string(), "Munich".to_string()],
            )
            .unwrap();
        assert_eq!(p.origin_label(1), "Hamburg");
        assert_eq!(p.destination_label(0), "Berlin");

        assert!(p.clone().with_labels(vec!["A".to_string()], vec![]).is_err());
    }

    #[cfg(feature = "serialize")]
    mod serialize {
        use super::super::TransportProblem;
        use serde_json;

        #[test]
        fn test_serde_validates() {
            let p = TransportProblem::new(vec![vec![1, 2], vec![3, 4]], vec![5, 5], vec![4, 6])
                .unwrap()
                .with_labels(
                    vec!["A".to_string(), "B".to_string()],
                    vec!["X".to_string(), "Y".to_string()],
                )
                .unwrap();
            let serialized = serde_json::to_string(&p).unwrap();
            let q: TransportProblem<i32> = serde_json::from_str(&serialized).unwrap();
            assert_eq!(p, q);

            let empty = r#"{"costs":[],"supply":[],"demand":[],"origin_labels":null,"destination_labels":null}"#;
            assert!(serde_json::from_str::<TransportProblem<i32>>(empty).is_err());

            let unbalanced =
                r#"{"costs":[[1,2],[3,4]],"supply":[5,5],"demand":[5,6],"origin_labels":null,"destination_labels":null}"#;
            assert!(serde_json::from_str::<TransportProblem<i32>>(unbalanced).is_err());

            let labels = r#"{"costs":[[1,2],[3,4]],"supply":[5,5],"demand":[5,5],"origin_labels":["A"],"destination_labels":null}"#;
            assert!(serde_json::from_str::<TransportProblem<i32>>(labels).is_err());
        }
    }
}
