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

//! Reading and writing transportation problems in a line based text format.
//!
//! The format is modelled after the DIMACS formats:
//!
//! 1. empty lines are allowed and ignored
//! 2. a line starting with `c` is a comment line and is ignored
//! 3. the first non-comment line must have the form `p tp <m> <n>`,
//!    where `<m>` is the number of origins and `<n>` the number of
//!    destinations.
//! 4. a line `s <s_1> ... <s_m>` with the supplies and a line
//!    `d <d_1> ... <d_n>` with the demands must follow exactly once.
//! 5. for each origin `i` there must be exactly one line
//!    `a <i> <c_i1> ... <c_in>` with the costs of row `i` (origins are
//!    numbered `1..m`).
//! 6. optional lines `o <i> <label>` and `t <j> <label>` name origin `i`
//!    and destination `j`. If labels are given for some origin or
//!    destination, the remaining ones get their positional name.
//!
//! A solution is written as a line `s <value>` with the total cost
//! followed by lines `f <i> <j> <quantity>` for all cells with non-zero
//! quantity.

use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::problem::TransportProblem;
use num_traits::{NumAssign, Signed};
use std::collections::HashMap;
use std::fmt::Display;
use std::io::{BufRead, BufReader, Read, Write};
use std::str::{FromStr, SplitWhitespace};

/// Iterates over the tokens of a line.
struct Tokens<'a> {
    it: SplitWhitespace<'a>,
    line: usize,
}

impl<'a> Tokens<'a> {
    fn str(&mut self) -> Result<&'a str> {
        let line = self.line;
        self.it.next().ok_or_else(|| Error::Format {
            line,
            msg: "expected token".to_string(),
        })
    }

    fn number<T>(&mut self) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let line = self.line;
        self.it
            .next()
            .ok_or_else(|| Error::Format {
                line,
                msg: "expected number".to_string(),
            })?
            .parse()
            .map_err(|e| Error::Format {
                line,
                msg: format!("{}", e),
            })
    }

    /// Read exactly `n` numbers and ensure the line ends afterwards.
    fn numbers<T>(&mut self, n: usize) -> Result<Vec<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        let values = (0..n).map(|_| self.number()).collect::<Result<Vec<_>>>()?;
        self.end()?;
        Ok(values)
    }

    /// Read a 1-based index in `1..=n`.
    fn index(&mut self, n: usize, what: &str) -> Result<usize> {
        let k: usize = self.number()?;
        if k < 1 || k > n {
            return Err(Error::Data {
                line: self.line,
                msg: format!("invalid {} {} (must be in 1..{})", what, k, n),
            });
        }
        Ok(k - 1)
    }

    /// The remainder of the line.
    fn rest(&mut self) -> String {
        self.it.by_ref().collect::<Vec<_>>().join(" ")
    }

    fn end(&mut self) -> Result<()> {
        match self.it.next() {
            Some(s) => Err(Error::Format {
                line: self.line,
                msg: format!("unexpected token at end of line: {}", s),
            }),
            None => Ok(()),
        }
    }
}

/// Call `f` with descriptor and tokens of each non-comment line.
fn read_lines<R, G>(r: R, mut f: G) -> Result<()>
where
    R: Read,
    G: FnMut(&str, &mut Tokens) -> Result<()>,
{
    let mut reader = BufReader::new(r);
    let mut line = String::new();
    let mut nline = 0;
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        nline += 1;

        let mut toks = Tokens {
            it: line.split_whitespace(),
            line: nline,
        };
        match toks.it.next() {
            None => continue,
            Some(d) if d.starts_with('c') => continue,
            Some(d) => f(d, &mut toks)?,
        }
    }
}

/// Read a transportation problem.
///
/// # Example
///
/// ```
/// use rs_transport::text;
/// use std::io::Cursor;
///
/// let p = text::read::<_, i32>(Cursor::new("p tp 2 2\ns 5 5\nd 4 6\na 1 1 2\na 2 3 4\n")).unwrap();
/// assert_eq!(p.costs(), &[vec![1, 2], vec![3, 4]]);
/// ```
pub fn read<R, F>(r: R) -> Result<TransportProblem<F>>
where
    R: Read,
    F: FromStr + Signed + PartialOrd + Copy,
    F::Err: Display,
{
    let mut size: Option<(usize, usize)> = None;
    let mut supply: Option<Vec<F>> = None;
    let mut demand: Option<Vec<F>> = None;
    // keyed by index, the sizes in the problem line are not trusted
    let mut costs: HashMap<usize, Vec<F>> = HashMap::new();
    let mut origins: HashMap<usize, String> = HashMap::new();
    let mut destinations: HashMap<usize, String> = HashMap::new();

    read_lines(r, |d, toks| {
        let (m, n) = match (d, size) {
            ("p", None) => {
                let kind = toks.str()?;
                if kind != "tp" {
                    return Err(Error::Format {
                        line: toks.line,
                        msg: format!("expected 'tp', got '{}'", kind),
                    });
                }
                let m = toks.number()?;
                let n = toks.number()?;
                toks.end()?;
                size = Some((m, n));
                return Ok(());
            }
            ("p", Some(_)) => {
                return Err(Error::Format {
                    line: toks.line,
                    msg: "duplicate problem line".to_string(),
                })
            }
            (_, None) => {
                return Err(Error::Format {
                    line: toks.line,
                    msg: format!("unexpected line, expected 'p', got '{}'", d),
                })
            }
            (_, Some(size)) => size,
        };

        let line = toks.line;
        let duplicate = |what: &str| Error::Data {
            line,
            msg: format!("duplicate {}", what),
        };

        match d {
            "s" if supply.is_some() => return Err(duplicate("supply line")),
            "s" => supply = Some(toks.numbers(m)?),
            "d" if demand.is_some() => return Err(duplicate("demand line")),
            "d" => demand = Some(toks.numbers(n)?),
            "a" => {
                let i = toks.index(m, "origin")?;
                if costs.contains_key(&i) {
                    return Err(duplicate("cost line"));
                }
                costs.insert(i, toks.numbers(n)?);
            }
            "o" => {
                let i = toks.index(m, "origin")?;
                origins.insert(i, toks.rest());
            }
            "t" => {
                let j = toks.index(n, "destination")?;
                destinations.insert(j, toks.rest());
            }
            _ => {
                return Err(Error::Format {
                    line,
                    msg: format!("unexpected line, expected one of 's', 'd', 'a', 'o', 't', got '{}'", d),
                })
            }
        }

        Ok(())
    })?;

    let missing = |msg: &str| Error::Format {
        line: 0,
        msg: msg.to_string(),
    };

    let (m, n) = size.ok_or_else(|| missing("missing problem line"))?;
    let supply = supply.ok_or_else(|| missing("missing supply line"))?;
    let demand = demand.ok_or_else(|| missing("missing demand line"))?;
    let costs = (0..m)
        .map(|i| {
            costs
                .remove(&i)
                .ok_or_else(|| missing(&format!("missing costs of origin {}", i + 1)))
        })
        .collect::<Result<Vec<_>>>()?;

    let problem = TransportProblem::new(costs, supply, demand)?;
    if !origins.is_empty() || !destinations.is_empty() {
        let origins = (0..m)
            .map(|i| {
                origins
                    .remove(&i)
                    .unwrap_or_else(|| problem.origin_label(i).into_owned())
            })
            .collect();
        let destinations = (0..n)
            .map(|j| {
                destinations
                    .remove(&j)
                    .unwrap_or_else(|| problem.destination_label(j).into_owned())
            })
            .collect();
        problem.with_labels(origins, destinations)
    } else {
        Ok(problem)
    }
}

pub fn read_from_file<F>(filename: &str) -> Result<TransportProblem<F>>
where
    F: FromStr + Signed + PartialOrd + Copy,
    F::Err: Display,
{
    read(std::fs::File::open(filename)?)
}

/// Write a transportation problem.
///
/// Labels are only written if they differ from the positional names.
pub fn write<W, F>(mut w: W, problem: &TransportProblem<F>) -> std::io::Result<()>
where
    W: Write,
    F: Display,
{
    let join = |values: &[F]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ");

    writeln!(w, "p tp {} {}", problem.rows(), problem.cols())?;
    writeln!(w, "s {}", join(problem.supply()))?;
    writeln!(w, "d {}", join(problem.demand()))?;
    for (i, row) in problem.costs().iter().enumerate() {
        writeln!(w, "a {} {}", i + 1, join(&row[..]))?;
    }
    for i in 0..problem.rows() {
        let label = problem.origin_label(i);
        if label != format!("O{}", i + 1) {
            writeln!(w, "o {} {}", i + 1, label)?;
        }
    }
    for j in 0..problem.cols() {
        let label = problem.destination_label(j);
        if label != format!("D{}", j + 1) {
            writeln!(w, "t {} {}", j + 1, label)?;
        }
    }

    Ok(())
}

/// Write the solution stored in an assignment matrix.
pub fn write_solution<W, F>(mut w: W, x: &Matrix<F>) -> std::io::Result<()>
where
    W: Write,
    F: NumAssign + PartialOrd + Copy + Display,
{
    writeln!(w, "s {}", x.total_cost())?;
    for (p, c) in x.iter() {
        if !c.quantity.is_zero() {
            writeln!(w, "f {} {} {}", p.row + 1, p.col + 1, c.quantity)?;
        }
    }

    Ok(())
}

/// Read a solution.
///
/// Returns the total cost and the list of `(row, col, quantity)` with
/// 0-based row and column indices.
pub fn read_solution<R, F>(r: R) -> Result<(F, Vec<(usize, usize, F)>)>
where
    R: Read,
    F: FromStr,
    F::Err: Display,
{
    let mut value = None;
    let mut flows = Vec::new();

    read_lines(r, |d, toks| {
        match d {
            "s" if value.is_some() => {
                return Err(Error::Format {
                    line: toks.line,
                    msg: "The solution value must be specified exactly once".to_string(),
                })
            }
            "s" => value = Some(toks.number()?),
            "f" => {
                let i = toks.number::<usize>()?;
                let j = toks.number::<usize>()?;
                if i < 1 || j < 1 {
                    return Err(Error::Data {
                        line: toks.line,
                        msg: format!("invalid cell ({}, {})", i, j),
                    });
                }
                flows.push((i - 1, j - 1, toks.number()?));
            }
            _ => {
                return Err(Error::Format {
                    line: toks.line,
                    msg: format!("unexpected line, expected one of 's', 'f', got '{}'", d),
                })
            }
        }
        toks.end()
    })?;

    Ok((
        value.ok_or_else(|| Error::Format {
            line: 0,
            msg: "Missing solution value".to_string(),
        })?,
        flows,
    ))
}

pub fn read_solution_from_file<F>(filename: &str) -> Result<(F, Vec<(usize, usize, F)>)>
where
    F: FromStr,
    F::Err: Display,
{
    read_solution(std::fs::File::open(filename)?)
}
