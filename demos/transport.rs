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

use num_traits::{NumAssign, Signed};
use rs_transport::{text, InitialMethod, Modi, StepKind};
use std::error::Error;
use std::fmt::{Debug, Display};
use std::io::Write;
use std::path::PathBuf;
use std::result::Result;
use std::str::FromStr;

use rustop::opts;
use time::OffsetDateTime;

trait ZeroValue {
    fn zero() -> Self;
}

impl ZeroValue for i64 {
    fn zero() -> i64 {
        0
    }
}

impl ZeroValue for f64 {
    fn zero() -> f64 {
        1e-9
    }
}

fn run<F>(filename: &str, method: InitialMethod, show_trace: bool) -> Result<(), Box<dyn Error>>
where
    F: NumAssign + Signed + PartialOrd + Copy + FromStr + Display + Debug + ZeroValue,
    F::Err: Display,
{
    let tstart = OffsetDateTime::now_utc();
    let problem = text::read_from_file::<F>(filename)?;
    let tend = OffsetDateTime::now_utc();

    println!("Instance            : {}", filename);
    println!("Read Time (seconds) : {}", (tend - tstart).as_seconds_f64());
    println!("Value type          : {}", std::any::type_name::<F>());
    println!("Number of origins   : {}", problem.rows());
    println!("Number of dest.     : {}", problem.cols());
    println!("Total supply        : {}", problem.total_supply());

    let tstart = OffsetDateTime::now_utc();
    let x = method.solve(&problem);
    let mut modi = Modi::new(&problem);
    modi.zero = ZeroValue::zero();
    let sol = modi.solve(&x, method, show_trace)?;
    let tend = OffsetDateTime::now_utc();
    let soltime = (tend - tstart).as_seconds_f64();

    if show_trace {
        println!();
        for step in sol.trace.iter().filter(|s| s.kind() != StepKind::ComputeNonBasicValues) {
            println!("{}", step.title);
            println!("    {}", step.description);
            println!("    cost: {}", step.matrix.total_cost());
        }
    }

    println!();
    println!("Initial method      : {}", method);
    println!("Initial value       : {}", x.total_cost());
    println!("Solution state      : {:?}", sol.state);
    println!("Value               : {}", sol.matrix.total_cost());
    println!("Time (seconds)      : {:.2}", soltime);
    println!("Iterations (total)  : {}", modi.num_iterations());
    println!();
    for (p, c) in sol.matrix.iter().filter(|(_, c)| !c.quantity.is_zero()) {
        println!(
            "{:>10} -> {:<10} {}",
            problem.origin_label(p.row),
            problem.destination_label(p.col),
            c.quantity
        );
    }
    println!();
    println!("Write solution to   : {}.sol", filename);

    let solfile = PathBuf::from(format!("{}.sol", filename));
    let f = &mut std::fs::File::create(&solfile)?;
    let fname = solfile
        .file_name()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| "".into());
    writeln!(f, "c Solved with the multiplier method")?;
    writeln!(f, "c instance            : {}", fname)?;
    writeln!(f, "c initial solution    : {}", method)?;
    writeln!(f, "c solution time       : {:.2} seconds", soltime)?;
    writeln!(f, "c number of iterations: {}", modi.num_iterations())?;
    text::write_solution(f, &sol.matrix)?;

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let (args, _) = opts! {
        synopsis "Solve a transportation problem with the multiplier method.";
        param file:String, desc:"Instance file name";
        opt northwest:bool, desc:"Initial solution by the northwest corner rule";
        opt minimum_cost:bool, desc:"Initial solution by the minimum cost method";
        opt trace:bool, desc:"Print all steps of the method";
        opt floating_point:bool, desc:"Use floating point values";
    }
    .parse_or_exit();

    let method = if args.northwest {
        InitialMethod::NorthwestCorner
    } else if args.minimum_cost {
        InitialMethod::MinimumCost
    } else {
        InitialMethod::Vogel
    };

    if args.floating_point {
        run::<f64>(&args.file, method, args.trace)
    } else {
        run::<i64>(&args.file, method, args.trace)
    }
}
