// Copyright (c) 2026 The rs-netopt developers
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see  <http://www.gnu.org/licenses/>
//

//! Depth first branch and bound for integer variables.
//!
//! Each subproblem is the LP relaxation with tightened variable bounds.
//! The first integer variable with fractional value is branched on, the
//! subproblem rounding it up is explored first. Subproblems whose
//! relaxation is not better than the best integer solution are pruned.

use super::{simplex, BranchOptions, Problem, Sense, Solution, SolutionState};
use crate::error::{Error, Result};

use tracing::{debug, trace};

/// A subproblem: variable bounds and the objective bound of its parent.
struct Subproblem {
    bounds: Vec<(f64, f64)>,
    bound: f64,
}

/// Solve `problem` respecting integrality of variables.
pub fn solve(problem: &Problem, opts: &BranchOptions) -> Result<Solution> {
    // objective values are compared in minimization form
    let sign = match problem.sense() {
        Sense::Minimize => 1.0,
        Sense::Maximize => -1.0,
    };

    let root = problem
        .vars()
        .map(|v| {
            if v.integer {
                ((v.lower - opts.int_tol).ceil(), (v.upper + opts.int_tol).floor())
            } else {
                (v.lower, v.upper)
            }
        })
        .collect();

    let mut stack = vec![Subproblem {
        bounds: root,
        bound: f64::NEG_INFINITY,
    }];
    let mut best: Option<Vec<f64>> = None;
    let mut best_key = f64::INFINITY;
    let mut nodes = 0;
    let mut iterations = 0;

    while let Some(sub) = stack.pop() {
        if sub.bound >= best_key - opts.gap_tol {
            continue;
        }

        nodes += 1;
        if nodes > opts.max_nodes {
            return Err(Error::IterationLimit {
                what: "branch and bound",
                limit: opts.max_nodes,
            });
        }

        let lp = simplex::solve_bounded(problem, &sub.bounds, &opts.lp)?;
        iterations += lp.iterations;
        match lp.state {
            SolutionState::Optimal => {}
            SolutionState::Unbounded => {
                debug!(nodes, "relaxation is unbounded");
                return Ok(Solution::without_values(SolutionState::Unbounded, iterations));
            }
            _ => continue,
        }

        let key = sign * lp.objective;
        if key >= best_key - opts.gap_tol {
            continue;
        }

        let fractional = problem
            .vars()
            .zip(lp.values.iter())
            .position(|(v, &x)| v.integer && (x - x.round()).abs() > opts.int_tol);

        match fractional {
            None => {
                trace!(objective = lp.objective, nodes, "new incumbent");
                best_key = key;
                best = Some(lp.values);
            }
            Some(j) => {
                let x = lp.values[j];
                let mut down = sub.bounds.clone();
                down[j].1 = x.floor();
                let mut up = sub.bounds;
                up[j].0 = x.ceil();
                stack.push(Subproblem { bounds: down, bound: key });
                stack.push(Subproblem { bounds: up, bound: key });
            }
        }
    }

    debug!(nodes, iterations, "branch and bound finished");

    match best {
        Some(mut values) => {
            for (v, x) in problem.vars().zip(values.iter_mut()) {
                if v.integer {
                    *x = x.round();
                }
            }
            Ok(Solution {
                state: SolutionState::Optimal,
                objective: problem.objective_value(&values),
                values,
                iterations,
            })
        }
        None => Ok(Solution::without_values(SolutionState::Infeasible, iterations)),
    }
}
