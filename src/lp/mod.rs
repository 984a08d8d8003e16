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

//! Linear and integer linear programs.
//!
//! A [`Problem`] is a model with bounded variables, linear constraints and a
//! linear objective. It is solved by a dense two-phase
//! [simplex](self::simplex) method or, if some variables are integer, by
//! [branch and bound](self::branch) on top of the simplex.
//!
//! # Example
//!
//! ```
//! use rs_netopt::lp::{Problem, Relation, Sense};
//! use rs_netopt::SolutionState;
//!
//! // maximize x + 2y  s.t.  x + y <= 4,  x <= 2,  y <= 3
//! let mut p = Problem::new(Sense::Maximize);
//! let x = p.add_var("x", 0.0, 2.0, false).unwrap();
//! let y = p.add_var("y", 0.0, 3.0, false).unwrap();
//! p.add_constraint(vec![(x, 1.0), (y, 1.0)], Relation::Le, 4.0).unwrap();
//! p.set_objective(vec![(x, 1.0), (y, 2.0)]).unwrap();
//!
//! let sol = p.solve().unwrap();
//! assert_eq!(sol.state, SolutionState::Optimal);
//! assert!((sol.objective - 7.0).abs() < 1e-9);
//! assert!((sol.value(x) - 1.0).abs() < 1e-9);
//! ```

use crate::error::{Error, Result};
pub use crate::mcf::SolutionState;

use serde_derive::{Deserialize, Serialize};
use std::fmt;

pub mod branch;
pub mod simplex;

/// Direction of optimization.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Default for Sense {
    fn default() -> Self {
        Sense::Minimize
    }
}

/// Relation between the left and right hand side of a constraint.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    /// `lhs <= rhs`
    Le,
    /// `lhs >= rhs`
    Ge,
    /// `lhs == rhs`
    Eq,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::Eq => "=",
        };
        write!(f, "{}", s)
    }
}

/// Handle of a variable in a [`Problem`].
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub struct Var(usize);

impl Var {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A variable with its bounds.
#[derive(Clone, Debug)]
pub struct Variable {
    pub name: String,
    pub lower: f64,
    /// Upper bound, may be `f64::INFINITY`.
    pub upper: f64,
    pub integer: bool,
}

/// A linear constraint `sum(coef * var) relation rhs`.
#[derive(Clone, Debug)]
pub struct Constraint {
    pub terms: Vec<(Var, f64)>,
    pub relation: Relation,
    pub rhs: f64,
}

impl Constraint {
    /// Evaluate the left hand side.
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms.iter().map(|&(v, c)| c * values[v.index()]).sum()
    }

    /// Return `true` if `values` satisfy the constraint within `tol`.
    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        let lhs = self.lhs(values);
        match self.relation {
            Relation::Le => lhs <= self.rhs + tol,
            Relation::Ge => lhs >= self.rhs - tol,
            Relation::Eq => (lhs - self.rhs).abs() <= tol,
        }
    }
}

/// Options of the simplex method.
#[derive(Clone, Debug)]
pub struct LpOptions {
    /// Tolerance for pivot elements and reduced costs.
    pub tol: f64,
    /// Tolerance for the phase 1 objective, larger values are infeasible.
    pub feas_tol: f64,
    /// Maximal number of pivots.
    pub max_iter: usize,
}

impl Default for LpOptions {
    fn default() -> Self {
        LpOptions {
            tol: 1e-9,
            feas_tol: 1e-7,
            max_iter: 50_000,
        }
    }
}

/// Options of branch and bound.
#[derive(Clone, Debug)]
pub struct BranchOptions {
    /// Maximal number of subproblems.
    pub max_nodes: usize,
    /// Tolerance for integer feasibility.
    pub int_tol: f64,
    /// Subproblems not better than the incumbent by this amount are pruned.
    pub gap_tol: f64,
    /// Options of the LP solver.
    pub lp: LpOptions,
}

impl Default for BranchOptions {
    fn default() -> Self {
        BranchOptions {
            max_nodes: 100_000,
            int_tol: 1e-6,
            gap_tol: 1e-6,
            lp: LpOptions::default(),
        }
    }
}

/// The solution of a [`Problem`].
#[derive(Clone, Debug)]
pub struct Solution {
    pub state: SolutionState,
    /// Objective value, only meaningful if the state is `Optimal`.
    pub objective: f64,
    /// Variable values, empty unless the state is `Optimal`.
    pub values: Vec<f64>,
    /// Number of simplex pivots.
    pub iterations: usize,
}

impl Solution {
    pub(crate) fn without_values(state: SolutionState, iterations: usize) -> Self {
        Solution {
            state,
            objective: 0.0,
            values: vec![],
            iterations,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.state == SolutionState::Optimal
    }

    /// The value of a variable (zero if there is no solution).
    pub fn value(&self, v: Var) -> f64 {
        self.values.get(v.index()).copied().unwrap_or(0.0)
    }
}

/// A linear program with optional integer variables.
#[derive(Clone, Debug)]
pub struct Problem {
    sense: Sense,
    vars: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Vec<(Var, f64)>,
}

impl Problem {
    /// Create an empty problem.
    pub fn new(sense: Sense) -> Self {
        Problem {
            sense,
            vars: vec![],
            constraints: vec![],
            objective: vec![],
        }
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn var(&self, v: Var) -> &Variable {
        &self.vars[v.index()]
    }

    pub fn vars(&self) -> impl Iterator<Item = &Variable> {
        self.vars.iter()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &[(Var, f64)] {
        &self.objective
    }

    /// Return `true` if some variable must be integral.
    pub fn has_integers(&self) -> bool {
        self.vars.iter().any(|v| v.integer)
    }

    /// Add a new variable with bounds `lower <= x <= upper`.
    ///
    /// The lower bound must be finite.
    pub fn add_var(&mut self, name: &str, lower: f64, upper: f64, integer: bool) -> Result<Var> {
        if !lower.is_finite() || upper.is_nan() || lower > upper {
            return Err(Error::InvalidBounds {
                name: name.to_string(),
                lower,
                upper,
            });
        }
        self.vars.push(Variable {
            name: name.to_string(),
            lower,
            upper,
            integer,
        });
        Ok(Var(self.vars.len() - 1))
    }

    /// Add a binary variable.
    pub fn add_binary(&mut self, name: &str) -> Result<Var> {
        self.add_var(name, 0.0, 1.0, true)
    }

    fn check_terms(&self, terms: &[(Var, f64)]) -> Result<()> {
        for &(v, c) in terms {
            if v.index() >= self.vars.len() {
                return Err(Error::InvalidData(format!("unknown variable {}", v.index())));
            }
            if !c.is_finite() {
                return Err(Error::InvalidData(format!(
                    "coefficient of '{}' is not finite",
                    self.vars[v.index()].name
                )));
            }
        }
        Ok(())
    }

    /// Add a constraint and return its index.
    pub fn add_constraint(&mut self, terms: Vec<(Var, f64)>, relation: Relation, rhs: f64) -> Result<usize> {
        self.check_terms(&terms)?;
        if !rhs.is_finite() {
            return Err(Error::InvalidData("right hand side is not finite".to_string()));
        }
        self.constraints.push(Constraint { terms, relation, rhs });
        Ok(self.constraints.len() - 1)
    }

    /// Set the objective function.
    pub fn set_objective(&mut self, terms: Vec<(Var, f64)>) -> Result<()> {
        self.check_terms(&terms)?;
        self.objective = terms;
        Ok(())
    }

    /// Evaluate the objective function.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.iter().map(|&(v, c)| c * values[v.index()]).sum()
    }

    /// Return `true` if `values` satisfy all bounds and constraints.
    pub fn is_feasible(&self, values: &[f64], tol: f64) -> bool {
        values.len() == self.vars.len()
            && self
                .vars
                .iter()
                .zip(values)
                .all(|(v, &x)| x >= v.lower - tol && x <= v.upper + tol && (!v.integer || (x - x.round()).abs() <= tol))
            && self.constraints.iter().all(|c| c.is_satisfied(values, tol))
    }

    /// Solve the problem with default options.
    ///
    /// Uses branch and bound if some variable is integer, otherwise the
    /// simplex method.
    pub fn solve(&self) -> Result<Solution> {
        if self.has_integers() {
            branch::solve(self, &BranchOptions::default())
        } else {
            simplex::solve(self, &LpOptions::default())
        }
    }
}
