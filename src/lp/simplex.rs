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

//! Dense two-phase simplex method.
//!
//! The problem is brought into the form `min c^T y, Ay = b, y >= 0, b >= 0`:
//! variables are shifted by their lower bounds, finite upper bounds become
//! rows, rows with negative right hand side are negated and every row gets
//! a slack, a surplus and an artificial column as needed.
//!
//! Phase 1 minimizes the sum of the artificial variables starting from
//! the artificial basis. Afterwards artificial variables still in the
//! basis are pivoted out or, if their row is a combination of the others,
//! the row is dropped. Phase 2 optimizes the original objective.
//!
//! Pivots follow Bland's rule: the entering column is the one with smallest
//! index and negative reduced cost, of rows with minimal ratio the one with
//! the smallest basic column leaves. This rule does not cycle.
//!
//! Integrality of variables is ignored, see [`branch`](super::branch).

use super::{LpOptions, Problem, Relation, Sense, Solution, SolutionState};
use crate::error::{Error, Result};

use tracing::{debug, trace};

/// Solve the LP relaxation of `problem`.
pub fn solve(problem: &Problem, opts: &LpOptions) -> Result<Solution> {
    let bounds: Vec<_> = problem.vars().map(|v| (v.lower, v.upper)).collect();
    solve_bounded(problem, &bounds, opts)
}

/// Solve the LP relaxation of `problem` with modified variable bounds.
pub(crate) fn solve_bounded(problem: &Problem, bounds: &[(f64, f64)], opts: &LpOptions) -> Result<Solution> {
    let n = problem.num_vars();
    if bounds.len() != n {
        return Err(Error::DimensionMismatch {
            context: "variable bounds".to_string(),
            expected: n,
            found: bounds.len(),
        });
    }
    if bounds.iter().any(|&(l, u)| l > u + opts.tol) {
        return Ok(Solution::without_values(SolutionState::Infeasible, 0));
    }

    let mut tab = Tableau::new(problem, bounds, opts);
    debug!(rows = tab.rows.len(), cols = tab.ncols, "simplex phase 1");
    let obj = tab.phase1(opts)?;
    if obj > opts.feas_tol {
        debug!(infeasibility = obj, "problem is infeasible");
        return Ok(Solution::without_values(SolutionState::Infeasible, tab.iterations));
    }
    tab.remove_artificials(opts);

    debug!(rows = tab.rows.len(), iterations = tab.iterations, "simplex phase 2");
    if !tab.phase2(problem, opts)? {
        return Ok(Solution::without_values(SolutionState::Unbounded, tab.iterations));
    }

    let mut values: Vec<f64> = bounds.iter().map(|&(l, _)| l).collect();
    for (row, &b) in tab.rows.iter().zip(tab.basis.iter()) {
        if b < n {
            values[b] += row[tab.ncols];
        }
    }
    for x in values.iter_mut() {
        let r = x.round();
        if (*x - r).abs() < 1e-9 {
            *x = r;
        }
    }

    Ok(Solution {
        state: SolutionState::Optimal,
        objective: problem.objective_value(&values),
        values,
        iterations: tab.iterations,
    })
}

/// A row of the standard form before adding slacks.
struct Row {
    coefs: Vec<f64>,
    relation: Relation,
    rhs: f64,
}

struct Tableau {
    /// Each row has `ncols + 1` entries, the last is the right hand side.
    rows: Vec<Vec<f64>>,
    /// Reduced costs, `z[ncols]` is the negated objective value.
    z: Vec<f64>,
    basis: Vec<usize>,
    ncols: usize,
    nstruct: usize,
    /// Columns from this index on are artificial.
    art_start: usize,
    iterations: usize,
}

impl Tableau {
    fn new(problem: &Problem, bounds: &[(f64, f64)], opts: &LpOptions) -> Self {
        let n = problem.num_vars();

        let mut rows = vec![];
        for c in problem.constraints() {
            let mut coefs = vec![0.0; n];
            let mut rhs = c.rhs;
            for &(v, a) in &c.terms {
                coefs[v.index()] += a;
                rhs -= a * bounds[v.index()].0;
            }
            rows.push(Row {
                coefs,
                relation: c.relation,
                rhs,
            });
        }
        for (j, &(l, u)) in bounds.iter().enumerate() {
            if u.is_finite() {
                let mut coefs = vec![0.0; n];
                coefs[j] = 1.0;
                rows.push(Row {
                    coefs,
                    relation: Relation::Le,
                    rhs: (u - l).max(0.0),
                });
            }
        }

        // negative right hand sides
        for row in rows.iter_mut() {
            if row.rhs < 0.0 {
                row.rhs = -row.rhs;
                for a in row.coefs.iter_mut() {
                    *a = -*a;
                }
                row.relation = match row.relation {
                    Relation::Le => Relation::Ge,
                    Relation::Ge => Relation::Le,
                    Relation::Eq => Relation::Eq,
                };
            }
        }

        let nslack = rows.iter().filter(|r| r.relation != Relation::Eq).count();
        let nart = rows.iter().filter(|r| r.relation != Relation::Le).count();
        let art_start = n + nslack;
        let ncols = art_start + nart;

        let mut tab = Tableau {
            rows: Vec::with_capacity(rows.len()),
            z: vec![0.0; ncols + 1],
            basis: Vec::with_capacity(rows.len()),
            ncols,
            nstruct: n,
            art_start,
            iterations: 0,
        };

        let mut slack = n;
        let mut art = art_start;
        for row in rows {
            let mut t = row.coefs;
            t.resize(ncols + 1, 0.0);
            t[ncols] = row.rhs;
            match row.relation {
                Relation::Le => {
                    t[slack] = 1.0;
                    tab.basis.push(slack);
                    slack += 1;
                }
                Relation::Ge => {
                    t[slack] = -1.0;
                    slack += 1;
                    t[art] = 1.0;
                    tab.basis.push(art);
                    art += 1;
                }
                Relation::Eq => {
                    t[art] = 1.0;
                    tab.basis.push(art);
                    art += 1;
                }
            }
            tab.rows.push(t);
        }

        // phase 1 costs: one for each artificial column, priced out
        for j in art_start..ncols {
            tab.z[j] = 1.0;
        }
        for (row, &b) in tab.rows.iter().zip(tab.basis.iter()) {
            if b >= art_start {
                for (z, &a) in tab.z.iter_mut().zip(row.iter()) {
                    *z -= a;
                }
            }
        }
        for z in tab.z.iter_mut() {
            if z.abs() < opts.tol {
                *z = 0.0;
            }
        }

        tab
    }

    /// Run phase 1 and return the sum of the artificial variables.
    fn phase1(&mut self, opts: &LpOptions) -> Result<f64> {
        if self.art_start == self.ncols {
            return Ok(0.0);
        }
        // the artificial sum is bounded below, hence never unbounded
        self.optimize(self.ncols, opts)?;
        Ok(-self.z[self.ncols])
    }

    /// Pivot artificial variables out of the basis, drop redundant rows.
    fn remove_artificials(&mut self, opts: &LpOptions) {
        let mut r = 0;
        while r < self.rows.len() {
            if self.basis[r] < self.art_start {
                r += 1;
                continue;
            }
            match (0..self.art_start).find(|&j| self.rows[r][j].abs() > opts.tol) {
                Some(j) => {
                    self.pivot(r, j, opts);
                    r += 1;
                }
                None => {
                    trace!(row = r, "drop redundant row");
                    self.rows.remove(r);
                    self.basis.remove(r);
                }
            }
        }
    }

    /// Run phase 2, returns `false` if the problem is unbounded.
    fn phase2(&mut self, problem: &Problem, opts: &LpOptions) -> Result<bool> {
        let mut cost = vec![0.0; self.ncols];
        let sign = match problem.sense() {
            Sense::Minimize => 1.0,
            Sense::Maximize => -1.0,
        };
        for &(v, c) in problem.objective() {
            cost[v.index()] += sign * c;
        }

        for z in self.z.iter_mut() {
            *z = 0.0;
        }
        self.z[..self.nstruct].copy_from_slice(&cost[..self.nstruct]);
        for (row, &b) in self.rows.iter().zip(self.basis.iter()) {
            let cb = cost[b];
            if cb != 0.0 {
                for (z, &a) in self.z.iter_mut().zip(row.iter()) {
                    *z -= cb * a;
                }
            }
        }

        self.optimize(self.art_start, opts)
    }

    /// Run simplex iterations with entering columns from `0..ncand`.
    ///
    /// Returns `false` if the problem is unbounded.
    fn optimize(&mut self, ncand: usize, opts: &LpOptions) -> Result<bool> {
        let rhs = self.ncols;
        loop {
            let c = match (0..ncand).find(|&j| self.z[j] < -opts.tol) {
                Some(c) => c,
                None => return Ok(true),
            };

            let mut best: Option<(usize, f64)> = None;
            for (i, row) in self.rows.iter().enumerate() {
                if row[c] <= opts.tol {
                    continue;
                }
                let ratio = row[rhs] / row[c];
                best = match best {
                    Some((bi, br)) if ratio > br + opts.tol => Some((bi, br)),
                    Some((bi, br)) if ratio >= br - opts.tol && self.basis[bi] < self.basis[i] => Some((bi, br)),
                    _ => Some((i, ratio)),
                };
            }
            let r = match best {
                Some((r, _)) => r,
                None => return Ok(false),
            };

            if self.iterations >= opts.max_iter {
                return Err(Error::IterationLimit {
                    what: "simplex",
                    limit: opts.max_iter,
                });
            }
            self.iterations += 1;
            trace!(entering = c, leaving = self.basis[r], "pivot");
            self.pivot(r, c, opts);
        }
    }

    fn pivot(&mut self, r: usize, c: usize, opts: &LpOptions) {
        let rhs = self.ncols;
        let p = self.rows[r][c];
        for a in self.rows[r].iter_mut() {
            *a /= p;
        }
        let prow = self.rows[r].clone();
        for (i, row) in self.rows.iter_mut().enumerate() {
            if i == r {
                continue;
            }
            let f = row[c];
            if f != 0.0 {
                for (a, &b) in row.iter_mut().zip(prow.iter()) {
                    *a -= f * b;
                }
                row[c] = 0.0;
                if row[rhs] < 0.0 && row[rhs] > -opts.tol {
                    row[rhs] = 0.0;
                }
            }
        }
        let f = self.z[c];
        if f != 0.0 {
            for (z, &b) in self.z.iter_mut().zip(prow.iter()) {
                *z -= f * b;
            }
            self.z[c] = 0.0;
        }
        if self.rows[r][rhs] < 0.0 && self.rows[r][rhs] > -opts.tol {
            self.rows[r][rhs] = 0.0;
        }
        self.basis[r] = c;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp::{Problem, Relation, Sense};

    #[test]
    fn test_max() {
        // maximize 3x + 5y  s.t.  x <= 4,  2y <= 12,  3x + 2y <= 18
        let mut p = Problem::new(Sense::Maximize);
        let x = p.add_var("x", 0.0, f64::INFINITY, false).unwrap();
        let y = p.add_var("y", 0.0, f64::INFINITY, false).unwrap();
        p.add_constraint(vec![(x, 1.0)], Relation::Le, 4.0).unwrap();
        p.add_constraint(vec![(y, 2.0)], Relation::Le, 12.0).unwrap();
        p.add_constraint(vec![(x, 3.0), (y, 2.0)], Relation::Le, 18.0).unwrap();
        p.set_objective(vec![(x, 3.0), (y, 5.0)]).unwrap();

        let sol = solve(&p, &LpOptions::default()).unwrap();
        assert_eq!(sol.state, SolutionState::Optimal);
        assert_eq!(sol.objective, 36.0);
        assert_eq!(sol.value(x), 2.0);
        assert_eq!(sol.value(y), 6.0);
    }

    #[test]
    fn test_min_with_ge_and_eq() {
        // minimize 2x + 3y + z  s.t.  x + y >= 2,  y + z = 3,  x - z <= 1
        let mut p = Problem::new(Sense::Minimize);
        let x = p.add_var("x", 0.0, f64::INFINITY, false).unwrap();
        let y = p.add_var("y", 0.0, f64::INFINITY, false).unwrap();
        let z = p.add_var("z", 0.0, f64::INFINITY, false).unwrap();
        p.add_constraint(vec![(x, 1.0), (y, 1.0)], Relation::Ge, 2.0).unwrap();
        p.add_constraint(vec![(y, 1.0), (z, 1.0)], Relation::Eq, 3.0).unwrap();
        p.add_constraint(vec![(x, 1.0), (z, -1.0)], Relation::Le, 1.0).unwrap();
        p.set_objective(vec![(x, 2.0), (y, 3.0), (z, 1.0)]).unwrap();

        let sol = solve(&p, &LpOptions::default()).unwrap();
        assert_eq!(sol.state, SolutionState::Optimal);
        // every y in [0, 2] with x = 2 - y, z = 3 - y is optimal
        assert!((sol.objective - 7.0).abs() < 1e-9);
        assert!(p.is_feasible(&sol.values, 1e-9));
    }

    #[test]
    fn test_bounds_shift() {
        // minimize x + y  s.t.  x + y >= 1,  2 <= x <= 5,  -3 <= y <= 4
        let mut p = Problem::new(Sense::Minimize);
        let x = p.add_var("x", 2.0, 5.0, false).unwrap();
        let y = p.add_var("y", -3.0, 4.0, false).unwrap();
        p.add_constraint(vec![(x, 1.0), (y, 1.0)], Relation::Ge, 1.0).unwrap();
        p.set_objective(vec![(x, 1.0), (y, 1.0)]).unwrap();

        let sol = solve(&p, &LpOptions::default()).unwrap();
        assert_eq!(sol.state, SolutionState::Optimal);
        assert!((sol.objective - 1.0).abs() < 1e-9);
        assert!(sol.value(x) >= 2.0 && sol.value(y) >= -3.0);
    }

    #[test]
    fn test_infeasible() {
        let mut p = Problem::new(Sense::Minimize);
        let x = p.add_var("x", 0.0, f64::INFINITY, false).unwrap();
        let y = p.add_var("y", 0.0, f64::INFINITY, false).unwrap();
        p.add_constraint(vec![(x, 1.0), (y, 1.0)], Relation::Le, 2.0).unwrap();
        p.add_constraint(vec![(x, 1.0), (y, 1.0)], Relation::Ge, 3.0).unwrap();
        p.set_objective(vec![(x, 1.0)]).unwrap();
        assert_eq!(solve(&p, &LpOptions::default()).unwrap().state, SolutionState::Infeasible);
    }

    #[test]
    fn test_unbounded() {
        let mut p = Problem::new(Sense::Maximize);
        let x = p.add_var("x", 0.0, f64::INFINITY, false).unwrap();
        let y = p.add_var("y", 0.0, f64::INFINITY, false).unwrap();
        p.add_constraint(vec![(x, 1.0), (y, -1.0)], Relation::Le, 1.0).unwrap();
        p.set_objective(vec![(x, 1.0), (y, 1.0)]).unwrap();
        assert_eq!(solve(&p, &LpOptions::default()).unwrap().state, SolutionState::Unbounded);
    }

    #[test]
    fn test_redundant_equalities() {
        // the third row is the sum of the first two
        let mut p = Problem::new(Sense::Minimize);
        let v: Vec<_> = (0..3)
            .map(|i| p.add_var(&format!("x{}", i), 0.0, f64::INFINITY, false).unwrap())
            .collect();
        p.add_constraint(vec![(v[0], 1.0), (v[1], 1.0)], Relation::Eq, 2.0).unwrap();
        p.add_constraint(vec![(v[1], 1.0), (v[2], 1.0)], Relation::Eq, 3.0).unwrap();
        p.add_constraint(vec![(v[0], 1.0), (v[1], 2.0), (v[2], 1.0)], Relation::Eq, 5.0)
            .unwrap();
        p.set_objective(vec![(v[0], 1.0), (v[1], 3.0), (v[2], 1.0)]).unwrap();

        let sol = solve(&p, &LpOptions::default()).unwrap();
        assert_eq!(sol.state, SolutionState::Optimal);
        // x1 = 0, x0 = 2, x2 = 3
        assert!((sol.objective - 5.0).abs() < 1e-9);
        assert!(p.is_feasible(&sol.values, 1e-9));
    }

    #[test]
    fn test_degenerate() {
        // a classic cycling example for the largest coefficient rule
        let mut p = Problem::new(Sense::Maximize);
        let x: Vec<_> = (0..4)
            .map(|i| p.add_var(&format!("x{}", i), 0.0, f64::INFINITY, false).unwrap())
            .collect();
        p.add_constraint(vec![(x[0], 0.5), (x[1], -5.5), (x[2], -2.5), (x[3], 9.0)], Relation::Le, 0.0)
            .unwrap();
        p.add_constraint(vec![(x[0], 0.5), (x[1], -1.5), (x[2], -0.5), (x[3], 1.0)], Relation::Le, 0.0)
            .unwrap();
        p.add_constraint(vec![(x[0], 1.0)], Relation::Le, 1.0).unwrap();
        p.set_objective(vec![(x[0], 10.0), (x[1], -57.0), (x[2], -9.0), (x[3], -24.0)])
            .unwrap();

        let sol = solve(&p, &LpOptions::default()).unwrap();
        assert_eq!(sol.state, SolutionState::Optimal);
        assert!((sol.objective - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_iteration_limit() {
        let mut p = Problem::new(Sense::Maximize);
        let x = p.add_var("x", 0.0, 1.0, false).unwrap();
        let y = p.add_var("y", 0.0, 1.0, false).unwrap();
        p.set_objective(vec![(x, 1.0), (y, 1.0)]).unwrap();
        let opts = LpOptions {
            max_iter: 1,
            ..LpOptions::default()
        };
        assert!(matches!(
            solve(&p, &opts),
            Err(Error::IterationLimit { what: "simplex", limit: 1 })
        ));
    }
}
