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

//! Transportation problems.
//!
//! Goods are shipped from sources with a limited supply to destinations
//! with a demand. Each unit shipped on route `(i, j)` costs `costs[i][j]`,
//! routes without cost are not available. The problem is solved as a
//! linear program with one variable per route.
//!
//! # Example
//!
//! ```
//! use rs_netopt::transport::{Balance, TransportationProblem};
//!
//! let p = TransportationProblem::new(
//!     &[("LA", 1000.0), ("Detroit", 1500.0), ("New Orleans", 1200.0)],
//!     &[("Denver", 2300.0), ("Miami", 1400.0)],
//!     vec![vec![80.0, 215.0], vec![100.0, 108.0], vec![102.0, 95.0]],
//! );
//! assert_eq!(p.balance(), Balance::Balanced);
//!
//! let plan = p.solve().unwrap();
//! assert!((plan.cost - 345_600.0).abs() < 1e-6);
//! assert!((plan.received_by(1) - 1400.0).abs() < 1e-6);
//! ```

use crate::error::{Error, Result};
use crate::lp::{Problem, Relation, Sense, SolutionState, Var};

use serde_derive::{Deserialize, Serialize};
use tracing::debug;

/// Tolerance used when comparing amounts.
const EPS: f64 = 1e-6;

/// How the demand of a destination must be met.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DemandMode {
    /// Each destination receives exactly its demand.
    Exact,
    /// Each destination receives at least its demand.
    AtLeast,
}

impl Default for DemandMode {
    fn default() -> Self {
        DemandMode::Exact
    }
}

/// How the supply of a source may be used.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupplyMode {
    /// A source ships at most its supply.
    AtMost,
    /// A source ships all of its supply.
    Exact,
}

impl Default for SupplyMode {
    fn default() -> Self {
        SupplyMode::AtMost
    }
}

/// Relation between total supply and total demand.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Balance {
    Balanced,
    /// Supply exceeds demand by this amount.
    ExcessSupply(f64),
    /// Demand exceeds supply by this amount.
    Shortage(f64),
}

/// A transportation problem.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransportationProblem {
    /// Sources with their supply.
    pub sources: Vec<(String, f64)>,
    /// Destinations with their demand.
    pub destinations: Vec<(String, f64)>,
    /// `costs[i][j]` is the unit cost from source `i` to destination `j`,
    /// `None` if the route does not exist.
    pub costs: Vec<Vec<Option<f64>>>,
    /// Upper bounds `(source, destination, max)` on single routes.
    #[serde(default)]
    pub route_limits: Vec<(usize, usize, f64)>,
    #[serde(default)]
    pub demand: DemandMode,
    #[serde(default)]
    pub supply: SupplyMode,
}

/// Result of the comparison of one supply or demand row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RowCheck {
    pub name: String,
    pub relation: Relation,
    pub limit: f64,
    pub actual: f64,
    pub ok: bool,
}

/// The solution of a [`TransportationProblem`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransportPlan {
    pub state: SolutionState,
    pub cost: f64,
    /// `shipments[i][j]` is the amount shipped from source `i` to
    /// destination `j`.
    pub shipments: Vec<Vec<f64>>,
}

impl TransportPlan {
    fn empty(state: SolutionState) -> Self {
        TransportPlan {
            state,
            cost: 0.0,
            shipments: vec![],
        }
    }

    /// Amount shipped on route `(i, j)`.
    pub fn shipment(&self, i: usize, j: usize) -> f64 {
        self.shipments.get(i).and_then(|row| row.get(j)).copied().unwrap_or(0.0)
    }

    /// Total amount shipped from source `i`.
    pub fn shipped_from(&self, i: usize) -> f64 {
        self.shipments.get(i).map_or(0.0, |row| row.iter().sum())
    }

    /// Total amount received by destination `j`.
    pub fn received_by(&self, j: usize) -> f64 {
        self.shipments.iter().filter_map(|row| row.get(j)).sum()
    }

    /// Compare the totals of each source and destination with the limits
    /// of `problem`.
    ///
    /// Also reports shipments on unavailable routes or beyond a route limit
    /// as failed rows.
    pub fn check(&self, problem: &TransportationProblem) -> Vec<RowCheck> {
        let mut checks = vec![];
        let supply_rel = problem.supply_relation();
        for (i, (name, supply)) in problem.sources.iter().enumerate() {
            let actual = self.shipped_from(i);
            checks.push(RowCheck {
                name: name.clone(),
                relation: supply_rel,
                limit: *supply,
                actual,
                ok: satisfies(actual, supply_rel, *supply),
            });
        }
        let demand_rel = problem.demand_relation();
        for (j, (name, demand)) in problem.destinations.iter().enumerate() {
            let actual = self.received_by(j);
            checks.push(RowCheck {
                name: name.clone(),
                relation: demand_rel,
                limit: *demand,
                actual,
                ok: satisfies(actual, demand_rel, *demand),
            });
        }
        for (i, row) in problem.costs.iter().enumerate() {
            for (j, c) in row.iter().enumerate() {
                let x = self.shipment(i, j);
                let limit = if c.is_none() { Some(0.0) } else { problem.route_limit(i, j) };
                if let Some(limit) = limit {
                    if x > limit + EPS {
                        checks.push(RowCheck {
                            name: format!("{} -> {}", problem.sources[i].0, problem.destinations[j].0),
                            relation: Relation::Le,
                            limit,
                            actual: x,
                            ok: false,
                        });
                    }
                }
            }
        }
        checks
    }
}

fn satisfies(actual: f64, relation: Relation, limit: f64) -> bool {
    match relation {
        Relation::Le => actual <= limit + EPS,
        Relation::Ge => actual >= limit - EPS,
        Relation::Eq => (actual - limit).abs() <= EPS,
    }
}

impl TransportationProblem {
    /// Create a problem where every route is available.
    pub fn new<S: AsRef<str>>(sources: &[(S, f64)], destinations: &[(S, f64)], costs: Vec<Vec<f64>>) -> Self {
        TransportationProblem {
            sources: sources.iter().map(|(n, s)| (n.as_ref().to_string(), *s)).collect(),
            destinations: destinations.iter().map(|(n, d)| (n.as_ref().to_string(), *d)).collect(),
            costs: costs
                .into_iter()
                .map(|row| row.into_iter().map(Some).collect())
                .collect(),
            route_limits: vec![],
            demand: DemandMode::Exact,
            supply: SupplyMode::AtMost,
        }
    }

    pub fn with_demand(mut self, demand: DemandMode) -> Self {
        self.demand = demand;
        self
    }

    pub fn with_supply(mut self, supply: SupplyMode) -> Self {
        self.supply = supply;
        self
    }

    /// Close the route from `i` to `j`.
    pub fn forbid(mut self, i: usize, j: usize) -> Self {
        if let Some(c) = self.costs.get_mut(i).and_then(|row| row.get_mut(j)) {
            *c = None;
        }
        self
    }

    /// Ship at most `max` units from `i` to `j`.
    pub fn limit_route(mut self, i: usize, j: usize, max: f64) -> Self {
        self.route_limits.push((i, j, max));
        self
    }

    pub fn total_supply(&self) -> f64 {
        self.sources.iter().map(|(_, s)| s).sum()
    }

    pub fn total_demand(&self) -> f64 {
        self.destinations.iter().map(|(_, d)| d).sum()
    }

    pub fn balance(&self) -> Balance {
        let diff = self.total_supply() - self.total_demand();
        if diff > EPS {
            Balance::ExcessSupply(diff)
        } else if diff < -EPS {
            Balance::Shortage(-diff)
        } else {
            Balance::Balanced
        }
    }

    /// Return a balanced copy of the problem.
    ///
    /// An excess of supply is sent to an additional destination `dummy`, a
    /// shortage is covered by an additional source `dummy`. Both have zero
    /// costs.
    pub fn balanced(&self) -> Self {
        let mut p = self.clone();
        match self.balance() {
            Balance::Balanced => {}
            Balance::ExcessSupply(x) => {
                p.destinations.push(("dummy".to_string(), x));
                for row in p.costs.iter_mut() {
                    row.push(Some(0.0));
                }
            }
            Balance::Shortage(x) => {
                p.sources.push(("dummy".to_string(), x));
                p.costs.push(vec![Some(0.0); p.destinations.len()]);
            }
        }
        p
    }

    /// The smallest limit on route `(i, j)`.
    pub fn route_limit(&self, i: usize, j: usize) -> Option<f64> {
        self.route_limits
            .iter()
            .filter(|&&(a, b, _)| a == i && b == j)
            .map(|&(_, _, max)| max)
            .fold(None, |m, x| Some(m.map_or(x, |m: f64| m.min(x))))
    }

    fn supply_relation(&self) -> Relation {
        match self.supply {
            SupplyMode::AtMost => Relation::Le,
            SupplyMode::Exact => Relation::Eq,
        }
    }

    fn demand_relation(&self) -> Relation {
        match self.demand {
            DemandMode::Exact => Relation::Eq,
            DemandMode::AtLeast => Relation::Ge,
        }
    }

    /// Check dimensions and amounts of the problem.
    pub fn validate(&self) -> Result<()> {
        let (m, n) = (self.sources.len(), self.destinations.len());
        if self.costs.len() != m {
            return Err(Error::DimensionMismatch {
                context: "cost rows".to_string(),
                expected: m,
                found: self.costs.len(),
            });
        }
        for (i, row) in self.costs.iter().enumerate() {
            if row.len() != n {
                return Err(Error::DimensionMismatch {
                    context: format!("cost row of '{}'", self.sources[i].0),
                    expected: n,
                    found: row.len(),
                });
            }
            if row.iter().any(|c| c.map_or(false, |c| !c.is_finite())) {
                return Err(Error::InvalidData(format!("costs of '{}' must be finite", self.sources[i].0)));
            }
        }
        for (name, x) in self.sources.iter().chain(self.destinations.iter()) {
            if !x.is_finite() || *x < 0.0 {
                return Err(Error::InvalidData(format!("amount of '{}' must be non-negative", name)));
            }
        }
        for &(i, j, max) in &self.route_limits {
            if i >= m || j >= n {
                return Err(Error::InvalidData(format!("route limit ({}, {}) out of range", i, j)));
            }
            if max.is_nan() || max < 0.0 {
                return Err(Error::InvalidData(format!("route limit ({}, {}) must be non-negative", i, j)));
            }
        }
        Ok(())
    }

    /// Solve the problem.
    pub fn solve(&self) -> Result<TransportPlan> {
        self.validate()?;
        let (m, n) = (self.sources.len(), self.destinations.len());

        let mut lp = Problem::new(Sense::Minimize);
        let mut vars: Vec<(usize, usize, Var, f64)> = vec![];
        for (i, row) in self.costs.iter().enumerate() {
            for (j, c) in row.iter().enumerate() {
                if let Some(c) = *c {
                    let upper = self.route_limit(i, j).unwrap_or(f64::INFINITY);
                    let v = lp.add_var(&format!("x_{}_{}", i, j), 0.0, upper, false)?;
                    vars.push((i, j, v, c));
                }
            }
        }
        for (i, (_, supply)) in self.sources.iter().enumerate() {
            let terms = vars.iter().filter(|x| x.0 == i).map(|x| (x.2, 1.0)).collect();
            lp.add_constraint(terms, self.supply_relation(), *supply)?;
        }
        for (j, (_, demand)) in self.destinations.iter().enumerate() {
            let terms = vars.iter().filter(|x| x.1 == j).map(|x| (x.2, 1.0)).collect();
            lp.add_constraint(terms, self.demand_relation(), *demand)?;
        }
        lp.set_objective(vars.iter().map(|x| (x.2, x.3)).collect())?;

        debug!(sources = m, destinations = n, balance = ?self.balance(), "transportation model");
        let sol = lp.solve()?;
        if !sol.is_optimal() {
            return Ok(TransportPlan::empty(sol.state));
        }

        let mut shipments = vec![vec![0.0; n]; m];
        for &(i, j, v, _) in &vars {
            shipments[i][j] = sol.value(v);
        }
        Ok(TransportPlan {
            state: SolutionState::Optimal,
            cost: sol.objective,
            shipments,
        })
    }

    /// Compute a starting plan by the least cost method.
    ///
    /// Repeatedly ships as much as possible on the cheapest route whose
    /// source has supply and whose destination has demand left. Ties are
    /// broken by the first route in row major order. The resulting plan
    /// satisfies the supply rows but need not be optimal, and demand may
    /// remain unmet if supply is short.
    pub fn least_cost_plan(&self) -> Result<TransportPlan> {
        self.validate()?;
        let (m, n) = (self.sources.len(), self.destinations.len());
        let mut supply: Vec<f64> = self.sources.iter().map(|s| s.1).collect();
        let mut demand: Vec<f64> = self.destinations.iter().map(|d| d.1).collect();
        let mut shipments = vec![vec![0.0; n]; m];
        let mut closed = vec![vec![false; n]; m];
        let mut cost = 0.0;

        loop {
            let mut best: Option<(usize, usize, f64)> = None;
            for i in (0..m).filter(|&i| supply[i] > EPS) {
                for j in (0..n).filter(|&j| demand[j] > EPS && !closed[i][j]) {
                    if let Some(c) = self.costs[i][j] {
                        if best.map_or(true, |(_, _, b)| c < b) {
                            best = Some((i, j, c));
                        }
                    }
                }
            }
            let (i, j, c) = match best {
                Some(b) => b,
                None => break,
            };
            let mut amount = supply[i].min(demand[j]);
            if let Some(max) = self.route_limit(i, j) {
                amount = amount.min(max);
            }
            closed[i][j] = true;
            shipments[i][j] = amount;
            supply[i] -= amount;
            demand[j] -= amount;
            cost += amount * c;
        }

        let state = if demand.iter().all(|&d| d <= EPS) {
            SolutionState::Unknown
        } else {
            SolutionState::Infeasible
        };
        Ok(TransportPlan { state, cost, shipments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coal() -> TransportationProblem {
        TransportationProblem::new(
            &[("mine 1", 75.0), ("mine 2", 125.0), ("mine 3", 100.0)],
            &[("center 1", 80.0), ("center 2", 65.0), ("center 3", 70.0), ("center 4", 85.0)],
            vec![
                vec![866.0, 861.0, 612.0, 590.0],
                vec![547.0, 622.0, 433.0, 570.0],
                vec![707.0, 664.0, 426.0, 779.0],
            ],
        )
    }

    fn water() -> TransportationProblem {
        TransportationProblem::new(
            &[("colombo", 50.0), ("piave", 60.0), ("calorie", 50.0)],
            &[("po", 30.0), ("ancona", 70.0), ("edolo", 0.0), ("pienza", 10.0)],
            vec![
                vec![5.0, 2.0, 7.0, 3.0],
                vec![3.0, 6.0, 6.0, 1.0],
                vec![6.0, 1.0, 2.0, 4.0],
            ],
        )
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
    }

    #[test]
    fn test_balanced() {
        let p = coal();
        assert_eq!(p.balance(), Balance::Balanced);
        let plan = p.solve().unwrap();
        assert_eq!(plan.state, SolutionState::Optimal);
        assert_close(plan.cost, 165_220.0);
        assert!(plan.check(&p).iter().all(|c| c.ok));
    }

    #[test]
    fn test_excess_supply() {
        let p = water();
        assert_eq!(p.balance(), Balance::ExcessSupply(50.0));
        let plan = p.solve().unwrap();
        assert_close(plan.cost, 190.0);
        assert_close(plan.received_by(2), 0.0);

        let q = p.balanced();
        assert_eq!(q.destinations.len(), 5);
        assert_eq!(q.balance(), Balance::Balanced);
        assert_close(q.solve().unwrap().cost, 190.0);
    }

    #[test]
    fn test_minimum_needs() {
        // all water is used, every city gets at least its need
        let p = water().with_demand(DemandMode::AtLeast).with_supply(SupplyMode::Exact);
        let plan = p.solve().unwrap();
        assert_close(plan.cost, 210.0);
        let total: f64 = (0..4).map(|j| plan.received_by(j)).sum();
        assert_close(total, 160.0);
        assert!(plan.check(&p).iter().all(|c| c.ok));
    }

    #[test]
    fn test_route_limit() {
        let p = TransportationProblem::new(
            &[("monteria", 80.0), ("bogota", 30.0), ("medellin", 60.0), ("barranquilla", 45.0)],
            &[("monteria", 70.0), ("bogota", 40.0), ("medellin", 70.0), ("barranquilla", 35.0)],
            vec![
                vec![5.0, 2.0, 7.0, 3.0],
                vec![3.0, 6.0, 6.0, 1.0],
                vec![6.0, 1.0, 2.0, 4.0],
                vec![4.0, 3.0, 6.0, 6.0],
            ],
        );
        assert_close(p.solve().unwrap().cost, 620.0);

        let p = p.limit_route(0, 1, 25.0);
        let plan = p.solve().unwrap();
        assert_close(plan.cost, 650.0);
        assert!(plan.shipment(0, 1) <= 25.0 + 1e-9);
    }

    #[test]
    fn test_forbidden_routes() {
        // production in month i can only serve months j >= i
        let capacity = [22.0, 36.0, 38.0, 21.0];
        let production = [238.0, 384.0, 132.0, 430.0];
        let demand = [10.0, 15.0, 25.0, 20.0];
        let costs: Vec<Vec<f64>> = (0..4)
            .map(|i| (0..4).map(|j| production[i] + 3.0 * (j as f64 - i as f64)).collect())
            .collect();
        let months = ["aug", "sep", "oct", "nov"];
        let mut p = TransportationProblem::new(
            &months.iter().zip(&capacity).map(|(m, &c)| (*m, c)).collect::<Vec<_>>(),
            &months.iter().zip(&demand).map(|(m, &d)| (*m, d)).collect::<Vec<_>>(),
            costs,
        );
        for i in 1..4 {
            for j in 0..i {
                p = p.forbid(i, j);
            }
        }
        let plan = p.solve().unwrap();
        assert_close(plan.cost, 14_209.0);
        // october is the cheapest month and runs at capacity
        assert_close(plan.shipped_from(2), 38.0);
        assert_close(plan.shipped_from(3), 0.0);
    }

    #[test]
    fn test_shortage() {
        let mut p = coal();
        p.destinations[0].1 = 100.0;
        assert_eq!(p.balance(), Balance::Shortage(20.0));
        assert_eq!(p.solve().unwrap().state, SolutionState::Infeasible);

        let q = p.balanced();
        assert_eq!(q.sources.last().map(|s| s.0.as_str()), Some("dummy"));
        let plan = q.solve().unwrap();
        assert_eq!(plan.state, SolutionState::Optimal);
        assert_close(plan.shipped_from(3), 20.0);
    }

    #[test]
    fn test_check_violations() {
        let p = coal();
        let mut plan = p.solve().unwrap();
        plan.shipments[0][0] += 5.0;
        let failed: Vec<_> = plan.check(&p).into_iter().filter(|c| !c.ok).map(|c| c.name).collect();
        assert_eq!(failed, vec!["mine 1".to_string(), "center 1".to_string()]);
    }

    #[test]
    fn test_least_cost_plan() {
        let p = TransportationProblem::new(
            &[("LA", 1000.0), ("Detroit", 1500.0), ("New Orleans", 1200.0)],
            &[("Denver", 2300.0), ("Miami", 1400.0)],
            vec![vec![80.0, 215.0], vec![100.0, 108.0], vec![102.0, 95.0]],
        );
        let start = p.least_cost_plan().unwrap();
        assert_eq!(start.state, SolutionState::Unknown);
        assert_eq!(start.shipments, vec![vec![1000.0, 0.0], vec![1300.0, 200.0], vec![0.0, 1200.0]]);
        assert_close(start.cost, 345_600.0);
        assert!(start.check(&p).iter().all(|c| c.ok));
    }

    #[test]
    fn test_validate() {
        let mut p = coal();
        p.costs[1].push(Some(1.0));
        assert!(matches!(p.solve(), Err(Error::DimensionMismatch { expected: 4, found: 5, .. })));
        let p = coal().limit_route(3, 0, 1.0);
        assert!(matches!(p.validate(), Err(Error::InvalidData(_))));
    }
}
