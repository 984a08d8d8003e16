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

//! Generalized assignment problems.
//!
//! Agents are assigned to tasks. Each pair `(agent, task)` has a cost or is
//! forbidden. The number of tasks an agent works on and the number of agents
//! working on a task are restricted by [`Limits`]. The classical problem,
//! where each agent does exactly one task and vice versa, is created with
//! [`AssignmentProblem::classic`].
//!
//! The model is solved as a binary integer program. A [`ScheduleProblem`]
//! couples several periods in which an agent must not repeat a task.
//!
//! # Example
//!
//! ```
//! use rs_netopt::assignment::AssignmentProblem;
//!
//! let p = AssignmentProblem::classic(
//!     &["s1", "s2", "s3"],
//!     &["computer", "printer", "iron"],
//!     vec![vec![15.0, 10.0, 8.0], vec![1.0, 8.0, 3.0], vec![1.0, 3.0, 7.0]],
//! );
//! let sol = p.solve().unwrap();
//! assert_eq!(sol.cost, 12.0);
//! assert_eq!(sol.task_agents(2), vec![0]);
//! ```

use crate::error::{Error, Result};
use crate::lp::{Problem, Relation, Sense, Solution, SolutionState, Var};

use serde_derive::{Deserialize, Serialize};
use tracing::debug;

/// Bounds on a number of assignments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub min: u32,
    /// No upper bound if `None`.
    pub max: Option<u32>,
}

impl Limits {
    pub fn exactly(n: u32) -> Self {
        Limits { min: n, max: Some(n) }
    }

    pub fn at_most(n: u32) -> Self {
        Limits { min: 0, max: Some(n) }
    }

    pub fn at_least(n: u32) -> Self {
        Limits { min: n, max: None }
    }

    /// Return `true` if `k` is within the limits.
    pub fn contains(&self, k: u32) -> bool {
        k >= self.min && self.max.map_or(true, |m| k <= m)
    }

    fn is_valid(&self) -> bool {
        self.max.map_or(true, |m| self.min <= m)
    }
}

/// One chosen pair of an assignment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub agent: usize,
    pub task: usize,
    pub cost: f64,
}

/// An assignment problem.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssignmentProblem {
    pub agents: Vec<String>,
    pub tasks: Vec<String>,
    /// `costs[i][j]` is the cost of agent `i` doing task `j`, `None` if forbidden.
    pub costs: Vec<Vec<Option<f64>>>,
    /// Limits on the number of tasks of each agent.
    pub agent_limits: Vec<Limits>,
    /// Limits on the number of agents of each task.
    pub task_limits: Vec<Limits>,
    /// Pairs that must be part of the solution.
    #[serde(default)]
    pub fixed: Vec<(usize, usize)>,
    #[serde(default)]
    pub sense: Sense,
}

/// The result of solving an [`AssignmentProblem`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssignmentSolution {
    pub state: SolutionState,
    pub cost: f64,
    /// The chosen pairs sorted by agent and task.
    pub pairs: Vec<Pair>,
}

impl AssignmentSolution {
    /// The agents working on task `j`.
    pub fn task_agents(&self, j: usize) -> Vec<usize> {
        self.pairs.iter().filter(|p| p.task == j).map(|p| p.agent).collect()
    }

    /// The tasks of agent `i`.
    pub fn agent_tasks(&self, i: usize) -> Vec<usize> {
        self.pairs.iter().filter(|p| p.agent == i).map(|p| p.task).collect()
    }
}

/// The outcome when the minimum number of agents of one task is reduced.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deficit {
    pub task: usize,
    pub state: SolutionState,
    pub cost: f64,
}

impl AssignmentProblem {
    /// Create a problem where each agent does at most one task and each
    /// task is done by exactly one agent.
    pub fn new<S: AsRef<str>>(agents: &[S], tasks: &[S], costs: Vec<Vec<Option<f64>>>) -> Self {
        AssignmentProblem {
            agents: agents.iter().map(|a| a.as_ref().to_string()).collect(),
            tasks: tasks.iter().map(|t| t.as_ref().to_string()).collect(),
            costs,
            agent_limits: vec![Limits::at_most(1); agents.len()],
            task_limits: vec![Limits::exactly(1); tasks.len()],
            fixed: vec![],
            sense: Sense::Minimize,
        }
    }

    /// Create a one-to-one problem without forbidden pairs.
    pub fn classic<S: AsRef<str>>(agents: &[S], tasks: &[S], costs: Vec<Vec<f64>>) -> Self {
        let mut p = AssignmentProblem::new(
            agents,
            tasks,
            costs
                .into_iter()
                .map(|row| row.into_iter().map(Some).collect())
                .collect(),
        );
        p.agent_limits = vec![Limits::exactly(1); p.agents.len()];
        p
    }

    /// Set the limits of all agents.
    pub fn with_agent_limits(mut self, limits: Limits) -> Self {
        self.agent_limits = vec![limits; self.agents.len()];
        self
    }

    /// Set the limits of all tasks.
    pub fn with_task_limits(mut self, limits: Limits) -> Self {
        self.task_limits = vec![limits; self.tasks.len()];
        self
    }

    /// Forbid agent `i` to do task `j`.
    pub fn forbid(mut self, i: usize, j: usize) -> Self {
        if let Some(c) = self.costs.get_mut(i).and_then(|row| row.get_mut(j)) {
            *c = None;
        }
        self
    }

    /// Require agent `i` to do task `j`.
    pub fn fix(mut self, i: usize, j: usize) -> Self {
        self.fixed.push((i, j));
        self
    }

    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    pub fn num_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Check the dimensions and limits of the problem.
    pub fn validate(&self) -> Result<()> {
        let (m, n) = (self.agents.len(), self.tasks.len());
        let dim = |context: String, expected, found| {
            if expected != found {
                Err(Error::DimensionMismatch { context, expected, found })
            } else {
                Ok(())
            }
        };
        dim("cost rows".to_string(), m, self.costs.len())?;
        for (i, row) in self.costs.iter().enumerate() {
            dim(format!("cost row of '{}'", self.agents[i]), n, row.len())?;
            if let Some(j) = row.iter().position(|c| c.map_or(false, |c| !c.is_finite())) {
                return Err(Error::InvalidData(format!(
                    "cost of '{}' for '{}' is not finite",
                    self.agents[i], self.tasks[j]
                )));
            }
        }
        dim("agent limits".to_string(), m, self.agent_limits.len())?;
        dim("task limits".to_string(), n, self.task_limits.len())?;
        for (name, lim) in self
            .agents
            .iter()
            .zip(&self.agent_limits)
            .chain(self.tasks.iter().zip(&self.task_limits))
        {
            if !lim.is_valid() {
                return Err(Error::InvalidData(format!("limits of '{}' are empty", name)));
            }
        }
        for &(i, j) in &self.fixed {
            if i >= m || j >= n {
                return Err(Error::InvalidData(format!("fixed pair ({}, {}) out of range", i, j)));
            }
            if self.costs[i][j].is_none() {
                return Err(Error::InvalidData(format!(
                    "fixed pair '{}' - '{}' is forbidden",
                    self.agents[i], self.tasks[j]
                )));
            }
        }
        Ok(())
    }

    /// The allowed pairs in row major order.
    pub fn allowed_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = vec![];
        for (i, row) in self.costs.iter().enumerate() {
            for (j, c) in row.iter().enumerate() {
                if c.is_some() {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Return `true` if the chosen pairs form a feasible assignment.
    pub fn is_feasible(&self, pairs: &[(usize, usize)]) -> bool {
        let mut agent_count = vec![0; self.agents.len()];
        let mut task_count = vec![0; self.tasks.len()];
        for &(i, j) in pairs {
            if self.costs[i][j].is_none() {
                return false;
            }
            agent_count[i] += 1;
            task_count[j] += 1;
        }
        self.fixed.iter().all(|f| pairs.contains(f))
            && agent_count.iter().zip(&self.agent_limits).all(|(&k, l)| l.contains(k))
            && task_count.iter().zip(&self.task_limits).all(|(&k, l)| l.contains(k))
    }

    /// Total cost of the chosen pairs, forbidden pairs count as zero.
    pub fn cost_of(&self, pairs: &[(usize, usize)]) -> f64 {
        pairs.iter().filter_map(|&(i, j)| self.costs[i][j]).sum()
    }

    /// Add the variables and rows of the problem to `lp`.
    ///
    /// The variable names start with `prefix`. Returns the variable of
    /// every allowed pair together with the objective terms.
    fn add_to(&self, lp: &mut Problem, prefix: &str) -> Result<(Vec<((usize, usize), Var)>, Vec<(Var, f64)>)> {
        let mut vars = vec![];
        for (i, j) in self.allowed_pairs() {
            let lower = if self.fixed.contains(&(i, j)) { 1.0 } else { 0.0 };
            let v = lp.add_var(&format!("{}x_{}_{}", prefix, i, j), lower, 1.0, true)?;
            vars.push(((i, j), v));
        }

        let rows = (0..self.agents.len())
            .map(|i| (self.agent_limits[i], vars.iter().filter(|((a, _), _)| *a == i).collect::<Vec<_>>()))
            .chain(
                (0..self.tasks.len())
                    .map(|j| (self.task_limits[j], vars.iter().filter(|((_, t), _)| *t == j).collect::<Vec<_>>())),
            );
        for (lim, row) in rows {
            let terms: Vec<_> = row.iter().map(|&&(_, v)| (v, 1.0)).collect();
            match lim.max {
                Some(max) if max == lim.min => {
                    lp.add_constraint(terms, Relation::Eq, f64::from(max))?;
                }
                max => {
                    if lim.min > 0 {
                        lp.add_constraint(terms.clone(), Relation::Ge, f64::from(lim.min))?;
                    }
                    if let Some(max) = max {
                        if (max as usize) < terms.len() {
                            lp.add_constraint(terms, Relation::Le, f64::from(max))?;
                        }
                    }
                }
            }
        }

        let objective = vars
            .iter()
            .filter_map(|&((i, j), v)| self.costs[i][j].map(|c| (v, c)))
            .collect();
        Ok((vars, objective))
    }

    /// Build the binary integer program.
    fn model(&self) -> Result<(Problem, Vec<((usize, usize), Var)>)> {
        let mut lp = Problem::new(self.sense);
        let (vars, objective) = self.add_to(&mut lp, "")?;
        lp.set_objective(objective)?;
        Ok((lp, vars))
    }

    /// The chosen pairs of an optimal LP solution.
    fn chosen(&self, vars: &[((usize, usize), Var)], sol: &Solution) -> AssignmentSolution {
        let pairs: Vec<_> = vars
            .iter()
            .filter(|&&(_, v)| sol.value(v) > 0.5)
            .filter_map(|&((i, j), _)| self.costs[i][j].map(|cost| Pair { agent: i, task: j, cost }))
            .collect();
        AssignmentSolution {
            state: SolutionState::Optimal,
            cost: pairs.iter().map(|p| p.cost).sum(),
            pairs,
        }
    }

    /// Solve the problem.
    pub fn solve(&self) -> Result<AssignmentSolution> {
        self.validate()?;
        let (lp, vars) = self.model()?;
        debug!(vars = lp.num_vars(), rows = lp.num_constraints(), "assignment model");
        let sol = lp.solve()?;
        if !sol.is_optimal() {
            return Ok(AssignmentSolution {
                state: sol.state,
                cost: 0.0,
                pairs: vec![],
            });
        }
        Ok(self.chosen(&vars, &sol))
    }

    /// Solve the problem once for every task with a positive minimum,
    /// that minimum reduced by one.
    ///
    /// This shows which task should get fewer agents than required if the
    /// problem itself is infeasible.
    pub fn deficit_scenarios(&self) -> Result<Vec<Deficit>> {
        self.validate()?;
        let mut result = vec![];
        for j in 0..self.tasks.len() {
            if self.task_limits[j].min == 0 {
                continue;
            }
            let mut relaxed = self.clone();
            relaxed.task_limits[j].min -= 1;
            let sol = relaxed.solve()?;
            debug!(task = %self.tasks[j], state = %sol.state, cost = sol.cost, "deficit scenario");
            result.push(Deficit {
                task: j,
                state: sol.state,
                cost: sol.cost,
            });
        }
        Ok(result)
    }
}

/// One period of a [`ScheduleProblem`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Period {
    pub name: String,
    pub problem: AssignmentProblem,
}

/// Assignment problems over several periods with the same agents and
/// tasks.
///
/// Every period is an [`AssignmentProblem`] of its own, but an agent does
/// each task in at most one period. All periods are solved together as one
/// binary program with a row `sum_p x[p][i][j] <= 1` for every pair
/// `(i, j)` allowed in more than one period.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleProblem {
    pub periods: Vec<Period>,
}

/// The result of solving a [`ScheduleProblem`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleSolution {
    pub state: SolutionState,
    /// Total cost over all periods.
    pub cost: f64,
    /// The assignment of each period, empty unless optimal.
    pub periods: Vec<AssignmentSolution>,
}

impl ScheduleProblem {
    pub fn new<S: AsRef<str>>(periods: Vec<(S, AssignmentProblem)>) -> Self {
        ScheduleProblem {
            periods: periods
                .into_iter()
                .map(|(name, problem)| Period {
                    name: name.as_ref().to_string(),
                    problem,
                })
                .collect(),
        }
    }

    /// The agents, taken from the first period.
    pub fn agents(&self) -> &[String] {
        self.periods.first().map_or(&[][..], |p| p.problem.agents.as_slice())
    }

    /// The tasks, taken from the first period.
    pub fn tasks(&self) -> &[String] {
        self.periods.first().map_or(&[][..], |p| p.problem.tasks.as_slice())
    }

    /// The optimization sense, taken from the first period.
    pub fn sense(&self) -> Sense {
        self.periods.first().map_or(Sense::Minimize, |p| p.problem.sense)
    }

    /// Check every period and that all periods agree on agents, tasks and sense.
    pub fn validate(&self) -> Result<()> {
        let first = match self.periods.first() {
            Some(first) => &first.problem,
            None => return Err(Error::InvalidData("schedule without periods".to_string())),
        };
        for period in &self.periods {
            let p = &period.problem;
            p.validate()?;
            if p.agents != first.agents || p.tasks != first.tasks {
                return Err(Error::InvalidData(format!(
                    "agents or tasks of period '{}' differ from the first period",
                    period.name
                )));
            }
            if p.sense != first.sense {
                return Err(Error::InvalidData(format!("period '{}' has a different sense", period.name)));
            }
        }
        Ok(())
    }

    /// Return `true` if the chosen pairs of every period form a feasible
    /// schedule.
    pub fn is_feasible(&self, chosen: &[Vec<(usize, usize)>]) -> bool {
        if chosen.len() != self.periods.len()
            || !self.periods.iter().zip(chosen).all(|(p, pairs)| p.problem.is_feasible(pairs))
        {
            return false;
        }
        chosen
            .iter()
            .enumerate()
            .all(|(k, pairs)| chosen[k + 1..].iter().all(|later| pairs.iter().all(|f| !later.contains(f))))
    }

    /// Solve all periods together.
    pub fn solve(&self) -> Result<ScheduleSolution> {
        self.validate()?;
        let mut lp = Problem::new(self.sense());
        let mut period_vars = vec![];
        let mut objective = vec![];
        for (k, period) in self.periods.iter().enumerate() {
            let (vars, obj) = period.problem.add_to(&mut lp, &format!("p{}_", k))?;
            period_vars.push(vars);
            objective.extend(obj);
        }
        for i in 0..self.agents().len() {
            for j in 0..self.tasks().len() {
                let terms: Vec<_> = period_vars
                    .iter()
                    .flat_map(|vars| vars.iter().filter(|&&(pair, _)| pair == (i, j)).map(|&(_, v)| (v, 1.0)))
                    .collect();
                if terms.len() > 1 {
                    lp.add_constraint(terms, Relation::Le, 1.0)?;
                }
            }
        }
        lp.set_objective(objective)?;
        debug!(vars = lp.num_vars(), rows = lp.num_constraints(), "schedule model");

        let sol = lp.solve()?;
        if !sol.is_optimal() {
            return Ok(ScheduleSolution {
                state: sol.state,
                cost: 0.0,
                periods: vec![],
            });
        }
        let periods: Vec<_> = self
            .periods
            .iter()
            .zip(&period_vars)
            .map(|(period, vars)| period.problem.chosen(vars, &sol))
            .collect();
        Ok(ScheduleSolution {
            state: SolutionState::Optimal,
            cost: periods.iter().map(|p| p.cost).sum(),
            periods,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translators() -> AssignmentProblem {
        AssignmentProblem::new(
            &["bibiana", "dayana", "mario", "juan"],
            &["ch14", "ch15", "ch16", "ch17"],
            vec![
                vec![Some(120.0), Some(105.0), Some(107.0), Some(110.0)],
                vec![Some(116.0), Some(109.0), Some(107.0), Some(110.0)],
                vec![Some(115.0), Some(120.0), Some(113.0), Some(111.0)],
                vec![Some(122.0), Some(109.0), Some(118.0), Some(115.0)],
            ],
        )
        .with_task_limits(Limits::at_least(1))
    }

    #[test]
    fn test_limits() {
        assert!(Limits::exactly(2).contains(2));
        assert!(!Limits::exactly(2).contains(1));
        assert!(Limits::at_least(1).contains(7));
        assert!(Limits::at_most(1).contains(0));
        assert!(!Limits { min: 2, max: Some(1) }.is_valid());
    }

    #[test]
    fn test_forbidden_and_fixed() {
        let p = AssignmentProblem::classic(
            &["a", "b", "c"],
            &["x", "y", "z"],
            vec![vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0], vec![3.0, 6.0, 9.0]],
        );
        let free = p.solve().unwrap();
        assert_eq!(free.cost, 10.0);

        let p = p.forbid(0, 2).fix(1, 1);
        let sol = p.solve().unwrap();
        assert_eq!(sol.state, SolutionState::Optimal);
        assert_eq!(sol.agent_tasks(1), vec![1]);
        // a-x and c-z remain
        assert_eq!(sol.cost, 14.0);
        let chosen: Vec<_> = sol.pairs.iter().map(|p| (p.agent, p.task)).collect();
        assert!(p.is_feasible(&chosen));
    }

    #[test]
    fn test_deficit() {
        let mut p = translators();
        p.task_limits[0] = Limits::at_least(2);
        assert_eq!(p.solve().unwrap().state, SolutionState::Infeasible);

        let scenarios = p.deficit_scenarios().unwrap();
        let costs: Vec<_> = scenarios.iter().map(|d| (d.task, d.state, d.cost)).collect();
        assert_eq!(
            costs,
            vec![
                (0, SolutionState::Optimal, 441.0),
                (1, SolutionState::Optimal, 453.0),
                (2, SolutionState::Optimal, 450.0),
                (3, SolutionState::Optimal, 447.0),
            ]
        );
    }

    #[test]
    fn test_validate() {
        let mut p = translators();
        p.costs[2].pop();
        assert!(matches!(p.solve(), Err(Error::DimensionMismatch { expected: 4, found: 3, .. })));

        let p = translators().forbid(0, 0).fix(0, 0);
        assert!(matches!(p.validate(), Err(Error::InvalidData(_))));
    }

    fn two_days() -> ScheduleProblem {
        let day = |costs| {
            AssignmentProblem::classic(&["a", "b"], &["x", "y"], costs).with_task_limits(Limits::at_least(1))
        };
        ScheduleProblem::new(vec![
            ("first", day(vec![vec![1.0, 5.0], vec![5.0, 2.0]])),
            ("second", day(vec![vec![1.0, 4.0], vec![5.0, 2.0]])),
        ])
    }

    #[test]
    fn test_schedule_no_repeat() {
        let p = two_days();
        // each day alone picks a-x and b-y
        for period in &p.periods {
            assert_eq!(period.problem.solve().unwrap().cost, 3.0);
        }
        let sol = p.solve().unwrap();
        assert_eq!(sol.state, SolutionState::Optimal);
        // swapping on the second day is cheaper than on the first
        assert_eq!(sol.cost, 12.0);
        assert_eq!(sol.periods[0].agent_tasks(0), vec![0]);
        assert_eq!(sol.periods[1].agent_tasks(0), vec![1]);
        let chosen: Vec<Vec<_>> = sol
            .periods
            .iter()
            .map(|s| s.pairs.iter().map(|p| (p.agent, p.task)).collect())
            .collect();
        assert!(p.is_feasible(&chosen));
        assert!(!p.is_feasible(&[chosen[0].clone(), chosen[0].clone()]));
    }

    #[test]
    fn test_schedule_infeasible() {
        let mut p = two_days();
        let third = p.periods[0].clone();
        p.periods.push(third);
        // two tasks cannot be rotated over three days
        assert_eq!(p.solve().unwrap().state, SolutionState::Infeasible);
    }

    #[test]
    fn test_schedule_validate() {
        assert!(matches!(ScheduleProblem::new::<&str>(vec![]).solve(), Err(Error::InvalidData(_))));
        let mut p = two_days();
        p.periods[1].problem.tasks[1] = "z".to_string();
        assert!(matches!(p.validate(), Err(Error::InvalidData(_))));
    }
}
