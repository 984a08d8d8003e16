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

//! Plain text reports of outcomes.
//!
//! [`Outcome`] and [`Verification`] implement [`Display`](std::fmt::Display)
//! with a report meant for the terminal. Values that are integral are
//! printed without fractional part, others with one decimal.

use crate::instance::{
    AssignmentOutcome, FlowOutcome, Outcome, PathOutcome, ScheduleOutcome, TransportOutcome, TransshipOutcome,
    TreeOutcome, Verification,
};
use crate::transport::{Balance, RowCheck};
use crate::SolutionState;

use std::fmt::{self, Display, Formatter};

/// A number formatted for reports.
pub struct Num(pub f64);

impl Display for Num {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let x = self.0;
        if (x - x.round()).abs() < 1e-9 {
            // avoid "-0"
            write!(f, "{}", x.round() + 0.0)
        } else {
            write!(f, "{:.1}", x)
        }
    }
}

const TOL: f64 = 1e-9;

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Outcome::SpanningTree(t) => t.fmt(f),
            Outcome::MaxFlow(m) => m.fmt(f),
            Outcome::ShortestPath(p) => p.fmt(f),
            Outcome::Assignment(a) => a.fmt(f),
            Outcome::Schedule(s) => s.fmt(f),
            Outcome::Transportation(t) => t.fmt(f),
            Outcome::Transshipment(t) => t.fmt(f),
        }
    }
}

impl Display for TreeOutcome {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "Minimum spanning tree")?;
        for (u, v, w) in &self.edges {
            writeln!(f, "  {} - {}  {}", u, v, Num(*w))?;
        }
        writeln!(f, "Total weight: {}", Num(self.weight))?;
        if !self.spanning {
            writeln!(f, "The network is not connected, this is a spanning forest")?;
        }
        Ok(())
    }
}

impl Display for FlowOutcome {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "Augmenting paths")?;
        for (i, p) in self.augmentations.iter().enumerate() {
            writeln!(f, "  {:2}. {}  +{}", i + 1, p.nodes.join(" -> "), Num(p.amount))?;
        }
        writeln!(f, "Arc flows")?;
        for (u, v, x) in self.flows.iter().filter(|a| a.2 > TOL) {
            writeln!(f, "  {} -> {}  {}", u, v, Num(*x))?;
        }
        writeln!(f, "Source side of minimum cut: {{{}}}", self.cut.join(", "))?;
        if self.forward_only {
            writeln!(f, "Maximum flow (forward arcs only): {}", Num(self.value))
        } else {
            writeln!(f, "Maximum flow: {}", Num(self.value))
        }
    }
}

impl Display for PathOutcome {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match (&self.nodes, self.length) {
            (Some(nodes), Some(length)) => {
                writeln!(f, "Shortest path via {}", self.stops.join(", "))?;
                writeln!(f, "  {}", nodes.join(" -> "))?;
                writeln!(f, "Length: {}", Num(length))
            }
            _ => writeln!(f, "No path via {}", self.stops.join(", ")),
        }
    }
}

impl Display for AssignmentOutcome {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let sol = &self.solution;
        writeln!(f, "Assignment: {}", sol.state)?;
        if sol.state == SolutionState::Optimal {
            for p in &sol.pairs {
                writeln!(f, "  {} -> {}  {}", self.agents[p.agent], self.tasks[p.task], Num(p.cost))?;
            }
            let idle: Vec<_> = (0..self.agents.len())
                .filter(|&i| sol.agent_tasks(i).is_empty())
                .map(|i| self.agents[i].as_str())
                .collect();
            if !idle.is_empty() {
                writeln!(f, "Unassigned: {}", idle.join(", "))?;
            }
            writeln!(f, "Total cost: {}", Num(sol.cost))?;
        }
        if !self.deficits.is_empty() {
            writeln!(f, "Relaxing one task by one agent")?;
            for d in &self.deficits {
                if d.state == SolutionState::Optimal {
                    writeln!(f, "  {}  {}", self.tasks[d.task], Num(d.cost))?;
                } else {
                    writeln!(f, "  {}  {}", self.tasks[d.task], d.state)?;
                }
            }
        }
        Ok(())
    }
}

impl Display for ScheduleOutcome {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let sol = &self.solution;
        writeln!(f, "Schedule: {}", sol.state)?;
        for (name, period) in self.periods.iter().zip(&sol.periods) {
            writeln!(f, "{}", name)?;
            for p in &period.pairs {
                writeln!(f, "  {} -> {}  {}", self.agents[p.agent], self.tasks[p.task], Num(p.cost))?;
            }
            writeln!(f, "  cost {}", Num(period.cost))?;
        }
        if sol.state == SolutionState::Optimal {
            writeln!(f, "Total cost: {}", Num(sol.cost))?;
        }
        Ok(())
    }
}

fn write_checks(f: &mut Formatter, checks: &[RowCheck]) -> fmt::Result {
    if checks.is_empty() {
        return Ok(());
    }
    writeln!(f, "Checks")?;
    for c in checks {
        writeln!(
            f,
            "  {:<16} {} {} {}  {}",
            c.name,
            Num(c.actual),
            c.relation,
            Num(c.limit),
            if c.ok { "ok" } else { "VIOLATED" }
        )?;
    }
    Ok(())
}

impl Display for TransportOutcome {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.balance {
            Balance::Balanced => writeln!(f, "Supply and demand are balanced")?,
            Balance::ExcessSupply(x) => writeln!(f, "Supply exceeds demand by {}", Num(x))?,
            Balance::Shortage(x) => writeln!(f, "Demand exceeds supply by {}", Num(x))?,
        }
        let plan = &self.plan;
        writeln!(f, "Transportation: {}", plan.state)?;
        for (i, row) in plan.shipments.iter().enumerate() {
            for (j, &x) in row.iter().enumerate().filter(|(_, &x)| x > TOL) {
                let src = self.sources.get(i).map_or("dummy", |s| s.as_str());
                let dst = self.destinations.get(j).map_or("dummy", |s| s.as_str());
                writeln!(f, "  {} -> {}  {}", src, dst, Num(x))?;
            }
        }
        if plan.state == SolutionState::Optimal {
            writeln!(f, "Total cost: {}", Num(plan.cost))?;
        }
        write_checks(f, &self.checks)
    }
}

impl Display for TransshipOutcome {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let plan = &self.plan;
        writeln!(f, "Transshipment: {}", plan.state)?;
        for ((u, v), &x) in self.arcs.iter().zip(plan.flows.iter()).filter(|(_, &x)| x > TOL) {
            writeln!(f, "  {} -> {}  {}", u, v, Num(x))?;
        }
        if plan.state == SolutionState::Optimal {
            writeln!(f, "Total cost: {}", Num(plan.cost))?;
        }
        write_checks(f, &self.checks)
    }
}

impl Display for Verification {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let value = self.value.map_or_else(|| "none".to_string(), |x| Num(x).to_string());
        writeln!(
            f,
            "Verification by {}: {} ({})",
            self.method,
            value,
            if self.agrees { "agrees" } else { "DISAGREES" }
        )?;
        for note in &self.notes {
            writeln!(f, "  {}", note)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_num() {
        assert_eq!(Num(12.0).to_string(), "12");
        assert_eq!(Num(106.5).to_string(), "106.5");
        assert_eq!(Num(-0.0).to_string(), "0");
        assert_eq!(Num(2.4).to_string(), "2.4");
    }

    #[test]
    fn test_tree_report() {
        let out = catalog::get("cabling-5").unwrap().solve().unwrap();
        let text = out.to_string();
        assert!(text.starts_with("Minimum spanning tree\n"));
        assert!(text.contains("  2 - 4  2\n"));
        assert!(text.ends_with("Total weight: 18\n"));
    }

    #[test]
    fn test_infeasible_assignment_report() {
        let out = catalog::get("translators").unwrap().solve().unwrap();
        let text = out.to_string();
        assert!(text.starts_with("Assignment: infeasible\n"));
        assert!(text.contains("  chapter 14  441\n"));
        assert!(!text.contains("Total cost"));
    }

    #[test]
    fn test_schedule_report() {
        let out = catalog::get("carriers-two-day").unwrap().solve().unwrap();
        let text = out.to_string();
        assert!(text.starts_with("Schedule: optimal\nmonday\n"));
        assert!(text.contains("\nthursday\n"));
        assert!(text.ends_with("Total cost: 35\n"));
    }

    #[test]
    fn test_verification_report() {
        let inst = catalog::get("short-trip").unwrap();
        let out = inst.solve().unwrap();
        let text = inst.verify(&out).unwrap().to_string();
        assert_eq!(
            text,
            "Verification by linear program: 17 (agrees)\n  2 simple paths enumerated\n"
        );
    }
}
