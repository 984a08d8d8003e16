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

use std::error::Error;

use ordered_float::OrderedFloat;
use rs_netopt::catalog;
use rs_netopt::instance::{Instance, Outcome};
use rs_netopt::maxflow::{EdmondsKarp, ResidualPolicy};
use rs_netopt::transship::Method;
use rs_netopt::{Network, SolutionState};

const VALUES: &[(&str, Option<f64>)] = &[
    ("cabling-5", Some(18.0)),
    ("cabling-6", Some(25.0)),
    ("cabling-7", Some(9.0)),
    ("cabling-8", Some(37.0)),
    ("pipeline-6", Some(17.0)),
    ("pipeline-7", Some(17.0)),
    ("ai-gt", Some(10.0)),
    ("ai-gt-forward", Some(10.0)),
    ("crew-zones", Some(22.0)),
    ("theater-route", Some(11.0)),
    ("mandatory-stop", Some(10.0)),
    ("short-trip", Some(17.0)),
    ("road-network", Some(10.0)),
    ("city-route", Some(11.0)),
    ("suppliers", Some(12.0)),
    ("translators", None),
    ("translators-2", Some(411.0)),
    ("relay", Some(106.0)),
    ("relay-fixed", Some(107.0)),
    ("communities", Some(504.0)),
    ("builders", Some(20.0)),
    ("consultants", Some(22.0)),
    ("carriers-monday", Some(12.0)),
    ("carriers-thursday", Some(19.0)),
    ("carriers-two-day", Some(35.0)),
    ("coal-mines", Some(165220.0)),
    ("water", Some(190.0)),
    ("water-min", Some(210.0)),
    ("breweries", Some(360.0)),
    ("breweries-cap", Some(650.0)),
    ("car-plants", Some(345600.0)),
    ("wind-turbines", Some(14209.0)),
    ("coal-transship", Some(25600.0)),
    ("computer-network", Some(20700.0)),
    ("fuel", Some(278000.0)),
    ("oil-barrels", Some(51500.0)),
];

fn assert_value(name: &str, value: Option<f64>, expected: Option<f64>) {
    match (value, expected) {
        (Some(x), Some(y)) => assert!((x - y).abs() < 1e-6, "Instance: {} value: {} expected: {}", name, x, y),
        _ => assert_eq!(value, expected, "Instance: {}", name),
    }
}

#[test]
fn test_catalog_values() -> Result<(), Box<dyn Error>> {
    assert_eq!(catalog::names().count(), VALUES.len());
    for &(name, expected) in VALUES {
        let instance = catalog::get(name)?;
        let outcome = instance.solve()?;
        assert_value(name, outcome.value(), expected);

        let verification = instance.verify(&outcome)?;
        assert!(verification.agrees, "Instance: {} {:?}", name, verification);
        assert_value(name, verification.value, expected);
    }
    Ok(())
}

#[test]
fn test_catalog_json() -> Result<(), Box<dyn Error>> {
    for name in catalog::names() {
        let instance = catalog::get(name)?;
        let text = instance.to_string()?;
        let again = Instance::from_reader(text.as_bytes())?;
        assert_eq!(again.kind(), instance.kind());
        assert_eq!(again.to_string()?, text, "Instance: {}", name);
    }
    Ok(())
}

/// Both residual policies find the same maximum flow on the pipelines.
#[test]
fn test_residual_policies() -> Result<(), Box<dyn Error>> {
    for &name in &["pipeline-6", "pipeline-7", "ai-gt"] {
        let (arcs, source, sink) = match catalog::get(name)? {
            Instance::MaxFlow { arcs, source, sink, .. } => (arcs, source, sink),
            _ => panic!("{} is not a max flow instance", name),
        };
        let g = Network::from_arcs(&arcs.iter().map(|a| (&a.0, &a.1)).collect::<Vec<_>>())?;
        let (s, t) = (g.node_or_err(&source)?, g.node_or_err(&sink)?);

        let mut values = vec![];
        for &policy in &[ResidualPolicy::Full, ResidualPolicy::ForwardOnly] {
            let mut ek = EdmondsKarp::new(&g).with_policy(policy);
            ek.solve(s, t, |e| arcs[e.index()].2)?;
            let value: f64 = ek.value();
            for e in g.edges() {
                assert!(ek.flow(e) >= 0.0 && ek.flow(e) <= arcs[e.index()].2);
            }
            values.push(value);
        }
        assert_eq!(values[0], values[1], "Instance: {}", name);
    }
    Ok(())
}

#[test]
fn test_transshipment_methods() -> Result<(), Box<dyn Error>> {
    for &name in &["coal-transship", "computer-network", "fuel", "oil-barrels"] {
        let p = match catalog::get(name)? {
            Instance::Transshipment(p) => p,
            _ => panic!("{} is not a transshipment instance", name),
        };
        let lp = p.solve(Method::LinearProgram)?;
        let flow = p.solve(Method::NetworkFlow)?;
        assert_eq!(lp.state, SolutionState::Optimal);
        assert_eq!(flow.state, SolutionState::Optimal);
        assert!((lp.cost - flow.cost).abs() < 1e-6, "Instance: {}", name);
        assert!(lp.check(&p).iter().all(|c| c.ok));
        assert!(flow.check(&p).iter().all(|c| c.ok));
    }
    Ok(())
}

#[test]
fn test_infeasible_translators() -> Result<(), Box<dyn Error>> {
    let outcome = catalog::get("translators")?.solve()?;
    let a = match outcome {
        Outcome::Assignment(a) => a,
        _ => panic!("not an assignment outcome"),
    };
    assert_eq!(a.solution.state, SolutionState::Infeasible);
    let mut costs: Vec<_> = a.deficits.iter().map(|d| OrderedFloat(d.cost)).collect();
    costs.sort();
    assert_eq!(
        costs,
        vec![
            OrderedFloat(441.0),
            OrderedFloat(447.0),
            OrderedFloat(450.0),
            OrderedFloat(453.0)
        ]
    );
    Ok(())
}

#[test]
fn test_turbine_plan() -> Result<(), Box<dyn Error>> {
    let outcome = catalog::get("wind-turbines")?.solve()?;
    let t = match outcome {
        Outcome::Transportation(t) => t,
        _ => panic!("not a transportation outcome"),
    };
    // november is expensive, nothing is produced there
    assert!((t.plan.shipped_from(2) - 38.0).abs() < 1e-6);
    assert!(t.plan.shipped_from(3).abs() < 1e-6);
    // nothing is delivered before it is produced
    for i in 1..4 {
        for j in 0..i {
            assert!(t.plan.shipment(i, j).abs() < 1e-9);
        }
    }
    Ok(())
}

#[test]
fn test_carriers_two_day() -> Result<(), Box<dyn Error>> {
    let instance = catalog::get("carriers-two-day")?;
    let mut outcome = instance.solve()?;
    let s = match outcome {
        Outcome::Schedule(ref mut s) => s,
        _ => panic!("not a schedule outcome"),
    };
    assert_eq!(s.periods, vec!["monday", "thursday"]);
    let (monday, thursday) = (&s.solution.periods[0], &s.solution.periods[1]);
    for i in 0..4 {
        assert_eq!(monday.agent_tasks(i).len(), 1);
        assert_ne!(monday.agent_tasks(i), thursday.agent_tasks(i));
    }
    // both days alone cost 16 + 17
    assert!(s.solution.cost > 33.0);

    // a cost the enumeration cannot reach makes the verification fail
    s.solution.cost = 33.0;
    let verification = instance.verify(&outcome)?;
    assert!(!verification.agrees);
    assert_eq!(verification.value, Some(35.0));
    assert_eq!(verification.exit_status(), 2);
    Ok(())
}
