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

//! Built-in worked instances.
//!
//! Every entry is a small classroom exercise. The instances can be solved
//! and verified like instances read from a file.
//!
//! # Example
//!
//! ```
//! use rs_netopt::catalog;
//!
//! let inst = catalog::get("cabling-5").unwrap();
//! let out = inst.solve().unwrap();
//! assert_eq!(out.value(), Some(18.0));
//! assert!(catalog::names().any(|n| n == "coal-mines"));
//! ```

use crate::assignment::{AssignmentProblem, Limits, ScheduleProblem};
use crate::error::{Error, Result};
use crate::instance::{Instance, WeightedArc};
use crate::transport::{DemandMode, SupplyMode, TransportationProblem};
use crate::transship::TransshipmentProblem;

use std::path::Path;

struct Entry {
    name: &'static str,
    description: &'static str,
    build: fn() -> Instance,
}

const ENTRIES: &[Entry] = &[
    Entry {
        name: "cabling-5",
        description: "cheapest cabling connecting 5 offices",
        build: cabling_5,
    },
    Entry {
        name: "cabling-6",
        description: "cheapest cabling connecting 6 offices",
        build: cabling_6,
    },
    Entry {
        name: "cabling-7",
        description: "cheapest cabling connecting 7 offices, one free connection",
        build: cabling_7,
    },
    Entry {
        name: "cabling-8",
        description: "cheapest cabling connecting 8 offices",
        build: cabling_8,
    },
    Entry {
        name: "pipeline-6",
        description: "maximum flow through a pipeline network with 7 stations, full residual network",
        build: pipeline_6,
    },
    Entry {
        name: "pipeline-7",
        description: "maximum flow from station 1 to station 7, full residual network",
        build: pipeline_7,
    },
    Entry {
        name: "ai-gt",
        description: "maximum flow from node ai to node gt, full residual network",
        build: ai_gt_full,
    },
    Entry {
        name: "ai-gt-forward",
        description: "maximum flow from ai to gt searching forward arcs only",
        build: ai_gt_forward,
    },
    Entry {
        name: "crew-zones",
        description: "fastest way of a repair crew from zone 1 to zone 6 on two-way streets",
        build: crew_zones,
    },
    Entry {
        name: "theater-route",
        description: "fastest route from node 0 to node 8 in a one-way network with parallel arcs",
        build: theater_route,
    },
    Entry {
        name: "mandatory-stop",
        description: "cheapest trip from A to J with a mandatory stop at B",
        build: mandatory_stop,
    },
    Entry {
        name: "short-trip",
        description: "shortest trip from A to G",
        build: short_trip,
    },
    Entry {
        name: "road-network",
        description: "shortest route from O to T",
        build: road_network,
    },
    Entry {
        name: "city-route",
        description: "cheapest route from city A to city J",
        build: city_route,
    },
    Entry {
        name: "suppliers",
        description: "three suppliers for three machines, one each",
        build: suppliers,
    },
    Entry {
        name: "translators",
        description: "translators for four chapters, chapter 14 needs two (infeasible)",
        build: translators,
    },
    Entry {
        name: "translators-2",
        description: "translators for four chapters with two forbidden pairs",
        build: translators_2,
    },
    Entry {
        name: "relay",
        description: "relay team, each member runs up to two events",
        build: relay,
    },
    Entry {
        name: "relay-fixed",
        description: "relay team where Pedro must do the strength event",
        build: relay_fixed,
    },
    Entry {
        name: "communities",
        description: "installation companies for three communities",
        build: communities,
    },
    Entry {
        name: "builders",
        description: "five workers for four construction processes",
        build: builders,
    },
    Entry {
        name: "consultants",
        description: "four leaders for three clients",
        build: consultants,
    },
    Entry {
        name: "carriers-monday",
        description: "four carriers for three cities on monday, every city served",
        build: carriers_monday,
    },
    Entry {
        name: "carriers-thursday",
        description: "four carriers for three cities on thursday, every city served",
        build: carriers_thursday,
    },
    Entry {
        name: "carriers-two-day",
        description: "four carriers on monday and thursday, never to the same city twice",
        build: carriers_two_day,
    },
    Entry {
        name: "coal-mines",
        description: "balanced transportation from three mines to four centers",
        build: coal_mines,
    },
    Entry {
        name: "water",
        description: "water from three rivers to four cities, excess supply",
        build: water_exact,
    },
    Entry {
        name: "water-min",
        description: "all river water distributed, cities receive at least their needs",
        build: water_min,
    },
    Entry {
        name: "breweries",
        description: "balanced transportation between four breweries and four cities",
        build: breweries,
    },
    Entry {
        name: "breweries-cap",
        description: "breweries with at most 25 units from Monteria to Bogota",
        build: breweries_cap,
    },
    Entry {
        name: "car-plants",
        description: "cars from three plants to two distribution centers",
        build: car_plants,
    },
    Entry {
        name: "wind-turbines",
        description: "production plan over four months with storage cost",
        build: wind_turbines,
    },
    Entry {
        name: "coal-transship",
        description: "coal from two mines via crossing centers to three destinations",
        build: coal_transship,
    },
    Entry {
        name: "computer-network",
        description: "messages from two origins via two transmitters to three destinations",
        build: computer_network,
    },
    Entry {
        name: "fuel",
        description: "fuel gallons through a network of seven nodes",
        build: fuel,
    },
    Entry {
        name: "oil-barrels",
        description: "oil barrels from two refineries via distribution centers to four cities",
        build: oil_barrels,
    },
];

/// The names of all catalog entries.
pub fn names() -> impl Iterator<Item = &'static str> {
    ENTRIES.iter().map(|e| e.name)
}

fn entry(name: &str) -> Result<&'static Entry> {
    ENTRIES
        .iter()
        .find(|e| e.name == name)
        .ok_or_else(|| Error::UnknownInstance(name.to_string()))
}

/// Return the instance with the given name.
pub fn get(name: &str) -> Result<Instance> {
    entry(name).map(|e| (e.build)())
}

/// A one line description of an entry.
pub fn describe(name: &str) -> Result<&'static str> {
    entry(name).map(|e| e.description)
}

/// Load a catalog entry or, if there is no entry of that name, a JSON file.
///
/// A name that is neither an entry nor an existing file is reported as
/// unknown entry.
pub fn load(name: &str) -> Result<Instance> {
    if entry(name).is_ok() || !Path::new(name).exists() {
        get(name)
    } else {
        Instance::from_file(name)
    }
}

fn arcs(data: &[(&str, &str, f64)]) -> Vec<WeightedArc> {
    data.iter().map(|&(u, v, w)| (u.to_string(), v.to_string(), w)).collect()
}

fn matrix<const N: usize>(rows: &[[f64; N]]) -> Vec<Vec<f64>> {
    rows.iter().map(|r| r.to_vec()).collect()
}

fn cabling_5() -> Instance {
    Instance::SpanningTree {
        edges: arcs(&[
            ("1", "2", 16.0),
            ("1", "3", 17.0),
            ("1", "5", 9.0),
            ("2", "3", 3.0),
            ("2", "4", 2.0),
            ("2", "5", 10.0),
            ("3", "4", 13.0),
            ("3", "5", 4.0),
            ("4", "5", 4.0),
        ]),
    }
}

fn cabling_6() -> Instance {
    Instance::SpanningTree {
        edges: arcs(&[
            ("1", "2", 5.0),
            ("1", "3", 5.0),
            ("1", "4", 7.0),
            ("1", "5", 9.0),
            ("2", "3", 6.0),
            ("2", "4", 4.0),
            ("2", "5", 3.0),
            ("3", "4", 5.0),
            ("3", "6", 10.0),
            ("4", "5", 8.0),
            ("4", "6", 8.0),
        ]),
    }
}

fn cabling_7() -> Instance {
    Instance::SpanningTree {
        edges: arcs(&[
            ("1", "2", 3.0),
            ("1", "3", 1.0),
            ("2", "3", 8.0),
            ("2", "4", 0.0),
            ("2", "5", 5.0),
            ("4", "5", 3.0),
            ("4", "7", 9.0),
            ("5", "6", 1.0),
            ("5", "7", 2.0),
            ("6", "7", 1.0),
        ]),
    }
}

fn cabling_8() -> Instance {
    Instance::SpanningTree {
        edges: arcs(&[
            ("1", "2", 8.0),
            ("1", "3", 7.0),
            ("1", "4", 10.0),
            ("2", "3", 5.0),
            ("2", "5", 9.0),
            ("3", "4", 4.0),
            ("3", "5", 10.0),
            ("3", "6", 9.0),
            ("3", "7", 10.0),
            ("4", "7", 9.0),
            ("5", "6", 4.0),
            ("5", "8", 3.0),
            ("6", "7", 5.0),
            ("6", "8", 6.0),
            ("7", "8", 7.0),
        ]),
    }
}

fn max_flow(data: &[(&str, &str, f64)], source: &str, sink: &str, forward_only: bool) -> Instance {
    Instance::MaxFlow {
        arcs: arcs(data),
        source: source.to_string(),
        sink: sink.to_string(),
        forward_only,
    }
}

fn pipeline_6() -> Instance {
    max_flow(
        &[
            ("0", "1", 10.0),
            ("0", "2", 10.0),
            ("1", "2", 1.0),
            ("1", "3", 8.0),
            ("1", "4", 6.0),
            ("2", "1", 1.0),
            ("2", "4", 4.0),
            ("2", "5", 12.0),
            ("3", "4", 3.0),
            ("3", "6", 7.0),
            ("4", "2", 4.0),
            ("4", "3", 3.0),
            ("4", "5", 2.0),
            ("4", "6", 2.0),
            ("5", "4", 2.0),
            ("5", "6", 8.0),
        ],
        "0",
        "6",
        false,
    )
}

fn pipeline_7() -> Instance {
    max_flow(
        &[
            ("1", "2", 16.0),
            ("1", "3", 20.0),
            ("1", "4", 6.0),
            ("2", "3", 6.0),
            ("2", "5", 17.0),
            ("3", "2", 4.0),
            ("3", "4", 4.0),
            ("3", "5", 3.0),
            ("3", "6", 5.0),
            ("4", "6", 8.0),
            ("5", "6", 7.0),
            ("5", "7", 8.0),
            ("6", "7", 9.0),
        ],
        "1",
        "7",
        false,
    )
}

fn ai_gt(forward_only: bool) -> Instance {
    max_flow(
        &[
            ("ai", "b", 6.0),
            ("ai", "c", 4.0),
            ("ai", "d", 3.0),
            ("b", "e", 4.0),
            ("c", "d", 3.0),
            ("c", "e", 1.0),
            ("c", "f", 3.0),
            ("d", "f", 4.0),
            ("e", "gt", 3.0),
            ("f", "gt", 9.0),
        ],
        "ai",
        "gt",
        forward_only,
    )
}

fn ai_gt_full() -> Instance {
    ai_gt(false)
}

fn ai_gt_forward() -> Instance {
    ai_gt(true)
}

fn shortest_path(data: &[(&str, &str, f64)], source: &str, target: &str, via: &[&str], undirected: bool) -> Instance {
    Instance::ShortestPath {
        arcs: arcs(data),
        source: source.to_string(),
        target: target.to_string(),
        via: via.iter().map(|s| s.to_string()).collect(),
        undirected,
    }
}

fn crew_zones() -> Instance {
    shortest_path(
        &[
            ("1", "2", 16.0),
            ("1", "3", 17.0),
            ("2", "3", 9.0),
            ("2", "4", 4.0),
            ("2", "6", 13.0),
            ("3", "5", 3.0),
            ("4", "5", 10.0),
            ("4", "6", 4.0),
            ("5", "6", 2.0),
        ],
        "1",
        "6",
        &[],
        true,
    )
}

fn theater_route() -> Instance {
    shortest_path(
        &[
            ("0", "1", 4.0),
            ("0", "2", 2.0),
            ("1", "2", 2.0),
            ("1", "3", 2.0),
            ("1", "3", 7.0),
            ("2", "1", 4.0),
            ("2", "4", 3.0),
            ("2", "3", 9.0),
            ("3", "5", 1.0),
            ("3", "6", 5.0),
            ("4", "3", 2.0),
            ("4", "6", 3.0),
            ("4", "7", 2.0),
            ("4", "5", 4.0),
            ("5", "6", 1.0),
            ("5", "8", 5.0),
            ("6", "5", 4.0),
            ("6", "7", 3.0),
            ("6", "8", 5.0),
            ("7", "8", 4.0),
            ("7", "6", 3.0),
        ],
        "0",
        "8",
        &[],
        false,
    )
}

/// The layered network of the city route exercises with the given costs of
/// the last two arcs.
fn layered(h_j: f64, i_j: f64) -> Vec<(&'static str, &'static str, f64)> {
    vec![
        ("A", "B", 2.0),
        ("A", "C", 5.0),
        ("A", "D", 4.0),
        ("B", "E", 7.0),
        ("B", "F", 4.0),
        ("B", "G", 6.0),
        ("C", "E", 3.0),
        ("C", "F", 2.0),
        ("C", "G", 4.0),
        ("D", "E", 4.0),
        ("D", "F", 1.0),
        ("D", "G", 5.0),
        ("E", "H", 1.0),
        ("E", "I", 4.0),
        ("F", "H", 6.0),
        ("F", "I", 3.0),
        ("G", "H", 3.0),
        ("G", "I", 3.0),
        ("H", "J", h_j),
        ("I", "J", i_j),
    ]
}

fn mandatory_stop() -> Instance {
    shortest_path(&layered(2.0, 1.0), "A", "J", &["B"], false)
}

fn short_trip() -> Instance {
    shortest_path(
        &[
            ("A", "B", 12.0),
            ("A", "C", 4.0),
            ("B", "D", 5.0),
            ("B", "E", 3.0),
            ("C", "D", 2.0),
            ("C", "F", 10.0),
            ("E", "G", 2.0),
            ("F", "G", 4.0),
        ],
        "A",
        "G",
        &[],
        false,
    )
}

fn road_network() -> Instance {
    shortest_path(
        &[
            ("O", "A", 4.0),
            ("O", "C", 2.0),
            ("O", "B", 3.0),
            ("A", "D", 3.0),
            ("A", "C", 5.0),
            ("B", "C", 4.0),
            ("B", "E", 6.0),
            ("C", "D", 2.0),
            ("C", "F", 2.0),
            ("C", "E", 5.0),
            ("D", "G", 4.0),
            ("D", "F", 2.0),
            ("E", "F", 1.0),
            ("E", "H", 2.0),
            ("E", "I", 5.0),
            ("F", "G", 2.0),
            ("F", "H", 5.0),
            ("G", "T", 7.0),
            ("H", "G", 2.0),
            ("H", "T", 1.0),
            ("H", "I", 3.0),
            ("I", "T", 4.0),
        ],
        "O",
        "T",
        &[],
        false,
    )
}

fn city_route() -> Instance {
    let mut data = layered(3.0, 4.0);
    // this variant has a cheaper arc from A to C
    data[1].2 = 4.0;
    shortest_path(&data, "A", "J", &[], false)
}

fn suppliers() -> Instance {
    Instance::Assignment(AssignmentProblem::classic(
        &["supplier 1", "supplier 2", "supplier 3"],
        &["computer", "printer", "industrial iron"],
        matrix(&[[15.0, 10.0, 8.0], [1.0, 8.0, 3.0], [1.0, 3.0, 7.0]]),
    ))
}

const TRANSLATORS: [&str; 4] = ["Bibiana", "Dayana", "Mario", "Juan"];
const CHAPTERS: [&str; 4] = ["chapter 14", "chapter 15", "chapter 16", "chapter 17"];

fn translators() -> Instance {
    let costs = matrix(&[
        [120.0, 105.0, 107.0, 110.0],
        [116.0, 109.0, 107.0, 110.0],
        [115.0, 120.0, 113.0, 111.0],
        [122.0, 109.0, 118.0, 115.0],
    ]);
    let mut p = AssignmentProblem::classic(&TRANSLATORS, &CHAPTERS, costs)
        .with_agent_limits(Limits::at_most(1))
        .with_task_limits(Limits::at_least(1));
    p.task_limits[0] = Limits::at_least(2);
    Instance::Assignment(p)
}

fn translators_2() -> Instance {
    let costs = matrix(&[
        [90.0, 88.0, 105.0, 110.0],
        [116.0, 109.0, 107.0, 96.0],
        [120.0, 102.0, 113.0, 111.0],
        [114.0, 105.0, 118.0, 115.0],
    ]);
    let p = AssignmentProblem::classic(&TRANSLATORS, &CHAPTERS, costs)
        .with_agent_limits(Limits::at_most(1))
        .forbid(0, 0)
        .forbid(3, 3);
    Instance::Assignment(p)
}

const MEMBERS: [&str; 4] = ["Pedro", "Juliana", "Leonardo", "Diana"];
const EVENTS: [&str; 4] = ["swimming", "balance", "air", "strength"];

fn relay() -> Instance {
    let costs = matrix(&[
        [27.0, 30.0, 26.5, 26.5],
        [26.5, 28.5, 26.0, 26.0],
        [28.0, 28.5, 27.0, 28.0],
        [27.0, 27.0, 27.5, 28.5],
    ]);
    Instance::Assignment(AssignmentProblem::classic(&MEMBERS, &EVENTS, costs).with_agent_limits(Limits::at_most(2)))
}

fn relay_fixed() -> Instance {
    let costs = matrix(&[
        [27.0, 27.5, 25.9, 26.5],
        [28.5, 28.5, 26.0, 26.0],
        [25.0, 26.5, 27.0, 28.0],
        [28.0, 30.0, 27.5, 28.5],
    ]);
    let p = AssignmentProblem::classic(&MEMBERS, &EVENTS, costs)
        .with_agent_limits(Limits::at_most(1))
        .fix(0, 3);
    Instance::Assignment(p)
}

fn communities() -> Instance {
    Instance::Assignment(AssignmentProblem::classic(
        &["company 1", "company 2", "company 3"],
        &["community 1", "community 2", "community 3"],
        matrix(&[[183.0, 210.0, 277.0], [138.0, 173.0, 494.0], [385.0, 113.0, 156.0]]),
    ))
}

fn builders() -> Instance {
    let costs = vec![
        vec![Some(10.0), Some(9.0), Some(6.0), Some(7.0)],
        vec![Some(8.0), Some(7.0), Some(6.0), Some(8.0)],
        vec![Some(8.0), Some(6.0), Some(5.0), Some(9.0)],
        vec![Some(5.0), Some(7.0), Some(7.0), Some(10.0)],
        vec![Some(8.0), Some(7.0), Some(6.0), Some(3.0)],
    ];
    Instance::Assignment(AssignmentProblem::new(
        &["Denis", "Yuly", "Lucia", "Carlos", "Ariel"],
        &["masonry", "tiling", "painting", "flooring"],
        costs,
    ))
}

fn consultants() -> Instance {
    let costs = vec![
        vec![Some(14.0), Some(5.0), Some(19.0)],
        vec![Some(18.0), Some(8.0), Some(18.0)],
        vec![Some(17.0), Some(6.0), Some(10.0)],
        vec![Some(7.0), Some(3.0), Some(5.0)],
    ];
    Instance::Assignment(AssignmentProblem::new(
        &["leader 1", "leader 2", "leader 3", "leader 4"],
        &["client 1", "client 2", "client 3"],
        costs,
    ))
}

const MONDAY: [[f64; 3]; 4] = [[5.0, 3.0, 7.0], [7.0, 9.0, 5.0], [6.0, 7.0, 2.0], [2.0, 12.0, 6.0]];
const THURSDAY: [[f64; 3]; 4] = [[2.0, 7.0, 10.0], [8.0, 5.0, 7.0], [9.0, 6.0, 8.0], [6.0, 8.0, 6.0]];

fn carriers(costs: &[[f64; 3]; 4]) -> Instance {
    let p = AssignmentProblem::classic(
        &["carrier 1", "carrier 2", "carrier 3", "carrier 4"],
        &["Bogota", "Medellin", "Cali"],
        matrix(costs),
    )
    .with_task_limits(Limits::at_least(1));
    Instance::Assignment(p)
}

fn carriers_monday() -> Instance {
    carriers(&MONDAY)
}

fn carriers_thursday() -> Instance {
    carriers(&THURSDAY)
}

fn carriers_two_day() -> Instance {
    let day = |costs: &[[f64; 3]; 4]| {
        AssignmentProblem::classic(
            &["carrier 1", "carrier 2", "carrier 3", "carrier 4"],
            &["Bogota", "Medellin", "Cali"],
            matrix(costs),
        )
        .with_task_limits(Limits::at_least(1))
    };
    Instance::Schedule(ScheduleProblem::new(vec![
        ("monday", day(&[[3.0, 6.0, 9.0], [7.0, 9.0, 5.0], [6.0, 7.0, 8.0], [1.0, 3.0, 6.0]])),
        ("thursday", day(&[[1.0, 3.0, 2.0], [8.0, 5.0, 7.0], [9.0, 6.0, 8.0], [6.0, 8.0, 5.0]])),
    ]))
}

fn coal_mines() -> Instance {
    Instance::Transportation(TransportationProblem::new(
        &[("mine 1", 75.0), ("mine 2", 125.0), ("mine 3", 100.0)],
        &[("center 1", 80.0), ("center 2", 65.0), ("center 3", 70.0), ("center 4", 85.0)],
        matrix(&[
            [866.0, 861.0, 612.0, 590.0],
            [547.0, 622.0, 433.0, 570.0],
            [707.0, 664.0, 426.0, 779.0],
        ]),
    ))
}

fn water(minimum_needs: bool) -> Instance {
    let p = TransportationProblem::new(
        &[("Colombo", 50.0), ("Piave", 60.0), ("Calorie", 50.0)],
        &[("Po", 30.0), ("Ancona", 70.0), ("Edolo", 0.0), ("Pienza", 10.0)],
        matrix(&[[5.0, 2.0, 7.0, 3.0], [3.0, 6.0, 6.0, 1.0], [6.0, 1.0, 2.0, 4.0]]),
    );
    Instance::Transportation(if minimum_needs {
        p.with_demand(DemandMode::AtLeast).with_supply(SupplyMode::Exact)
    } else {
        p
    })
}

fn water_exact() -> Instance {
    water(false)
}

fn water_min() -> Instance {
    water(true)
}

const CITIES: [(&str, f64); 4] = [("Monteria", 70.0), ("Bogota", 40.0), ("Medellin", 70.0), ("Barranquilla", 35.0)];
const BREWERIES: [(&str, f64); 4] = [("Monteria", 80.0), ("Bogota", 30.0), ("Medellin", 60.0), ("Barranquilla", 45.0)];

fn breweries() -> Instance {
    Instance::Transportation(TransportationProblem::new(
        &BREWERIES,
        &CITIES,
        matrix(&[
            [2.0, 5.0, 2.0, 3.0],
            [5.0, 5.0, 7.0, 1.0],
            [6.0, 1.0, 2.0, 4.0],
            [5.0, 1.0, 6.0, 2.0],
        ]),
    ))
}

fn breweries_cap() -> Instance {
    let p = TransportationProblem::new(
        &BREWERIES,
        &CITIES,
        matrix(&[
            [5.0, 2.0, 7.0, 3.0],
            [3.0, 6.0, 6.0, 1.0],
            [6.0, 1.0, 2.0, 4.0],
            [4.0, 3.0, 6.0, 6.0],
        ]),
    );
    Instance::Transportation(p.limit_route(0, 1, 25.0))
}

fn car_plants() -> Instance {
    Instance::Transportation(TransportationProblem::new(
        &[("Los Angeles", 1000.0), ("Detroit", 1500.0), ("New Orleans", 1200.0)],
        &[("Denver", 2300.0), ("Miami", 1400.0)],
        matrix(&[[80.0, 215.0], [100.0, 108.0], [102.0, 95.0]]),
    ))
}

fn wind_turbines() -> Instance {
    const MONTHS: [&str; 4] = ["August", "September", "October", "November"];
    const CAPACITY: [f64; 4] = [22.0, 36.0, 38.0, 21.0];
    const PRODUCTION: [f64; 4] = [238.0, 384.0, 132.0, 430.0];
    const DEMAND: [f64; 4] = [10.0, 15.0, 25.0, 20.0];
    const STORAGE: f64 = 3.0;

    // production of month i delivered in month j >= i
    let costs = (0..4)
        .map(|i| {
            (0..4)
                .map(|j| if j >= i { Some(PRODUCTION[i] + STORAGE * (j - i) as f64) } else { None })
                .collect()
        })
        .collect();
    Instance::Transportation(TransportationProblem {
        sources: MONTHS.iter().zip(CAPACITY.iter()).map(|(m, &c)| (m.to_string(), c)).collect(),
        destinations: MONTHS.iter().zip(DEMAND.iter()).map(|(m, &d)| (m.to_string(), d)).collect(),
        costs,
        route_limits: vec![],
        demand: DemandMode::Exact,
        supply: SupplyMode::AtMost,
    })
}

fn coal_transship() -> Instance {
    Instance::Transshipment(
        TransshipmentProblem::new(&[
            ("M1", 1000.0),
            ("M2", 1200.0),
            ("CC1", 0.0),
            ("CC2", 0.0),
            ("D1", -800.0),
            ("D2", -900.0),
            ("D3", -500.0),
        ])
        .arc("M1", "CC1", 9.0)
        .arc("M1", "CC2", 11.0)
        .arc("M2", "CC1", 9.0)
        .arc("M2", "CC2", 4.0)
        .arc("CC1", "D1", 3.0)
        .arc("CC1", "D2", 4.0)
        .arc("CC1", "CC2", 13.0)
        .arc("CC2", "D2", 3.0)
        .arc("CC2", "D3", 15.0)
        .arc("D2", "D3", 10.0)
        .arc("D1", "D2", 2.0),
    )
}

fn computer_network() -> Instance {
    // arcs from an origin to a destination stand for the route via a transmitter
    Instance::Transshipment(
        TransshipmentProblem::new(&[
            ("O1", 1000.0),
            ("O2", 1200.0),
            ("D1", -800.0),
            ("D2", -900.0),
            ("D3", -500.0),
        ])
        .arc("O1", "D1", 11.0)
        .arc("O1", "D2", 9.0)
        .arc("O1", "D2", 8.0)
        .arc("O1", "D3", 13.0)
        .arc("O2", "D1", 10.0)
        .arc("O2", "D2", 8.0)
        .arc("O2", "D2", 9.0)
        .arc("O2", "D3", 14.0)
        .arc("D1", "D2", 5.0)
        .arc("D2", "D3", 3.0),
    )
}

fn fuel() -> Instance {
    Instance::Transshipment(
        TransshipmentProblem::new(&[
            ("1", 5000.0),
            ("2", 6000.0),
            ("3", 0.0),
            ("4", 0.0),
            ("5", 0.0),
            ("6", -2000.0),
            ("7", -9000.0),
        ])
        .arc("1", "7", 20.0)
        .arc("1", "3", 3.0)
        .arc("2", "3", 9.0)
        .arc("2", "6", 30.0)
        .arc("3", "7", 40.0)
        .arc("3", "5", 10.0)
        .arc("4", "7", 8.0)
        .arc("5", "4", 7.0)
        .arc("5", "6", 2.0),
    )
}

fn oil_barrels() -> Instance {
    let mut p = TransshipmentProblem::new(&[
        ("refinery 1", 600.0),
        ("refinery 2", 400.0),
        ("center 1", 0.0),
        ("center 2", 0.0),
        ("Bari", -200.0),
        ("Porto", -150.0),
        ("Vita", -350.0),
        ("Siena", -300.0),
    ])
    .arc("refinery 1", "center 1", 19.0)
    .arc("refinery 1", "center 2", 29.0)
    .arc("refinery 2", "center 1", 64.0)
    .arc("refinery 2", "center 2", 19.0);
    let costs = [("center 1", [59.0, 63.0, 39.0, 12.0]), ("center 2", [46.0, 34.0, 58.0, 32.0])];
    for &(center, row) in costs.iter() {
        for (&city, &c) in ["Bari", "Porto", "Vita", "Siena"].iter().zip(row.iter()) {
            p = p.arc(center, city, c);
        }
    }
    Instance::Transshipment(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_unique() {
        let mut all: Vec<_> = names().collect();
        let n = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), n);
    }

    #[test]
    fn test_unknown() {
        assert!(matches!(get("nothing"), Err(Error::UnknownInstance(ref n)) if n == "nothing"));
        assert!(describe("nothing").is_err());
        assert!(describe("fuel").unwrap().contains("fuel"));
    }

    #[test]
    fn test_load() {
        let inst = load("cabling-5").unwrap();
        assert_eq!(inst.kind(), "spanning-tree");

        let inst = load("tests/instances/maxflow-small.json").unwrap();
        assert_eq!(inst.kind(), "max-flow");
        assert_eq!(inst.solve().unwrap().value(), Some(4.0));

        assert!(matches!(load("no-such-file.json"), Err(Error::UnknownInstance(_))));
        assert!(matches!(load("tests/instances/maxflow-small.sol"), Err(Error::Json(_))));
    }

    #[test]
    fn test_flow_policy_described() {
        for name in names() {
            if let Instance::MaxFlow { forward_only, .. } = get(name).unwrap() {
                let text = describe(name).unwrap();
                if forward_only {
                    assert!(text.contains("forward arcs only"), "{}", name);
                } else {
                    assert!(text.contains("full residual network"), "{}", name);
                }
            }
        }
    }

    #[test]
    fn test_kinds() {
        let count = |kind| names().filter(|n| get(n).unwrap().kind() == kind).count();
        assert_eq!(count("spanning-tree"), 4);
        assert_eq!(count("max-flow"), 4);
        assert_eq!(count("shortest-path"), 6);
        assert_eq!(count("assignment"), 10);
        assert_eq!(count("schedule"), 1);
        assert_eq!(count("transportation"), 7);
        assert_eq!(count("transshipment"), 4);
    }
}
