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

use rs_netopt::catalog;

use std::error::Error;
use std::result::Result;

use rustop::opts;
use time::OffsetDateTime;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn list() {
    for name in catalog::names() {
        let description = catalog::describe(name).unwrap_or_default();
        println!("{:<20} {}", name, description);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let (args, _) = opts! {
        synopsis "Solve network optimization and assignment problems.";
        param instance:Option<String>, desc:"Catalog name or JSON instance file";
        opt list:bool, desc:"List the catalog";
        opt verify:bool, desc:"Verify the solution by an independent method";
        opt json:bool, desc:"Print the solution as JSON";
        opt time:bool, desc:"Print the solution time";
        opt verbose:bool, short:'v', desc:"Print debug messages";
    }
    .parse_or_exit();

    init_logging(args.verbose);

    if args.list {
        list();
        return Ok(());
    }
    let name = match args.instance {
        Some(name) => name,
        None => {
            eprintln!("no instance given, use --list to show the catalog");
            std::process::exit(1);
        }
    };

    let instance = catalog::load(&name)?;
    debug!(instance = %name, problem = instance.kind(), "loaded");

    let tstart = OffsetDateTime::now_utc();
    let outcome = instance.solve()?;
    let tend = OffsetDateTime::now_utc();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", outcome);
    }
    if args.time {
        println!("Time (seconds): {:.4}", (tend - tstart).as_seconds_f64());
    }

    if args.verify {
        let verification = instance.verify(&outcome)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&verification)?);
        } else {
            print!("{}", verification);
        }
        let status = verification.exit_status();
        if status != 0 {
            std::process::exit(status);
        }
    }

    Ok(())
}
