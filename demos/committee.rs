//! # Committee
//!
//! Picks a committee of at least three out of six candidates, where among
//! each group of rivals at most one can be picked and the chair has to be on
//! it. The instance is written to the path given as the first argument (or
//! `committee.cnf`). If `SATENC_SOLVER` names a solver binary, the instance is
//! solved and the committee printed.
//!
//! Usage: committee [output cnf file]
//!
//! Set `RUST_LOG=debug` to see what the library does.

use std::process::Command;

use satenc::{
    instances::Model,
    solvers::{ExternalSolver, Outcome},
    types::{Lit, TernaryVal, Var},
};
use tracing_subscriber::EnvFilter;

const CANDIDATES: [&str; 6] = ["ada", "bob", "cyd", "dee", "eve", "fay"];
const RIVALS: [&[usize]; 2] = [&[0, 1, 2], &[3, 4]];
const CHAIR: usize = 5;
const MIN_SIZE: usize = 3;

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let out_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("committee.cnf"));

    let mut model = Model::with_name("committee");
    let picked: Vec<Var> = model.new_vars(CANDIDATES.len());
    let lits: Vec<Lit> = picked.iter().map(|v| v.pos_lit()).collect();

    for group in RIVALS {
        let rivals: Vec<Lit> = group.iter().map(|&i| lits[i]).collect();
        model.add_at_most_one(&rivals);
    }
    model.add_unit(lits[CHAIR]);
    let counter = model.add_at_least_k(&lits, MIN_SIZE);

    println!("{model}");
    println!(
        "c counter output variable: {} ({} counter variables)",
        counter.output(),
        counter.iter().count()
    );
    model.write_dimacs_path(&out_path)?;
    println!("c instance written to {out_path}");

    let Ok(slv) = std::env::var("SATENC_SOLVER") else {
        println!("c set SATENC_SOLVER to solve the instance");
        return Ok(());
    };
    let solver = ExternalSolver::with_instance_file(Command::new(slv), &out_path);
    match solver.run(&model) {
        Outcome::Satisfiable(sol) => {
            let members: Vec<_> = picked
                .iter()
                .zip(CANDIDATES)
                .filter(|(&v, _)| sol.var_value(v) == TernaryVal::True)
                .map(|(_, name)| name)
                .collect();
            println!("s SATISFIABLE");
            println!("c committee: {}", members.join(", "));
        }
        Outcome::Unsatisfiable => println!("s UNSATISFIABLE"),
        Outcome::AdapterFailure(err) => return Err(err),
    }
    Ok(())
}
