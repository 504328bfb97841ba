use batsat::{lbool, BasicSolver, SolverInterface};
use satenc::{
    encodings::{
        am1::{Encode, Pairwise},
        EncodeStats,
    },
    instances::{BasicVarManager, Cnf, ManageVars, Model},
    lit,
    types::{Lit, Var},
    var,
};

fn to_batsat(solver: &mut BasicSolver, lit: Lit) -> batsat::Lit {
    batsat::Lit::new(solver.var_of_int(lit.vidx32() + 1), lit.is_pos())
}

fn solve_under(cnf: &Cnf, assumps: &[Lit]) -> bool {
    let mut solver = BasicSolver::default();
    for cl in cnf {
        let mut bs: Vec<_> = cl.iter().map(|&l| to_batsat(&mut solver, l)).collect();
        solver.add_clause_reuse(&mut bs);
    }
    let assumps: Vec<_> = assumps.iter().map(|&l| to_batsat(&mut solver, l)).collect();
    let res = solver.solve_limited(&assumps);
    assert!(res != lbool::UNDEF, "solver gave up");
    res == lbool::TRUE
}

fn test_am1(n: u32) {
    let lits: Vec<Lit> = (0..n).map(|i| lit![i]).collect();
    let mut enc = Pairwise::from(lits.clone());
    let mut cnf = Cnf::new();
    let mut vm = BasicVarManager::from_next_free(var![n]);
    enc.encode(&mut cnf, &mut vm);
    let n = n as usize;
    assert_eq!(cnf.len(), n * n.saturating_sub(1) / 2);
    assert_eq!(enc.n_clauses(), cnf.len());
    assert_eq!(enc.n_vars(), 0);
    assert_eq!(vm.n_used() as usize, n);

    assert!(solve_under(&cnf, &[]));
    for (i, &a) in lits.iter().enumerate() {
        let others: Vec<_> = lits.iter().filter(|&&l| l != a).map(|&l| !l).collect();
        assert!(solve_under(&cnf, &[&[a][..], &others[..]].concat()));
        for &b in &lits[i + 1..] {
            assert!(!solve_under(&cnf, &[a, b]));
        }
    }
}

#[test]
fn pairwise_1() {
    test_am1(1);
}

#[test]
fn pairwise_2() {
    test_am1(2);
}

#[test]
fn pairwise_5() {
    test_am1(5);
}

#[test]
fn pairwise_10() {
    test_am1(10);
}

#[test]
fn model_at_most_one() {
    let mut model = Model::new();
    let lits: Vec<_> = model.new_vars(4).into_iter().map(Var::pos_lit).collect();
    model.add_at_most_one(&lits);
    model.add_at_most_one(&[]);
    assert_eq!(model.n_clauses(), 6);
    assert_eq!(model.n_vars(), 4);
    assert!(solve_under(model.cnf(), &[lits[3]]));
    assert!(!solve_under(model.cnf(), &[lits[0], lits[3]]));
}
