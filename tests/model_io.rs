use std::{fs, io::Cursor};

use satenc::{
    clause,
    instances::{fio::dimacs, Model},
    types::Var,
};

fn exactly_two_of_three() -> Model {
    let mut model = Model::with_name("exactly two");
    let lits: Vec<_> = model.new_vars(3).into_iter().map(Var::pos_lit).collect();
    model.add_at_least_k(&lits, 2);
    model.add_clause(clause![!lits[0], !lits[1], !lits[2]]);
    model
}

#[test]
fn cnf_file_layout() {
    let model = exactly_two_of_three();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("two.cnf");
    model.write_dimacs_path(&path).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    let mut lines = content.lines().skip_while(|l| l.starts_with('c'));
    assert_eq!(lines.next(), Some("p cnf 12 32"));
    // the first clause is the unit on the zero row of the counter
    assert_eq!(lines.next(), Some("4 0"));
    assert_eq!(content.lines().last(), Some("-1 -2 -3 0"));
    assert_eq!(lines.count(), 31);

    let parsed = Model::from_dimacs_path(&path).unwrap();
    assert_eq!(parsed.cnf(), model.cnf());
    assert_eq!(parsed.n_vars(), 12);
}

#[test]
fn wcnf_file_layout() {
    let mut model = Model::new();
    let x = model.new_vars(3);
    model.add_clause(clause![x[0].pos_lit(), x[1].pos_lit()]);
    model.add_clause(clause![x[2].neg_lit()]);
    model.add_soft_clause(clause![x[0].neg_lit()]);
    let mut buf = vec![];
    model.write_wcnf(&mut buf).unwrap();
    let content = String::from_utf8(buf).unwrap();
    let body: Vec<_> = content.lines().filter(|l| !l.starts_with('c')).collect();
    assert_eq!(body, vec!["p wcnf 3 3 2", "2 1 2 0", "2 -3 0", "1 -1 0"]);
}

#[test]
fn soft_clauses_not_in_cnf() {
    let mut model = Model::new();
    let x = model.new_var();
    model.add_soft_clause(clause![x.pos_lit()]);
    let mut buf = vec![];
    model.write_dimacs(&mut buf).unwrap();
    assert_eq!(
        dimacs::parse_header(Cursor::new(&buf)).unwrap(),
        dimacs::Header::Cnf {
            n_vars: 1,
            n_clauses: 0
        }
    );
}

#[test]
fn parse_errors_are_reported() {
    let err = Model::from_dimacs(Cursor::new("c just a comment\n")).unwrap_err();
    assert!(matches!(err, dimacs::Error::NoHeader));
    let err = Model::from_dimacs(Cursor::new("p wcnf 2 1 3\n3 1 0\n")).unwrap_err();
    assert!(matches!(err, dimacs::Error::WrongFormat { .. }));
}

#[cfg(feature = "compression")]
#[test]
fn compressed_round_trip() {
    let model = exactly_two_of_three();
    let dir = tempfile::tempdir().unwrap();
    for ext in ["cnf.gz", "cnf.bz2", "cnf.xz"] {
        let path = dir.path().join(format!("two.{ext}"));
        model.write_dimacs_path(&path).unwrap();
        let parsed = Model::from_dimacs_path(&path).unwrap();
        assert_eq!(parsed.cnf(), model.cnf());
    }
}
