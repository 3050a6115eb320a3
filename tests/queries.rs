use reldb::{Database, DatabaseConfig};
use tempfile::tempdir;

fn run(db: &mut Database, statements: &[&str]) {
    for statement in statements {
        assert_eq!(db.transact(statement), "", "statement {statement:?} failed");
    }
}

fn people() -> Database {
    let mut db = Database::new();
    run(
        &mut db,
        &[
            "create table a (id int, name string)",
            "insert into a values (1, 'a')",
            "insert into a values (2, 'b')",
            "create table b (id int, val float)",
            "insert into b values (1, 1.5)",
            "insert into b values (3, 2.0)",
        ],
    );
    db
}

#[test]
fn natural_join_on_shared_column() {
    let mut db = people();

    assert_eq!(
        db.transact("select * from a, b"),
        "id int,name string,val float\n1,'a',1.500"
    );
}

#[test]
fn cross_product_without_shared_columns() {
    let mut db = Database::new();
    run(
        &mut db,
        &[
            "create table a (x int)",
            "insert into a values 1",
            "insert into a values 2",
            "create table c (y int)",
            "insert into c values 9",
        ],
    );

    assert_eq!(db.transact("select * from a, c"), "x int,y int\n1,9\n2,9");
}

#[test]
fn filter_by_comparison() {
    let mut db = Database::new();
    run(
        &mut db,
        &[
            "create table t (n int)",
            "insert into t values 1",
            "insert into t values 2",
            "insert into t values 3",
        ],
    );

    assert_eq!(db.transact("select n from t where n > 1"), "n int\n2\n3");
    assert_eq!(db.transact("select n from t where n == 2"), "n int\n2");
    assert_eq!(db.transact("select n from t where n > 1 and n < 3"), "n int\n2");
}

#[test]
fn later_clauses_see_the_projected_columns() {
    let mut db = Database::new();
    run(
        &mut db,
        &[
            "create table t (n int)",
            "insert into t values 1",
            "insert into t values 2",
        ],
    );

    // the second clause runs against the output of the first step, which no
    // longer has a column named n
    assert_eq!(
        db.transact("select n as m from t where n > 0 and m < 2"),
        "ERROR: column n does not exist"
    );
}

#[test]
fn arithmetic_projection_with_alias() {
    let mut db = Database::new();
    run(
        &mut db,
        &[
            "create table t (p int)",
            "insert into t values 3",
            "insert into t values 4",
        ],
    );

    assert_eq!(db.transact("select p * 2 as doubled from t"), "doubled int\n6\n8");
    assert_eq!(
        db.transact("select p / 2 as half, p + 0.5 as more from t"),
        "half int,more float\n1,3.500\n2,4.500"
    );
}

#[test]
fn computed_column_requires_alias() {
    let mut db = Database::new();
    run(&mut db, &["create table t (p int)"]);

    assert!(db.transact("select p * 2 from t").starts_with("ERROR: Malformed query"));
}

#[test]
fn schema_violation_leaves_table_unchanged() {
    let mut db = Database::new();
    run(&mut db, &["create table t (a string, b int)"]);

    assert_eq!(db.transact("insert into t values 'x', 5"), "");
    assert_eq!(
        db.transact("insert into t values 5, 'x'"),
        "ERROR: row does not match the given table"
    );
    assert_eq!(
        db.transact("insert into t values 'y'"),
        "ERROR: row does not match the given table"
    );
    assert_eq!(db.get_table("t").unwrap().row_count(), 1);
}

#[test]
fn novalue_is_exempt_from_type_checks() {
    let mut db = Database::new();
    run(
        &mut db,
        &[
            "create table t (a string, b int)",
            "insert into t values NOVALUE, NOVALUE",
            "insert into t values 'z', 4",
        ],
    );

    assert_eq!(
        db.transact("select b + 1 as c from t"),
        "c int\nNOVALUE\n5"
    );
    assert_eq!(db.transact("select a from t where b >= 0"), "a string\n'z'");
}

#[test]
fn unresolved_references() {
    let mut db = people();

    assert_eq!(db.transact("select * from a, nope"), "ERROR: table nope does not exist");
    assert_eq!(db.transact("print nope"), "ERROR: table nope does not exist");
    assert_eq!(
        db.transact("select missing from a"),
        "ERROR: column missing does not exist"
    );
    assert_eq!(
        db.transact("select id from a where missing > 1"),
        "ERROR: column missing does not exist"
    );
}

#[test]
fn type_conflicts() {
    let mut db = people();

    assert!(db.transact("select id from a where name > 1").starts_with("ERROR: "));
    assert!(db.transact("select name + id as x from a").starts_with("ERROR: "));
    assert!(db.transact("create table bad as select name * name as x from a").starts_with("ERROR: "));
    assert!(db.get_table("bad").is_none());
}

#[test]
fn division_by_zero() {
    let mut db = Database::new();
    run(
        &mut db,
        &["create table t (n int)", "insert into t values 0"],
    );

    assert_eq!(
        db.transact("create table q as select 10 / n as r from t"),
        "ERROR: division by zero"
    );
    assert!(db.get_table("q").is_none());
}

#[test]
fn malformed_statements() {
    let mut db = people();

    for query in [
        "",
        "select from a",
        "create table x",
        "insert into a values",
        "select id from a where id = 1",
        "select a.* from a",
        "print",
        "create table t (x bool)",
    ] {
        let output = db.transact(query);
        assert!(output.starts_with("ERROR: Malformed query"), "{query:?} gave {output:?}");
    }
}

#[test]
fn keywords_are_case_insensitive() {
    let mut db = Database::new();

    run(
        &mut db,
        &["CREATE TABLE t (n INT)", "Insert Into t Values (7)"],
    );

    assert_eq!(db.transact("SELECT n FROM t WHERE n > 1"), "n int\n7");
}

#[test]
fn store_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let mut db = Database::with_config(DatabaseConfig::with_data_dir(dir.path()));
    run(
        &mut db,
        &[
            "create table t (id int, f float, s string)",
            "insert into t values 1, 2.5, 'x'",
            "store t",
        ],
    );
    let first = std::fs::read_to_string(dir.path().join("t.tbl")).unwrap();
    assert_eq!(first, "id int,f float,s string\n1,2.500,'x'\n");

    let mut other = Database::with_config(DatabaseConfig::with_data_dir(dir.path()));
    run(&mut other, &["load t"]);
    assert_eq!(other.transact("print t"), "id int,f float,s string\n1,2.500,'x'");

    run(&mut other, &["store t"]);
    let second = std::fs::read_to_string(dir.path().join("t.tbl")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn load_missing_file() {
    let dir = tempdir().unwrap();
    let mut db = Database::with_config(DatabaseConfig::with_data_dir(dir.path()));

    let output = db.transact("load ghost");

    assert!(output.starts_with("ERROR: couldn't access table file"));
    assert!(db.get_table("ghost").is_none());
}

#[test]
fn floats_round_half_up() {
    let mut db = Database::new();
    run(
        &mut db,
        &[
            "create table t (f float)",
            "insert into t values 0.0625",
            "insert into t values 0.3125",
            "insert into t values 1.0625",
        ],
    );

    assert_eq!(db.transact("print t"), "f float\n0.063\n0.313\n1.063");
    assert_eq!(
        db.transact("select f * 0.5 as h from t where f > 1"),
        "h float\n0.532"
    );
}
