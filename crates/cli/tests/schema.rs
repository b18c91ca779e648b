use assert_cmd::Command;

#[test]
fn schema_prints_tables_in_dependency_order() {
    let output = Command::cargo_bin("libris")
        .unwrap()
        .arg("schema")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let users = stdout.find("CREATE TABLE IF NOT EXISTS users").unwrap();
    let books = stdout.find("CREATE TABLE IF NOT EXISTS books").unwrap();
    let reviews = stdout.find("CREATE TABLE IF NOT EXISTS reviews").unwrap();
    assert!(users < reviews);
    assert!(books < reviews);
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("libris")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure();
}
