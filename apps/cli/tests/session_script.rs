use std::error::Error;
use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

#[test]
fn run_script_against_sample_project() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let script = workspace.path().join("session.txt");
    fs::write(
        &script,
        "# open two files, then close the active one\n\
         select src/App.js\n\
         select README.md\n\
         close README.md\n\
         add-file src/hooks\n",
    )?;

    cli(workspace.path())?
        .args(["run", script.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("v src/")
                .and(predicate::str::contains("hooks.js"))
                .and(predicate::str::contains("Tabs: [src/App.js]"))
                .and(predicate::str::contains("Active: src/App.js (javascript)")),
        );
    Ok(())
}

#[test]
fn json_report_reflects_cascading_delete() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let script = workspace.path().join("session.txt");
    fs::write(
        &script,
        "add-folder src\n\
         add-file src/index\n\
         select src/index.js\n\
         edit console.log(1);\\nconsole.log(2);\n\
         delete src\n",
    )?;

    let output = cli(workspace.path())?
        .args(["run", "--empty", "--json", script.to_str().unwrap()])
        .output()?;
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["tree"], Value::Array(Vec::new()));
    assert_eq!(report["tabs"], Value::Array(Vec::new()));
    assert_eq!(report["active"]["view"], "welcome");
    Ok(())
}

#[test]
fn edit_writes_back_to_the_active_document() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let script = workspace.path().join("session.txt");
    fs::write(
        &script,
        "add-file notes.txt\nselect notes.txt\nedit first\\nsecond\n",
    )?;

    let output = cli(workspace.path())?
        .args(["run", "--empty", "--json", script.to_str().unwrap()])
        .output()?;
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["active"]["path"], "notes.txt");
    assert_eq!(report["active"]["language"], "plaintext");
    assert_eq!(report["active"]["content"], "first\nsecond");
    assert_eq!(report["tabs"][0]["is_selected"], true);
    Ok(())
}

#[test]
fn unknown_command_reports_line() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let script = workspace.path().join("bad.txt");
    fs::write(&script, "select README.md\nrename a b\n")?;

    cli(workspace.path())?
        .args(["run", script.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("bad.txt:2")
                .and(predicate::str::contains("unknown command 'rename'")),
        );
    Ok(())
}

#[test]
fn seed_file_replaces_sample_project() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let seed = workspace.path().join("seed.json");
    fs::write(
        &seed,
        r#"{ "entries": [
            { "kind": "folder", "name": "lib", "is_open": true, "children": [
                { "kind": "file", "name": "util.ts", "content": "export {};" }
            ] }
        ] }"#,
    )?;

    cli(workspace.path())?
        .args(["tree", "--seed", seed.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("lib/\n  util.ts")
                .and(predicate::str::contains("1 files, 1 folders"))
                .and(predicate::str::contains("README.md").not()),
        );
    Ok(())
}

#[test]
fn sample_tree_lists_every_node() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    cli(workspace.path())?
        .arg("tree")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("    Button.jsx")
                .and(predicate::str::contains("  main.css"))
                .and(predicate::str::contains("5 files, 3 folders")),
        );
    Ok(())
}

fn cli(workspace: &std::path::Path) -> Result<Command, Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("codev-cli")?;
    cmd.current_dir(workspace);
    Ok(cmd)
}
