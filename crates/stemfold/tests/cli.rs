use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn stemfold() -> Command {
    let mut cmd = Command::cargo_bin("stemfold").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help() -> anyhow::Result<()> {
    stemfold()
        .assert()
        .failure()
        .stderr(predicate::str::contains("fold"));
    stemfold()
        .arg("fold")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--stem-costs"));
    Ok(())
}

#[test]
fn test_fold_stdin() -> anyhow::Result<()> {
    stemfold()
        .arg("fold")
        .arg("--stem-costs")
        .arg("2 -61 69 18")
        .write_stdin("UGGCGUUC\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(".((...))"))
        .stdout(predicate::str::contains("MFE: -1.7 (kcal/mol)"));
    Ok(())
}

#[test]
fn test_fold_reference_fscore() -> anyhow::Result<()> {
    stemfold()
        .arg("fold")
        .arg("--stem-costs")
        .arg("2 -61 69 18")
        .write_stdin("UGGCGUUC .((...))\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("F-score: 1.000"));
    Ok(())
}

#[test]
fn test_fold_file_keeps_order() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let input = temp.path().join("seqs.txt");
    fs::write(&input, "# comment\nGGGGAAACCCC\n\nAAAAAAAA\nUGGCGUUC\n")?;

    let output = stemfold()
        .arg("fold")
        .arg("--input")
        .arg(&input)
        .arg("--threads")
        .arg("2")
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let seqs: Vec<&str> = stdout.lines().step_by(3).collect();
    assert_eq!(seqs, vec!["GGGGAAACCCC", "AAAAAAAA", "UGGCGUUC"]);
    assert!(stdout.contains("........\nMFE: 0.0 (kcal/mol)"));
    Ok(())
}

#[test]
fn test_fold_invalid_input() -> anyhow::Result<()> {
    stemfold()
        .arg("fold")
        .write_stdin("GGXGAAACCC\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'X'"));
    stemfold()
        .arg("fold")
        .arg("--stem-costs")
        .arg("5 x")
        .write_stdin("GGGAAACCC\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid stem length cost"));
    stemfold()
        .arg("fold")
        .arg("--stem-costs")
        .arg("")
        .write_stdin("GGGAAACCC\n")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_eval() -> anyhow::Result<()> {
    stemfold()
        .arg("eval")
        .arg("--stem-costs")
        .arg("2 -61 69 18")
        .write_stdin("UGGCGUUC .((...))\nUGGCGUUC ........\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Free Energy Change: -1.7 (kcal/mol)"))
        .stdout(predicate::str::contains("Free Energy Change: 0.0 (kcal/mol)"));
    Ok(())
}

#[test]
fn test_eval_errors() -> anyhow::Result<()> {
    stemfold()
        .arg("eval")
        .write_stdin("UGGCGUUC\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected a sequence and a structure"));
    stemfold()
        .arg("eval")
        .write_stdin("UGGCGUUC .((..))\n")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_params_file() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let params = temp.path().join("params.json");
    fs::write(&params, sf_energy::EnergyTables::default().to_json_string()?)?;

    stemfold()
        .arg("eval")
        .arg("--params")
        .arg(&params)
        .arg("--stem-costs")
        .arg("2 -61 69 18")
        .write_stdin("UGGCGUUC .((...))\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Free Energy Change: -1.7 (kcal/mol)"));

    stemfold()
        .arg("eval")
        .arg("--params")
        .arg(temp.path().join("missing.json"))
        .write_stdin("UGGCGUUC .((...))\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load energy parameters"));
    Ok(())
}

#[test]
fn test_out_of_range_energies() -> anyhow::Result<()> {
    stemfold()
        .arg("fold")
        .arg("--stem-costs")
        .arg("2100000000")
        .write_stdin("GGGGAAACCCCAGGGAAACCCA\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
    stemfold()
        .arg("eval")
        .arg("--ml-init")
        .arg("-2000000000")
        .write_stdin("UGGCGUUC .((...))\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("multi-loop init"));
    Ok(())
}
