use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn parsearch() -> Result<Command> {
    let mut cmd = Command::cargo_bin("parsearch")?;
    // Keep the user's config files out of the way
    cmd.env("HOME", std::env::temp_dir());
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("parsearch-cli-test-config"));
    Ok(cmd)
}

#[test]
fn test_basic_benchmark() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("text.txt");
    fs::write(&file, "abcabcabc")?;

    parsearch()?
        .current_dir(dir.path())
        .arg(&file)
        .arg("bca")
        .arg("3")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("length=9, pattern='bca'"))
        .stdout(predicate::str::contains("ntasks=3, nthreads=2"))
        .stdout(predicate::str::contains("2 occurrences found"))
        .stdout(predicate::str::contains("Average speedup"))
        .stdout(predicate::str::contains("lists differ").not());
    Ok(())
}

#[test]
fn test_print_positions_with_every_executor() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("text.txt");
    fs::write(&file, "abcabcabc")?;

    for executor in ["single", "cached", "fixed"] {
        parsearch()?
            .current_dir(dir.path())
            .args(["-P", "-W", "1", "-R", "2", "-E", executor])
            .arg(&file)
            .arg("bca")
            .arg("3")
            .assert()
            .success()
            .stdout(predicate::str::contains(format!("executor: {}", executor)))
            .stdout(predicate::str::contains("      1      4"))
            .stdout(predicate::str::contains("Run no.  1"));
    }
    Ok(())
}

#[test]
fn test_appends_to_data_file() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("text.txt");
    let data = dir.path().join("speedup.dat");
    fs::write(&file, "needle in a haystack, another needle")?;

    for _ in 0..2 {
        parsearch()?
            .current_dir(dir.path())
            .args(["-E", "fixed", "-d"])
            .arg(&data)
            .arg(&file)
            .arg("needle")
            .arg("4")
            .arg("2")
            .assert()
            .success();
    }

    let contents = fs::read_to_string(&data)?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("36 4 2 fixed "));
    Ok(())
}

#[test]
fn test_json_report() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("text.txt");
    fs::write(&file, "aaaa")?;

    parsearch()?
        .current_dir(dir.path())
        .args(["--json", "-P"])
        .arg(&file)
        .arg("aa")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"verified\": true"))
        .stdout(predicate::str::contains("\"strategy\": \"single\""));
    Ok(())
}

#[test]
fn test_config_file_values() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("text.txt");
    let config = dir.path().join("bench.yaml");
    fs::write(&file, "xyzxyzxyzxyz")?;
    fs::write(&config, "warmups: 1\nruns: 3\nstrategy: cached\n")?;

    parsearch()?
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config)
        .arg(&file)
        .arg("zx")
        .arg("4")
        .assert()
        .success()
        .stdout(predicate::str::contains("warmups=1, runs=3"))
        .stdout(predicate::str::contains("executor: cached"));
    Ok(())
}

#[test]
fn test_cli_arguments_override_local_config() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("text.txt");
    fs::write(&file, "abcabcabc")?;
    fs::write(
        dir.path().join(".parsearch.yaml"),
        "strategy: fixed\nwarmups: 2\ntask_count: 3\n",
    )?;

    // Explicit values equal to the defaults must still beat the file
    parsearch()?
        .current_dir(dir.path())
        .args(["-E", "single", "-W", "0"])
        .arg(&file)
        .arg("bca")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("executor: single"))
        .stdout(predicate::str::contains("warmups=0"))
        .stdout(predicate::str::contains("ntasks=1"));
    Ok(())
}

#[test]
fn test_pattern_longer_than_text() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("text.txt");
    fs::write(&file, "abc")?;

    parsearch()?
        .current_dir(dir.path())
        .arg(&file)
        .arg("abcdef")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
    Ok(())
}

#[test]
fn test_too_many_tasks() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("text.txt");
    fs::write(&file, "abc")?;

    parsearch()?
        .current_dir(dir.path())
        .arg(&file)
        .arg("a")
        .arg("4")
        .assert()
        .failure()
        .stderr(predicate::str::contains("4 tasks requested"));
    Ok(())
}

#[test]
fn test_zero_tasks_rejected() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("text.txt");
    fs::write(&file, "abc")?;

    parsearch()?
        .current_dir(dir.path())
        .arg(&file)
        .arg("a")
        .arg("0")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_missing_file() -> Result<()> {
    let dir = tempdir()?;

    parsearch()?
        .current_dir(dir.path())
        .arg(dir.path().join("missing.txt"))
        .arg("a")
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
    Ok(())
}

#[test]
fn test_truncation_warning() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("text.txt");
    fs::write(&file, "abcabcabcabc")?;

    parsearch()?
        .current_dir(dir.path())
        .args(["--capacity", "6"])
        .arg(&file)
        .arg("abc")
        .arg("2")
        .assert()
        .success()
        .stderr(predicate::str::contains("file truncated to 6 characters"))
        .stdout(predicate::str::contains("length=6"));
    Ok(())
}

#[test]
fn test_truncated_json_report_stays_parseable() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("text.txt");
    fs::write(&file, "abcabcabcabc")?;

    let output = parsearch()?
        .current_dir(dir.path())
        .args(["--capacity", "6", "--json"])
        .arg(&file)
        .arg("abc")
        .arg("2")
        .output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["text_len"], 6);
    assert!(String::from_utf8_lossy(&output.stderr).contains("file truncated to 6 characters"));
    Ok(())
}
