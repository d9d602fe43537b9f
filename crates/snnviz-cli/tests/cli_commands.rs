use assert_cmd::Command;
use predicates::prelude::*;
use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use tempfile::tempdir;

#[derive(Deserialize)]
struct SpikeRecord {
    tick: u64,
    neuron: u32,
    cluster: usize,
}

/// `snnviz` with the per-user config dir pointed at `home`
fn snnviz(home: &Path) -> Result<Command, Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("snnviz")?;
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env_remove("SNNVIZ_CONFIG")
        .env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn run_prints_summary() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    snnviz(tmp.path())?
        .args(["run", "--frames", "30", "--speed", "2", "--seed", "5", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("frames=30 ticks=60"));
    Ok(())
}

#[test]
fn run_exports_json_raster() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let out = tmp.path().join("out").join("raster.json");
    let out_str = out.to_str().ok_or("non-utf8 temp path")?;

    snnviz(tmp.path())?
        .args([
            "run", "--frames", "200", "--seed", "7",
            "--clusters", "2", "--cluster-size", "15",
            "--export", out_str, "--no-progress",
        ])
        .assert()
        .success();

    let text = std::fs::read_to_string(&out)?;
    let records: Vec<SpikeRecord> = serde_json::from_str(&text)?;
    for r in &records {
        assert!(r.neuron < 30);
        assert_eq!(r.cluster, r.neuron as usize / 15);
        assert!(r.tick < 200);
    }
    assert!(records.windows(2).all(|w| w[0].tick <= w[1].tick));
    Ok(())
}

#[test]
fn run_exports_bincode_raster() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let out = tmp.path().join("raster.bin");
    let out_str = out.to_str().ok_or("non-utf8 temp path")?;

    snnviz(tmp.path())?
        .args([
            "run", "--frames", "100", "--seed", "7",
            "--export", out_str, "--format", "bincode", "--no-progress",
        ])
        .assert()
        .success();

    let bytes = std::fs::read(&out)?;
    let records: Vec<SpikeRecord> = bincode::deserialize(&bytes)?;
    assert!(records.iter().all(|r| r.neuron < 120 && r.cluster < 4));
    Ok(())
}

#[test]
fn run_is_reproducible_with_seed() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let a = tmp.path().join("a.json");
    let b = tmp.path().join("b.json");
    for out in [&a, &b] {
        snnviz(tmp.path())?
            .args(["run", "--frames", "120", "--seed", "99", "--no-progress", "--export"])
            .arg(out)
            .assert()
            .success();
    }
    assert_eq!(std::fs::read(&a)?, std::fs::read(&b)?);
    Ok(())
}

#[test]
fn run_rejects_invalid_config() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let config = tmp.path().join("bad.toml");
    std::fs::write(&config, "[simulation]\nleak = 1.5\n")?;

    snnviz(tmp.path())?
        .arg("--config")
        .arg(&config)
        .args(["run", "--frames", "1", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("leak"));
    Ok(())
}

#[test]
fn missing_config_file_fails() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    snnviz(tmp.path())?
        .args(["--config", "/definitely/not/here.toml", "run", "--frames", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
    Ok(())
}

#[test]
fn init_then_run_with_config() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let path = tmp.path().join("snnviz.toml");

    snnviz(tmp.path())?.arg("init").arg(&path).assert().success();
    let text = std::fs::read_to_string(&path)?;
    assert!(text.contains("[simulation]"));
    assert!(text.contains("[driver]"));

    // Refuses to clobber without --force
    snnviz(tmp.path())?.arg("init").arg(&path).assert().failure();
    snnviz(tmp.path())?
        .arg("init")
        .arg(&path)
        .arg("--force")
        .assert()
        .success();

    snnviz(tmp.path())?
        .arg("--config")
        .arg(&path)
        .args(["run", "--frames", "10", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("frames=10 ticks=10"));
    Ok(())
}

#[test]
fn project_writes_json() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let out = tmp.path().join("proj.json");

    snnviz(tmp.path())?
        .args(["project", "--yaw", "-0.3", "--pitch", "0.4", "--distance", "1200", "--seed", "2"])
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let doc: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out)?)?;
    assert_eq!(doc["camera"]["distance"].as_f64(), Some(1200.0));
    let neurons = doc["neurons"].as_array().ok_or("neurons array")?;
    assert_eq!(neurons.len(), 120);
    assert!(neurons.iter().all(|n| n["scale"].as_f64().is_some()));
    Ok(())
}

#[test]
fn project_to_stdout() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    snnviz(tmp.path())?
        .args(["project", "--seed", "4", "--width", "320", "--height", "240"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"neurons\"").and(predicate::str::contains("\"width\": 320.0")));
    Ok(())
}

#[test]
fn completions_for_bash() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    snnviz(tmp.path())?
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("snnviz"));
    Ok(())
}
