use std::process::Command;

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_collapse-arena"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch collapse-arena")
}

#[test]
fn short_run_prints_a_summary() {
    let output = run(&["--seed", "7", "--ticks", "600", "--log-level", "warn"]);
    assert!(output.status.success(), "collapse-arena should exit cleanly");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome to Collapse Arena."));
    assert!(stdout.contains("ticks:"), "{stdout}");
    assert!(stdout.contains("simulated time:"));
}

#[test]
fn same_seed_prints_the_same_summary() {
    let args = ["--seed", "11", "--class", "reaper", "--ticks", "1200", "--log-level", "off"];
    let first = run(&args);
    let second = run(&args);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn missing_config_file_is_reported() {
    let output = run(&["--config", "does/not/exist.toml", "--log-level", "off"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read config file"), "{stderr}");
}
