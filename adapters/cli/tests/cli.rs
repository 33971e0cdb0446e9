use std::{
    path::PathBuf,
    process::{Command, Output},
};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../level/tests/fixtures/three_shapes.json")
}

fn creepline(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_creepline"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch the creepline binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn check_summarises_a_valid_level() {
    let level = fixture();
    let output = creepline(&["check", level.to_str().expect("utf-8 path")]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("level: Three Shapes"), "{text}");
    assert!(text.contains("grid: 10x6, goal (9, 3)"), "{text}");
    assert!(text.contains("waves: 2 with 8 creeps"), "{text}");
    assert!(text.contains("spawn points: (0, 0) (0, 5)"), "{text}");
}

#[test]
fn check_fails_on_missing_file() {
    let output = creepline(&["check", "does/not/exist.json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load level"), "{stderr}");
}

#[test]
fn undefended_level_is_lost() {
    let level = fixture();
    let output = creepline(&["run", level.to_str().expect("utf-8 path"), "--ticks", "3000"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("state: Lost"), "{text}");
    assert!(text.contains("lives: 0"), "{text}");
}

#[test]
fn held_level_renders_idle_field() {
    let level = fixture();
    let output = creepline(&[
        "run",
        level.to_str().expect("utf-8 path"),
        "--hold",
        "--ticks",
        "10",
        "--tower",
        "GenericTower@4,3",
        "--render",
        "--inspect",
        "4,3",
    ]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("state: Idle"), "{text}");
    assert!(text.contains("money: 115"), "{text}");
    assert!(text.contains("....G....X"), "{text}");
    assert!(text.contains("GenericTower"), "{text}");
    assert!(text.contains("[Sell(TowerId(0))]"), "{text}");
}

#[test]
fn unknown_tower_kind_is_fatal() {
    let level = fixture();
    let output = creepline(&[
        "run",
        level.to_str().expect("utf-8 path"),
        "--tower",
        "PlasmaTower@1,1",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PlasmaTower"), "{stderr}");
}

#[test]
fn generate_prints_a_level_document() {
    let output = creepline(&["generate", "--waves", "2"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("\"grid-size\""), "{text}");
    assert!(text.contains("Generated (2 waves)"), "{text}");
}

#[test]
fn unrepresentable_tick_rate_is_an_error() {
    let level = fixture();
    let output = creepline(&[
        "run",
        level.to_str().expect("utf-8 path"),
        "--tick-hz",
        "1e-20",
        "--ticks",
        "1",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not fit"), "{stderr}");
    assert!(!stderr.contains("panicked"), "{stderr}");
}
