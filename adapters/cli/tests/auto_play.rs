use std::{fs, process::Command};

fn nexus_lanes() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_nexus-lanes"));
    let _ = command.env("RUST_LOG", "off");
    command
}

#[test]
fn autopilot_plays_a_bounded_seeded_game() {
    let output = nexus_lanes()
        .args(["--auto", "--seed", "7", "--difficulty", "easy", "--max-rounds", "5"])
        .output()
        .expect("failed to launch nexus-lanes");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("-- deployment --\n"));
    assert_eq!(stdout.matches("(level 1) spawns in").count(), 3);
    assert!(stdout.contains("-- round 1 --"));
    assert!(stdout.contains("H1 moves"));
    assert!(stdout.contains("H3"));
}

#[test]
fn identical_seeds_replay_identically() {
    let play = || {
        nexus_lanes()
            .args(["--auto", "--seed", "2024", "--difficulty", "hard", "--max-rounds", "12"])
            .output()
            .expect("failed to launch nexus-lanes")
            .stdout
    };
    assert_eq!(play(), play());
}

#[test]
fn launch_config_feeds_the_session() {
    let dir = std::env::temp_dir().join(format!("nexus-lanes-cli-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("launch.toml");
    fs::write(&path, "difficulty = \"hard\"\nseed = 3\nmax_rounds = 2\n").expect("write config");

    let output = nexus_lanes()
        .arg("--auto")
        .arg("--config")
        .arg(&path)
        .output()
        .expect("failed to launch nexus-lanes");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("-- round 2 --"));
    assert!(!stdout.contains("-- round 3 --"));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn malformed_config_fails_before_play() {
    let dir = std::env::temp_dir().join(format!("nexus-lanes-bad-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("launch.toml");
    fs::write(&path, "difficulty = \"nightmare\"\n").expect("write config");

    let output = nexus_lanes()
        .arg("--auto")
        .arg("--config")
        .arg(&path)
        .output()
        .expect("failed to launch nexus-lanes");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to parse launch config"));
    let _ = fs::remove_dir_all(&dir);
}
