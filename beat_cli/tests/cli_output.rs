use std::{env, fs, path::PathBuf, process::Command};

fn norm_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "")
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("beatfall_cli_{name}_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn run(args: &[&str]) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_beatfall");
    Command::new(exe).args(args).output().unwrap()
}

#[test]
fn help_mentions_subcommands() {
    let output = run(&["--help"]);

    assert!(output.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("preview"));
    assert!(stdout.contains("autoplay"));
}

#[test]
fn generate_writes_beatmap_json() {
    let dir = temp_dir("generate");
    let output_path = dir.join("hard.json");

    let out = run(&[
        "generate",
        "--difficulty",
        "hard",
        "--duration",
        "30",
        "--seed",
        "42",
        "-o",
        output_path.to_str().unwrap(),
    ]);
    assert!(out.status.success());

    let json = fs::read_to_string(&output_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["duration"], 30.0);
    assert_eq!(v["seed"], 42);
    assert_eq!(v["placeholder"], false);

    let notes = v["notes"].as_array().unwrap();
    assert!(!notes.is_empty());
    let times: Vec<f64> = notes.iter().map(|n| n["time"].as_f64().unwrap()).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn generate_is_reproducible_with_seed() {
    let args = ["generate", "-d", "normal", "--duration", "20", "--seed", "7"];
    let a = run(&args);
    let b = run(&args);

    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn unknown_difficulty_is_rejected() {
    let output = run(&["generate", "--difficulty", "expert"]);

    assert!(!output.status.success());
    let stderr = norm_newlines(&String::from_utf8_lossy(&output.stderr));
    assert!(stderr.contains("unknown difficulty"));
}

#[test]
fn preview_prints_lane_columns() {
    let dir = temp_dir("preview");
    let input = dir.join("map.json");
    fs::write(
        &input,
        r#"{
            "duration": 10.0,
            "seed": 3,
            "notes": [
                { "time": 2.0, "lane": "left", "kind": "single" },
                { "time": 3.0, "lane": "up", "kind": "double" },
                { "time": 3.0, "lane": "right", "kind": "double" }
            ]
        }"#,
    )
    .unwrap();

    let out = run(&["preview", input.to_str().unwrap()]);
    assert!(out.status.success());

    let stdout = norm_newlines(&String::from_utf8_lossy(&out.stdout));
    assert!(stdout.contains("Beatmap: 3 notes over 10.0s (seed 3)"));
    assert!(stdout.contains("Time(s)  | ← ↓ ↑ → | Kind"));
    assert!(stdout.contains("   2.000 | o . . . | single"));
    assert!(stdout.contains("   3.000 | . . d d | double"));
}

#[test]
fn preview_missing_file_is_reported() {
    let missing = env::temp_dir().join(format!("beatfall_cli_missing_{}.json", std::process::id()));
    let _ = fs::remove_file(&missing);

    let out = run(&["preview", missing.to_str().unwrap()]);

    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: failed to read:"));
    assert!(stderr.contains("Caused by:"));
}

#[test]
fn autoplay_perfect_bot_gets_top_rank() {
    let out = run(&[
        "autoplay",
        "--difficulty",
        "normal",
        "--duration",
        "30",
        "--seed",
        "5",
        "--json",
    ]);
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["outcome"], "completed");
    assert_eq!(v["rank"], "SSS");
    assert_eq!(v["miss_count"], 0);
    assert_eq!(v["counts"]["perfect"], v["total_notes"]);
    assert_eq!(v["accuracy"].as_f64().unwrap(), 100.0);
}

#[test]
fn autoplay_missing_every_note_depletes() {
    let out = run(&[
        "autoplay",
        "-d",
        "hard",
        "--duration",
        "30",
        "--seed",
        "5",
        "--miss-rate",
        "1.0",
        "--json",
    ]);
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["outcome"], "depleted");
    assert_eq!(v["miss_count"], 5);
    assert_eq!(v["rank"], "F");
}

#[test]
fn autoplay_reads_config_file() {
    let dir = temp_dir("config");
    let config = dir.join("no_penalty.json");
    fs::write(&config, r#"{ "scoring": { "miss_penalty": 0.0 } }"#).unwrap();

    let out = run(&[
        "autoplay",
        "-d",
        "hard",
        "--duration",
        "20",
        "--seed",
        "9",
        "--miss-rate",
        "1.0",
        "--config",
        config.to_str().unwrap(),
        "--json",
    ]);
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["outcome"], "completed");
    assert_eq!(v["miss_count"], v["total_notes"]);
}

#[test]
fn autoplay_invalid_config_is_reported() {
    let dir = temp_dir("bad_config");
    let config = dir.join("bad.json");
    fs::write(&config, r#"{ "judge": { "proximity_window": 1.0 } }"#).unwrap();

    let out = run(&["autoplay", "-d", "easy", "--config", config.to_str().unwrap()]);

    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: invalid config:"));
    assert!(stderr.contains("judge.proximity_window"));
}

#[test]
fn autoplay_text_summary() {
    let out = run(&[
        "autoplay",
        "-d",
        "easy",
        "--duration",
        "15",
        "--seed",
        "1",
        "--jitter",
        "0.02",
    ]);
    assert!(out.status.success());

    let stdout = norm_newlines(&String::from_utf8_lossy(&out.stdout));
    assert!(stdout.contains("Difficulty : Easy (level 1)"));
    assert!(stdout.contains("Outcome    : completed"));
    assert!(stdout.contains("Rank       :"));
    assert!(stdout.contains("Judgments  : PERFECT "));
    assert!(stdout.contains(" / GREAT "));
    assert!(stdout.contains(" / BAD "));
    assert!(stdout.contains(" / MISS "));
}

#[test]
fn infinite_duration_is_rejected() {
    for subcommand in ["generate", "autoplay"] {
        let out = run(&[subcommand, "-d", "easy", "--duration", "inf"]);

        assert!(!out.status.success());
        assert_eq!(out.status.code(), Some(1));
        let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
        assert!(stderr.contains("duration must be a positive number of seconds (got inf)"));
    }
}
