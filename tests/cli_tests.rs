mod common;

use common::{run_recap, TestEnv};

#[test]
fn recap_help_shows_usage() {
    let output = run_recap(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "--help should succeed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("extract"));
    assert!(stdout.contains("chunks"));
}

#[test]
fn recap_version_shows_version() {
    let output = run_recap(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("recap "));
}

#[test]
fn completions_bash_outputs_script() {
    let output = run_recap(&["completions", "bash"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(
        stdout.contains("recap"),
        "expected completion output to reference command name\nstdout:\n{}",
        stdout
    );
}

#[test]
fn config_show_works() {
    let output = run_recap(&["config", "show"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "config show should succeed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );
    assert!(stdout.contains("[llm]"));
    assert!(stdout.contains("[params]"));
    assert!(stdout.contains("overlap_ratio"));
}

#[test]
fn config_path_points_at_toml_file() {
    let output = run_recap(&["config", "path"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.trim().ends_with("config.toml"), "got: {}", stdout);
}

#[test]
fn config_init_refuses_to_overwrite_without_force() {
    let env = TestEnv::new();
    let path = env.work_dir().join("custom.toml");
    let path = path.to_str().unwrap();

    let first = env.run(&["--config", path, "config", "init"]);
    assert!(first.status.success());
    assert!(std::fs::read_to_string(path).unwrap().contains("[llm]"));

    let second = env.run(&["--config", path, "config", "init"]);
    assert!(!second.status.success());
    assert!(String::from_utf8_lossy(&second.stderr).contains("--force"));

    let forced = env.run(&["--config", path, "config", "init", "--force"]);
    assert!(forced.status.success());
}

#[test]
fn broken_config_is_reported() {
    let env = TestEnv::new();
    let path = env.write_file("broken.toml", "[llm\nmodel = ");

    let output = env.run(&["--config", path.to_str().unwrap(), "config", "show"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Failed to parse config file"), "got: {}", stderr);
}

#[test]
fn config_rejects_reserve_larger_than_context_window() {
    let env = TestEnv::new();
    let path = env.write_file(
        "small.toml",
        "[llm]\ncontext_window = 1000\n\n[params]\nmax_summary_tokens = 1000\n",
    );

    let output = env.run(&["--config", path.to_str().unwrap(), "config", "show"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("context window"));
}

#[test]
fn chunks_runs_without_api_key() {
    let env = TestEnv::new();
    env.write_file("talk.txt", "We met. We ate. We sat. We ran.");

    let output = env.run(&["chunks", "talk.txt", "--max-tokens", "6", "--overlap", "0"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "chunks should succeed offline\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );
    assert!(stdout.contains("2 chunk(s)"), "got: {}", stdout);
    assert!(stdout.contains("We met. We ate."));
    assert!(stdout.contains("We sat. We ran."));
}

#[test]
fn chunks_rejects_invalid_overlap() {
    let env = TestEnv::new();
    env.write_file("talk.txt", "One. Two.");

    let output = env.run(&["chunks", "talk.txt", "--max-tokens", "5", "--overlap", "1.5"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Overlap ratio"));
}

#[test]
fn extract_reports_missing_transcript() {
    let output = run_recap(&["extract", "does-not-exist.json"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(
        stderr.contains("Transcript file not found"),
        "expected missing transcript error, got:\n{}",
        stderr
    );
}

#[test]
fn extract_without_api_key_writes_nothing() {
    let env = TestEnv::new();
    env.write_file("talk.json", r#"{"text": "Hello team. Budget is approved."}"#);

    let output = env.run(&["extract", "talk.json"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("API key is missing"), "got:\n{}", stderr);
    assert!(!env.work_dir().join("talk.summary.json").exists());
}

#[test]
fn dotenv_file_supplies_api_key() {
    let env = TestEnv::new();
    env.write_file("talk.json", r#"{"text": "Hello team. Budget is approved."}"#);
    // Nothing listens on the discard port, so the call fails fast after the key check.
    env.write_file(
        ".env",
        "RECAP_API_KEY=sk-from-dotenv\nRECAP_ENDPOINT=http://127.0.0.1:9\n",
    );

    let output = env.run(&["extract", "talk.json"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(!stderr.contains("API key is missing"), "got:\n{}", stderr);
    assert!(stderr.contains("OpenRouter request failed"), "got:\n{}", stderr);
    assert!(!env.work_dir().join("talk.summary.json").exists());
}

#[test]
fn extract_rejects_malformed_json_transcript() {
    let env = TestEnv::new();
    env.write_file("talk.json", "{not json");

    let output = env.run(&["extract", "talk.json"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid transcript"));
}

#[test]
fn extract_output_conflicts_with_stdout() {
    let output = run_recap(&["extract", "talk.json", "-o", "out.json", "--stdout"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot be used with"));
}
