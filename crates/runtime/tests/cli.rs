use std::path::PathBuf;
use std::process::Command;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("runtime crate lives under crates/")
        .to_path_buf()
}

fn tracking_main() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tracking_main"));
    cmd.current_dir(workspace_root());
    cmd
}

#[test]
fn rollout_then_replay() {
    let trace_path =
        std::env::temp_dir().join(format!("tracking_main_trace_{}.json", std::process::id()));

    let output = tracking_main()
        .args(["rollout", "--episodes", "3", "--seed", "7", "--output"])
        .arg(&trace_path)
        .output()
        .expect("failed to run tracking_main");
    assert!(
        output.status.success(),
        "rollout failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json = std::fs::read_to_string(&trace_path).expect("trace was written");
    let trace: serde_json::Value = serde_json::from_str(&json).expect("trace is JSON");
    assert_eq!(trace["archived"].as_array().map(Vec::len), Some(2));
    assert!(trace["current"].is_object());

    let output = tracking_main()
        .args(["replay", "--trace"])
        .arg(&trace_path)
        .output()
        .expect("failed to run tracking_main");
    std::fs::remove_file(&trace_path).ok();
    assert!(
        output.status.success(),
        "replay failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn unknown_model_fails() {
    let trace_path =
        std::env::temp_dir().join(format!("tracking_main_bad_{}.json", std::process::id()));
    let output = tracking_main()
        .args(["rollout", "--episodes", "1", "--model", "Truck", "--output"])
        .arg(&trace_path)
        .output()
        .expect("failed to run tracking_main");
    assert!(!output.status.success());
    assert!(!trace_path.exists());
}
