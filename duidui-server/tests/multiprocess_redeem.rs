// File: duidui-server/tests/multiprocess_redeem.rs
//
// Runs the real binary as separate OS processes sharing one data directory.

use std::collections::HashSet;
use std::path::Path;
use std::process::{Command, Output};
use std::sync::{Arc, Barrier};
use std::thread;

use serde_json::Value;

const CODES: usize = 16;
const REDEEMERS: usize = 24;

fn duidui(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_duidui"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env("DUIDUI_LOG", "warn")
        .output()
        .expect("failed to run duidui")
}

fn json_stdout(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "duidui failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn test_concurrent_processes_never_share_a_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().to_path_buf();

    let tier = json_stdout(&duidui(&data_dir, &["tier", "create", "--name", "Gold"]));
    let tier_id = tier["id"].to_string();

    let codes: Vec<String> = (0..CODES).map(|i| format!("MP-{i:02}")).collect();
    let mut import_args = vec!["cdk", "import", tier_id.as_str()];
    import_args.extend(codes.iter().map(String::as_str));
    let import = json_stdout(&duidui(&data_dir, &import_args));
    assert_eq!(import["success_count"], CODES);

    let barrier = Arc::new(Barrier::new(REDEEMERS));
    let handles: Vec<_> = (1..=REDEEMERS)
        .map(|user_id| {
            let barrier = barrier.clone();
            let data_dir = data_dir.clone();
            let tier_id = tier_id.clone();
            thread::spawn(move || {
                let user_id = user_id.to_string();
                barrier.wait();
                duidui(&data_dir, &["redeem", &tier_id, "--user-id", &user_id])
            })
        })
        .collect();

    let mut handed_out = HashSet::new();
    let mut rejected = 0;
    for handle in handles {
        let output = handle.join().expect("redeemer thread panicked");
        if output.status.success() {
            let outcome: Value = serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
            let code = outcome["plain_code"].as_str().unwrap_or_default().to_string();
            assert!(handed_out.insert(code.clone()), "{code} was handed out twice");
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            assert!(stderr.contains("Exhausted"), "{stderr}");
            rejected += 1;
        }
    }

    assert_eq!(rejected, REDEEMERS - CODES);
    let expected: HashSet<String> = codes.into_iter().collect();
    assert_eq!(handed_out, expected);

    let redeemed = json_stdout(&duidui(&data_dir, &["cdk", "list", "--status", "redeemed"]));
    assert_eq!(redeemed.as_array().map(Vec::len), Some(CODES));
    let history = json_stdout(&duidui(&data_dir, &["history"]));
    assert_eq!(history.as_array().map(Vec::len), Some(CODES));
}

#[test]
fn test_login_state_is_single_use_across_processes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path();

    let started = json_stdout(&duidui(data_dir, &["login", "start"]));
    let state = started["state"].as_str().unwrap_or_default().to_string();
    let finish = ["login", "finish", "--state", state.as_str(), "--external-id", "5", "--username", "neko"];

    let user = json_stdout(&duidui(data_dir, &finish));
    assert_eq!(user["external_id"], 5);

    let replay = duidui(data_dir, &finish);
    assert!(!replay.status.success());
    assert!(String::from_utf8_lossy(&replay.stderr).contains("already used"));
}

#[test]
fn test_login_state_expires_across_processes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path();

    let started = json_stdout(&duidui(data_dir, &["--state-ttl-secs", "1", "login", "start"]));
    let state = started["state"].as_str().unwrap_or_default().to_string();
    thread::sleep(std::time::Duration::from_millis(1500));

    let late = duidui(
        data_dir,
        &["--state-ttl-secs", "1", "login", "finish", "--state", state.as_str(), "--external-id", "5", "--username", "neko"],
    );
    assert!(!late.status.success());
    assert!(String::from_utf8_lossy(&late.stderr).contains("expired"));
    let users = json_stdout(&duidui(data_dir, &["user", "list"]));
    assert_eq!(users, Value::Array(vec![]));
}
