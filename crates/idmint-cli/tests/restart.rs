//! Kill the generator mid-stream and restart it against the same database:
//! nothing it printed before the kill may be printed again.

use std::collections::HashSet;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

fn temp_db(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("idmint-cli-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir.push("identity.db");
    dir
}

fn cleanup(db: &Path) {
    if let Some(dir) = db.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}

/// Run `idmint generate --follow`, read `lines` identifiers, then kill it.
fn run_and_kill(db: &PathBuf, lines: usize) -> Vec<String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_idmint"))
        .arg("--db")
        .arg(db)
        .args(["generate", "--follow"])
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn idmint");

    let stdout = child.stdout.take().expect("piped stdout");
    let ids: Vec<String> = BufReader::new(stdout)
        .lines()
        .take(lines)
        .map(|l| l.expect("read line").trim().to_string())
        .collect();

    child.kill().expect("kill idmint");
    let _ = child.wait();
    ids
}

#[test]
fn restarting_process_does_not_duplicate_ids() {
    let db = temp_db("restart");

    let first = run_and_kill(&db, 200);
    assert_eq!(first.len(), 200);
    // Fresh store: the first run starts at zero and counts up.
    assert_eq!(first[0], "0000000");

    let second = run_and_kill(&db, 200);
    assert_eq!(second.len(), 200);

    let mut seen: HashSet<&String> = first.iter().collect();
    for id in &second {
        assert!(seen.insert(id), "identifier {id} issued twice");
    }
    assert_eq!(seen.len(), 400);

    // Fixed width and the same alphabet: string order is issuance order.
    let last_before = first.iter().max().unwrap();
    let first_after = second.iter().min().unwrap();
    assert!(first_after > last_before);
    cleanup(&db);
}

#[test]
fn encode_decode_and_status() {
    let db = temp_db("status");
    let bin = env!("CARGO_BIN_EXE_idmint");

    let out = Command::new(bin).args(["encode", "34"]).output().unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "0000010");

    let out = Command::new(bin).args(["decode", "ZZZZZZZ"]).output().unwrap();
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "52523350143");

    let out = Command::new(bin).args(["decode", "000O000"]).output().unwrap();
    assert!(!out.status.success());

    let out = Command::new(bin)
        .arg("--db")
        .arg(&db)
        .args(["generate", "-n", "3"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let printed: Vec<_> = String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(printed, vec!["0000000", "0000001", "0000002"]);

    let out = Command::new(bin)
        .arg("--db")
        .arg(&db)
        .arg("status")
        .output()
        .unwrap();
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("high_water: 0000002"));
    assert!(text.contains("remaining: 52523350141"));
    cleanup(&db);
}
