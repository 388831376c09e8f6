//! `.fqx` containers on disk, and the CLI driving them end to end.

use std::fs;
use std::process::Command;

use freqidx::binary::Container;
use freqidx::{build_indexes, query_index, verify_index, IndexBuilder};

use crate::common::{cheap_params, occurrences, realistic_params};

fn sample_blocks() -> Vec<Vec<u32>> {
    vec![
        vec![5, 5, 5],
        vec![],
        (0..5_000).map(|v| v * 3).collect(),
        vec![1, 2, 3, 4, 4, 4, 1_000_000],
    ]
}

#[test]
fn test_container_file_roundtrip() {
    let blocks = sample_blocks();
    let indexes = build_indexes(&IndexBuilder::new(realistic_params()), &blocks).unwrap();
    assert!(indexes[2].is_none(), "large block should be rejected");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blocks.fqx");
    fs::write(&path, Container::new(indexes.clone()).to_bytes().unwrap()).unwrap();

    let loaded = Container::from_bytes(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(loaded.blocks, indexes);

    for (i, block) in blocks.iter().enumerate() {
        let index = loaded.block(i);
        match index {
            Some(bytes) => {
                verify_index(bytes).unwrap();
                for (value, count) in occurrences(block) {
                    assert_eq!(query_index(value, Some(bytes)).unwrap(), Some(count));
                }
            }
            None => assert_eq!(query_index(3, index).unwrap(), None),
        }
    }
}

#[test]
fn test_container_corruption_on_disk() {
    let blocks = sample_blocks();
    let indexes = build_indexes(&IndexBuilder::new(cheap_params()), &blocks).unwrap();
    let mut bytes = Container::new(indexes).to_bytes().unwrap();

    // Flip a bit inside the first payload
    let payload_start = 12 + 4 * blocks.len();
    bytes[payload_start + 8] ^= 0x01;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.fqx");
    fs::write(&path, &bytes).unwrap();

    let err = Container::from_bytes(&fs::read(&path).unwrap()).unwrap_err();
    assert!(err.to_string().contains("CRC32"), "unexpected error: {}", err);
}

// ============================================================================
// CLI
// ============================================================================

fn freqidx() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_freqidx"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_cli_build_query_verify() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("values.json");
    let output = dir.path().join("out.fqx");
    fs::write(&input, "[[5, 5, 5], [], [1, 2, 3, 4]]").unwrap();

    let status = freqidx()
        .args(["build", "--access-cost", "1", "--skip-cost", "1000"])
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let query = freqidx()
        .arg("query")
        .arg(&output)
        .arg("5")
        .output()
        .unwrap();
    assert!(query.status.success());
    let stdout = String::from_utf8(query.stdout).unwrap();
    assert_eq!(stdout, "block 0: 3\nblock 1: 0\nblock 2: 0\n");

    let single = freqidx()
        .arg("query")
        .arg(&output)
        .arg("3")
        .args(["--block", "2"])
        .output()
        .unwrap();
    assert_eq!(String::from_utf8(single.stdout).unwrap(), "block 2: 1\n");

    let verify = freqidx().arg("verify").arg(&output).status().unwrap();
    assert!(verify.success());

    let inspect = freqidx().arg("inspect").arg(&output).status().unwrap();
    assert!(inspect.success());
}

#[test]
fn test_cli_rejected_block_reports_no_index() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("values.json");
    let output = dir.path().join("out.fqx");
    let block: Vec<u32> = (0..5_000).collect();
    fs::write(&input, serde_json::to_string(&block).unwrap()).unwrap();

    let status = freqidx()
        .args(["build", "--access-cost", "1", "--skip-cost", "1000"])
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let query = freqidx().arg("query").arg(&output).arg("7").output().unwrap();
    assert_eq!(String::from_utf8(query.stdout).unwrap(), "block 0: no index\n");
}

#[test]
fn test_cli_verify_fails_on_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.fqx");
    let mut bytes = Container::new(vec![Some(vec![1, 0, 0, 0, 9, 0, 0, 0, 5, 0, 1])])
        .to_bytes()
        .unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    fs::write(&path, &bytes).unwrap();

    let status = freqidx().arg("verify").arg(&path).status().unwrap();
    assert!(!status.success());
}

#[test]
fn test_cli_rejects_invalid_costs() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("values.json");
    fs::write(&input, "[1, 2, 3]").unwrap();

    let status = freqidx()
        .args(["build", "--access-cost", "1", "--skip-cost", "0"])
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out.fqx"))
        .status()
        .unwrap();
    assert!(!status.success());
}
