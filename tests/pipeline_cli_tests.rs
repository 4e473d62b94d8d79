// End-to-end tests for the centinela binary.
//
// Fixture models and datasets are built with the library API and written to
// a temp directory, then the binary is driven over them.

use assert_cmd::Command;
use centinela::boosted_trees::{BoostedClassifier, ClassScorer, RegressionTree, TreeNode};
use centinela::model_persistence;
use centinela::stump_ensemble::{DecisionStump, StumpEnsemble};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stage-1 fixture: flag rows whose class_hint (column 1) is non-zero
fn hint_detector() -> StumpEnsemble {
    StumpEnsemble {
        n_features: 2,
        stumps: vec![DecisionStump {
            feature_idx: 1,
            threshold: 0.5,
            polarity: 1,
            weight: 1.0,
        }],
    }
}

/// Stage-2 fixture: predict the class named by the class_hint column
fn hint_labeler() -> BoostedClassifier {
    let classes = (0..5)
        .map(|k| ClassScorer {
            trees: vec![RegressionTree {
                root: TreeNode::Internal {
                    feature_idx: 1,
                    threshold: k as f64 - 0.5,
                    left: Box::new(TreeNode::Leaf { value: 0.0 }),
                    right: Box::new(TreeNode::Internal {
                        feature_idx: 1,
                        threshold: k as f64 + 0.5,
                        left: Box::new(TreeNode::Leaf { value: 1.0 }),
                        right: Box::new(TreeNode::Leaf { value: 0.0 }),
                    }),
                },
            }],
        })
        .collect();

    BoostedClassifier {
        n_features: 2,
        base_score: 0.0,
        classes,
    }
}

struct Fixtures {
    stage1: PathBuf,
    stage2: PathBuf,
    dataset: PathBuf,
}

/// One row per class, hints 1..4 non-benign plus one benign row
const SMALL_DATASET: &str = "flow_duration,class_hint\n\
                             10,1\n\
                             20,0\n\
                             5,3\n\
                             2,4\n\
                             1,2\n";

fn write_fixtures(dir: &Path, dataset_csv: &str) -> Fixtures {
    let stage1 = dir.join("stage1.mpk");
    let stage2 = dir.join("stage2.mpk");
    let dataset = dir.join("flows.csv");

    model_persistence::save_stump_ensemble(&hint_detector(), &stage1).unwrap();
    model_persistence::save_boosted_classifier(&hint_labeler(), &stage2).unwrap();
    fs::write(&dataset, dataset_csv).unwrap();

    Fixtures {
        stage1,
        stage2,
        dataset,
    }
}

fn centinela() -> Command {
    Command::cargo_bin("centinela").unwrap()
}

/// Run a seeded JSON report and return its sorted keys
fn report_keys(stage1: &Path, stage2: &Path, dataset: &Path, seed: u64, n: usize) -> Vec<String> {
    let output = centinela()
        .arg("--stage1")
        .arg(stage1)
        .arg("--stage2")
        .arg(stage2)
        .arg("--dataset")
        .arg(dataset)
        .arg("-n")
        .arg(n.to_string())
        .arg("--seed")
        .arg(seed.to_string())
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let mut keys: Vec<String> = parsed.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    keys
}

// ============================================================================
// Report Output Tests
// ============================================================================

#[test]
fn test_text_report_lists_detected_categories() {
    let tmp = TempDir::new().unwrap();
    let fx = write_fixtures(tmp.path(), SMALL_DATASET);

    centinela()
        .arg("--stage1")
        .arg(&fx.stage1)
        .arg("--stage2")
        .arg(&fx.stage2)
        .arg("--dataset")
        .arg(&fx.dataset)
        .arg("-n")
        .arg("5")
        .arg("--seed")
        .arg("42")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Attack Surface Report ==="))
        .stdout(predicate::str::contains("Recon-HostDiscovery"))
        .stdout(predicate::str::contains("Recon-OSScan"))
        .stdout(predicate::str::contains("Recon-PortScan"))
        .stdout(predicate::str::contains("VulnerabilityScan"))
        .stdout(predicate::str::contains("BenignTraffic").not());
}

#[test]
fn test_json_report_is_valid_object() {
    let tmp = TempDir::new().unwrap();
    let fx = write_fixtures(tmp.path(), SMALL_DATASET);

    let keys = report_keys(&fx.stage1, &fx.stage2, &fx.dataset, 42, 5);

    // All five rows sampled; the benign row is filtered out
    assert_eq!(
        keys,
        [
            "Recon-HostDiscovery",
            "Recon-OSScan",
            "Recon-PortScan",
            "VulnerabilityScan"
        ]
    );
}

#[test]
fn test_benign_only_dataset_reports_nothing() {
    let tmp = TempDir::new().unwrap();
    let fx = write_fixtures(
        tmp.path(),
        "flow_duration,class_hint\n1,0\n2,0\n3,0\n",
    );

    centinela()
        .arg("--stage1")
        .arg(&fx.stage1)
        .arg("--stage2")
        .arg(&fx.stage2)
        .arg("--dataset")
        .arg(&fx.dataset)
        .arg("-n")
        .arg("3")
        .assert()
        .success()
        .stdout(predicate::str::contains("No non-benign traffic detected"));
}

#[test]
fn test_timestamp_keyed_report() {
    let tmp = TempDir::new().unwrap();
    let fx = write_fixtures(tmp.path(), SMALL_DATASET);

    // Keyed by timestamp: categories appear on the value side
    centinela()
        .arg("--stage1")
        .arg(&fx.stage1)
        .arg("--stage2")
        .arg(&fx.stage2)
        .arg("--dataset")
        .arg(&fx.dataset)
        .arg("-n")
        .arg("5")
        .arg("--seed")
        .arg("42")
        .arg("--keyed-by")
        .arg("timestamp")
        .assert()
        .success()
        .stdout(predicate::str::contains("-> Recon-PortScan"));
}

// ============================================================================
// Determinism Tests
// ============================================================================

#[test]
fn test_seeded_runs_sample_identical_rows() {
    let tmp = TempDir::new().unwrap();
    // 12 rows with distinct hints so different draws give different key sets
    let fx = write_fixtures(
        tmp.path(),
        "flow_duration,class_hint\n\
         1,1\n2,0\n3,2\n4,0\n5,3\n6,0\n7,4\n8,0\n9,1\n10,0\n11,2\n12,0\n",
    );

    let first = report_keys(&fx.stage1, &fx.stage2, &fx.dataset, 7, 5);
    let second = report_keys(&fx.stage1, &fx.stage2, &fx.dataset, 7, 5);

    assert_eq!(first, second);
}

// ============================================================================
// Archive Loading Tests
// ============================================================================

#[test]
fn test_zip_archive_and_plain_model_agree() {
    let tmp = TempDir::new().unwrap();
    let fx = write_fixtures(tmp.path(), SMALL_DATASET);

    let zipped = tmp.path().join("stage1.zip");
    model_persistence::save_stump_ensemble_archive(&hint_detector(), &zipped, "stage1.mpk")
        .unwrap();

    let from_plain = report_keys(&fx.stage1, &fx.stage2, &fx.dataset, 42, 5);
    let from_zip = report_keys(&zipped, &fx.stage2, &fx.dataset, 42, 5);

    assert_eq!(from_plain, from_zip);
}

#[test]
fn test_named_archive_entry() {
    let tmp = TempDir::new().unwrap();
    let fx = write_fixtures(tmp.path(), SMALL_DATASET);

    let zipped = tmp.path().join("bundle.zip");
    model_persistence::save_stump_ensemble_archive(&hint_detector(), &zipped, "models/stage1.mpk")
        .unwrap();

    centinela()
        .arg("--stage1")
        .arg(&zipped)
        .arg("--stage1-entry")
        .arg("models/stage1.mpk")
        .arg("--stage2")
        .arg(&fx.stage2)
        .arg("--dataset")
        .arg(&fx.dataset)
        .arg("-n")
        .arg("5")
        .assert()
        .success();
}

// ============================================================================
// Failure Mode Tests
// ============================================================================

#[test]
fn test_missing_model_file_fails() {
    let tmp = TempDir::new().unwrap();
    let fx = write_fixtures(tmp.path(), SMALL_DATASET);

    centinela()
        .arg("--stage1")
        .arg(tmp.path().join("absent.mpk"))
        .arg("--stage2")
        .arg(&fx.stage2)
        .arg("--dataset")
        .arg(&fx.dataset)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_sample_size_exceeding_rows_fails() {
    let tmp = TempDir::new().unwrap();
    let fx = write_fixtures(tmp.path(), SMALL_DATASET);

    centinela()
        .arg("--stage1")
        .arg(&fx.stage1)
        .arg("--stage2")
        .arg(&fx.stage2)
        .arg("--dataset")
        .arg(&fx.dataset)
        .arg("-n")
        .arg("100")
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds"));
}

#[test]
fn test_sample_size_zero_rejected() {
    let tmp = TempDir::new().unwrap();
    let fx = write_fixtures(tmp.path(), SMALL_DATASET);

    centinela()
        .arg("--stage1")
        .arg(&fx.stage1)
        .arg("--stage2")
        .arg(&fx.stage2)
        .arg("--dataset")
        .arg(&fx.dataset)
        .arg("-n")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--sample-size"));
}

#[test]
fn test_missing_required_args_shows_usage() {
    centinela()
        .arg("--stage1")
        .arg("a.mpk")
        .arg("--stage2")
        .arg("b.mpk")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--dataset"));
}

#[test]
fn test_malformed_dataset_fails() {
    let tmp = TempDir::new().unwrap();
    let fx = write_fixtures(
        tmp.path(),
        "flow_duration,class_hint\nnot-a-number,1\n",
    );

    centinela()
        .arg("--stage1")
        .arg(&fx.stage1)
        .arg("--stage2")
        .arg(&fx.stage2)
        .arg("--dataset")
        .arg(&fx.dataset)
        .arg("-n")
        .arg("1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse"));
}
