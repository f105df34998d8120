use assert_cmd::Command;
use predicates::prelude::*;
use roead::sarc::SarcWriter;
use roead::Endian;
use std::path::Path;
use tempfile::TempDir;

fn sarcdec() -> Command {
    Command::cargo_bin("sarcdec").expect("binary builds")
}

fn write_archive(dir: &Path) -> std::path::PathBuf {
    let byml = roead::byml::Byml::from_text("{Enabled: true, Count: 3}")
        .unwrap()
        .to_binary(Endian::Little);
    let mut writer = SarcWriter::new(Endian::Little);
    writer.add_file("Actor/Flags.bgyml", byml);
    writer.add_file("Model/notes.txt", b"keep me".to_vec());
    let path = dir.join("Bootup.pack");
    std::fs::write(&path, writer.to_binary()).unwrap();
    path
}

#[test]
fn test_decompiles_archive_into_mirrored_tree() {
    let tmp = TempDir::new().unwrap();
    let archive = write_archive(tmp.path());
    let out = tmp.path().join("bootup_out");

    sarcdec()
        .arg(&archive)
        .arg("--output")
        .arg(&out)
        .arg("--output-format")
        .arg("plain")
        .assert()
        .success()
        .stdout(predicate::str::contains("DONE:"));

    assert!(out.join("Actor/Flags.bgyml.yml").is_file());
    assert!(out.join("Model/notes.txt").is_file());
    assert!(out.join(".sarcdec/report.json").is_file());
}

#[test]
fn test_dry_run_lists_members_without_writing() {
    let tmp = TempDir::new().unwrap();
    let archive = write_archive(tmp.path());
    let out = tmp.path().join("bootup_out");

    sarcdec()
        .arg(&archive)
        .arg("--output")
        .arg(&out)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Actor/Flags.bgyml"))
        .stdout(predicate::str::contains("BYML"))
        .stdout(predicate::str::contains("copy"));

    assert!(!out.exists());
}

#[test]
fn test_missing_input_fails_with_specific_code() {
    let tmp = TempDir::new().unwrap();

    sarcdec()
        .current_dir(tmp.path())
        .arg("DoesNotExist.pack")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("DoesNotExist.pack"));
}

#[test]
fn test_existing_output_requires_force() {
    let tmp = TempDir::new().unwrap();
    let archive = write_archive(tmp.path());
    let out = tmp.path().join("bootup_out");
    std::fs::create_dir(&out).unwrap();
    std::fs::write(out.join("stale.txt"), b"old run").unwrap();

    sarcdec()
        .arg(&archive)
        .arg("--output")
        .arg(&out)
        .assert()
        .failure()
        .code(4);

    sarcdec()
        .arg(&archive)
        .arg("--output")
        .arg(&out)
        .arg("--force")
        .assert()
        .success();

    assert!(!out.join("stale.txt").exists());
    assert!(out.join("Actor/Flags.bgyml.yml").is_file());
}

#[test]
fn test_corrupt_member_yields_warning_exit_code() {
    let tmp = TempDir::new().unwrap();
    let mut writer = SarcWriter::new(Endian::Little);
    writer.add_file("Broken.bgyml", b"BYxxxxxx garbage".to_vec());
    let archive = tmp.path().join("Broken.pack");
    std::fs::write(&archive, writer.to_binary()).unwrap();
    let out = tmp.path().join("broken_out");

    sarcdec()
        .arg(&archive)
        .arg("--output")
        .arg(&out)
        .arg("--output-format")
        .arg("plain")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Broken.bgyml"));
}

#[test]
fn test_json_output_emits_report() {
    let tmp = TempDir::new().unwrap();
    let archive = write_archive(tmp.path());
    let out = tmp.path().join("bootup_out");

    let assert = sarcdec()
        .arg(&archive)
        .arg("--output")
        .arg(&out)
        .arg("--output-format")
        .arg("json")
        .arg("--quiet")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["artifacts_decoded"], 1);
    assert_eq!(report["files_copied"], 1);
    assert_eq!(report["containers_extracted"], 1);
}

#[test]
fn test_generate_config_writes_sample() {
    let tmp = TempDir::new().unwrap();

    sarcdec()
        .current_dir(tmp.path())
        .arg("--generate-config")
        .assert()
        .success();

    let content = std::fs::read_to_string(tmp.path().join("sarcdec.toml")).unwrap();
    assert!(content.contains("[tools]"));
    assert!(content.contains("[output]"));
}

#[test]
fn test_no_args_shows_help() {
    sarcdec()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
