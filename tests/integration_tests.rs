use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SHA: &str = "8efadf219440b8166cafc2ca6ea3925a03053770";

/// Helper function to create a temporary directory for testing
fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Helper function to get the update-assembly-info binary command
fn generator_cmd() -> Command {
    Command::cargo_bin("update-assembly-info").expect("Failed to find update-assembly-info binary")
}

/// Lays out `<temp>/<name>/.git` with HEAD on `branch` pointing at `revision`
fn create_repository(temp_dir: &TempDir, name: &str, branch: &str, revision: &str) -> PathBuf {
    let root = temp_dir.path().join(name);
    let metadata_dir = root.join(".git");
    let ref_path = metadata_dir.join("refs/heads").join(branch);
    fs::create_dir_all(ref_path.parent().unwrap()).unwrap();
    fs::write(metadata_dir.join("HEAD"), format!("ref: refs/heads/{}\n", branch)).unwrap();
    fs::write(&ref_path, format!("{}\n", revision)).unwrap();
    root
}

fn attribute_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|line| line.starts_with("[assembly:"))
        .map(str::to_string)
        .collect()
}

#[test]
#[serial]
fn test_help_command() {
    generator_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generates an assembly metadata source file"))
        .stdout(predicate::str::contains("Usage: update-assembly-info"))
        .stdout(predicate::str::contains("--build"))
        .stdout(predicate::str::contains("--using"))
        .stdout(predicate::str::contains("--source-control-revision"))
        .stdout(predicate::str::contains("--build-info"))
        .stdout(predicate::str::contains("Logs are written to"));
}

#[test]
#[serial]
fn test_version_command() {
    generator_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("update-assembly-info"));
}

#[test]
#[serial]
fn test_flag_without_value_is_rejected() {
    let temp_dir = create_temp_dir();

    generator_cmd()
        .current_dir(temp_dir.path())
        .args(["--build", "--company", "EA4T", "file.cs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--build"));

    assert!(!temp_dir.path().join("file.cs").exists());
}

#[test]
#[serial]
fn test_build_without_repository() {
    let temp_dir = create_temp_dir();
    let out = temp_dir.path().join("out.cs");

    generator_cmd()
        .current_dir(temp_dir.path())
        .args(["out.cs", "--build", "Release"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated"))
        .stdout(predicate::str::contains("out.cs"));

    assert_eq!(
        attribute_lines(&out),
        vec![r#"[assembly: AssemblyConfiguration("Release")]"#.to_string()]
    );
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("// <auto-generated>"));
    assert!(text.contains("using System.Reflection;"));
}

#[test]
#[serial]
fn test_source_control_revision_from_repository() {
    let temp_dir = create_temp_dir();
    let root = create_repository(&temp_dir, "proj", "main", "abc123");
    let work_dir = root.join("src");
    fs::create_dir_all(&work_dir).unwrap();

    generator_cmd()
        .current_dir(&work_dir)
        .args(["AssemblyInfo.auto.cs", "--SourceControlRevision"])
        .assert()
        .success();

    assert_eq!(
        attribute_lines(&work_dir.join("AssemblyInfo.auto.cs")),
        vec![r#"[assembly: SourceControlRevision(Revision = "abc123", Branch = "main", Repository = "proj")]"#.to_string()]
    );
}

#[test]
#[serial]
fn test_source_control_revision_with_feature_branch_and_tag() {
    let temp_dir = create_temp_dir();
    let root = create_repository(&temp_dir, "proj", "feature/x", SHA);
    fs::write(root.join("next-version-tag"), "v1.2.6-xyz\n").unwrap();

    generator_cmd()
        .current_dir(&root)
        .args(["out.cs", "--scr"])
        .assert()
        .success();

    let expected = format!(
        r#"[assembly: SourceControlRevision(Revision = "{}", Branch = "feature/x", Repository = "proj", VersionTag = "v1.2.6-xyz")]"#,
        SHA
    );
    assert_eq!(attribute_lines(&root.join("out.cs")), vec![expected]);
}

#[test]
#[serial]
fn test_malformed_branch_ref_is_unknown() {
    let temp_dir = create_temp_dir();
    let root = create_repository(&temp_dir, "proj", "main", "not-a-commit");

    generator_cmd()
        .current_dir(&root)
        .args(["--scr"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"Revision = "UNKNOWN""#));
}

#[test]
#[serial]
fn test_detached_head() {
    let temp_dir = create_temp_dir();
    let root = temp_dir.path().join("detached");
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join(".git/HEAD"), format!("{}\n", SHA)).unwrap();

    generator_cmd()
        .current_dir(&root)
        .args(["--scr"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            r#"[assembly: SourceControlRevision(Revision = "{}", Repository = "detached")]"#,
            SHA
        )));
}

#[test]
#[serial]
fn test_flags_in_any_case() {
    let temp_dir = create_temp_dir();
    let root = create_repository(&temp_dir, "proj", "main", SHA);

    generator_cmd()
        .current_dir(&root)
        .args(["--BUILD", "Release", "--sourcecontrolrevision"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"[assembly: AssemblyConfiguration("Release")]"#))
        .stdout(predicate::str::contains(format!(r#"Revision = "{}""#, SHA)));
}

#[test]
#[serial]
fn test_slash_question_mark_shows_help() {
    generator_cmd()
        .arg("/?")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: update-assembly-info"));
}

#[test]
#[serial]
fn test_version_tag_with_byte_order_mark() {
    let temp_dir = create_temp_dir();
    let root = create_repository(&temp_dir, "proj", "main", SHA);
    fs::write(root.join("next-version-tag"), b"\xEF\xBB\xBFv1.2.6\r\n").unwrap();

    generator_cmd()
        .current_dir(&root)
        .args(["--scr"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"VersionTag = "v1.2.6")]"#));
}

#[test]
#[serial]
fn test_stdout_mode() {
    let temp_dir = create_temp_dir();

    generator_cmd()
        .current_dir(temp_dir.path())
        .args(["--company", r#"Acme "Rockets""#, "-u", "Acme.AssemblyInfo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("// <auto-generated>"))
        .stdout(predicate::str::contains("using System.Reflection;"))
        .stdout(predicate::str::contains("using Acme.AssemblyInfo;"))
        .stdout(predicate::str::contains(r#"[assembly: AssemblyCompany("Acme \"Rockets\"")]"#))
        .stdout(predicate::str::contains("✓").not());
}

#[test]
#[serial]
fn test_build_info_and_packages() {
    let temp_dir = create_temp_dir();

    generator_cmd()
        .current_dir(temp_dir.path())
        .args(["--BuildInfo", "--PackageName", "Skates", "--Package", "Skates-v1.2.3"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r#"\[assembly: BuildInfo\(Date = "\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{7}Z", MachineName = "[^"]+", PackageName = "Skates", Package = "Skates-v1\.2\.3"\)\]"#,
        ).unwrap());
}

#[test]
#[serial]
fn test_print_context() {
    let temp_dir = create_temp_dir();
    let root = create_repository(&temp_dir, "proj", "main", SHA);

    generator_cmd()
        .current_dir(&root)
        .args(["--print-context"])
        .assert()
        .success()
        .stderr(predicate::str::contains("repository_name: proj"))
        .stderr(predicate::str::contains(format!("revision: {}", SHA)));
}

#[test]
#[serial]
fn test_existing_file_is_overwritten() {
    let temp_dir = create_temp_dir();
    let out = temp_dir.path().join("out.cs");
    fs::write(&out, "x".repeat(20_000)).unwrap();

    generator_cmd()
        .current_dir(temp_dir.path())
        .args(["out.cs", "--product", "Skates"])
        .assert()
        .success();

    let text = fs::read_to_string(&out).unwrap();
    assert!(!text.contains("xxxx"));
    assert!(text.contains(r#"[assembly: AssemblyProduct("Skates")]"#));
}

#[test]
#[serial]
fn test_utf16_encoding() {
    let temp_dir = create_temp_dir();
    let out = temp_dir.path().join("out.cs");

    generator_cmd()
        .current_dir(temp_dir.path())
        .args(["out.cs", "--encoding", "utf-16le"])
        .assert()
        .success();

    let bytes = fs::read(&out).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xFE]);
}

#[test]
#[serial]
fn test_explicit_config_file() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("custom.yml");
    fs::write(
        &config_path,
        "company: \"Config Co\"\nusings:\n  - \"Acme.AssemblyInfo\"\n",
    )
    .unwrap();

    generator_cmd()
        .current_dir(temp_dir.path())
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("using Acme.AssemblyInfo;"))
        .stdout(predicate::str::contains(r#"[assembly: AssemblyCompany("Config Co")]"#));
}

#[test]
#[serial]
fn test_missing_config_file_fails() {
    let temp_dir = create_temp_dir();

    generator_cmd()
        .current_dir(temp_dir.path())
        .args(["--config", "does-not-exist.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
#[serial]
fn test_unwritable_target_fails() {
    let temp_dir = create_temp_dir();

    generator_cmd()
        .current_dir(temp_dir.path())
        .args(["missing-dir/out.cs", "--build", "Debug"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to create missing-dir/out.cs"));
}
