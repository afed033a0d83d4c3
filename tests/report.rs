use std::fs;
use std::path::MAIN_SEPARATOR;

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;
use vst3_list::model::PluginCatalog;
use vst3_list::report::{CHECK_FILE_NAME, LIST_FILE_NAME, write_reports};

fn command() -> Command {
    Command::cargo_bin("vst3-list").expect("binary exists")
}

fn plugin_tree(temp: &assert_fs::TempDir) -> assert_fs::fixture::ChildPath {
    let plugins = temp.child("plugins");
    plugins.create_dir_all().unwrap();
    plugins.child("Loose.vst3/Contents/Info.plist").write_str("<plist/>").unwrap();
    plugins.child("Vendor, Inc/Chorus.vst3/Contents/Info.plist").write_str("<plist/>").unwrap();
    plugins.child("VendorA/Bass.vst3").write_str("binary").unwrap();
    plugins.child("VendorA/Synth.vst3/Contents/Info.plist").write_str("<plist/>").unwrap();
    plugins.child("VendorA/readme.txt").write_str("read me").unwrap();
    plugins.child("VendorB/Pad.dll").write_str("binary").unwrap();
    plugins.child("notes.txt").write_str("notes").unwrap();
    plugins.child("desktop.ini").write_str("[.ShellClassInfo]").unwrap();
    plugins
}

#[test]
fn report_writes_both_tables() {
    let temp = assert_fs::TempDir::new().unwrap();
    let plugins = plugin_tree(&temp);
    let output = temp.child("out");
    output.create_dir_all().unwrap();

    command()
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("report")
        .arg(plugins.path())
        .arg("--output")
        .arg(output.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Listed 5 plugin(s) from 3 manufacturer(s)."))
        .stdout(predicate::str::contains(LIST_FILE_NAME))
        .stdout(predicate::str::contains(CHECK_FILE_NAME));

    let list = fs::read_to_string(output.child(LIST_FILE_NAME).path()).unwrap();
    assert_eq!(list, "\"Vendor, Inc\",VendorA,VendorB\nChorus.vst3,Bass.vst3,Pad.dll\n,Synth.vst3,\n");

    let check = fs::read_to_string(output.child(CHECK_FILE_NAME).path()).unwrap();
    assert_eq!(
        check,
        format!("_Unknown,_Not recognized\nLoose.vst3,VendorA{MAIN_SEPARATOR}readme.txt\n,notes.txt\n")
    );
}

#[test]
fn alias_rp_works_like_report() {
    let temp = assert_fs::TempDir::new().unwrap();
    let plugins = plugin_tree(&temp);
    let output = temp.child("out");
    output.create_dir_all().unwrap();

    command()
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("rp")
        .arg(plugins.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .success();

    output.child(LIST_FILE_NAME).assert(predicate::path::is_file());
    output.child(CHECK_FILE_NAME).assert(predicate::path::is_file());
}

#[test]
fn report_is_idempotent() {
    let temp = assert_fs::TempDir::new().unwrap();
    let plugins = plugin_tree(&temp);
    let output = temp.child("out");
    output.create_dir_all().unwrap();

    let run = || {
        command()
            .env("HOME", temp.path())
            .env("XDG_CONFIG_HOME", temp.child("config").path())
            .arg("report")
            .arg(plugins.path())
            .arg("--output")
            .arg(output.path())
            .assert()
            .success();
        (
            fs::read(output.child(LIST_FILE_NAME).path()).unwrap(),
            fs::read(output.child(CHECK_FILE_NAME).path()).unwrap(),
        )
    };

    let first = run();
    let second = run();
    assert_eq!(first, second);
}

#[test]
fn report_overwrites_previous_files() {
    let temp = assert_fs::TempDir::new().unwrap();
    let plugins = plugin_tree(&temp);
    let output = temp.child("out");
    output.child(LIST_FILE_NAME).write_str("stale,content\nfrom,before\nand,more\nrows,here\n").unwrap();

    command()
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("report")
        .arg(plugins.path())
        .arg("--output")
        .arg(output.path())
        .assert()
        .success();

    let list = fs::read_to_string(output.child(LIST_FILE_NAME).path()).unwrap();
    assert!(!list.contains("stale"));
    assert!(list.starts_with("\"Vendor, Inc\""));
}

#[test]
fn missing_plugin_dir_fails_without_writing() {
    let temp = assert_fs::TempDir::new().unwrap();
    let output = temp.child("out");
    output.create_dir_all().unwrap();

    command()
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("report")
        .arg(temp.child("does-not-exist").path())
        .arg("--output")
        .arg(output.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Plugin folder does not exist"));

    output.child(LIST_FILE_NAME).assert(predicate::path::missing());
    output.child(CHECK_FILE_NAME).assert(predicate::path::missing());
}

#[test]
fn missing_report_dir_fails_without_writing() {
    let temp = assert_fs::TempDir::new().unwrap();
    let plugins = plugin_tree(&temp);
    let output = temp.child("missing-out");

    command()
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("report")
        .arg(plugins.path())
        .arg("--output")
        .arg(output.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Report folder does not exist"));

    output.assert(predicate::path::missing());
}

#[test]
fn report_dir_defaults_to_config_value() {
    let temp = assert_fs::TempDir::new().unwrap();
    let plugins = plugin_tree(&temp);
    let output = temp.child("configured-out");
    output.create_dir_all().unwrap();
    temp.child("config/vst3-list/config.toml")
        .write_str(&format!(
            "plugin_dir = {:?}\nreport_dir = {:?}\n",
            plugins.path().display().to_string(),
            output.path().display().to_string()
        ))
        .unwrap();

    command()
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("report")
        .assert()
        .success();

    output.child(LIST_FILE_NAME).assert(predicate::str::contains("VendorA").from_utf8().from_file_path());
}

#[test]
fn empty_tree_still_writes_review_header() {
    let temp = assert_fs::TempDir::new().unwrap();
    let plugins = temp.child("plugins");
    plugins.create_dir_all().unwrap();
    let output = temp.child("out");
    output.create_dir_all().unwrap();

    command()
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("report")
        .arg(plugins.path())
        .arg("--output")
        .arg(output.path())
        .assert()
        .success();

    output.child(LIST_FILE_NAME).assert("");
    output.child(CHECK_FILE_NAME).assert("_Unknown,_Not recognized\n");
}

#[test]
fn quotes_in_names_are_doubled() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mut catalog = PluginCatalog::new();
    catalog.push("Studio \"One\"", "Say \"Hi\".vst3");
    catalog.push("Studio \"One\"", "Plain.vst3");

    write_reports(&catalog, temp.path()).unwrap();

    temp.child(LIST_FILE_NAME)
        .assert("\"Studio \"\"One\"\"\"\n\"Say \"\"Hi\"\".vst3\"\nPlain.vst3\n");
}

#[cfg(unix)]
#[test]
fn failed_table_does_not_block_the_other() {
    let temp = assert_fs::TempDir::new().unwrap();
    // A directory in the way makes the final rename of the list table fail.
    temp.child(LIST_FILE_NAME).child("occupied").write_str("x").unwrap();
    let mut catalog = PluginCatalog::new();
    catalog.push("VendorA", "Synth.vst3");
    catalog.push(vst3_list::model::UNKNOWN_LABEL, "Loose.vst3");

    let err = write_reports(&catalog, temp.path()).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("Failed to write"), "{message}");
    assert!(message.contains(LIST_FILE_NAME), "{message}");
    temp.child(CHECK_FILE_NAME).assert("_Unknown,_Not recognized\nLoose.vst3,\n");
    temp.child(format!(".{LIST_FILE_NAME}.tmp")).assert(predicate::path::missing());
}

#[test]
fn both_failed_tables_are_reported_together() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(LIST_FILE_NAME).child("occupied").write_str("x").unwrap();
    temp.child(CHECK_FILE_NAME).child("occupied").write_str("x").unwrap();
    let mut catalog = PluginCatalog::new();
    catalog.push("VendorA", "Synth.vst3");

    let err = write_reports(&catalog, temp.path()).unwrap_err();

    assert!(matches!(&err, vst3_list::error::AppError::Reports(errors) if errors.len() == 2));
    let message = err.to_string();
    assert!(message.starts_with("Failed to write reports"), "{message}");
    assert!(message.contains(LIST_FILE_NAME), "{message}");
    assert!(message.contains(CHECK_FILE_NAME), "{message}");
    temp.child(format!(".{LIST_FILE_NAME}.tmp")).assert(predicate::path::missing());
    temp.child(format!(".{CHECK_FILE_NAME}.tmp")).assert(predicate::path::missing());
}

#[cfg(unix)]
#[test]
fn read_only_report_dir_fails_before_scanning() {
    use std::os::unix::fs::PermissionsExt;

    let temp = assert_fs::TempDir::new().unwrap();
    let plugins = plugin_tree(&temp);
    let output = temp.child("out");
    output.create_dir_all().unwrap();
    fs::set_permissions(output.path(), fs::Permissions::from_mode(0o555)).unwrap();
    if tempfile::tempfile_in(output.path()).is_ok() {
        // Running with privileges that ignore permission bits.
        fs::set_permissions(output.path(), fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let assert = command()
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("report")
        .arg(plugins.path())
        .arg("--output")
        .arg(output.path())
        .assert();
    fs::set_permissions(output.path(), fs::Permissions::from_mode(0o755)).unwrap();

    assert
        .failure()
        .stderr(predicate::str::contains("Report folder is not writable"))
        .stdout(predicate::str::contains("Listed").not());
    output.child(LIST_FILE_NAME).assert(predicate::path::missing());
    output.child(CHECK_FILE_NAME).assert(predicate::path::missing());
}
