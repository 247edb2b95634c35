//! Tests for the convert subcommand: flags, overrides and offline runs.

use super::parse;
use crate::cli::commands::{run_convert, ConvertOptions};
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use dep2bazel_core::config::Dep2BazelConfig;
use std::fs;
use std::path::PathBuf;

#[test]
fn cli_parse_convert_minimal() {
    match parse(&["dep2bazel", "convert", "Gopkg.lock"]) {
        CliCommand::Convert {
            lockfile,
            output,
            rules,
            gopath,
            ..
        } => {
            assert_eq!(lockfile, PathBuf::from("Gopkg.lock"));
            assert!(output.is_none());
            assert!(!rules.sha256);
            assert!(rules.build_file_proto_mode.is_none());
            assert!(gopath.is_none());
        }
        _ => panic!("expected Convert"),
    }
}

#[test]
fn cli_parse_convert_all_flags() {
    let cmd = parse(&[
        "dep2bazel",
        "convert",
        "Gopkg.lock",
        "-o",
        "go_deps.bzl",
        "--sha256",
        "--build-file-generation",
        "on",
        "--build-file-proto-mode",
        "",
        "--gopath",
        "/tmp/gopath",
        "--bazel-output-base",
        "/tmp/out",
        "--source-directory",
        ".",
        "--go-prefix",
        "github.com/me/project",
    ]);
    match cmd {
        CliCommand::Convert {
            output,
            rules,
            gopath,
            bazel_output_base,
            source_directory,
            go_prefix,
            ..
        } => {
            assert_eq!(output, Some(PathBuf::from("go_deps.bzl")));
            assert!(rules.sha256);
            assert_eq!(rules.build_file_generation.as_deref(), Some("on"));
            assert_eq!(rules.build_file_proto_mode.as_deref(), Some(""));
            assert_eq!(gopath, Some(PathBuf::from("/tmp/gopath")));
            assert_eq!(bazel_output_base, Some(PathBuf::from("/tmp/out")));
            assert_eq!(source_directory, Some(PathBuf::from(".")));
            assert_eq!(go_prefix.as_deref(), Some("github.com/me/project"));
        }
        _ => panic!("expected Convert"),
    }
}

#[test]
fn cli_gopath_requires_output_base() {
    let res = Cli::try_parse_from(["dep2bazel", "convert", "Gopkg.lock", "--gopath", "/g"]);
    assert!(res.is_err());
}

#[test]
fn cli_verbose_counts() {
    let cli = Cli::try_parse_from(["dep2bazel", "-vv", "name", "golang.org/x/net"]).unwrap();
    assert_eq!(cli.verbose, 2);
    let cli = Cli::try_parse_from(["dep2bazel", "name", "golang.org/x/net"]).unwrap();
    assert_eq!(cli.verbose, 0);
}

#[test]
fn cli_global_config_flag() {
    let cli = Cli::try_parse_from(["dep2bazel", "convert", "Gopkg.lock", "--config", "/etc/d.toml"])
        .unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("/etc/d.toml")));
}

#[test]
fn rule_flags_override_config() {
    let CliCommand::Convert { rules, .. } = parse(&[
        "dep2bazel",
        "convert",
        "Gopkg.lock",
        "--sha256",
        "--build-file-proto-mode",
        "default",
    ]) else {
        panic!("expected Convert");
    };
    let mut cfg = Dep2BazelConfig::default();
    rules.apply(&mut cfg);
    assert!(cfg.sha256);
    assert_eq!(cfg.build_file_proto_mode.as_deref(), Some("default"));
    assert!(cfg.build_file_generation.is_none());
}

#[test]
fn rules_are_emitted_unless_only_a_workspace_is_requested() {
    let mut opts = ConvertOptions::default();
    assert!(opts.emits_rules());
    opts.workspace = Some(("/g".into(), "/o".into()));
    assert!(!opts.emits_rules());
    opts.output = Some("deps.bzl".into());
    assert!(opts.emits_rules());
}

// Hosts without a tarball endpoint resolve to commits without any network access.
const OFFLINE_LOCK: &str = r#"
[[projects]]
  name = "bitbucket.org/ww/goautoneg"
  packages = ["."]
  revision = "75cd24fc2f2c2a2088577d12123ddee5f54e0675"

[[projects]]
  name = "launchpad.net/gocheck"
  packages = ["."]
  revision = "87"
"#;

#[test]
fn convert_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let lockfile = dir.path().join("Gopkg.lock");
    fs::write(&lockfile, OFFLINE_LOCK).unwrap();
    let output = dir.path().join("go_deps.bzl");

    let opts = ConvertOptions {
        lockfile,
        output: Some(output.clone()),
        ..ConvertOptions::default()
    };
    run_convert(&Dep2BazelConfig::default(), opts).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("# This file is autogenerated with dep2bazel, do not edit.\n"));
    assert!(text.contains("name = \"org_bitbucket_ww_goautoneg\""));
    assert!(text.contains("commit = \"75cd24fc2f2c2a2088577d12123ddee5f54e0675\""));
    assert!(text.contains("name = \"net_launchpad_gocheck\""));
    assert_eq!(text.matches("build_file_proto_mode = \"disable\"").count(), 2);
}

#[test]
fn convert_fails_when_output_cannot_be_created() {
    let dir = tempfile::tempdir().unwrap();
    let lockfile = dir.path().join("Gopkg.lock");
    fs::write(&lockfile, OFFLINE_LOCK).unwrap();

    let opts = ConvertOptions {
        lockfile,
        output: Some(dir.path().join("missing/dir/go_deps.bzl")),
        ..ConvertOptions::default()
    };
    let err = run_convert(&Dep2BazelConfig::default(), opts).unwrap_err();
    assert!(format!("{err:#}").contains("create"));
}

#[test]
fn bad_output_path_fails_before_any_links() {
    let dir = tempfile::tempdir().unwrap();
    let lockfile = dir.path().join("Gopkg.lock");
    fs::write(&lockfile, OFFLINE_LOCK).unwrap();
    let gopath = dir.path().join("gopath");

    let opts = ConvertOptions {
        lockfile,
        output: Some(dir.path().join("missing/go_deps.bzl")),
        workspace: Some((gopath.clone(), dir.path().join("output_base"))),
        ..ConvertOptions::default()
    };
    assert!(run_convert(&Dep2BazelConfig::default(), opts).is_err());
    assert!(!gopath.exists(), "no workspace links before the output file exists");
}

#[test]
fn empty_lock_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let lockfile = dir.path().join("Gopkg.lock");
    fs::write(&lockfile, "").unwrap();
    let output = dir.path().join("go_deps.bzl");

    let opts = ConvertOptions {
        lockfile,
        output: Some(output.clone()),
        ..ConvertOptions::default()
    };
    run_convert(&Dep2BazelConfig::default(), opts).unwrap();
    let text = fs::read_to_string(&output).unwrap();
    assert!(text.ends_with("def go_deps():\n"));
}

#[test]
fn convert_fails_on_unreadable_lock() {
    let dir = tempfile::tempdir().unwrap();
    let opts = ConvertOptions {
        lockfile: dir.path().join("Gopkg.lock"),
        ..ConvertOptions::default()
    };
    assert!(run_convert(&Dep2BazelConfig::default(), opts).is_err());
}
