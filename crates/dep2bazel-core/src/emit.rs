//! `go_repository` rule records and their Starlark rendering.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::config::Dep2BazelConfig;
use crate::descriptor::FetchDescriptor;
use crate::naming::CanonicalName;

pub const BUILD_FILE_GENERATION: &str = "build_file_generation";
pub const BUILD_FILE_PROTO_MODE: &str = "build_file_proto_mode";

/// Rendered after the fetch attributes, in this order.
const EXTRA_ATTRIBUTE_ORDER: [&str; 2] = [BUILD_FILE_GENERATION, BUILD_FILE_PROTO_MODE];

const FILE_HEADER: &str = r#"# This file is autogenerated with dep2bazel, do not edit.
load("@io_bazel_rules_go//go:def.bzl", "go_repository")

def go_deps():
"#;

/// Everything needed to emit one `go_repository` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildRule {
    pub name: CanonicalName,
    pub import_path: String,
    pub descriptor: FetchDescriptor,
    pub extra_attributes: BTreeMap<String, String>,
}

impl BuildRule {
    pub fn new(
        name: CanonicalName,
        import_path: impl Into<String>,
        descriptor: FetchDescriptor,
        extra_attributes: BTreeMap<String, String>,
    ) -> Self {
        Self {
            name,
            import_path: import_path.into(),
            descriptor,
            extra_attributes,
        }
    }
}

/// Build-generation hints from configuration; unset or empty values are left out.
pub fn extra_attributes(cfg: &Dep2BazelConfig) -> BTreeMap<String, String> {
    [
        (BUILD_FILE_GENERATION, &cfg.build_file_generation),
        (BUILD_FILE_PROTO_MODE, &cfg.build_file_proto_mode),
    ]
    .into_iter()
    .filter_map(|(k, v)| match v.as_deref() {
        Some(v) if !v.is_empty() => Some((k.to_string(), v.to_string())),
        _ => None,
    })
    .collect()
}

fn attr(out: &mut String, key: &str, value: &str) {
    let _ = writeln!(out, "        {key} = \"{value}\",");
}

fn fetch_attributes(out: &mut String, descriptor: &FetchDescriptor) {
    match descriptor {
        FetchDescriptor::Archive(a) => {
            let _ = writeln!(out, "        urls = [\"{}\"],", a.url());
            attr(out, "strip_prefix", a.strip_prefix());
            if let Some(sha) = a.sha256() {
                attr(out, "sha256", sha);
            }
        }
        FetchDescriptor::Vcs(v) => attr(out, "commit", v.revision()),
    }
}

/// Just the fetch attributes of a rule, as they appear inside `go_repository(...)`.
pub fn render_descriptor(descriptor: &FetchDescriptor) -> String {
    let mut out = String::new();
    fetch_attributes(&mut out, descriptor);
    out
}

/// One `go_repository(...)` block, preceded by a blank line.
///
/// The extra attributes are written for `commit` rules too, so a configured
/// `build_file_generation` or non-default `build_file_proto_mode` also lands
/// on VCS checkouts; older dep2bazel output always wrote `"disable"` there.
pub fn render_rule(rule: &BuildRule) -> String {
    let mut out = String::from("\n    go_repository(\n");
    attr(&mut out, "name", rule.name.as_str());
    attr(&mut out, "importpath", &rule.import_path);
    fetch_attributes(&mut out, &rule.descriptor);
    for key in EXTRA_ATTRIBUTE_ORDER {
        if let Some(value) = rule.extra_attributes.get(key).filter(|v| !v.is_empty()) {
            attr(&mut out, key, value);
        }
    }
    out.push_str("    )\n");
    out
}

/// The whole `.bzl` file: header plus one rule per entry, in order.
pub fn render_file(rules: &[BuildRule]) -> String {
    let mut out = String::from(FILE_HEADER);
    for rule in rules {
        out.push_str(&render_rule(rule));
    }
    out
}
