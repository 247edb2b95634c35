//! Rewrites of source hosts that cannot serve reproducible tarballs.
//!
//! GitHub serves revision snapshots at a stable URL, so hosts that merely
//! redirect to GitHub (gopkg.in) or that mirror onto it (go.googlesource.com)
//! are rewritten to the equivalent GitHub repository before a tarball is
//! attempted.

use regex::Regex;
use std::sync::LazyLock;

const GOPKG_IN: &str = "https://gopkg.in";
const GOOGLESOURCE: &str = "https://go.googlesource.com/";
const GITHUB: &str = "https://github.com/";

/// `/[user/]name.vN[...]`, e.g. `/yaml.v2` or `/check/check.v1/sub`.
static GOPKG_IN_NEW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^/(?:([a-zA-Z0-9][-a-zA-Z0-9]+)/)?([a-zA-Z][-.a-zA-Z0-9]*)\.((?:v0|v[1-9][0-9]*)(?:\.0|\.[1-9][0-9]*){0,2}(?:-unstable)?)(?:\.git)?((?:/[a-zA-Z0-9][-.a-zA-Z0-9]*)*)$",
    )
    .expect("gopkg.in name.version grammar")
});

/// `/[user/]vN[...]/name`, the older gopkg.in layout, e.g. `/v1/check`.
static GOPKG_IN_OLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^/(?:([a-z0-9][-a-z0-9]+)/)?((?:v0|v[1-9][0-9]*)(?:\.0|\.[1-9][0-9]*){0,2}(?:-unstable)?)/([a-zA-Z][-a-zA-Z0-9]*)(?:\.git)?((?:/[a-zA-Z][-a-zA-Z0-9]*)*)$",
    )
    .expect("gopkg.in version/name grammar")
});

/// Returns the archive-friendly equivalent of `url`, or `url` itself when no
/// rewrite applies.
pub fn remap(url: &str) -> String {
    if url.starts_with("https://gopkg.in/") {
        let tail = &url[GOPKG_IN.len()..];
        return match gopkg_in_repo(tail) {
            Some((user, name)) if !user.is_empty() => format!("{GITHUB}{user}/{name}"),
            Some((_, name)) => format!("{GITHUB}go-{name}/{name}"),
            None => url.to_string(),
        };
    }
    if url.starts_with(GOOGLESOURCE) {
        let repo = url.rsplit('/').next().unwrap_or_default();
        return format!("{GITHUB}golang/{repo}");
    }
    url.to_string()
}

/// Extracts `(user, name)` from a gopkg.in path; `user` is empty when the
/// path does not name one.
fn gopkg_in_repo(tail: &str) -> Option<(&str, &str)> {
    if let Some(caps) = GOPKG_IN_NEW.captures(tail) {
        return Some((group(&caps, 1), group(&caps, 2)));
    }
    let caps = GOPKG_IN_OLD.captures(tail)?;
    Some((group(&caps, 1), group(&caps, 3)))
}

fn group<'t>(caps: &regex::Captures<'t>, i: usize) -> &'t str {
    caps.get(i).map_or("", |m| m.as_str())
}
