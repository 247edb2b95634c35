//! Code hosts whose repository root can be read off the import path.

use regex::Regex;
use std::sync::LazyLock;

use super::{RepoRoot, Vcs};

struct HostRule {
    prefix: &'static str,
    pattern: Regex,
    vcs: Vcs,
}

fn rule(prefix: &'static str, pattern: &str, vcs: Vcs) -> HostRule {
    HostRule {
        prefix,
        pattern: Regex::new(pattern).expect("static host pattern"),
        vcs,
    }
}

static RULES: LazyLock<Vec<HostRule>> = LazyLock::new(|| {
    vec![
        rule(
            "github.com/",
            r"^(?P<root>github\.com/[A-Za-z0-9_.\-]+/[A-Za-z0-9_.\-]+)(/[A-Za-z0-9_.\-]+)*$",
            Vcs::Git,
        ),
        rule(
            "bitbucket.org/",
            r"^(?P<root>bitbucket\.org/[A-Za-z0-9_.\-]+/[A-Za-z0-9_.\-]+)(/[A-Za-z0-9_.\-]+)*$",
            Vcs::Git,
        ),
        rule(
            "launchpad.net/",
            r"^(?P<root>launchpad\.net/(([A-Za-z0-9_.\-]+)(/[A-Za-z0-9_.\-]+)?|~[A-Za-z0-9_.\-]+/(\+junk|[A-Za-z0-9_.\-]+)/[A-Za-z0-9_.\-]+))(/[A-Za-z0-9_.\-]+)*$",
            Vcs::Bzr,
        ),
        rule(
            "hub.jazz.net/git/",
            r"^(?P<root>hub\.jazz\.net/git/[a-z0-9]+/[A-Za-z0-9_.\-]+)(/[A-Za-z0-9_.\-]+)*$",
            Vcs::Git,
        ),
        rule(
            "git.apache.org/",
            r"^(?P<root>git\.apache\.org/[a-z0-9_.\-]+\.git)(/[A-Za-z0-9_.\-]+)*$",
            Vcs::Git,
        ),
        rule(
            "git.openstack.org/",
            r"^(?P<root>git\.openstack\.org/[A-Za-z0-9_.\-]+/[A-Za-z0-9_.\-]+)(\.git)?(/[A-Za-z0-9_.\-]+)*$",
            Vcs::Git,
        ),
    ]
});

/// Paths that spell out their VCS, e.g. `example.org/repo.git/sub`.
static VCS_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<root>([a-z0-9.\-]+\.)+[a-z0-9.\-]+(:[0-9]+)?/[A-Za-z0-9_.\-/]*?\.(?P<vcs>bzr|git|hg|svn))(/[A-Za-z0-9_.\-]+)*$",
    )
    .expect("vcs suffix pattern")
});

/// Outcome of matching the static table.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum StaticMatch {
    Found(RepoRoot),
    /// The host is known but the path does not fit its layout.
    Malformed(&'static str),
    Unknown,
}

pub(super) fn lookup(import_path: &str) -> StaticMatch {
    for r in RULES.iter() {
        if !import_path.starts_with(r.prefix) {
            continue;
        }
        return match r.pattern.captures(import_path) {
            Some(caps) => StaticMatch::Found(root_from(&caps["root"], r.vcs)),
            None => StaticMatch::Malformed(r.prefix),
        };
    }
    if let Some(caps) = VCS_SUFFIX.captures(import_path) {
        if let Some(vcs) = Vcs::from_cmd(&caps["vcs"]) {
            return StaticMatch::Found(root_from(&caps["root"], vcs));
        }
    }
    StaticMatch::Unknown
}

fn root_from(root: &str, vcs: Vcs) -> RepoRoot {
    RepoRoot {
        vcs,
        repo: format!("https://{root}"),
        root: root.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(path: &str) -> RepoRoot {
        match lookup(path) {
            StaticMatch::Found(r) => r,
            other => panic!("expected match for {path}, got {other:?}"),
        }
    }

    #[test]
    fn github_root_drops_subpackages() {
        let r = found("github.com/scele/dep2bazel/cmd/tool");
        assert_eq!(r.root, "github.com/scele/dep2bazel");
        assert_eq!(r.repo, "https://github.com/scele/dep2bazel");
        assert_eq!(r.vcs, Vcs::Git);
    }

    #[test]
    fn github_without_repo_is_malformed() {
        assert_eq!(lookup("github.com/scele"), StaticMatch::Malformed("github.com/"));
    }

    #[test]
    fn other_known_hosts() {
        assert_eq!(found("bitbucket.org/ww/goautoneg").repo, "https://bitbucket.org/ww/goautoneg");
        let lp = found("launchpad.net/gocheck");
        assert_eq!(lp.vcs, Vcs::Bzr);
        assert_eq!(lp.root, "launchpad.net/gocheck");
        assert_eq!(found("git.apache.org/thrift.git/lib/go").root, "git.apache.org/thrift.git");
        assert_eq!(
            found("git.openstack.org/openstack/golang-client/x").root,
            "git.openstack.org/openstack/golang-client"
        );
    }

    #[test]
    fn explicit_vcs_suffix() {
        let r = found("example.org/user/repo.hg/sub");
        assert_eq!(r.vcs, Vcs::Hg);
        assert_eq!(r.root, "example.org/user/repo.hg");
    }

    #[test]
    fn vanity_hosts_are_unknown() {
        assert_eq!(lookup("golang.org/x/net/context"), StaticMatch::Unknown);
        assert_eq!(lookup("k8s.io/client-go"), StaticMatch::Unknown);
    }
}
