//! `<meta name="go-import">` discovery for vanity import paths.

use regex::Regex;
use std::sync::LazyLock;

static META_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\s[^>]*>").expect("meta tag pattern"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([A-Za-z][A-Za-z0-9_\-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("attribute pattern")
});

static HEAD_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head>|<body[\s>]").expect("head end pattern"));

/// One `go-import` declaration: `prefix vcs repo-url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaImport {
    pub prefix: String,
    pub vcs: String,
    pub repo: String,
}

/// Collects `go-import` declarations from the document head.
pub fn parse_meta_imports(html: &str) -> Vec<MetaImport> {
    let head = match HEAD_END.find(html) {
        Some(m) => &html[..m.start()],
        None => html,
    };

    let mut imports = Vec::new();
    for tag in META_TAG.find_iter(head) {
        let mut name = None;
        let mut content = None;
        for caps in ATTRIBUTE.captures_iter(tag.as_str()) {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            match caps[1].to_ascii_lowercase().as_str() {
                "name" => name = Some(value),
                "content" => content = Some(value),
                _ => {}
            }
        }
        if name != Some("go-import") {
            continue;
        }
        let fields: Vec<&str> = content.unwrap_or_default().split_whitespace().collect();
        if let [prefix, vcs, repo] = fields[..] {
            imports.push(MetaImport {
                prefix: prefix.to_string(),
                vcs: vcs.to_string(),
                repo: repo.to_string(),
            });
        }
    }
    imports
}

#[derive(Debug, PartialEq, Eq)]
pub enum MatchError {
    NoMatch,
    Ambiguous(Vec<String>),
}

/// Picks the declaration whose prefix covers `import_path`.
///
/// `mod` entries (module proxies) are ignored whenever a real VCS entry for
/// the same prefix exists.
pub fn match_import<'a>(
    imports: &'a [MetaImport],
    import_path: &str,
) -> Result<&'a MetaImport, MatchError> {
    let covers = |prefix: &str| {
        import_path == prefix
            || import_path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    };
    let candidates: Vec<&MetaImport> = imports.iter().filter(|m| covers(&m.prefix)).collect();
    let has_vcs = candidates.iter().any(|m| m.vcs != "mod");
    let candidates: Vec<&MetaImport> = candidates
        .into_iter()
        .filter(|m| !has_vcs || m.vcs != "mod")
        .collect();

    match candidates.as_slice() {
        [] => Err(MatchError::NoMatch),
        [only] => Ok(*only),
        many => Err(MatchError::Ambiguous(
            many.iter().map(|m| m.prefix.clone()).collect(),
        )),
    }
}
