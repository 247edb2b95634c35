//! The per-dependency pipeline: root lookup, fetch resolution, rule building
//! and optional workspace links, in lock-file order.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::emit::BuildRule;
use crate::layout::{GopathLayout, LayoutError};
use crate::lockfile::{Lock, LockedProject};
use crate::naming::normalize;
use crate::repository::RepositoryResolver;
use crate::vcs_root::{RootResolver, VcsRootError};

/// A dependency left out of the output because its root could not be found.
#[derive(Debug)]
pub struct Skipped {
    pub name: String,
    pub error: VcsRootError,
}

#[derive(Debug, Default)]
pub struct Conversion {
    pub rules: Vec<BuildRule>,
    pub skipped: Vec<Skipped>,
    /// Symlinks placed in the GOPATH layout, in creation order.
    pub links: Vec<PathBuf>,
}

pub struct Converter {
    roots: Box<dyn RootResolver>,
    repositories: RepositoryResolver,
    extra_attributes: BTreeMap<String, String>,
    emit_rules: bool,
    layout: Option<GopathLayout>,
    source_link: Option<(String, PathBuf)>,
}

impl Converter {
    pub fn new(roots: Box<dyn RootResolver>, repositories: RepositoryResolver) -> Self {
        Self {
            roots,
            repositories,
            extra_attributes: BTreeMap::new(),
            emit_rules: true,
            layout: None,
            source_link: None,
        }
    }

    pub fn extra_attributes(mut self, attrs: BTreeMap<String, String>) -> Self {
        self.extra_attributes = attrs;
        self
    }

    /// With rules off no archives are downloaded; only links are placed.
    pub fn emit_rules(mut self, on: bool) -> Self {
        self.emit_rules = on;
        self
    }

    pub fn layout(mut self, layout: GopathLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Link `go_prefix` to the project's own sources once all dependencies
    /// are in place. Ignored without a layout.
    pub fn source_link(
        mut self,
        go_prefix: impl Into<String>,
        source_directory: impl Into<PathBuf>,
    ) -> Self {
        self.source_link = Some((go_prefix.into(), source_directory.into()));
        self
    }

    /// Root lookup failures skip the dependency; layout failures end the run.
    pub fn run(&self, lock: &Lock) -> Result<Conversion, LayoutError> {
        let mut out = Conversion::default();
        for project in &lock.projects {
            if let Err(error) = self.convert_one(project, &mut out.rules) {
                tracing::warn!(name = %project.name, error = %error, "skipping dependency");
                out.skipped.push(Skipped {
                    name: project.name.clone(),
                    error,
                });
                continue;
            }
            if let Some(layout) = &self.layout {
                out.links.push(layout.link_dependency(&project.name)?);
            }
        }

        if let (Some(layout), Some((prefix, dir))) = (&self.layout, &self.source_link) {
            out.links.push(layout.link_source(prefix, dir)?);
        }
        tracing::info!(
            rules = out.rules.len(),
            skipped = out.skipped.len(),
            links = out.links.len(),
            "conversion finished"
        );
        Ok(out)
    }

    fn convert_one(
        &self,
        project: &LockedProject,
        rules: &mut Vec<BuildRule>,
    ) -> Result<(), VcsRootError> {
        let remote = project.remote();
        let root = self.roots.repo_root(remote)?;
        tracing::debug!(name = %project.name, remote, repo = %root.repo, "repository root");

        if self.emit_rules {
            let descriptor = self.repositories.resolve(&root.repo, &project.revision);
            rules.push(BuildRule::new(
                normalize(&project.name),
                project.name.clone(),
                descriptor,
                self.extra_attributes.clone(),
            ));
        }
        Ok(())
    }
}
