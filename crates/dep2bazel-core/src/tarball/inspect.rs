//! Reading the directory layout of a gzipped tarball.

use flate2::read::GzDecoder;
use std::io::{self, Read};
use tar::EntryType;
use thiserror::Error;

use crate::config::StripPrefixStrategy;

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("archive has fewer than two entries")]
    TooFewEntries,
    #[error("archive has no single top-level directory")]
    NoCommonRoot,
}

/// Determines the strip prefix of the `.tar.gz` stream in `reader`.
pub fn strip_prefix<R: Read>(
    reader: R,
    strategy: StripPrefixStrategy,
) -> Result<String, InspectError> {
    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    match strategy {
        StripPrefixStrategy::SecondEntry => second_entry(&mut archive),
        StripPrefixStrategy::CommonPrefix => common_root(&mut archive),
    }
}

/// GitHub archives open with a pax global header carrying the commit id,
/// followed by the root directory whose capitalization we cannot predict.
fn second_entry<R: Read>(archive: &mut tar::Archive<R>) -> Result<String, InspectError> {
    let mut entries = archive.entries()?;
    entries.next().transpose()?.ok_or(InspectError::TooFewEntries)?;
    let root = entries.next().transpose()?.ok_or(InspectError::TooFewEntries)?;
    Ok(String::from_utf8_lossy(&root.path_bytes()).into_owned())
}

fn common_root<R: Read>(archive: &mut tar::Archive<R>) -> Result<String, InspectError> {
    let mut root: Option<String> = None;
    for entry in archive.entries()? {
        let entry = entry?;
        let kind = entry.header().entry_type();
        if is_metadata(kind) {
            continue;
        }
        let path = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        let path = path.trim_start_matches("./");
        let (first, rest) = match path.split_once('/') {
            Some((first, rest)) => (first, Some(rest)),
            None => (path, None),
        };
        // A plain file at the top level means there is nothing to strip.
        if first.is_empty() || (rest.is_none() && !kind.is_dir()) {
            return Err(InspectError::NoCommonRoot);
        }
        match &root {
            Some(r) if r != first => return Err(InspectError::NoCommonRoot),
            Some(_) => {}
            None => root = Some(first.to_string()),
        }
    }
    root.map(|r| format!("{r}/"))
        .ok_or(InspectError::TooFewEntries)
}

fn is_metadata(kind: EntryType) -> bool {
    kind.is_pax_global_extensions()
        || kind.is_pax_local_extensions()
        || kind.is_gnu_longname()
        || kind.is_gnu_longlink()
}
