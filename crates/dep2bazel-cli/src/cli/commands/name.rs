//! Name command: canonical repository name for an import path.

use dep2bazel_core::naming::normalize;

pub fn run_name(import_path: &str) {
    println!("{}", normalize(import_path));
}
