//! Reference enumeration via `git for-each-ref`, or a fixed list of refs the user named
//! on the command line.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use bstr::{BString, ByteSlice};
use gix_hash::ObjectId;
use sizer_core::{Result as SizerResult, RootSource, SizerError};

use crate::gitproc::git_command;

pub struct ForEachRefRootSource {
    repo_dir: PathBuf,
    /// If non-empty, only these ref names are resolved, instead of every ref in the repo.
    wanted: Vec<String>,
}

impl ForEachRefRootSource {
    pub fn new(repo_dir: &Path, wanted: Vec<String>) -> Self {
        ForEachRefRootSource {
            repo_dir: repo_dir.to_path_buf(),
            wanted,
        }
    }
}

impl RootSource for ForEachRefRootSource {
    fn list_refs(&mut self) -> SizerResult<Vec<(BString, ObjectId)>> {
        let mut cmd = git_command(&self.repo_dir);
        cmd.args(["for-each-ref", "--format=%(objectname) %(refname)"]);
        cmd.args(&self.wanted);
        cmd.stdout(Stdio::piped()).stderr(Stdio::null());

        let output = cmd.output()?;
        if !output.status.success() {
            return Err(SizerError::Protocol(format!(
                "git for-each-ref exited with {}",
                output.status
            )));
        }

        let mut refs = Vec::new();
        for line in output.stdout.lines() {
            let Some(space) = line.find_byte(b' ') else {
                continue;
            };
            let (oid_part, name_part) = line.split_at(space);
            let name_part = &name_part[1..];
            let oid = ObjectId::from_hex(oid_part)
                .map_err(|_| SizerError::Protocol(format!("malformed oid from for-each-ref: {}", oid_part.as_bstr())))?;
            refs.push((BString::from(name_part.to_vec()), oid));
        }
        Ok(refs)
    }
}

/// Resolves a single ref name to its target OID, used when the repository has no refs
/// at all but the caller passed a bare OID on the command line.
pub fn resolve_single_oid(repo_dir: &Path, name_or_oid: &str) -> SizerResult<ObjectId> {
    let mut cmd = git_command(repo_dir);
    cmd.args(["rev-parse", "--verify", name_or_oid]);
    cmd.stdout(Stdio::piped()).stderr(Stdio::null());
    let output = cmd.output()?;
    if !output.status.success() {
        return Err(SizerError::Protocol(format!("could not resolve {name_or_oid}")));
    }
    let hex = output.stdout.trim_end();
    ObjectId::from_hex(hex).map_err(|_| SizerError::Protocol(format!("malformed oid from rev-parse: {}", hex.as_bstr())))
}
