//! Subprocess collaborators that implement `sizer_core`'s `HeaderSource` and
//! `BodySource` traits over real `git` child processes.
//!
//! The environment sanitization in [`git_command`] is grounded directly on the
//! teacher's `Git::git()` in `git_binary.rs`: a clean `GIT_CONFIG_GLOBAL`/
//! `GIT_CONFIG_SYSTEM`/`GIT_CONFIG_NOSYSTEM` triple so a user's global git config
//! (aliases, credential helpers, core.autocrlf, ...) can't change what gets reported.

use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread;

use gix_hash::ObjectId;
use sizer_core::{BodySource, HeaderSource, ObjectKind, Result as SizerResult, SizerError};

pub fn git_command(repo_dir: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(repo_dir);
    cmd.env("GIT_CONFIG_GLOBAL", "/dev/null");
    cmd.env("GIT_CONFIG_NOSYSTEM", "1");
    cmd.env("GIT_CONFIG_SYSTEM", "/dev/null");
    cmd.env("LC_ALL", "C");
    cmd.stdin(Stdio::null());
    cmd
}

/// Enumerates reachable objects by piping `git rev-list --objects` into
/// `git cat-file --batch-check`, using one feeder thread per pipe so that `rev-list`'s
/// output and `cat-file`'s input can be produced and consumed concurrently — a
/// repository with millions of objects would otherwise fill the OS pipe buffer on one
/// side and deadlock against the other.
pub struct RevListHeaderSource {
    repo_dir: PathBuf,
}

impl RevListHeaderSource {
    pub fn new(repo_dir: &Path) -> Self {
        RevListHeaderSource { repo_dir: repo_dir.to_path_buf() }
    }
}

impl HeaderSource for RevListHeaderSource {
    fn enumerate(&mut self, roots: &[ObjectId]) -> SizerResult<Vec<(ObjectId, ObjectKind)>> {
        let mut rev_list = git_command(&self.repo_dir)
            .args(["rev-list", "--objects"])
            .args(roots.iter().map(|oid| oid.to_hex().to_string()))
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let rev_list_stdout = rev_list
            .stdout
            .take()
            .ok_or_else(|| SizerError::Protocol("rev-list produced no stdout pipe".into()))?;

        let mut cat_file = git_command(&self.repo_dir)
            .args(["cat-file", "--batch-check=%(objectname) %(objecttype)"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let mut cat_stdin = cat_file
            .stdin
            .take()
            .ok_or_else(|| SizerError::Protocol("cat-file --batch-check produced no stdin pipe".into()))?;
        let cat_stdout = cat_file
            .stdout
            .take()
            .ok_or_else(|| SizerError::Protocol("cat-file --batch-check produced no stdout pipe".into()))?;

        let writer = thread::spawn(move || -> std::io::Result<()> {
            for line in BufReader::new(rev_list_stdout).lines() {
                let line = line?;
                if let Some(oid_str) = line.split_whitespace().next() {
                    writeln!(cat_stdin, "{oid_str}")?;
                }
            }
            Ok(())
        });

        let reader = thread::spawn(move || -> SizerResult<Vec<(ObjectId, ObjectKind)>> {
            let mut entries = Vec::new();
            for line in BufReader::new(cat_stdout).lines() {
                let line = line.map_err(SizerError::from)?;
                let mut parts = line.splitn(2, ' ');
                let oid_str = parts.next().unwrap_or_default();
                let kind_str = parts.next().unwrap_or("missing");
                let oid = ObjectId::from_hex(oid_str.as_bytes())
                    .map_err(|_| SizerError::Protocol(format!("malformed oid from cat-file: {line}")))?;
                let kind = ObjectKind::parse(kind_str)
                    .ok_or_else(|| SizerError::Protocol(format!("unrecognized object type: {kind_str}")))?;
                entries.push((oid, kind));
            }
            Ok(entries)
        });

        writer
            .join()
            .map_err(|_| SizerError::Protocol("rev-list feeder thread panicked".into()))?
            .map_err(SizerError::from)?;
        let entries = reader
            .join()
            .map_err(|_| SizerError::Protocol("cat-file feeder thread panicked".into()))??;

        let status = rev_list.wait()?;
        if !status.success() {
            return Err(SizerError::Protocol(format!("git rev-list exited with {status}")));
        }
        let status = cat_file.wait()?;
        if !status.success() {
            return Err(SizerError::Protocol(format!(
                "git cat-file --batch-check exited with {status}"
            )));
        }

        Ok(entries)
    }
}

/// Retrieves object bodies from a persistent `git cat-file --batch` process. Unlike
/// [`RevListHeaderSource`], this is a strict one-request-one-response protocol, so a
/// single thread can write a request and then read its response without risking a
/// pipe deadlock.
pub struct BatchBodySource {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl BatchBodySource {
    pub fn spawn(repo_dir: &Path) -> SizerResult<Self> {
        let mut child = git_command(repo_dir)
            .args(["cat-file", "--batch"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SizerError::Protocol("cat-file --batch produced no stdin pipe".into()))?;
        let stdout = BufReader::new(
            child
                .stdout
                .take()
                .ok_or_else(|| SizerError::Protocol("cat-file --batch produced no stdout pipe".into()))?,
        );
        Ok(BatchBodySource { child, stdin, stdout })
    }
}

impl BodySource for BatchBodySource {
    fn fetch(&mut self, oid: ObjectId, _kind: ObjectKind) -> SizerResult<Vec<u8>> {
        writeln!(self.stdin, "{}", oid.to_hex())?;

        let mut header = String::new();
        self.stdout.read_line(&mut header)?;
        let header = header.trim_end();
        if header.is_empty() {
            return Err(SizerError::Protocol("cat-file --batch closed its output unexpectedly".into()));
        }
        if header.ends_with("missing") {
            return Err(SizerError::MissingObject(oid));
        }

        let mut parts = header.split_whitespace();
        let _oid_str = parts.next();
        let _type_str = parts.next();
        let size: usize = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| SizerError::Protocol(format!("malformed cat-file --batch header: {header}")))?;

        let mut body = vec![0u8; size];
        self.stdout.read_exact(&mut body)?;
        let mut trailing_newline = [0u8; 1];
        self.stdout.read_exact(&mut trailing_newline)?;

        Ok(body)
    }
}

impl Drop for BatchBodySource {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
