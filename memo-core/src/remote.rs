//! Optional remote-permalink enrichment for memo records.
//!
//! An injected port with a narrow contract: best effort, bounded to two
//! local `git` invocations, and no failure ever crosses the trait
//! boundary. A memo without a permalink is fully functional.

use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use regex::Regex;

/// Resolves a project-relative file to a hosted permalink.
pub trait RemoteLinkLookup {
    /// `None` covers every failure mode: no repository, no remote, an
    /// unrecognized hosting pattern, or a process error.
    fn lookup(&self, relative_file: &str) -> Option<String>;
}

/// Lookup for hosts without a repository, and the test substitute.
pub struct NoRemoteLookup;

impl RemoteLinkLookup for NoRemoteLookup {
    fn lookup(&self, _relative_file: &str) -> Option<String> {
        None
    }
}

/// Derives a GitHub blob permalink pinned to the current HEAD commit from
/// the checkout's `origin` remote.
pub struct GitRemoteLookup {
    project_root: PathBuf,
}

impl GitRemoteLookup {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }
}

impl RemoteLinkLookup for GitRemoteLookup {
    fn lookup(&self, relative_file: &str) -> Option<String> {
        let remote_url = git_stdout(
            &self.project_root,
            &["config", "--get", "remote.origin.url"],
        )?;
        let commit = git_stdout(&self.project_root, &["rev-parse", "HEAD"])?;
        github_blob_url(&remote_url, &commit, relative_file)
    }
}

fn github_blob_url(remote_url: &str, commit: &str, relative_file: &str) -> Option<String> {
    let pattern = Regex::new(r"github\.com[:/](.+)/(.+)\.git").ok()?;
    let caps = pattern.captures(remote_url)?;
    let user = caps.get(1)?.as_str();
    let repo = caps.get(2)?.as_str();
    Some(format!(
        "https://github.com/{user}/{repo}/blob/{commit}/{relative_file}"
    ))
}

fn git_stdout(root: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(args)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8(output.stdout).ok()?;
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
