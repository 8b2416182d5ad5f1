//! Real git repositories in temporary directories

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .env("GIT_AUTHOR_NAME", "keva")
        .env("GIT_AUTHOR_EMAIL", "keva@example.com")
        .env("GIT_COMMITTER_NAME", "keva")
        .env("GIT_COMMITTER_EMAIL", "keva@example.com")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// A bare remote and two clones of it sharing one commit
pub struct Sandbox {
    _root: TempDir,
    pub remote: PathBuf,
    pub alice: PathBuf,
    pub bob: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let remote = root.path().join("remote.git");
        let alice = root.path().join("alice");
        let bob = root.path().join("bob");

        git(
            root.path(),
            &["-c", "init.defaultBranch=main", "init", "--bare", "remote.git"],
        );
        git(root.path(), &["-c", "init.defaultBranch=main", "init", "alice"]);
        configure_identity(&alice);
        git(&alice, &["remote", "add", "origin", "../remote.git"]);
        git(&alice, &["commit", "--allow-empty", "-m", "initial"]);
        git(&alice, &["push", "origin", "HEAD:refs/heads/main"]);
        git(root.path(), &["clone", "remote.git", "bob"]);
        configure_identity(&bob);

        Self {
            _root: root,
            remote,
            alice,
            bob,
        }
    }
}

/// Empty repository (no commits) with identity configured
pub fn empty_repo() -> (TempDir, PathBuf) {
    let root = TempDir::new().expect("Failed to create temp dir");
    let repo = root.path().join("empty");
    git(root.path(), &["-c", "init.defaultBranch=main", "init", "empty"]);
    configure_identity(&repo);
    (root, repo)
}

fn configure_identity(repo: &Path) {
    git(repo, &["config", "user.name", "keva"]);
    git(repo, &["config", "user.email", "keva@example.com"]);
}
