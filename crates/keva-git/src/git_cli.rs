use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use keva_core::errors::Result;
use keva_core::store::NotesBackend;

use crate::classify::classify_failure;
use crate::errors::spawn_failure;

/// Runs git in a working tree on behalf of the engine
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
    remote: String,
}

struct Invocation<'a> {
    op: &'a str,
    notes_ref: &'a str,
    commit_id: Option<&'a str>,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>, remote: impl Into<String>) -> Self {
        Self {
            workdir: workdir.into(),
            remote: remote.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    fn notes_refspec(notes_ref: &str, force: bool) -> String {
        format!(
            "{}refs/notes/{}:refs/notes/{}",
            if force { "+" } else { "" },
            notes_ref,
            notes_ref
        )
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("git");
        // Diagnostics are matched on their English text
        cmd.current_dir(&self.workdir).env("LC_ALL", "C");
        cmd
    }

    /// Run git and return stdout, classifying any failure
    fn run(&self, call: Invocation<'_>, args: &[&str]) -> Result<String> {
        let start = Instant::now();
        let output = self
            .command()
            .args(args)
            .output()
            .map_err(|e| spawn_failure(call.op, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!(
            op = call.op,
            notes_ref = call.notes_ref,
            status = ?output.status.code(),
            duration_ms = start.elapsed().as_millis() as u64,
            "git {}",
            args.join(" ")
        );

        if output.status.success() {
            return Ok(stdout);
        }

        let combined = format!("{}{}", stdout, String::from_utf8_lossy(&output.stderr));
        Err(classify_failure(
            call.op,
            call.notes_ref,
            call.commit_id,
            &combined,
        ))
    }

    fn has_head(&self) -> Result<bool> {
        let status = self
            .command()
            .args(["rev-parse", "--verify", "--quiet", "HEAD"])
            .output()
            .map_err(|e| spawn_failure("rev_parse_head", e))?
            .status;
        Ok(status.success())
    }
}

impl NotesBackend for GitCli {
    fn fetch_notes(&mut self, notes_ref: &str, force: bool) -> Result<()> {
        let refspec = Self::notes_refspec(notes_ref, force);
        self.run(
            Invocation {
                op: "fetch_notes",
                notes_ref,
                commit_id: None,
            },
            &["fetch", "--no-tags", self.remote.as_str(), refspec.as_str()],
        )
        .map(|_| ())
    }

    fn push_notes(&mut self, notes_ref: &str) -> Result<()> {
        let refspec = Self::notes_refspec(notes_ref, false);
        self.run(
            Invocation {
                op: "push_notes",
                notes_ref,
                commit_id: None,
            },
            &["push", self.remote.as_str(), refspec.as_str()],
        )
        .map(|_| ())
    }

    fn log_commits(&self, max_count: usize) -> Result<String> {
        // A repository without commits has an empty history, not a broken one
        if !self.has_head()? {
            return Ok(String::new());
        }
        let max_count = format!("--max-count={}", max_count);
        self.run(
            Invocation {
                op: "log_commits",
                notes_ref: "",
                commit_id: None,
            },
            &["log", max_count.as_str(), "--pretty=format:%H"],
        )
    }

    fn notes_list(&self, notes_ref: &str) -> Result<String> {
        self.run(
            Invocation {
                op: "notes_list",
                notes_ref,
                commit_id: None,
            },
            &["notes", "--ref", notes_ref, "list"],
        )
    }

    fn notes_show(&self, notes_ref: &str, commit_id: &str) -> Result<String> {
        self.run(
            Invocation {
                op: "notes_show",
                notes_ref,
                commit_id: Some(commit_id),
            },
            &["notes", "--ref", notes_ref, "show", commit_id],
        )
    }

    fn notes_add(&mut self, notes_ref: &str, text: &str) -> Result<()> {
        self.run(
            Invocation {
                op: "notes_add",
                notes_ref,
                commit_id: None,
            },
            &["notes", "--ref", notes_ref, "add", "-f", "-m", text],
        )
        .map(|_| ())
    }

    fn rev_parse_head(&self) -> Result<String> {
        self.run(
            Invocation {
                op: "rev_parse_head",
                notes_ref: "",
                commit_id: None,
            },
            &["rev-parse", "HEAD"],
        )
        .map(|out| out.trim().to_string())
    }
}
