// Integration tests for GitCli against real repositories.
// Skipped when no git executable is available.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{empty_repo, git, git_available, Sandbox};
use keva_core::errors::KevaError;
use keva_core::store::{parse_notes_list, NotesBackend};
use keva_git::GitCli;

macro_rules! require_git {
    () => {
        if !git_available() {
            eprintln!("git not available, skipping");
            return;
        }
    };
}

#[test]
fn test_empty_repository_has_empty_history() {
    require_git!();
    let (_root, repo) = empty_repo();
    let cli = GitCli::new(&repo, "origin");

    assert_eq!(cli.log_commits(10).unwrap(), "");
    assert_eq!(cli.notes_list("keva").unwrap(), "");
}

#[test]
fn test_add_show_list() {
    require_git!();
    let sandbox = Sandbox::new();
    let mut cli = GitCli::new(&sandbox.alice, "origin");
    let head = cli.rev_parse_head().unwrap();
    assert_eq!(head.len(), 40);

    cli.notes_add("keva", "{\"events\":[]}\n").unwrap();
    assert_eq!(cli.notes_show("keva", &head).unwrap(), "{\"events\":[]}\n");

    let entries = parse_notes_list(&cli.notes_list("keva").unwrap()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].commit_id, head);
}

#[test]
fn test_show_without_note() {
    require_git!();
    let sandbox = Sandbox::new();
    let cli = GitCli::new(&sandbox.alice, "origin");
    let head = cli.rev_parse_head().unwrap();

    let err = cli.notes_show("keva", &head).unwrap_err();
    assert_eq!(err, KevaError::NoAnnotationPresent { commit_id: head });
}

#[test]
fn test_fetch_before_first_push() {
    require_git!();
    let sandbox = Sandbox::new();
    let mut cli = GitCli::new(&sandbox.alice, "origin");

    let err = cli.fetch_notes("keva", false).unwrap_err();
    assert!(matches!(err, KevaError::NoRemoteRef { .. }), "{:?}", err);
}

#[test]
fn test_push_then_fetch_in_other_clone() {
    require_git!();
    let sandbox = Sandbox::new();
    let mut alice = GitCli::new(&sandbox.alice, "origin");
    let mut bob = GitCli::new(&sandbox.bob, "origin");

    alice.notes_add("keva", "from alice").unwrap();
    alice.push_notes("keva").unwrap();

    bob.fetch_notes("keva", false).unwrap();
    let head = bob.rev_parse_head().unwrap();
    assert_eq!(bob.notes_show("keva", &head).unwrap().trim(), "from alice");
    assert!(git(&sandbox.remote, &["notes", "--ref", "keva", "list"]).contains(&head));
}

#[test]
fn test_diverged_push_and_fetch_are_upstream_changed() {
    require_git!();
    let sandbox = Sandbox::new();
    let mut alice = GitCli::new(&sandbox.alice, "origin");
    let mut bob = GitCli::new(&sandbox.bob, "origin");

    alice.notes_add("keva", "alice").unwrap();
    alice.push_notes("keva").unwrap();

    bob.notes_add("keva", "bob").unwrap();
    let err = bob.push_notes("keva").unwrap_err();
    assert!(err.is_upstream_changed(), "{:?}", err);

    let err = bob.fetch_notes("keva", false).unwrap_err();
    assert!(err.is_upstream_changed(), "{:?}", err);

    bob.fetch_notes("keva", true).unwrap();
    let head = bob.rev_parse_head().unwrap();
    assert_eq!(bob.notes_show("keva", &head).unwrap().trim(), "alice");
}

#[test]
fn test_unknown_remote_is_external_failure() {
    require_git!();
    let sandbox = Sandbox::new();
    let mut cli = GitCli::new(&sandbox.alice, "nowhere");

    let err = cli.fetch_notes("keva", false).unwrap_err();
    assert!(matches!(err, KevaError::ExternalTool { .. }), "{:?}", err);
}
