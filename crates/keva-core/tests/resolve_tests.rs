#![allow(clippy::unwrap_used, clippy::expect_used)]

use keva_core::errors::{KevaError, Result};
use keva_core::mutate::{apply_set, apply_unset};
use keva_core::resolve::{load_snapshot, locate_in, LocatorOutcome};
use keva_core::store::memory::MemoryRepo;
use keva_core::store::NotesBackend;
use keva_core::{KevaConfig, Value};

fn config() -> KevaConfig {
    KevaConfig::default().with_fetch(false)
}

#[test]
fn test_writes_on_successive_commits_accumulate() {
    let mut repo = MemoryRepo::with_commits(1);
    apply_set(&mut repo, "keva", "key", "value").unwrap();
    repo.commit();
    apply_set(&mut repo, "keva", "foo", "bar").unwrap();
    repo.commit();
    apply_unset(&mut repo, "keva", "key").unwrap();

    let snapshot = load_snapshot(&repo, &config()).unwrap();
    assert_eq!(snapshot.len(), 1);

    let source = &repo.ancestor(1).unwrap()[..8];
    assert_eq!(snapshot.get("foo"), Some(&Value::new("bar", source)));
}

#[test]
fn test_max_depth_hides_older_annotations() {
    let mut repo = MemoryRepo::with_commits(1);
    apply_set(&mut repo, "keva", "old", "1").unwrap();
    for _ in 0..3 {
        repo.commit();
    }

    let shallow = config().with_max_depth(2);
    let located = locate_in(&repo, &shallow).unwrap();
    assert_eq!(located.outcome, LocatorOutcome::DepthExhausted);
    assert!(load_snapshot(&repo, &shallow).unwrap().is_empty());

    let deep = config().with_max_depth(3);
    assert_eq!(load_snapshot(&repo, &deep).unwrap().len(), 1);
}

#[test]
fn test_unannotated_history_reaches_root() {
    let repo = MemoryRepo::with_commits(4);
    let located = locate_in(&repo, &config()).unwrap();
    assert_eq!(located.outcome, LocatorOutcome::RootReached);
    assert!(load_snapshot(&repo, &config()).unwrap().is_empty());
}

#[test]
fn test_refs_are_independent() {
    let mut repo = MemoryRepo::with_commits(1);
    apply_set(&mut repo, "keva", "key", "value").unwrap();
    apply_set(&mut repo, "non_default", "foo", "bar").unwrap();

    let default = load_snapshot(&repo, &config()).unwrap();
    let other = load_snapshot(&repo, &config().with_notes_ref("non_default")).unwrap();
    assert!(default.contains_key("key") && !default.contains_key("foo"));
    assert!(other.contains_key("foo") && !other.contains_key("key"));
}

#[test]
fn test_corrupt_annotation_is_fatal() {
    let mut repo = MemoryRepo::with_commits(1);
    let head = repo.rev_parse_head().unwrap();
    repo.put_note("keva", &head, r#"{"events":[{"type":"rename","key":"a"}]}"#);

    let err = load_snapshot(&repo, &config()).unwrap_err();
    assert!(matches!(err, KevaError::UnknownType { .. }));
}

/// Lists every annotation twice
struct DoubledListing(MemoryRepo);

impl NotesBackend for DoubledListing {
    fn fetch_notes(&mut self, notes_ref: &str, force: bool) -> Result<()> {
        self.0.fetch_notes(notes_ref, force)
    }
    fn push_notes(&mut self, notes_ref: &str) -> Result<()> {
        self.0.push_notes(notes_ref)
    }
    fn log_commits(&self, max_count: usize) -> Result<String> {
        self.0.log_commits(max_count)
    }
    fn notes_list(&self, notes_ref: &str) -> Result<String> {
        let listing = self.0.notes_list(notes_ref)?;
        Ok(format!("{}\n{}", listing, listing))
    }
    fn notes_show(&self, notes_ref: &str, commit_id: &str) -> Result<String> {
        self.0.notes_show(notes_ref, commit_id)
    }
    fn notes_add(&mut self, notes_ref: &str, text: &str) -> Result<()> {
        self.0.notes_add(notes_ref, text)
    }
    fn rev_parse_head(&self) -> Result<String> {
        self.0.rev_parse_head()
    }
}

#[test]
fn test_duplicate_listing_fails_fast() {
    let mut repo = MemoryRepo::with_commits(1);
    apply_set(&mut repo, "keva", "key", "value").unwrap();

    let err = load_snapshot(&DoubledListing(repo), &config()).unwrap_err();
    assert!(matches!(err, KevaError::DuplicateAnnotation { .. }));
}
