//! Integration tests for `SqliteStore` against an in-memory database.

use uuid::Uuid;
use weavery_core::{
  entry::DataHash,
  event::WeaveEvent,
  store::WeaveStore,
};

use crate::SqliteStore;

async fn store_with_owner(owner: Uuid) -> SqliteStore {
  SqliteStore::open_in_memory(owner)
    .await
    .expect("in-memory store")
}

async fn store() -> SqliteStore { store_with_owner(Uuid::new_v4()).await }

fn hash(fill: u8) -> DataHash { DataHash::new([fill; 32]) }

// ─── Weave creation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_weave() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let id = Uuid::new_v4();

  let weave = s.create_weave(alice, id, "Docs".into()).await.unwrap();
  assert_eq!(weave.weave_id, id);
  assert_eq!(weave.creator, alice);
  assert_eq!(weave.label, "Docs");
  assert!(weave.is_active);

  let fetched = s.get_weave(id).await.unwrap().unwrap();
  assert_eq!(fetched.weave_id, id);
  assert_eq!(fetched.creator, alice);
  assert_eq!(fetched.label, "Docs");
  assert_eq!(fetched.created_at, weave.created_at);
  assert!(fetched.is_active);
}

#[tokio::test]
async fn get_weave_missing_returns_none() {
  let s = store().await;
  assert!(s.get_weave(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn create_weave_nil_id_rejected() {
  let s = store().await;
  let err = s
    .create_weave(Uuid::new_v4(), Uuid::nil(), "x".into())
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::Core(weavery_core::Error::NilWeaveId)));
}

#[tokio::test]
async fn create_weave_duplicate_conflicts() {
  let s = store().await;
  let id = Uuid::new_v4();

  s.create_weave(Uuid::new_v4(), id, "x".into()).await.unwrap();
  let err = s
    .create_weave(Uuid::new_v4(), id, "x".into())
    .await
    .unwrap_err();
  assert!(
    matches!(err, crate::Error::Core(weavery_core::Error::WeaveExists(got)) if got == id)
  );
}

#[tokio::test]
async fn weave_id_never_freed_by_deactivation() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let id = Uuid::new_v4();

  s.create_weave(alice, id, "x".into()).await.unwrap();
  s.set_weave_active(alice, id, false).await.unwrap();

  // Even the original creator cannot recreate a deactivated id.
  let err = s.create_weave(alice, id, "x".into()).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(weavery_core::Error::WeaveExists(_))
  ));
}

// ─── Weave status ────────────────────────────────────────────────────────────

#[tokio::test]
async fn set_weave_active_requires_creator() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();
  let id = Uuid::new_v4();

  s.create_weave(alice, id, "w1".into()).await.unwrap();

  let err = s.set_weave_active(bob, id, false).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(weavery_core::Error::NotCreator { caller, .. }) if caller == bob
  ));

  let weave = s.set_weave_active(alice, id, false).await.unwrap();
  assert!(!weave.is_active);
}

#[tokio::test]
async fn administrator_has_no_weave_override() {
  let admin = Uuid::new_v4();
  let s = store_with_owner(admin).await;
  let alice = Uuid::new_v4();
  let id = Uuid::new_v4();

  s.create_weave(alice, id, "w1".into()).await.unwrap();

  let err = s.set_weave_active(admin, id, false).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(weavery_core::Error::NotCreator { .. })
  ));

  s.add_entry(id, hash(1), None).await.unwrap();
  let err = s.set_entry_active(admin, id, 0, false).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(weavery_core::Error::NotCreator { .. })
  ));
}

#[tokio::test]
async fn set_weave_active_unknown_weave() {
  let s = store().await;
  let err = s
    .set_weave_active(Uuid::new_v4(), Uuid::new_v4(), true)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(weavery_core::Error::WeaveNotFound(_))
  ));
}

#[tokio::test]
async fn set_weave_active_is_idempotent_and_always_emits() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let id = Uuid::new_v4();

  s.create_weave(alice, id, "w1".into()).await.unwrap();
  let before = s.events_since(0).await.unwrap().len();

  s.set_weave_active(alice, id, true).await.unwrap();
  let weave = s.set_weave_active(alice, id, true).await.unwrap();
  assert!(weave.is_active);

  // Two notifications, no no-op short-circuit.
  let events = s.events_since(0).await.unwrap();
  assert_eq!(events.len(), before + 2);
  assert!(events[before..].iter().all(|rec| matches!(
    rec.event,
    WeaveEvent::WeaveStatusUpdated { is_active: true, .. }
  )));
}

#[tokio::test]
async fn deactivation_is_reversible() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let id = Uuid::new_v4();

  s.create_weave(alice, id, "w1".into()).await.unwrap();
  s.set_weave_active(alice, id, false).await.unwrap();
  let weave = s.set_weave_active(alice, id, true).await.unwrap();
  assert!(weave.is_active);

  // Reactivated weaves accept entries again.
  s.add_entry(id, hash(1), None).await.unwrap();
}

// ─── Entry ledger ────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_entry_assigns_gap_free_indices() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let id = Uuid::new_v4();
  s.create_weave(alice, id, "w1".into()).await.unwrap();

  for expected in 0u64..5 {
    let entry = s
      .add_entry(id, hash(expected as u8 + 1), None)
      .await
      .unwrap();
    assert_eq!(entry.entry_index, expected);
  }

  let entries = s.get_entries(id).await.unwrap();
  let indices: Vec<u64> = entries.iter().map(|e| e.entry_index).collect();
  assert_eq!(indices, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn add_entry_zero_hash_rejected() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let id = Uuid::new_v4();
  s.create_weave(alice, id, "w1".into()).await.unwrap();

  let err = s.add_entry(id, hash(0), None).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(weavery_core::Error::ZeroDataHash)
  ));
  assert!(s.get_entries(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn add_entry_unknown_weave() {
  let s = store().await;
  let err = s.add_entry(Uuid::new_v4(), hash(1), None).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(weavery_core::Error::WeaveNotFound(_))
  ));
}

#[tokio::test]
async fn add_entry_inactive_weave_rejected() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let id = Uuid::new_v4();
  s.create_weave(alice, id, "w1".into()).await.unwrap();
  s.set_weave_active(alice, id, false).await.unwrap();

  let err = s.add_entry(id, hash(1), Some("x".into())).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(weavery_core::Error::WeaveInactive(got)) if got == id
  ));
}

#[tokio::test]
async fn full_history_in_order() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let id = Uuid::new_v4();
  s.create_weave(alice, id, "Docs".into()).await.unwrap();

  // Appends from different callers land in call order — the ledger does not
  // gate on identity.
  let first = s.add_entry(id, hash(0xaa), Some("v1".into())).await.unwrap();
  let second = s.add_entry(id, hash(0xbb), Some("v2".into())).await.unwrap();
  assert_eq!(first.entry_index, 0);
  assert_eq!(second.entry_index, 1);

  let entries = s.get_entries(id).await.unwrap();
  assert_eq!(entries.len(), 2);
  assert_eq!(entries[0].data_hash, hash(0xaa));
  assert_eq!(entries[0].note.as_deref(), Some("v1"));
  assert!(entries[0].is_active);
  assert_eq!(entries[1].data_hash, hash(0xbb));
  assert_eq!(entries[1].note.as_deref(), Some("v2"));
  assert!(entries[1].is_active);
}

#[tokio::test]
async fn get_entries_unknown_weave() {
  let s = store().await;
  let err = s.get_entries(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(weavery_core::Error::WeaveNotFound(_))
  ));
}

// ─── Entry status ────────────────────────────────────────────────────────────

#[tokio::test]
async fn set_entry_active_requires_creator() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();
  let id = Uuid::new_v4();
  s.create_weave(alice, id, "w1".into()).await.unwrap();
  s.add_entry(id, hash(1), None).await.unwrap();

  let err = s.set_entry_active(bob, id, 0, false).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(weavery_core::Error::NotCreator { .. })
  ));

  let entry = s.set_entry_active(alice, id, 0, false).await.unwrap();
  assert!(!entry.is_active);
}

#[tokio::test]
async fn set_entry_active_out_of_range() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let id = Uuid::new_v4();
  s.create_weave(alice, id, "w1".into()).await.unwrap();
  s.add_entry(id, hash(1), None).await.unwrap();

  let err = s.set_entry_active(alice, id, 1, false).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(weavery_core::Error::EntryIndexOutOfRange {
      index: 1,
      len: 1,
      ..
    })
  ));
}

#[tokio::test]
async fn entry_toggle_leaves_history_immutable() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let id = Uuid::new_v4();
  s.create_weave(alice, id, "w1".into()).await.unwrap();

  let first = s.add_entry(id, hash(0xaa), Some("v1".into())).await.unwrap();
  let second = s.add_entry(id, hash(0xbb), Some("v2".into())).await.unwrap();

  s.set_entry_active(alice, id, 0, false).await.unwrap();

  let entries = s.get_entries(id).await.unwrap();
  assert_eq!(entries.len(), 2);

  // Content fields of the toggled entry are untouched.
  assert_eq!(entries[0].entry_index, 0);
  assert_eq!(entries[0].data_hash, first.data_hash);
  assert_eq!(entries[0].note, first.note);
  assert_eq!(entries[0].recorded_at, first.recorded_at);
  assert!(!entries[0].is_active);

  // The sibling entry is untouched entirely.
  assert_eq!(entries[1].data_hash, second.data_hash);
  assert!(entries[1].is_active);

  // And the toggle is reversible.
  let entry = s.set_entry_active(alice, id, 0, true).await.unwrap();
  assert!(entry.is_active);
}

#[tokio::test]
async fn entry_toggle_allowed_on_inactive_weave() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let id = Uuid::new_v4();
  s.create_weave(alice, id, "w1".into()).await.unwrap();
  s.add_entry(id, hash(1), None).await.unwrap();
  s.set_weave_active(alice, id, false).await.unwrap();

  // Entry flags stay creator-toggleable regardless of the weave's state.
  let entry = s.set_entry_active(alice, id, 0, false).await.unwrap();
  assert!(!entry.is_active);
}

// ─── Creator index ───────────────────────────────────────────────────────────

#[tokio::test]
async fn weaves_of_preserves_creation_order() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();
  let w1 = Uuid::new_v4();
  let w2 = Uuid::new_v4();

  s.create_weave(alice, w1, "w1".into()).await.unwrap();
  s.create_weave(alice, w2, "w2".into()).await.unwrap();

  assert_eq!(s.weaves_of(alice).await.unwrap(), vec![w1, w2]);
  assert!(s.weaves_of(bob).await.unwrap().is_empty());
}

#[tokio::test]
async fn creator_index_survives_deactivation() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let id = Uuid::new_v4();

  s.create_weave(alice, id, "w1".into()).await.unwrap();
  s.set_weave_active(alice, id, false).await.unwrap();

  assert_eq!(s.weaves_of(alice).await.unwrap(), vec![id]);
}

// ─── Administration ──────────────────────────────────────────────────────────

#[tokio::test]
async fn transfer_ownership_owner_only() {
  let admin = Uuid::new_v4();
  let s = store_with_owner(admin).await;
  let mallory = Uuid::new_v4();
  let next = Uuid::new_v4();

  assert_eq!(s.owner().await.unwrap(), admin);

  let err = s.transfer_ownership(mallory, next).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(weavery_core::Error::NotOwner(got)) if got == mallory
  ));
  assert_eq!(s.owner().await.unwrap(), admin);

  s.transfer_ownership(admin, next).await.unwrap();
  assert_eq!(s.owner().await.unwrap(), next);

  // The previous owner has lost the authority.
  let err = s.transfer_ownership(admin, Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(weavery_core::Error::NotOwner(_))
  ));
}

#[tokio::test]
async fn transfer_ownership_nil_rejected() {
  let admin = Uuid::new_v4();
  let s = store_with_owner(admin).await;

  let err = s.transfer_ownership(admin, Uuid::nil()).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(weavery_core::Error::NilOwner)
  ));
  assert_eq!(s.owner().await.unwrap(), admin);
}

// ─── Event log ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn one_event_per_mutation_in_order() {
  let admin = Uuid::new_v4();
  let s = store_with_owner(admin).await;
  let alice = Uuid::new_v4();
  let id = Uuid::new_v4();
  let next_owner = Uuid::new_v4();

  let weave = s.create_weave(alice, id, "Docs".into()).await.unwrap();
  let entry = s.add_entry(id, hash(0xcd), Some("v1".into())).await.unwrap();
  s.set_entry_active(alice, id, 0, false).await.unwrap();
  s.set_weave_active(alice, id, false).await.unwrap();
  s.transfer_ownership(admin, next_owner).await.unwrap();

  let events = s.events_since(0).await.unwrap();
  assert_eq!(events.len(), 5);

  // Sequence numbers are strictly increasing.
  for pair in events.windows(2) {
    assert!(pair[0].seq < pair[1].seq);
  }

  assert!(matches!(
    &events[0].event,
    WeaveEvent::WeaveCreated { weave_id, creator, label, created_at }
      if *weave_id == id && *creator == alice && label == "Docs"
        && *created_at == weave.created_at
  ));
  assert!(matches!(
    &events[1].event,
    WeaveEvent::EntryAdded { weave_id, entry_index: 0, data_hash, note, .. }
      if *weave_id == id && *data_hash == entry.data_hash
        && note.as_deref() == Some("v1")
  ));
  assert!(matches!(
    events[2].event,
    WeaveEvent::EntryStatusUpdated { entry_index: 0, is_active: false, .. }
  ));
  assert!(matches!(
    events[3].event,
    WeaveEvent::WeaveStatusUpdated { is_active: false, .. }
  ));
  assert!(matches!(
    events[4].event,
    WeaveEvent::OwnershipTransferred { previous_owner, new_owner }
      if previous_owner == admin && new_owner == next_owner
  ));
}

#[tokio::test]
async fn failed_operations_emit_nothing() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let id = Uuid::new_v4();
  s.create_weave(alice, id, "w1".into()).await.unwrap();
  let baseline = s.events_since(0).await.unwrap().len();

  let _ = s.create_weave(alice, id, "dup".into()).await.unwrap_err();
  let _ = s.add_entry(id, hash(0), None).await.unwrap_err();
  let _ = s
    .set_weave_active(Uuid::new_v4(), id, false)
    .await
    .unwrap_err();
  let _ = s.set_entry_active(alice, id, 0, false).await.unwrap_err();

  assert_eq!(s.events_since(0).await.unwrap().len(), baseline);
}

#[tokio::test]
async fn events_since_skips_consumed_prefix() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let w1 = Uuid::new_v4();
  let w2 = Uuid::new_v4();

  s.create_weave(alice, w1, "w1".into()).await.unwrap();
  let all = s.events_since(0).await.unwrap();
  assert_eq!(all.len(), 1);

  s.create_weave(alice, w2, "w2".into()).await.unwrap();
  let tail = s.events_since(all[0].seq).await.unwrap();
  assert_eq!(tail.len(), 1);
  assert!(matches!(
    &tail[0].event,
    WeaveEvent::WeaveCreated { weave_id, .. } if *weave_id == w2
  ));
}
