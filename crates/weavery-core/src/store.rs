//! The `WeaveStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `weavery-store-sqlite`). Higher layers (`weavery-api`, `weavery-server`)
//! depend on this abstraction, not on any concrete backend.
//!
//! Every mutating method is a single atomic unit: it either fully applies
//! (state change plus one event in the durable log) or fully reverts.
//! Backends must serialise mutating calls so that check-then-act sequences
//! (existence checks, index assignment) never interleave.

use std::future::Future;

use crate::{
  entry::{DataHash, WeaveEntry},
  event::RecordedEvent,
  weave::{ActorId, Weave, WeaveId},
};

/// Abstraction over a Weavery registry backend.
///
/// Authorization is part of the contract, not a transport concern: methods
/// taking a `caller` enforce it against the stored authority. The policy is
/// deliberately asymmetric — any caller may append an entry to an active
/// weave, but only the weave's creator may toggle the weave's or an entry's
/// active flag, and only the current owner may transfer ownership. The
/// owner has no override on weave-level operations.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait WeaveStore: Send + Sync {
  type Error: std::error::Error
    + Into<crate::Error>
    + Send
    + Sync
    + 'static;

  // ── Weaves ────────────────────────────────────────────────────────────

  /// Create a weave with a caller-chosen id.
  ///
  /// Fails with `NilWeaveId` for the nil uuid and `WeaveExists` if the id
  /// was ever taken — ids are never freed, even by deactivation. The
  /// caller becomes the weave's creator and the id is appended to the
  /// caller's creator index in the same atomic unit.
  fn create_weave(
    &self,
    caller: ActorId,
    weave_id: WeaveId,
    label: String,
  ) -> impl Future<Output = Result<Weave, Self::Error>> + Send + '_;

  /// Set a weave's active flag. Creator-only.
  ///
  /// Idempotent: setting the current value succeeds and still emits an
  /// event — there is no no-op short-circuit.
  fn set_weave_active(
    &self,
    caller: ActorId,
    weave_id: WeaveId,
    active: bool,
  ) -> impl Future<Output = Result<Weave, Self::Error>> + Send + '_;

  /// Retrieve a weave by id. Returns `None` if not found.
  fn get_weave(
    &self,
    weave_id: WeaveId,
  ) -> impl Future<Output = Result<Option<Weave>, Self::Error>> + Send + '_;

  /// The ids of all weaves created by `creator`, in creation order.
  /// Never fails; unknown identities yield an empty list.
  fn weaves_of(
    &self,
    creator: ActorId,
  ) -> impl Future<Output = Result<Vec<WeaveId>, Self::Error>> + Send + '_;

  // ── Entries — append-only writes ──────────────────────────────────────

  /// Append an entry to a weave's ledger and return the stored record,
  /// including its assigned `entry_index`.
  ///
  /// Not creator-gated: any caller may append to an active weave. Fails
  /// with `WeaveInactive` if the weave's active flag is false, and with
  /// `ZeroDataHash` for the all-zero commitment.
  fn add_entry(
    &self,
    weave_id: WeaveId,
    data_hash: DataHash,
    note: Option<String>,
  ) -> impl Future<Output = Result<WeaveEntry, Self::Error>> + Send + '_;

  /// Set an entry's active flag. Creator-only, regardless of the weave's
  /// own active state.
  fn set_entry_active(
    &self,
    caller: ActorId,
    weave_id: WeaveId,
    entry_index: u64,
    active: bool,
  ) -> impl Future<Output = Result<WeaveEntry, Self::Error>> + Send + '_;

  /// The full entry ledger of a weave, ordered by `entry_index`, inactive
  /// entries included. Callers filter by `is_active` themselves.
  fn get_entries(
    &self,
    weave_id: WeaveId,
  ) -> impl Future<Output = Result<Vec<WeaveEntry>, Self::Error>> + Send + '_;

  // ── Administration ────────────────────────────────────────────────────

  /// The current registry owner.
  fn owner(
    &self,
  ) -> impl Future<Output = Result<ActorId, Self::Error>> + Send + '_;

  /// Replace the registry owner. Owner-only; the nil uuid is rejected.
  fn transfer_ownership(
    &self,
    caller: ActorId,
    new_owner: ActorId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Event log ─────────────────────────────────────────────────────────

  /// All events with a sequence number strictly greater than `after_seq`,
  /// in log order. Pass 0 to read from the beginning.
  fn events_since(
    &self,
    after_seq: u64,
  ) -> impl Future<Output = Result<Vec<RecordedEvent>, Self::Error>> + Send + '_;
}
