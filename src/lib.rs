//! Client-side core for the posting application.
//!
//! Two collaborating components own the state with real invariants:
//! [`application::likes::use_case::LikeReconciler`] keeps the current user's
//! liked set and per-post like counters consistent across optimistic local
//! edits, server responses, and authentication transitions;
//! [`application::feed::use_case::FeedPager`] drives the paginated post list
//! with infinite-scroll semantics. Both talk to the backend through the
//! [`infrastructure::api::traits::PostsApi`] seam and read identity from an
//! injected [`domain::session::entity::Session`]. The crate renders nothing;
//! the UI collaborator reads snapshots and invokes operations.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
