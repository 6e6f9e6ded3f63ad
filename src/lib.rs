//! This crate keeps a local tree of the organizers (calendars, task lists) of a collaboration-suite account.
//!
//! The tree lives in an [`OrganizerTree`](tree::OrganizerTree), that is only ever changed by notifications from the server. \
//! Organizer nodes can send requests (rename, move, change free/busy setting...) through an [`OrganizerTransport`](traits::OrganizerTransport), usually a [`Client`](client::Client). \
//! These requests do not change the local tree: their effect is applied once the server notifies it, see the [`notify`] module.
//!
//! Because the connection to the server may be slow, this crate also provides a local snapshot of the tree in the [`cache`] module.

pub mod traits;
pub mod error;
pub use error::OrganizerError;

pub mod organizer;
pub use organizer::{OrganizerId, OrganizerKind, ViewType, IconKey};
pub use organizer::node::OrganizerNode;
pub use organizer::color::Color;
pub use organizer::share::{Permissions, Share};
pub mod tree;
pub use tree::OrganizerTree;
pub mod event;
pub mod payload;
pub use payload::FolderPayload;
pub mod notify;

pub mod client;
pub mod cache;
pub mod app;

pub mod mock_behaviour;
pub mod mock_transport;

pub mod config;
pub mod utils;
