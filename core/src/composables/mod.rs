//! Reusable stateful helpers for views: form state and validation, a
//! reentrant loading flag, debouncing and click-outside detection.
//!
//! Helpers that hold a listener or timer return a disposer
//! ([`crate::Subscription`] or a handle with a `Drop` impl); dropping it is the
//! teardown.

pub mod click_outside;
pub mod debounce;
pub mod form;
pub mod loading;

pub use click_outside::{ClickOutside, NodeId, NodeTree, PointerEvents};
pub use debounce::{Debounced, Debouncer, DEFAULT_DELAY};
pub use form::{rules, Fields, Form, Rule};
pub use loading::{Loading, LoadingGuard};
