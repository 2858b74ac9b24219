//! Headless horizontal pager.
//!
//! Models the swipe container that hosts the main tab screens: a row of
//! full-width pages, dragged with the finger and settled onto a page when
//! released. Rendering and animation belong to the host; this crate only
//! decides where the row should be and which page is active.
//!
//! The gesture lifecycle is `Idle → Dragging → Settling → Idle`. A pointer
//! that has not yet moved far enough to count as a swipe sits in
//! `Pressed`, so taps never start a drag.

mod config;
mod errors;
mod pager;

pub use config::PagerConfig;
pub use errors::PagerError;
pub use pager::{GestureStart, PageChange, Pager, Phase};
