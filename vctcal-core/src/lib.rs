//! Core library for vctcal.
//!
//! Keeps a VCT match calendar in step with a changing schedule source:
//! - `identity` derives stable event ids from a match's bracket position
//! - `merge` applies fetched matches to a calendar in generate, append or update mode
//! - `ics` reads and writes the calendar file
//! - `sync` fetches several stages and merges them in a fixed order

pub mod config;
pub mod constants;
pub mod detect;
pub mod document;
pub mod error;
pub mod event;
pub mod ics;
pub mod identity;
pub mod merge;
pub mod model;
pub mod season;
pub mod source;
pub mod sync;

pub use config::VctConfig;
pub use document::CalendarDocument;
pub use error::{VctError, VctResult};
pub use event::Event;
pub use identity::{EventId, IdentityScheme, MatchKey};
pub use merge::{MergeEngine, MergeMode, MergeReport};
pub use season::Season;
pub use source::MatchSource;
