//! Value types for scraped matches and the stages they belong to.

mod bracket;
mod fixture;
mod outcome;
mod region;
mod stage;
mod team;

pub use bracket::{Round, Sequence};
pub use fixture::Match;
pub use outcome::{MatchStatus, Score, StatusTransition};
pub use region::Region;
pub use stage::{Stage, StageDef, StageRegistry};
pub use team::Team;
