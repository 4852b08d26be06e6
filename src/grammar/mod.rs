//! Static visual grammar: encodings, chart templates, and the read-only
//! grammar/composition tables a resolution is parameterised by.
pub mod chart;
pub mod composition;
pub mod encoding;
pub mod error;
pub mod rulebook;
pub mod table;

pub use chart::{ChartRequirement, ChartType};
pub use composition::{CompositionRule, CompositionTable, TiedOffset};
pub use encoding::{Axis, ChannelClass, Encoding, EncodingMap, EncodingPatch, MarkKind};
pub use error::RulesError;
pub use rulebook::Rulebook;
pub use table::{DataShape, GrammarEntry, GrammarTable, MarkPriority};
