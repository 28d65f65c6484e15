// Library interface for GoldenPace modules
// The CLI in main.rs and the integration tests build on these exports

pub mod config;
pub mod consistency;
pub mod engine;
pub mod equivalence;
pub mod error;
pub mod goal_zones;
pub mod index_chart;
pub mod logging;
pub mod models;
pub mod pr_profile;
pub mod progression;
pub mod time_codec;
pub mod zones;

// Re-export commonly used types for convenience
pub use models::*;
pub use consistency::{ConsistencyIssue, ConsistencyThresholds, ConsistencyValidator};
pub use engine::{Calculation, PaceEngine, ProfileReport};
pub use equivalence::EquivalenceConverter;
pub use goal_zones::{GoalZoneMapper, PrZone, ZonePace};
pub use index_chart::{IndexChart, IndexChartRow, IndexResolver};
pub use pr_profile::{PrProfile, PrProfileBuilder, PrProfileEntry};
pub use progression::{Progression, ProgressionPoint, ProgressionProjector};
pub use time_codec::{format_time, parse_time, RaceTime};
pub use zones::{Zone, ZonePaces, ZoneTable};
pub use error::{GoldenPaceError, Result, TimeFormatError};
pub use logging::{LogConfig, LogLevel, LogFormat};
