pub mod aggregate;
pub mod classify;
pub mod engine;
pub mod error;
pub mod narrate;
pub mod normalize;
pub mod sector;
pub mod types;

pub use aggregate::*;
pub use classify::*;
pub use engine::*;
pub use error::RiskError;
pub use narrate::*;
pub use normalize::*;
pub use sector::Sector;
pub use types::*;
