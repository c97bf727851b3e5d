pub mod direction;
pub mod observation;
pub mod timeframe;

pub use direction::*;
pub use observation::{MethodObservation, MindsetTag, Validation};
pub use timeframe::Timeframe;
