pub mod direction;
pub mod signal;
pub mod trade;

pub use direction::{Direction, LifecycleState};
pub use signal::{EntryZone, RawMessage, StructuredSignal, TradeEvent};
pub use trade::{MetadataUpdate, TradeKey, TradeMetadata, TradeRecord};
