//! Recipient strip: fit an ordered list of addressee labels into a fixed-width
//! terminal row, collapsing the overflow into a `+N` badge with a hover tooltip.

pub mod config;
pub mod fit;
mod lock;
pub mod measure;
pub mod render;
pub mod resize;
pub mod strip;
pub mod telemetry;
pub mod terminal_restore;
pub mod text;

pub(crate) use lock::lock_or_recover;

pub use config::{AppConfig, ConfigError, StripSettings, UserConfig};
pub use fit::{fit, FitResult, TRUNCATION_MARKER};
pub use measure::{CellSurface, MeasureError, MeasureSurface, WidthMeasurer, DEFAULT_SPACING};
pub use render::{layout_strip, RecipientStripView, StripLayout, StripTheme};
pub use resize::{ResizeBus, ResizeDelivery, ResizeSubscription};
pub use strip::{PresentationState, RecipientStrip};

/// A single addressee label. Opaque text; duplicates are independent entries.
pub type Recipient = String;
