//! Core business logic abstractions

pub mod config;
pub mod conversion;
pub mod currency;
pub mod log;
pub mod messages;
pub mod session;

// Re-export main types for cleaner imports
pub use conversion::{ConversionResult, FormatError, convert, parse_amount};
pub use currency::{Currency, RateError, RateSource, RateTable};
pub use messages::{Locale, Messages};
pub use session::{SessionState, UserId};
