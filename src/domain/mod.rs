//! Request-scoped domain types.
//!
//! Nothing here outlives a single request: a `PostalCodeRequest` is decoded
//! from the body, validated into a `PostalCode`, and the pipeline ends by
//! building an immutable `WeatherResult`.

pub mod postal_code;
pub mod weather;

pub use postal_code::{is_valid, PostalCode, PostalCodeRequest};
pub use weather::WeatherResult;
