//! Client for the postal-code weather service.

pub mod client;

pub use client::{LookupOutcome, WeatherClient, WeatherReport};
