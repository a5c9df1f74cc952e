//! Roadtrip - LLM-backed road trip planner
//!
//! Collects a starting city, destinations with stay durations and travel
//! preferences, asks a language model to order the stops and schedule the
//! days, and renders the returned plan as a timeline or map layers.
//!
//! Routing, scheduling and geocoding are the model's job. Locally this crate
//! owns the itinerary contract, the request/response protocol, the persisted
//! trip state and the views.
//!
//! # Modules
//!
//! - [`domain`] - Destinations, preferences and the itinerary schema
//! - [`schema`] - Structural schema descriptors and validation
//! - [`llm`] - LLM client trait with Gemini and OpenAI implementations
//! - [`prompts`] - Prompt templates
//! - [`planning`] - Request builder, response parser and planner
//! - [`store`] - Persisted destinations, preferences and last plan
//! - [`session`] - Single-flight generation over the store
//! - [`render`] - Timeline and map views
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod planning;
pub mod prompts;
pub mod render;
pub mod schema;
pub mod session;
pub mod store;

pub use config::Config;
pub use domain::{Destination, TripItinerary, TripPreferences};
pub use planning::{InvocationMode, PlanError, Planner};
pub use session::{GenerationState, TripSession};
pub use store::{ItineraryStore, StoreError};
