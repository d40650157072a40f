//! Rust client for the USDA Food Composition Databases (NDB) API.
//!
//! The client posts JSON parameter bodies to the four NDB endpoints (`list`,
//! `nutrients`, `V2/reports`, `search`) and decodes the typed responses.
//! Every call takes a [`Context`] that can cancel it or give it a deadline.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use usda::{Client, Context};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), usda::Error> {
//!     let client = Client::builder("your-api-key").build()?;
//!     let ctx = Context::new();
//!
//!     let report = client.basic_food_report(&ctx, "01009").await?;
//!     for entry in &report.foods {
//!         if let Some(food) = &entry.food {
//!             println!("{} ({} nutrients)", food.desc.name, food.nutrients.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod context;
mod convenience;
mod error;
mod options;
mod types;
mod version;

pub use client::{Client, ClientBuilder};
pub use context::Context;
pub use convenience::Presets;
pub use error::{Error, Result};
pub use options::{add_query_options, QueryOptions};
pub use types::*;
pub use version::SDK_VERSION;
