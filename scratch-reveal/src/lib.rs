//! Scratch-to-reveal card for Scratch & Win
//!
//! A card hides a `PlayOutcome` under an opaque surface. Pointer drags erase
//! circles from the surface; once enough of it is clear the card reveals the
//! result and, after a short delay, runs its completion callback exactly once.

pub mod card;
pub mod config;
pub mod display;
pub mod error;
pub mod surface;

pub use card::{PointerEvent, ProgressTier, RevealState, ScratchCard};
pub use config::RevealConfig;
pub use error::{Result, RevealError};
pub use surface::Surface;
