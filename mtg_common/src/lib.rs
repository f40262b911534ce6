//! Shared MTG types used by the deck tooling.
//!
//! Holds the Scryfall card model, the card database collaborator trait and
//! its HTTP implementation, plus the shared error type.

pub mod error;
pub mod scryfall;

pub use error::{ScryfallError, ScryfallResult};
pub use scryfall::{CardDatabase, CardFace, CardRecord, Color, ImageUris, ScryfallClient};
