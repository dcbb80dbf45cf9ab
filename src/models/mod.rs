//! Domain models for Guild Wars 2 Web API resources.
//!
//! These mirror the live `v2` JSON schema exactly; the offline and demo
//! fixtures deserialize through the same types.

pub mod account;
pub mod character;
pub mod guild;
pub mod item;
pub mod world;
pub mod wvw;

pub use account::{Access, Account, Currency, WalletEntry};
pub use character::Character;
pub use guild::{TreasuryItem, TreasuryNeed};
pub use item::{Item, ItemRarity};
pub use world::{World, WorldPopulation};
pub use wvw::{WvwMatch, WvwSides};
