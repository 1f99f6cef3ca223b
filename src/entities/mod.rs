// Entity Models
//
// Identity vs values:
// - EndItem identity is (LIN, NSN, serial number)
// - EndItemGroup identity is (LIN, NSN, serialized)
// - Everything else is a value that combine() may fill in, never overwrite

pub mod end_item;
pub mod group;
pub mod mos;
pub mod operator;
pub mod property_book;

pub use end_item::{AccountableComponent, EndItem};
pub use group::{EndItemGroup, GroupKey, OrderBy};
pub use mos::Mos;
pub use operator::{Operator, Rank};
pub use property_book::PropertyBook;
