//! Pure data structures stored by the record actors, plus the catalog types read before
//! checkout.

/// Defines a `u32` newtype id that the store can mint (`From<u32>`) and that displays as
/// `prefix_N`.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

pub mod cash;
pub mod catalog;
pub mod courier;
pub mod customer;
pub mod loyalty;
pub mod money;
pub mod order;
pub mod table;

pub use cash::*;
pub use catalog::*;
pub use courier::*;
pub use customer::*;
pub use loyalty::*;
pub use money::{Money, PointsRate};
pub use order::*;
pub use table::*;
