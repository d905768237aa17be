//! # bridge_component
//!
//! Object handles and the small shared vocabulary that both the authoritative
//! simulation and the wire layer speak.
//!
//! This crate provides:
//!
//! - [`Entity`]: opaque `u64` handles to simulated objects.
//! - [`EntityAllocator`]: monotonically increasing handle allocator.
//! - [`ScanState`]: escalate-only knowledge level of an observer.
//! - [`CrewPosition`] and [`CustomFunctionType`]: crew stations and the
//!   scripted affordances attached to them.
//! - [`ShipSystem`], [`AlertLevel`], [`MainScreenSetting`],
//!   [`MainScreenOverlay`]: ship control enums.
//! - [`MissileType`]: weapon tube payloads.
//!
//! Every vocabulary enum is `#[repr(u8)]` and converts to and from its wire
//! byte with [`TryFrom<u8>`].

/// A wire byte did not name any variant of the expected enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value {value}")]
pub struct UnknownVariant {
    /// Name of the enum being decoded.
    pub kind: &'static str,
    /// The offending byte.
    pub value: u8,
}

/// Declares a `#[repr(u8)]` enum with wire conversions.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl $name {
            /// Every variant, in wire order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The byte this variant is encoded as.
            #[must_use]
            pub const fn to_wire(self) -> u8 {
                self as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = $crate::UnknownVariant;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $(v if v == $value => Ok($name::$variant),)+
                    _ => Err($crate::UnknownVariant {
                        kind: stringify!($name),
                        value,
                    }),
                }
            }
        }
    };
}

pub mod crew;
pub mod entity;
pub mod scan;
pub mod systems;
pub mod weapons;

pub use crew::{CrewPosition, CustomFunctionType};
pub use entity::{Entity, EntityAllocator};
pub use scan::ScanState;
pub use systems::{AlertLevel, MainScreenOverlay, MainScreenSetting, ShipSystem};
pub use weapons::MissileType;
