//! Enumerations carried by design records.
//!
//! Every enumeration travels on the wire as the integer code used by the
//! layout parser. [`TryFrom<i32>`] rejects codes the protocol does not
//! define, and `name()` returns the LEF/DEF keyword for display.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i32", into = "i32")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in wire-code order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the parser wire code.
            pub fn code(self) -> i32 {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            /// Returns the LEF/DEF keyword.
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.code()
            }
        }

        impl TryFrom<i32> for $name {
            type Error = ModelError;

            fn try_from(code: i32) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(ModelError::UnknownCode { kind: $kind, code }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

wire_enum! {
    /// Placement orientation of an instance or row.
    Orientation as "orientation" {
        /// Rotated 0 degrees.
        #[default]
        R0 = 0 => "R0",
        /// Rotated 90 degrees.
        R90 = 1 => "R90",
        /// Rotated 180 degrees.
        R180 = 2 => "R180",
        /// Rotated 270 degrees.
        R270 = 3 => "R270",
        /// Mirrored about the Y axis.
        MY = 4 => "MY",
        /// Mirrored about the Y axis, then rotated 90 degrees.
        MYR90 = 5 => "MYR90",
        /// Mirrored about the X axis.
        MX = 6 => "MX",
        /// Mirrored about the X axis, then rotated 90 degrees.
        MXR90 = 7 => "MXR90",
    }
}

wire_enum! {
    /// Signal direction of a pin.
    PinDirection as "pin direction" {
        #[default]
        Input = 0 => "INPUT",
        Output = 1 => "OUTPUT",
        Inout = 2 => "INOUT",
        Feedthru = 3 => "FEEDTHRU",
    }
}

wire_enum! {
    /// Electrical use of a pin.
    SignalType as "signal type" {
        #[default]
        Signal = 0 => "SIGNAL",
        Power = 1 => "POWER",
        Ground = 2 => "GROUND",
        Clock = 3 => "CLOCK",
        Analog = 4 => "ANALOG",
        Reset = 5 => "RESET",
        Scan = 6 => "SCAN",
        Tieoff = 7 => "TIEOFF",
    }
}

wire_enum! {
    /// Technology layer type.
    LayerKind as "layer type" {
        #[default]
        Routing = 0 => "ROUTING",
        Cut = 1 => "CUT",
        Masterslice = 2 => "MASTERSLICE",
        Overlap = 3 => "OVERLAP",
        Implant = 4 => "IMPLANT",
        Untyped = 5 => "NONE",
    }
}

wire_enum! {
    /// Preferred routing or row direction.
    Direction as "direction" {
        #[default]
        Unset = 0 => "NONE",
        Horizontal = 1 => "HORIZONTAL",
        Vertical = 2 => "VERTICAL",
    }
}

wire_enum! {
    /// Kind of a decoded routing segment.
    EdgeKind as "edge type" {
        #[default]
        Segment = 0 => "SEGMENT",
        TechVia = 1 => "TECHVIA",
        Via = 2 => "VIA",
        Short = 3 => "SHORT",
        VirtualWire = 4 => "VWIRE",
    }
}

wire_enum! {
    /// Class of the master cell an instance is built from.
    MasterType as "master type" {
        #[default]
        Block = 0 => "BLOCK",
        Core = 1 => "CORE",
        Pad = 2 => "PAD",
        Endcap = 3 => "ENDCAP",
    }
}

wire_enum! {
    /// Shape class of a special-net wire.
    WireShapeType as "wire shape type" {
        #[default]
        Unset = 0 => "NONE",
        Ring = 1 => "RING",
        PadRing = 2 => "PADRING",
        BlockRing = 3 => "BLOCKRING",
        Stripe = 4 => "STRIPE",
        FollowPin = 5 => "FOLLOWPIN",
        IoWire = 6 => "IOWIRE",
        CoreWire = 7 => "COREWIRE",
        BlockWire = 8 => "BLOCKWIRE",
        BlockageWire = 9 => "BLOCKAGEWIRE",
        FillWire = 10 => "FILLWIRE",
        DrcFill = 11 => "DRCFILL",
    }
}
