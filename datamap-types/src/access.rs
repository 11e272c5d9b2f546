//! Read/write participation flags for mapped fields.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A bitset of {READ, WRITE}.
///
/// READ fields take part in storage → domain loads, WRITE fields in
/// domain → storage exports. Serialized as a list: `["read", "write"]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Access(u8);

impl Access {
    pub const NONE: Access = Access(0);
    pub const READ: Access = Access(0b01);
    pub const WRITE: Access = Access(0b10);
    pub const READ_WRITE: Access = Access(0b11);

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Builds a set from raw bits, dropping unknown ones.
    #[must_use]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::READ_WRITE.0)
    }

    /// True when every flag in `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Access) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when at least one flag of `other` is set in `self`.
    #[must_use]
    pub const fn intersects(self, other: Access) -> bool {
        self.0 & other.0 != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn names(self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(2);
        if self.contains(Self::READ) {
            names.push("read");
        }
        if self.contains(Self::WRITE) {
            names.push("write");
        }
        names
    }
}

impl BitOr for Access {
    type Output = Access;

    fn bitor(self, rhs: Access) -> Access {
        Access(self.0 | rhs.0)
    }
}

impl BitOrAssign for Access {
    fn bitor_assign(&mut self, rhs: Access) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Access {
    type Output = Access;

    fn bitand(self, rhs: Access) -> Access {
        Access(self.0 & rhs.0)
    }
}

impl fmt::Debug for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Access({})", self.names().join("|"))
    }
}

impl Serialize for Access {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.names().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Access {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        let mut access = Access::NONE;
        for name in names {
            match name.to_ascii_lowercase().as_str() {
                "read" => access |= Access::READ,
                "write" => access |= Access::WRITE,
                other => {
                    return Err(serde::de::Error::unknown_variant(other, &["read", "write"]));
                }
            }
        }
        Ok(access)
    }
}
