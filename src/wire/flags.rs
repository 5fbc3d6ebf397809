//! Flag sets over wire enums
//!
//! Canvas expresses multi-valued options (`include[]`, `submission_types[]`)
//! as a list of tokens. A [`FlagSet`] keeps them as a bitmask keyed by the
//! enumerant's declaration index.

use super::registry::WireEnum;
use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{BitOr, BitOrAssign};
use tracing::debug;

/// Marker for wire enums usable as bit flags (at most 64 enumerants).
pub trait WireFlag: WireEnum {}

/// A set of flags of one type
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagSet<F> {
    bits: u64,
    _marker: PhantomData<F>,
}

impl<F: WireFlag> FlagSet<F> {
    /// The empty set
    pub fn empty() -> Self {
        Self {
            bits: 0,
            _marker: PhantomData,
        }
    }

    /// Every declared flag
    pub fn all() -> Self {
        F::ALL.iter().copied().collect()
    }

    fn bit(flag: F) -> u64 {
        1u64 << F::mapping().ordinal(flag)
    }

    /// Raw bitmask, one bit per declaration index
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Add a flag
    pub fn insert(&mut self, flag: F) {
        self.bits |= Self::bit(flag);
    }

    /// Remove a flag
    pub fn remove(&mut self, flag: F) {
        self.bits &= !Self::bit(flag);
    }

    /// Builder form of [`insert`](Self::insert)
    #[must_use]
    pub fn with(mut self, flag: F) -> Self {
        self.insert(flag);
        self
    }

    /// Check membership
    pub fn contains(&self, flag: F) -> bool {
        self.bits & Self::bit(flag) != 0
    }

    /// Whether no flag is set
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of set flags
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Set flags in declaration order
    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        F::ALL.iter().copied().filter(move |flag| self.contains(*flag))
    }

    /// Union of the flags named by `tokens`; unknown tokens are skipped
    pub fn from_wire<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        for token in tokens {
            let token = token.as_ref();
            match F::from_wire(token).known() {
                Some(flag) => set.insert(flag),
                None => debug!(
                    "Ignoring unmapped {} token '{token}'",
                    F::mapping().type_name()
                ),
            }
        }
        set
    }

    /// One token per set flag, in declaration order
    pub fn to_wire(&self) -> Vec<&'static str> {
        self.iter().map(WireEnum::to_wire).collect()
    }
}

impl<F: WireFlag> Default for FlagSet<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F: WireFlag> From<F> for FlagSet<F> {
    fn from(flag: F) -> Self {
        Self::empty().with(flag)
    }
}

impl<F: WireFlag> FromIterator<F> for FlagSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut set = Self::empty();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

impl<F: WireFlag> BitOr for FlagSet<F> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            bits: self.bits | rhs.bits,
            _marker: PhantomData,
        }
    }
}

impl<F: WireFlag> BitOr<F> for FlagSet<F> {
    type Output = Self;

    fn bitor(self, rhs: F) -> Self {
        self.with(rhs)
    }
}

impl<F: WireFlag> BitOrAssign<F> for FlagSet<F> {
    fn bitor_assign(&mut self, rhs: F) {
        self.insert(rhs);
    }
}

impl<F: WireFlag> fmt::Debug for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.to_wire()).finish()
    }
}

impl<F: WireFlag> Serialize for FlagSet<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tokens = self.to_wire();
        let mut seq = serializer.serialize_seq(Some(tokens.len()))?;
        for token in tokens {
            seq.serialize_element(token)?;
        }
        seq.end()
    }
}

impl<'de, F: WireFlag> Deserialize<'de> for FlagSet<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tokens = Vec::<String>::deserialize(deserializer)?;
        Ok(Self::from_wire(tokens))
    }
}

/// Declare a flag enum: a [`wire_enum!`](crate::wire_enum) whose values
/// combine into a [`FlagSet`].
#[macro_export]
macro_rules! wire_flags {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $crate::wire_enum! {
            $(#[$meta])*
            $vis enum $name {
                $( $(#[$vmeta])* $variant => $token ),+
            }
        }

        const _: () = assert!(
            [$( stringify!($variant) ),+].len() <= 64,
            "flag enums are limited to 64 enumerants"
        );

        impl $crate::wire::WireFlag for $name {}

        impl ::std::ops::BitOr for $name {
            type Output = $crate::wire::FlagSet<$name>;

            fn bitor(self, rhs: Self) -> Self::Output {
                $crate::wire::FlagSet::from(self).with(rhs)
            }
        }
    };
}
