//! Wire token registry
//!
//! Every enum the API exchanges as a string token gets one static
//! [`EnumMapping`], built on first use and never mutated afterwards.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// An enum with a fixed wire vocabulary.
///
/// Implementations are normally generated by [`wire_enum!`](crate::wire_enum)
/// or [`wire_flags!`](crate::wire_flags).
pub trait WireEnum: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Every enumerant, in declaration order
    const ALL: &'static [Self];

    /// The process-wide token table for this type
    fn mapping() -> &'static EnumMapping<Self>;

    /// Token sent on the wire for this enumerant
    fn to_wire(self) -> &'static str {
        Self::mapping().to_wire(self)
    }

    /// Resolve a wire token, reporting unmapped tokens instead of failing
    fn from_wire(token: &str) -> Wire<Self> {
        Self::mapping().from_wire(token)
    }
}

/// Bidirectional token table for one enum type
pub struct EnumMapping<T> {
    type_name: &'static str,
    tokens: HashMap<T, &'static str>,
    values: HashMap<&'static str, T>,
    ordinals: HashMap<T, usize>,
}

impl<T: WireEnum> EnumMapping<T> {
    /// Build the table.
    ///
    /// # Panics
    ///
    /// Panics if two enumerants share a token, an enumerant is listed twice,
    /// or an enumerant from `T::ALL` has no token. These are programming
    /// errors in the declaration, not runtime conditions.
    pub fn new(type_name: &'static str, table: &[(T, &'static str)]) -> Self {
        let mut tokens = HashMap::with_capacity(table.len());
        let mut values = HashMap::with_capacity(table.len());

        for &(value, token) in table {
            if let Some(previous) = values.insert(token, value) {
                panic!("{type_name}: wire token '{token}' declared by both {previous:?} and {value:?}");
            }
            if tokens.insert(value, token).is_some() {
                panic!("{type_name}: {value:?} declares more than one wire token");
            }
        }

        let missing: Vec<_> = T::ALL.iter().filter(|v| !tokens.contains_key(*v)).collect();
        if !missing.is_empty() {
            panic!("{type_name}: no wire token declared for {missing:?}");
        }

        let ordinals = T::ALL.iter().enumerate().map(|(i, v)| (*v, i)).collect();

        Self {
            type_name,
            tokens,
            values,
            ordinals,
        }
    }

    /// Name of the enum type this table serves
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Token for an enumerant
    pub fn to_wire(&self, value: T) -> &'static str {
        match self.tokens.get(&value) {
            Some(token) => token,
            // Coverage of T::ALL is checked in `new`.
            None => unreachable!("{}: {value:?} missing from wire table", self.type_name),
        }
    }

    /// Enumerant for a token, or `Wire::Unknown` carrying the raw token
    pub fn from_wire(&self, token: &str) -> Wire<T> {
        match self.values.get(token) {
            Some(value) => Wire::Known(*value),
            None => Wire::Unknown(token.to_string()),
        }
    }

    /// Declaration index of an enumerant
    pub fn ordinal(&self, value: T) -> usize {
        self.ordinals.get(&value).copied().unwrap_or_default()
    }

    /// Number of mapped enumerants
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<T: fmt::Debug> fmt::Debug for EnumMapping<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumMapping")
            .field("type_name", &self.type_name)
            .field("len", &self.tokens.len())
            .finish()
    }
}

/// A decoded wire value: either a mapped enumerant or the raw token the
/// client does not know yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Wire<T> {
    /// Token mapped to a declared enumerant
    Known(T),
    /// Token introduced by the server after this client was built
    Unknown(String),
}

impl<T: WireEnum> Wire<T> {
    /// The enumerant, if the token was mapped
    pub fn known(&self) -> Option<T> {
        match self {
            Wire::Known(value) => Some(*value),
            Wire::Unknown(_) => None,
        }
    }

    /// Whether the token was mapped
    pub fn is_known(&self) -> bool {
        matches!(self, Wire::Known(_))
    }

    /// The token as it appears on the wire
    pub fn token(&self) -> &str {
        match self {
            Wire::Known(value) => value.to_wire(),
            Wire::Unknown(token) => token,
        }
    }
}

impl<T: WireEnum> From<T> for Wire<T> {
    fn from(value: T) -> Self {
        Wire::Known(value)
    }
}

impl<T: WireEnum> fmt::Display for Wire<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl<T: WireEnum> Serialize for Wire<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de, T: WireEnum> Deserialize<'de> for Wire<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(T::from_wire(&token))
    }
}

/// Declare an enum together with its wire tokens.
///
/// ```
/// canvas_client::wire_enum! {
///     /// Grading scheme
///     pub enum Scheme {
///         Points => "points",
///         Percent => "percent",
///     }
/// }
///
/// use canvas_client::wire::WireEnum;
/// assert_eq!(Scheme::Percent.to_wire(), "percent");
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::wire::WireEnum for $name {
            const ALL: &'static [Self] = &[ $( $name::$variant ),+ ];

            fn mapping() -> &'static $crate::wire::EnumMapping<Self> {
                static MAPPING: $crate::wire::__private::Lazy<$crate::wire::EnumMapping<$name>> =
                    $crate::wire::__private::Lazy::new(|| {
                        $crate::wire::EnumMapping::new(
                            stringify!($name),
                            &[ $( ($name::$variant, $token) ),+ ],
                        )
                    });
                &MAPPING
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::wire::WireEnum::to_wire(*self))
            }
        }

        impl $crate::wire::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::wire::__private::serde::Serializer,
            {
                serializer.serialize_str($crate::wire::WireEnum::to_wire(*self))
            }
        }
    };
}
