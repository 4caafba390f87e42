//! Macros for defining typed integer identifiers.

/// Macro to define a typed integer newtype.
///
/// This generates a newtype wrapper around a primitive integer with:
/// - A `KIND` constant used in diagnostics
/// - `new()` and `value()` const accessors
/// - `parse()` with whitespace trimming and range checking
/// - `Display`, `FromStr` and `From` conversions
/// - Transparent `Serialize` and `Deserialize` implementations
///
/// # Example
///
/// ```ignore
/// define_id!(HolderId, i64, "holder id");
///
/// let holder = HolderId::new(17);
/// let parsed: HolderId = " 17 ".parse()?;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $repr:ty, $kind:literal) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name($repr);

        impl $name {
            /// Human-readable name of this identifier type.
            pub const KIND: &'static str = $kind;

            /// Wraps a raw value.
            #[must_use]
            pub const fn new(value: $repr) -> Self {
                Self(value)
            }

            /// Returns the underlying value.
            #[must_use]
            pub const fn value(&self) -> $repr {
                self.0
            }

            /// Parses an identifier from text.
            ///
            /// Leading and trailing whitespace is ignored.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err($crate::IdError::Empty { kind: Self::KIND });
                }

                match trimmed.parse::<$repr>() {
                    Ok(value) => Ok(Self(value)),
                    Err(e) => match e.kind() {
                        std::num::IntErrorKind::PosOverflow
                        | std::num::IntErrorKind::NegOverflow => {
                            Err($crate::IdError::OutOfRange {
                                kind: Self::KIND,
                                actual: trimmed.to_string(),
                            })
                        }
                        // u64 rejects a leading '-' as an invalid digit
                        _ if trimmed.starts_with('-')
                            && trimmed[1..].bytes().all(|b| b.is_ascii_digit())
                            && trimmed.len() > 1 =>
                        {
                            Err($crate::IdError::OutOfRange {
                                kind: Self::KIND,
                                actual: trimmed.to_string(),
                            })
                        }
                        _ => Err($crate::IdError::NotANumber {
                            kind: Self::KIND,
                            actual: trimmed.to_string(),
                        }),
                    },
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<$repr> for $name {
            fn from(value: $repr) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $repr {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}
