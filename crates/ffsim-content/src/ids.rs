//! String identifiers for cases, stages and choices

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create from any string-like value
            #[inline]
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the raw identifier
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Unique key of a case in the catalog
    CaseId
);

string_id!(
    /// Stage identifier within a case flow
    StageId
);

string_id!(
    /// Choice identifier, unique within one stage
    ChoiceId
);

impl StageId {
    /// Raw id of the distinguished terminal stage closing every flow
    pub const TERMINAL: &'static str = "SUMMARY";

    /// The terminal stage
    #[inline]
    #[must_use]
    pub fn terminal() -> Self {
        Self::from(Self::TERMINAL)
    }

    /// Whether this is the terminal stage
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.0 == Self::TERMINAL
    }
}
