//! Strongly typed identifiers.
//!
//! Newtype wrappers around UUIDs for each domain entity. Using distinct
//! types prevents accidental misuse of different ID kinds at compile time:
//! a function taking a `CourseId` cannot be handed a `UserId`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// A string failed to parse as an identifier of the named kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} identifier")]
pub struct ParseIdError {
    /// Which identifier type rejected the input.
    pub kind: &'static str,
    #[source]
    source: uuid::Error,
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// A fresh random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// The raw UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match Uuid::parse_str(s) {
                    Ok(uuid) => Ok(Self(uuid)),
                    Err(source) => Err(ParseIdError {
                        kind: stringify!($name),
                        source,
                    }),
                }
            }
        }
    };
}

entity_id!(
    /// Identifier for user accounts (admins, instructors, students).
    UserId
);

entity_id!(
    /// Identifier for courses.
    CourseId
);

entity_id!(
    /// Identifier for assignments within a course.
    AssignmentId
);

entity_id!(
    /// Identifier for student submissions to an assignment.
    SubmissionId
);
