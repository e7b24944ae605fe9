//! The fixed role set.
//!
//! Every user account carries exactly one role. The set is closed, so it
//! is modeled as an enum rather than free-form role strings.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Account role, in decreasing order of privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Universal override: admins pass every role and ownership check.
    Admin,
    /// May manage the courses they teach and everything beneath them.
    Instructor,
    /// May submit work to courses they are enrolled in.
    Student,
}

impl Role {
    /// Whether this role bypasses ownership and enrollment checks.
    #[must_use]
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    #[must_use]
    pub fn is_instructor(self) -> bool {
        self == Role::Instructor
    }

    #[must_use]
    pub fn is_student(self) -> bool {
        self == Role::Student
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Instructor => write!(f, "instructor"),
            Role::Student => write!(f, "student"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "instructor" => Ok(Role::Instructor),
            "student" => Ok(Role::Student),
            other => Err(format!("unknown role: {other}")),
        }
    }
}
