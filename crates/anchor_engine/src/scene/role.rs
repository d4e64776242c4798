//! Figure roles and mixed-role assignment

use std::fmt;

use rand::Rng;
use serde::{Serialize, Deserialize};

/// Occupant role of a placed figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Teacher
    Teacher,
    /// Student
    Student,
    /// Administrator
    Admin,
    /// Visitor
    Visitor,
    /// Staff member
    Staff,
    /// Parent
    Parent,
    /// Custodian
    Custodian,
    /// Anything else
    Other,
}

impl Role {
    /// Every role, in display order
    pub const ALL: [Self; 8] = [
        Self::Teacher,
        Self::Student,
        Self::Admin,
        Self::Visitor,
        Self::Staff,
        Self::Parent,
        Self::Custodian,
        Self::Other,
    ];

    /// Display name, also used for generated figure names
    pub fn name(self) -> &'static str {
        match self {
            Self::Teacher => "Teacher",
            Self::Student => "Student",
            Self::Admin => "Admin",
            Self::Visitor => "Visitor",
            Self::Staff => "Staff",
            Self::Parent => "Parent",
            Self::Custodian => "Custodian",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Draw weights for [`RoleChoice::Mixed`]; they sum to 1.0
pub const MIXED_WEIGHTS: [(Role, f32); 6] = [
    (Role::Student, 0.50),
    (Role::Teacher, 0.15),
    (Role::Admin, 0.05),
    (Role::Staff, 0.10),
    (Role::Visitor, 0.10),
    (Role::Parent, 0.10),
];

/// Role requested for a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleChoice {
    /// Every figure gets this role
    Fixed(Role),
    /// Each figure draws its own role from [`MIXED_WEIGHTS`]
    Mixed,
}

impl RoleChoice {
    /// Pick the role for one figure
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Role {
        match self {
            Self::Fixed(role) => role,
            Self::Mixed => weighted_role(rng.gen()),
        }
    }
}

impl From<Role> for RoleChoice {
    fn from(role: Role) -> Self {
        Self::Fixed(role)
    }
}

/// Map a uniform draw in `[0, 1)` onto the cumulative mixed weights
///
/// Rounding can leave the cumulative sum a hair under 1.0; anything past
/// the last bucket falls back to Student.
fn weighted_role(draw: f32) -> Role {
    let mut cumulative = 0.0;
    for (role, weight) in MIXED_WEIGHTS {
        cumulative += weight;
        if draw <= cumulative {
            return role;
        }
    }
    Role::Student
}
