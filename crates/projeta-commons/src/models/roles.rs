//! Role enums for global accounts and project membership.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Global account role, attached to every user.
///
/// Serializes to the wire strings "admin", "manager", "developer".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalRole {
    Admin,
    Manager,
    Developer,
}

impl GlobalRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalRole::Admin => "admin",
            GlobalRole::Manager => "manager",
            GlobalRole::Developer => "developer",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(GlobalRole::Admin),
            "manager" => Some(GlobalRole::Manager),
            "developer" => Some(GlobalRole::Developer),
            _ => None,
        }
    }

    /// Admins and managers hold organization-wide management privileges.
    #[inline]
    pub fn is_privileged(&self) -> bool {
        matches!(self, GlobalRole::Admin | GlobalRole::Manager)
    }
}

impl FromStr for GlobalRole {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GlobalRole::from_str_opt(s).ok_or_else(|| format!("Invalid global role: {}", s))
    }
}

impl fmt::Display for GlobalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-project membership role.
///
/// Serializes to the wire strings "viewer", "contributor", "maintainer".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Viewer,
    Contributor,
    Maintainer,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Viewer => "viewer",
            MemberRole::Contributor => "contributor",
            MemberRole::Maintainer => "maintainer",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "viewer" => Some(MemberRole::Viewer),
            "contributor" => Some(MemberRole::Contributor),
            "maintainer" => Some(MemberRole::Maintainer),
            _ => None,
        }
    }

    /// Sort rank for roster listings: maintainers first, then contributors,
    /// then viewers.
    #[inline]
    pub fn sort_rank(&self) -> u8 {
        match self {
            MemberRole::Maintainer => 0,
            MemberRole::Contributor => 1,
            MemberRole::Viewer => 2,
        }
    }
}

impl FromStr for MemberRole {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MemberRole::from_str_opt(s).ok_or_else(|| format!("Invalid member role: {}", s))
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
