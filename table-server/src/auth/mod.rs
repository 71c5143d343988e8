//! 认证授权模块
//!
//! Identity is established upstream; requests arrive with `x-user-id` and
//! `x-user-role` headers. This module turns them into a [`CurrentUser`] and
//! gates routes by [`Role`]:
//! - [`identify`] - 解析身份头 (中间件)
//! - [`require_role`] - 角色检查中间件

pub mod extractor;
pub mod middleware;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use middleware::{identify, require_role};

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated role
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Staff role. Managers can do everything staff can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Staff,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Manager => "manager",
        }
    }

    /// Whether this role may act as `required`
    pub fn satisfies(&self, required: Role) -> bool {
        *self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "staff" => Ok(Role::Staff),
            "manager" => Ok(Role::Manager),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(Role::Manager.satisfies(Role::Staff));
        assert!(Role::Staff.satisfies(Role::Staff));
        assert!(!Role::Staff.satisfies(Role::Manager));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(" Manager ".parse::<Role>(), Ok(Role::Manager));
        assert!("admin".parse::<Role>().is_err());
    }
}
