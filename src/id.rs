//! Project identifiers and path escaping.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::TgitError;

/// Identifies a project either by numeric ID or by its namespaced path
/// (e.g. `"my-group/my-project"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProjectId {
    /// Numeric project ID.
    Int(i64),
    /// Project path, escaped when placed into a URL.
    Path(String),
}

impl ProjectId {
    /// The identifier as a single escaped path segment.
    pub fn escaped(&self) -> String {
        match self {
            Self::Int(id) => id.to_string(),
            Self::Path(path) => path_escape(path),
        }
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Path(path) => f.write_str(path),
        }
    }
}

impl From<i64> for ProjectId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for ProjectId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<u64> for ProjectId {
    fn from(id: u64) -> Self {
        match i64::try_from(id) {
            Ok(id) => Self::Int(id),
            Err(_) => Self::Path(id.to_string()),
        }
    }
}

impl From<&str> for ProjectId {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for ProjectId {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<&ProjectId> for ProjectId {
    fn from(id: &ProjectId) -> Self {
        id.clone()
    }
}

/// Digits parse as [`ProjectId::Int`], anything else is a path.
impl FromStr for ProjectId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(Self::Int)
            .unwrap_or_else(|_| Self::Path(s.to_string())))
    }
}

/// Accepts JSON integers and strings; every other value is rejected.
impl TryFrom<Value> for ProjectId {
    type Error = TgitError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(path) => Ok(Self::Path(path)),
            Value::Number(ref n) => {
                if let Some(id) = n.as_i64() {
                    Ok(Self::Int(id))
                } else if let Some(id) = n.as_u64() {
                    Ok(Self::from(id))
                } else {
                    Err(TgitError::InvalidId(value.to_string()))
                }
            }
            other => Err(TgitError::InvalidId(other.to_string())),
        }
    }
}

/// Percent-escape a value for use as one path segment.
///
/// Periods are escaped to `%2E` as well so that identifiers such as
/// `group/my.project` are not split or reinterpreted by the server router.
pub fn path_escape(s: &str) -> String {
    urlencoding::encode(s).replace('.', "%2E")
}
