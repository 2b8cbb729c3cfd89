//! Route prefixes that select how the gateway resolves the model.

use serde::{Serialize, Serializer};
use std::fmt;

/// URL path prefix in front of a protocol endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoutePrefix {
    /// No prefix; gateway default model
    Default,
    /// `/switch`
    Switch,
    /// `/switch/compat`
    SwitchCompat,
    /// `/{group}`
    Group(String),
    /// `/{group}/compat`
    GroupCompat(String),
}

impl RoutePrefix {
    /// The five prefixes in sweep order.
    pub fn all(group_name: &str) -> [RoutePrefix; 5] {
        [
            RoutePrefix::Default,
            RoutePrefix::Switch,
            RoutePrefix::SwitchCompat,
            RoutePrefix::Group(group_name.to_string()),
            RoutePrefix::GroupCompat(group_name.to_string()),
        ]
    }

    /// Path prefix, empty for [`RoutePrefix::Default`].
    pub fn path(&self) -> String {
        match self {
            RoutePrefix::Default => String::new(),
            RoutePrefix::Switch => "/switch".to_string(),
            RoutePrefix::SwitchCompat => "/switch/compat".to_string(),
            RoutePrefix::Group(name) => format!("/{}", name),
            RoutePrefix::GroupCompat(name) => format!("/{}/compat", name),
        }
    }

    /// Compat routes force OpenAI-style tool calling on the backend.
    pub fn is_compat(&self) -> bool {
        matches!(self, RoutePrefix::SwitchCompat | RoutePrefix::GroupCompat(_))
    }

    /// Display label, `/` for the default route.
    pub fn label(&self) -> String {
        match self {
            RoutePrefix::Default => "/".to_string(),
            other => other.path(),
        }
    }
}

impl fmt::Display for RoutePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for RoutePrefix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}
