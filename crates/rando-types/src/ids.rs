//! Type-safe identifier wrappers.
//!
//! Names that come from the host runtime or the catalog (items, locations,
//! scenes, objects, FSMs) are string newtypes so they cannot be mixed up at
//! call sites. Identifiers minted by this workspace (tracker entries, polling
//! tasks) wrap UUID v7 values.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_name {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new name from anything convertible to a [`String`].
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            /// Borrow the name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self(name.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self(name)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_name! {
    /// Catalog name of a grantable item (e.g. `Mantis_Claw`).
    ItemId
}

define_name! {
    /// Catalog name of a location an item can be placed at.
    LocationId
}

define_name! {
    /// Name of a scene (container) in the host runtime.
    SceneName
}

define_name! {
    /// Name of a game object inside a scene.
    ObjectName
}

define_name! {
    /// Name of an FSM component attached to a game object.
    FsmName
}

define_id! {
    /// Unique identifier for a tracker log entry.
    TrackerEntryId
}

define_id! {
    /// Unique identifier for a scheduled polling task.
    PollTaskId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_compare_by_content() {
        let a = ItemId::from("Mantis_Claw");
        let b = ItemId::new(String::from("Mantis_Claw"));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "Mantis_Claw");
        assert_eq!(a.to_string(), "Mantis_Claw");
    }

    #[test]
    fn names_serialize_transparently() {
        let id = LocationId::from("Crossroads_Shiny");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"Crossroads_Shiny\""));
    }

    #[test]
    fn uuid_ids_are_unique() {
        let a = PollTaskId::new();
        let b = PollTaskId::new();
        assert_ne!(a, b);
        assert_ne!(a.into_inner(), Uuid::nil());
    }
}
