use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The raw identifier text.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of a player.
    PlayerId
);
string_id!(
    /// Identifier of a creature (ghost, monkey).
    CreatureId
);
string_id!(
    /// Identifier of an item instance.
    ItemId
);
string_id!(
    /// Identifier of a static item type template.
    ItemTypeId
);
string_id!(
    /// Identifier of a map tile.
    TileId
);
string_id!(
    /// Identifier of a registered item-action hook.
    HookId
);

/// Unique identifier of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, for reproducible worlds.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_ids_display_raw_text() {
        assert_eq!(PlayerId::new("p1").to_string(), "p1");
        assert_eq!(TileId::from("beach").as_str(), "beach");
    }

    #[test]
    fn string_ids_serialize_transparently() {
        let json = serde_json::to_string(&ItemId::new("coconut")).unwrap();
        assert_eq!(json, "\"coconut\"");
        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ItemId::new("coconut"));
    }

    #[test]
    fn session_id_display_is_short() {
        let id = SessionId::from_uuid(Uuid::nil());
        assert_eq!(id.to_string(), "00000000");
    }
}
