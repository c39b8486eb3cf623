//! String identifiers for catalog entries.

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

catalog_id!(
    /// Key of a [`MoveDefinition`](super::MoveDefinition).
    MoveId
);
catalog_id!(
    /// Key of a [`CharacterTemplate`](super::CharacterTemplate).
    CharacterId
);
catalog_id!(
    /// Key of an [`EquipmentDescriptor`](super::EquipmentDescriptor).
    EquipmentId
);
catalog_id!(
    /// Key of an [`ItemDefinition`](super::ItemDefinition).
    ItemId
);
