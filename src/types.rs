//! Shared types used across the pipeline: layer roles and placements.
//!
//! [`LayerRole`] is ordered by composite z-order, so sorting a list of roles
//! (or using them as `BTreeMap` keys) yields the painting order directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four layer slots an item can fill.
///
/// Variant order is the composite z-order: Screenshot paints first
/// (bottom), Template paints last (top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerRole {
    Screenshot,
    Logo,
    Thumb,
    Template,
}

impl LayerRole {
    /// Painting order, bottom to top.
    pub const COMPOSITE_ORDER: [LayerRole; 4] = [
        LayerRole::Screenshot,
        LayerRole::Logo,
        LayerRole::Thumb,
        LayerRole::Template,
    ];

    /// Roles whose folders contribute base names to the batch.
    ///
    /// Template is resolved from a single configured name instead.
    pub const ITEM_SOURCES: [LayerRole; 3] =
        [LayerRole::Thumb, LayerRole::Screenshot, LayerRole::Logo];

    /// Subfolder of the assets folder holding this role's sources.
    pub fn dir_name(self) -> &'static str {
        match self {
            LayerRole::Screenshot => "screenshot",
            LayerRole::Logo => "logo",
            LayerRole::Thumb => "thumb",
            LayerRole::Template => "template",
        }
    }
}

impl fmt::Display for LayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Resolved top-left coordinate of a layer on the canvas.
///
/// Signed: a layer larger than the canvas clamps to a negative offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
}

impl Placement {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for Placement {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(i64::from(x), i64::from(y))
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorting_roles_yields_composite_order() {
        let mut roles = vec![
            LayerRole::Template,
            LayerRole::Thumb,
            LayerRole::Screenshot,
            LayerRole::Logo,
        ];
        roles.sort();
        assert_eq!(roles, LayerRole::COMPOSITE_ORDER);
    }

    #[test]
    fn template_is_not_an_item_source() {
        assert!(!LayerRole::ITEM_SOURCES.contains(&LayerRole::Template));
    }

    #[test]
    fn role_display_matches_folder_name() {
        assert_eq!(LayerRole::Screenshot.to_string(), "screenshot");
        assert_eq!(LayerRole::Thumb.dir_name(), "thumb");
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&LayerRole::Logo).unwrap();
        assert_eq!(json, "\"logo\"");
    }

    #[test]
    fn placement_from_config_pair() {
        assert_eq!(Placement::from([-10, 25]), Placement::new(-10, 25));
        assert_eq!(Placement::new(3, 4).to_string(), "(3, 4)");
    }
}
