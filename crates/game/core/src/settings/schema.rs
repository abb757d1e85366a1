//! The static settings schema.
//!
//! The schema is process-wide data: a tree of categories whose leaves carry
//! a type, optional inclusive bounds, a default, and a nullability flag.
//! Per-game overrides are validated against it at the two entry points
//! ([`parse`](super::parse) and [`verify`](super::verify)) and layered over
//! the defaults on read.

use std::fmt;
use std::sync::LazyLock;

use crate::color::HexColor;
use crate::settings::value::{SettingValue, TimeOfDay};

/// The declared type of a setting leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SettingType {
    Int,
    Color,
    Time,
}

/// Inclusive numeric bounds; either end may be open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub low: Option<i64>,
    pub high: Option<i64>,
}

impl Bounds {
    pub const fn closed(low: i64, high: i64) -> Self {
        Self {
            low: Some(low),
            high: Some(high),
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, value: i64) -> bool {
        self.low.is_none_or(|low| low <= value) && self.high.is_none_or(|high| value <= high)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.low, self.high) {
            (Some(low), Some(high)) => write!(f, "between {low} and {high}"),
            (Some(low), None) => write!(f, "{low} or greater"),
            (None, Some(high)) => write!(f, "{high} or less"),
            (None, None) => write!(f, "unbounded"),
        }
    }
}

/// One setting leaf.
#[derive(Clone, Debug)]
pub struct Setting {
    pub description: &'static str,
    pub ty: SettingType,
    pub bounds: Option<Bounds>,
    pub default: SettingValue,
    pub allow_null: bool,
}

/// A group of related settings.
#[derive(Clone, Debug)]
pub struct Category {
    pub description: &'static str,
    pub children: Vec<(&'static str, SchemaNode)>,
}

impl Category {
    pub fn child(&self, name: &str) -> Option<&SchemaNode> {
        self.children
            .iter()
            .find(|(child, _)| *child == name)
            .map(|(_, node)| node)
    }
}

/// A node in the schema tree.
#[derive(Clone, Debug)]
pub enum SchemaNode {
    Category(Category),
    Leaf(Setting),
}

fn int_leaf(description: &'static str, bounds: Bounds, default: i64) -> SchemaNode {
    SchemaNode::Leaf(Setting {
        description,
        ty: SettingType::Int,
        bounds: Some(bounds),
        default: SettingValue::Int(default),
        allow_null: false,
    })
}

fn color_leaf(description: &'static str, default: HexColor) -> SchemaNode {
    SchemaNode::Leaf(Setting {
        description,
        ty: SettingType::Color,
        bounds: None,
        default: SettingValue::Color(default),
        allow_null: false,
    })
}

static SCHEMA: LazyLock<SchemaNode> = LazyLock::new(|| {
    SchemaNode::Category(Category {
        description: "All Tank Tactics settings.",
        children: vec![
            (
                "gameplay",
                SchemaNode::Category(Category {
                    description: "Rules governing the flow of the game.",
                    children: vec![
                        (
                            "minimum_players",
                            int_leaf(
                                "The number of players required before the game can start.",
                                Bounds::closed(2, 196),
                                3,
                            ),
                        ),
                        (
                            "maximum_players",
                            SchemaNode::Leaf(Setting {
                                description: "The roster size at which the game starts \
                                              automatically. Null disables the cap.",
                                ty: SettingType::Int,
                                bounds: Some(Bounds::closed(2, 196)),
                                default: SettingValue::Null,
                                allow_null: true,
                            }),
                        ),
                        (
                            "initial_health",
                            int_leaf(
                                "The health every tank starts with.",
                                Bounds::closed(1, 100),
                                3,
                            ),
                        ),
                        (
                            "initial_actions",
                            int_leaf(
                                "The action points every tank starts with.",
                                Bounds::closed(0, 100),
                                1,
                            ),
                        ),
                        (
                            "daily_actions",
                            int_leaf(
                                "Action points granted to every alive tank each daily cycle.",
                                Bounds::closed(0, 100),
                                1,
                            ),
                        ),
                        (
                            "action_grant_time",
                            SchemaNode::Leaf(Setting {
                                description: "The time of day at which the daily cycle fires.",
                                ty: SettingType::Time,
                                bounds: None,
                                default: SettingValue::Time(TimeOfDay {
                                    hour: 12,
                                    minute: 0,
                                }),
                                allow_null: false,
                            }),
                        ),
                        (
                            "fire_range",
                            int_leaf(
                                "The maximum Chebyshev distance a tank can fire across.",
                                Bounds::closed(1, 100),
                                3,
                            ),
                        ),
                        (
                            "jury_votes_required",
                            int_leaf(
                                "Jury votes a survivor needs to receive a bonus action point.",
                                Bounds::closed(1, 100),
                                3,
                            ),
                        ),
                        (
                            "personal_space_size",
                            int_leaf(
                                "Side length of the square spawn region reserved per player.",
                                Bounds::closed(1, 100),
                                4,
                            ),
                        ),
                    ],
                }),
            ),
            (
                "board",
                SchemaNode::Category(Category {
                    description: "Presentation of the rendered board image.",
                    children: vec![
                        (
                            "cell_size",
                            int_leaf(
                                "Pixel size of one quadrant of a board cell.",
                                Bounds::closed(1, 64),
                                16,
                            ),
                        ),
                        (
                            "border_width",
                            int_leaf(
                                "Pixel width of the border between cells.",
                                Bounds::closed(0, 16),
                                2,
                            ),
                        ),
                        (
                            "border_color",
                            color_leaf(
                                "Color of the border between cells.",
                                HexColor::rgb(0x00, 0x00, 0x00),
                            ),
                        ),
                        (
                            "empty_cell_color",
                            color_leaf(
                                "Color of a cell with no tank on it.",
                                HexColor::rgb(0xFF, 0xFF, 0xFF),
                            ),
                        ),
                    ],
                }),
            ),
        ],
    })
});

/// The schema root.
pub fn root() -> &'static SchemaNode {
    &SCHEMA
}
