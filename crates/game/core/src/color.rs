//! The finite palette of tank identities.
//!
//! Every tank is identified by a pairing of two palette colors rendered as
//! the four quadrants of its board cell. A pairing is written `"a/b"`; a bare
//! single color normalizes to the self-pair `"a/a"`. The assignable identity
//! space is the full Cartesian product of the palette with itself.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use strum::IntoEnumIterator;

/// An RGB color in `#rrggbb` form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("expected a #rrggbb hex color")]
pub struct ParseHexColorError(());

impl FromStr for HexColor {
    type Err = ParseHexColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').ok_or(ParseHexColorError(()))?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseHexColorError(()));
        }
        let mut channels = [0u8; 3];
        for (i, channel) in channels.iter_mut().enumerate() {
            *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| ParseHexColorError(()))?;
        }
        Ok(Self(channels))
    }
}

impl serde::Serialize for HexColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for HexColor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A named palette color.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum ColorName {
    Red,
    Lime,
    Blue,
    Yellow,
    Magenta,
    Cyan,
    Green,
    Orange,
    Brown,
    Silver,
    Grey,
    Teal,
    Purple,
    Gold,
}

impl ColorName {
    /// The RGB value this palette name renders as.
    pub const fn hex(self) -> HexColor {
        match self {
            Self::Red => HexColor::rgb(0xFF, 0x00, 0x00),
            Self::Lime => HexColor::rgb(0x00, 0xFF, 0x00),
            Self::Blue => HexColor::rgb(0x00, 0x00, 0xFF),
            Self::Yellow => HexColor::rgb(0xFF, 0xFF, 0x00),
            Self::Magenta => HexColor::rgb(0xFF, 0x00, 0xFF),
            Self::Cyan => HexColor::rgb(0x00, 0xFF, 0xFF),
            Self::Green => HexColor::rgb(0x00, 0x64, 0x00),
            Self::Orange => HexColor::rgb(0xFF, 0x77, 0x00),
            Self::Brown => HexColor::rgb(0x96, 0x4B, 0x00),
            Self::Silver => HexColor::rgb(0xC0, 0xC0, 0xC0),
            Self::Grey => HexColor::rgb(0x80, 0x80, 0x80),
            Self::Teal => HexColor::rgb(0x00, 0x80, 0x80),
            Self::Purple => HexColor::rgb(0x80, 0x00, 0x80),
            Self::Gold => HexColor::rgb(0xFF, 0xD7, 0x00),
        }
    }
}

/// A primary/secondary pairing forming one assignable tank identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColorPair {
    pub primary: ColorName,
    pub secondary: ColorName,
}

impl ColorPair {
    pub const fn new(primary: ColorName, secondary: ColorName) -> Self {
        Self { primary, secondary }
    }

    /// The self-pair `x/x` for a single palette color.
    pub const fn solid(color: ColorName) -> Self {
        Self::new(color, color)
    }
}

impl fmt::Display for ColorPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.primary, self.secondary)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a palette color or color pairing")]
pub struct ParseColorPairError(pub String);

impl FromStr for ColorPair {
    type Err = ParseColorPairError;

    /// Parses `"a/b"` into a pairing; a bare `"a"` normalizes to `a/a`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseColorPairError(s.to_owned());
        match s.split_once('/') {
            Some((a, b)) => {
                let primary = a.trim().parse().map_err(|_| invalid())?;
                let secondary = b.trim().parse().map_err(|_| invalid())?;
                Ok(Self::new(primary, secondary))
            }
            None => {
                let color = s.trim().parse().map_err(|_| invalid())?;
                Ok(Self::solid(color))
            }
        }
    }
}

impl serde::Serialize for ColorPair {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ColorPair {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// All single palette colors.
pub fn all_units() -> impl Iterator<Item = ColorName> {
    ColorName::iter()
}

/// The full assignable identity space: every primary/secondary pairing,
/// self-pairs included.
pub fn all_pairings() -> impl Iterator<Item = ColorPair> {
    ColorName::iter()
        .flat_map(|primary| ColorName::iter().map(move |secondary| ColorPair::new(primary, secondary)))
}

/// Pairings not currently held by any alive player.
pub fn unused<'a, I>(taken: I) -> Vec<ColorPair>
where
    I: IntoIterator<Item = &'a ColorPair>,
{
    let taken: Vec<ColorPair> = taken.into_iter().copied().collect();
    all_pairings().filter(|pair| !taken.contains(pair)).collect()
}

/// Uniformly draws one unused pairing, or `None` when the palette is
/// exhausted.
pub fn random_unused<'a, I, R>(taken: I, rng: &mut R) -> Option<ColorPair>
where
    I: IntoIterator<Item = &'a ColorPair>,
    R: Rng + ?Sized,
{
    let pool = unused(taken);
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.gen_range(0..pool.len())])
}
