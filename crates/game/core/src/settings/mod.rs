//! Typed, schema-validated game settings.
//!
//! Settings are read far more often than written, so the cheap paths
//! ([`resolve`], [`get`]) never validate. Validation happens at exactly two
//! entry points: [`parse`] for user-supplied strings and [`verify`] /
//! [`validate_overrides`] for persisted values at load time. [`set`] writes
//! unconditionally; callers must validate first.

pub mod schema;
mod value;

use std::fmt;
use std::str::FromStr;

use serde_json::Value as Json;

pub use schema::{Bounds, Category, SchemaNode, Setting, SettingType};
pub use value::{SettingValue, TimeOfDay};

/// A game's stored overrides: a JSON object tree mirroring the schema,
/// holding only the values that differ from the defaults.
pub type Overrides = Json;

/// An empty override tree.
pub fn empty_overrides() -> Overrides {
    Json::Object(serde_json::Map::new())
}

/// A dotted settings path; the empty path names the schema root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SettingsPath(Vec<String>);

impl SettingsPath {
    pub const ROOT: Self = Self(Vec::new());

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn join(&self, segment: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_owned());
        Self(segments)
    }
}

impl fmt::Display for SettingsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for SettingsPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(
            s.split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect(),
        ))
    }
}

/// Failures when resolving or validating settings.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("setting `{path}` does not exist")]
    NotFound { path: SettingsPath },

    #[error("setting `{path}` does not allow null")]
    NullNotAllowed { path: SettingsPath },

    #[error("invalid type for setting `{path}`: expected {expected}, got `{actual}`")]
    WrongType {
        path: SettingsPath,
        expected: SettingType,
        actual: String,
    },

    #[error("value for setting `{path}` is out of bounds: expected {bounds}, got {actual}")]
    OutOfBounds {
        path: SettingsPath,
        bounds: Bounds,
        actual: i64,
    },
}

/// Resolves a path against the schema. The empty path yields the root;
/// traversal stops with `None` the moment a segment is absent.
pub fn resolve(path: &SettingsPath) -> Option<&'static SchemaNode> {
    let mut node = schema::root();
    for segment in path.segments() {
        match node {
            SchemaNode::Category(category) => node = category.child(segment)?,
            SchemaNode::Leaf(_) => return None,
        }
    }
    Some(node)
}

/// Resolves a path that must name a leaf.
fn leaf(path: &SettingsPath) -> Result<&'static Setting, SettingsError> {
    match resolve(path) {
        Some(SchemaNode::Leaf(setting)) => Ok(setting),
        _ => Err(SettingsError::NotFound { path: path.clone() }),
    }
}

fn stored<'a>(overrides: &'a Overrides, path: &SettingsPath) -> Option<&'a Json> {
    let mut node = overrides;
    for segment in path.segments() {
        node = node.as_object()?.get(segment)?;
    }
    Some(node)
}

/// Returns the game's stored override if present, else the schema leaf's
/// default, else `None` (unknown path or category).
pub fn get(overrides: &Overrides, path: &SettingsPath) -> Option<SettingValue> {
    let setting = leaf(path).ok()?;
    if let Some(json) = stored(overrides, path)
        && let Some(value) = SettingValue::from_json(setting.ty, json)
    {
        return Some(value);
    }
    Some(setting.default.clone())
}

fn bounds_check(
    setting: &Setting,
    path: &SettingsPath,
    value: &SettingValue,
) -> Result<(), SettingsError> {
    if let (Some(bounds), Some(actual)) = (setting.bounds, value.as_int())
        && !bounds.contains(actual)
    {
        return Err(SettingsError::OutOfBounds {
            path: path.clone(),
            bounds,
            actual,
        });
    }
    Ok(())
}

/// Parses a user-supplied string into a validated value for the leaf at
/// `path`. The literal `"null"` (or an empty string) is null, accepted only
/// on nullable leaves.
pub fn parse(path: &SettingsPath, raw: &str) -> Result<SettingValue, SettingsError> {
    let setting = leaf(path)?;

    let raw = raw.trim();
    if raw.is_empty() || raw == "null" {
        if setting.allow_null {
            return Ok(SettingValue::Null);
        }
        return Err(SettingsError::NullNotAllowed { path: path.clone() });
    }

    let wrong_type = || SettingsError::WrongType {
        path: path.clone(),
        expected: setting.ty,
        actual: raw.to_owned(),
    };
    let value = match setting.ty {
        SettingType::Int => SettingValue::Int(raw.parse().map_err(|_| wrong_type())?),
        SettingType::Color => SettingValue::Color(raw.parse().map_err(|_| wrong_type())?),
        SettingType::Time => SettingValue::Time(raw.parse().map_err(|_| wrong_type())?),
    };

    bounds_check(setting, path, &value)?;
    Ok(value)
}

/// Validates an already-typed (persisted) JSON value against the leaf at
/// `path`. Same checks as [`parse`], used when loading a game from disk.
pub fn verify(path: &SettingsPath, json: &Json) -> Result<SettingValue, SettingsError> {
    let setting = leaf(path)?;

    let value = SettingValue::from_json(setting.ty, json).ok_or_else(|| {
        SettingsError::WrongType {
            path: path.clone(),
            expected: setting.ty,
            actual: json.to_string(),
        }
    })?;

    if value.is_null() {
        if setting.allow_null {
            return Ok(value);
        }
        return Err(SettingsError::NullNotAllowed { path: path.clone() });
    }

    bounds_check(setting, path, &value)?;
    Ok(value)
}

/// Unconditionally writes a value into the override tree, auto-creating
/// intermediate category objects. No validation is performed; callers must
/// run the value through [`parse`] or [`verify`] first.
pub fn set(overrides: &mut Overrides, path: &SettingsPath, value: SettingValue) {
    if !overrides.is_object() {
        *overrides = empty_overrides();
    }
    let Some((last, parents)) = path.segments().split_last() else {
        return;
    };

    let mut node = overrides;
    for segment in parents {
        // Nodes along the path are objects: the root is ensured above and
        // every child is replaced with an object before descending.
        let Some(object) = node.as_object_mut() else {
            return;
        };
        let child = object
            .entry(segment.clone())
            .or_insert_with(empty_overrides);
        if !child.is_object() {
            *child = empty_overrides();
        }
        node = child;
    }
    if let Some(object) = node.as_object_mut() {
        object.insert(last.clone(), value.to_json());
    }
}

/// Validates every leaf of a persisted override tree against the schema.
///
/// Unknown paths are tolerated (schema evolution): they are collected and
/// returned so the caller can log them. The first type, bounds, or null
/// violation fails the whole validation. Every sibling category is visited;
/// the walk never stops at the first subcategory of a level.
pub fn validate_overrides(overrides: &Overrides) -> Result<Vec<SettingsPath>, SettingsError> {
    let mut unknown = Vec::new();
    if let Some(object) = overrides.as_object() {
        validate_level(object, &SettingsPath::ROOT, &mut unknown)?;
    }
    Ok(unknown)
}

fn validate_level(
    object: &serde_json::Map<String, Json>,
    prefix: &SettingsPath,
    unknown: &mut Vec<SettingsPath>,
) -> Result<(), SettingsError> {
    for (key, json) in object {
        let path = prefix.join(key);
        match resolve(&path) {
            Some(SchemaNode::Category(_)) => match json.as_object() {
                Some(children) => validate_level(children, &path, unknown)?,
                None => unknown.push(path),
            },
            Some(SchemaNode::Leaf(_)) => {
                verify(&path, json)?;
            }
            None => unknown.push(path),
        }
    }
    Ok(())
}

/// Human-readable description of a category (child listing) or a leaf
/// (type, bounds, current and default values).
pub fn describe(overrides: &Overrides, path: &SettingsPath) -> Result<String, SettingsError> {
    let node = resolve(path).ok_or_else(|| SettingsError::NotFound { path: path.clone() })?;

    let mut msg = if path.is_root() {
        "_Settings Root_:\n".to_owned()
    } else {
        format!("`{path}`:\n")
    };

    match node {
        SchemaNode::Category(category) => {
            msg.push_str(category.description);
            msg.push_str("\n**Settings:**\n");
            for (name, child) in &category.children {
                let ty = match child {
                    SchemaNode::Category(_) => "category".to_owned(),
                    SchemaNode::Leaf(setting) => setting.ty.to_string(),
                };
                msg.push_str(&format!("  `{}` ({ty})\n", path.join(name)));
            }
        }
        SchemaNode::Leaf(setting) => {
            msg.push_str(setting.description);
            msg.push_str(&format!("\n**Type Expected:** {}\n", setting.ty));
            if let Some(bounds) = setting.bounds {
                msg.push_str(&format!("**Bounds:** {bounds}\n"));
            }
            if let Some(current) = get(overrides, path) {
                msg.push_str(&format!("**Current value:** {current}\n"));
            }
            msg.push_str(&format!("**Default value:** {}\n", setting.default));
            if setting.allow_null {
                msg.push_str("_This setting allows null values._");
            }
        }
    }
    Ok(msg)
}

/// Fetches an integer setting by schema path.
///
/// Falls back to 0 when the path does not name an integer leaf; all call
/// sites use schema paths with non-null integer defaults, so the fallback is
/// unreachable in practice.
pub fn int(overrides: &Overrides, segments: &[&str]) -> i64 {
    let path = SettingsPath::from_segments(segments.iter().copied());
    get(overrides, &path).and_then(|v| v.as_int()).unwrap_or(0)
}

/// Fetches a nullable integer setting; `None` for a null value.
pub fn int_opt(overrides: &Overrides, segments: &[&str]) -> Option<i64> {
    let path = SettingsPath::from_segments(segments.iter().copied());
    get(overrides, &path)?.as_int()
}

/// Fetches a time-of-day setting by schema path.
pub fn time(overrides: &Overrides, segments: &[&str]) -> Option<TimeOfDay> {
    let path = SettingsPath::from_segments(segments.iter().copied());
    get(overrides, &path)?.as_time()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> SettingsPath {
        s.parse().unwrap()
    }

    #[test]
    fn resolve_walks_categories_and_leaves() {
        assert!(matches!(
            resolve(&SettingsPath::ROOT),
            Some(SchemaNode::Category(_))
        ));
        assert!(matches!(
            resolve(&path("gameplay")),
            Some(SchemaNode::Category(_))
        ));
        assert!(matches!(
            resolve(&path("gameplay.fire_range")),
            Some(SchemaNode::Leaf(_))
        ));
        assert!(resolve(&path("gameplay.nonsense")).is_none());
        assert!(resolve(&path("gameplay.fire_range.deeper")).is_none());
    }

    #[test]
    fn get_falls_back_to_default() {
        let overrides = empty_overrides();
        assert_eq!(
            get(&overrides, &path("gameplay.fire_range")),
            Some(SettingValue::Int(3))
        );
        assert_eq!(
            get(&overrides, &path("gameplay.maximum_players")),
            Some(SettingValue::Null)
        );
        assert_eq!(get(&overrides, &path("gameplay")), None);
        assert_eq!(get(&overrides, &path("bogus")), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut overrides = empty_overrides();
        let p = path("gameplay.fire_range");
        let value = parse(&p, "5").unwrap();
        set(&mut overrides, &p, value.clone());
        assert_eq!(get(&overrides, &p), Some(value));
    }

    #[test]
    fn set_round_trips_a_zero_value() {
        // Zero is falsy in the original implementation; the typed tree must
        // not fall through to the default.
        let mut overrides = empty_overrides();
        let p = path("gameplay.daily_actions");
        set(&mut overrides, &p, parse(&p, "0").unwrap());
        assert_eq!(get(&overrides, &p), Some(SettingValue::Int(0)));
    }

    #[test]
    fn parse_rejects_wrong_type_and_bounds() {
        let p = path("gameplay.fire_range");
        assert_eq!(parse(&p, "7"), Ok(SettingValue::Int(7)));
        assert!(matches!(
            parse(&p, "far"),
            Err(SettingsError::WrongType { .. })
        ));
        // Bounds are inclusive on both ends.
        assert_eq!(parse(&p, "1"), Ok(SettingValue::Int(1)));
        assert_eq!(parse(&p, "100"), Ok(SettingValue::Int(100)));
        assert!(matches!(
            parse(&p, "0"),
            Err(SettingsError::OutOfBounds { .. })
        ));
        assert!(matches!(
            parse(&p, "101"),
            Err(SettingsError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn parse_null_honors_nullability() {
        assert_eq!(
            parse(&path("gameplay.maximum_players"), "null"),
            Ok(SettingValue::Null)
        );
        assert_eq!(
            parse(&path("gameplay.maximum_players"), ""),
            Ok(SettingValue::Null)
        );
        assert!(matches!(
            parse(&path("gameplay.fire_range"), "null"),
            Err(SettingsError::NullNotAllowed { .. })
        ));
    }

    #[test]
    fn parse_color_and_time_leaves() {
        assert!(matches!(
            parse(&path("board.border_color"), "#a0b1c2"),
            Ok(SettingValue::Color(_))
        ));
        assert!(matches!(
            parse(&path("board.border_color"), "red"),
            Err(SettingsError::WrongType { .. })
        ));
        assert!(matches!(
            parse(&path("gameplay.action_grant_time"), "06:30"),
            Ok(SettingValue::Time(_))
        ));
        assert!(matches!(
            parse(&path("gameplay.action_grant_time"), "25:00"),
            Err(SettingsError::WrongType { .. })
        ));
    }

    #[test]
    fn parse_fails_on_category_or_unknown_path() {
        assert!(matches!(
            parse(&path("gameplay"), "5"),
            Err(SettingsError::NotFound { .. })
        ));
        assert!(matches!(
            parse(&path("does.not.exist"), "5"),
            Err(SettingsError::NotFound { .. })
        ));
    }

    #[test]
    fn verify_checks_persisted_values() {
        assert!(verify(&path("gameplay.fire_range"), &json!(5)).is_ok());
        assert!(matches!(
            verify(&path("gameplay.fire_range"), &json!("5")),
            Err(SettingsError::WrongType { .. })
        ));
        assert!(matches!(
            verify(&path("gameplay.fire_range"), &json!(0)),
            Err(SettingsError::OutOfBounds { .. })
        ));
        assert!(verify(&path("gameplay.maximum_players"), &json!(null)).is_ok());
        assert!(matches!(
            verify(&path("gameplay.fire_range"), &json!(null)),
            Err(SettingsError::NullNotAllowed { .. })
        ));
    }

    #[test]
    fn validate_overrides_visits_every_sibling_category() {
        // Both top-level categories carry values; a walk that stopped at the
        // first subcategory would miss the invalid board value.
        let overrides = json!({
            "gameplay": { "fire_range": 5 },
            "board": { "cell_size": 0 }
        });
        assert!(matches!(
            validate_overrides(&overrides),
            Err(SettingsError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn validate_overrides_reports_unknown_paths() {
        let overrides = json!({
            "gameplay": { "fire_range": 5, "retired_knob": true },
            "mystery": { "x": 1 }
        });
        let unknown = validate_overrides(&overrides).unwrap();
        assert_eq!(
            unknown,
            vec![path("gameplay.retired_knob"), path("mystery")]
        );
    }

    #[test]
    fn describe_lists_category_children() {
        let overrides = empty_overrides();
        let msg = describe(&overrides, &path("board")).unwrap();
        assert!(msg.contains("`board.cell_size` (int)"));
        assert!(msg.contains("`board.border_color` (color)"));

        let msg = describe(&overrides, &SettingsPath::ROOT).unwrap();
        assert!(msg.contains("`gameplay` (category)"));
    }

    #[test]
    fn describe_shows_leaf_details() {
        let mut overrides = empty_overrides();
        let p = path("gameplay.fire_range");
        set(&mut overrides, &p, SettingValue::Int(9));
        let msg = describe(&overrides, &p).unwrap();
        assert!(msg.contains("**Type Expected:** int"));
        assert!(msg.contains("**Bounds:** between 1 and 100"));
        assert!(msg.contains("**Current value:** 9"));
        assert!(msg.contains("**Default value:** 3"));

        let msg = describe(&overrides, &path("gameplay.maximum_players")).unwrap();
        assert!(msg.contains("_This setting allows null values._"));
    }
}
