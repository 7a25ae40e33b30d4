use crate::error::{JobError, JobResult};
use serde::de::{self, Deserializer, MapAccess, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single hyperparameter value. Only scalars are accepted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HyperValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl HyperValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }

    /// Integer view. Strings holding an integer are accepted, since training
    /// platforms often pass every hyperparameter as a string.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Str(s) => s.trim().parse().ok(),
            Self::Bool(_) | Self::Float(_) => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Str(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            Self::Str(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Self::Str(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for HyperValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v:?}"),
        }
    }
}

/// Supported on-disk formats for the hyperparameter file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` selects TOML; everything else is read as JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Read-only set of hyperparameters, ordered by key.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct HyperparameterSet {
    values: BTreeMap<String, HyperValue>,
    #[serde(skip)]
    source: PathBuf,
}

impl HyperparameterSet {
    /// Parse a document in the given format. The error is a human readable
    /// parse message without the file path.
    pub fn parse(raw: &str, format: ConfigFormat) -> Result<Self, String> {
        match format {
            ConfigFormat::Json => serde_json::from_str(raw).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(raw).map_err(|e| e.message().to_string()),
        }
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&HyperValue> {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HyperValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(HyperValue::as_str)
    }

    pub fn get_i64(&self, key: &str) -> JobResult<Option<i64>> {
        self.typed(key, "an integer", HyperValue::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> JobResult<Option<f64>> {
        self.typed(key, "a number", HyperValue::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> JobResult<Option<bool>> {
        self.typed(key, "a boolean", HyperValue::as_bool)
    }

    fn typed<T>(
        &self,
        key: &str,
        expected: &str,
        view: impl Fn(&HyperValue) -> Option<T>,
    ) -> JobResult<Option<T>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        view(value).map(Some).ok_or_else(|| {
            JobError::config(
                &self.source,
                format!("hyperparameter `{key}` must be {expected}, got {} {value}", value.type_name()),
            )
        })
    }
}

impl fmt::Display for HyperparameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, (key, value)) in self.values.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key:?}: {value}")?;
        }
        f.write_str("}")
    }
}

struct ScalarValue(HyperValue);

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = ScalarValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number or boolean")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ScalarValue(HyperValue::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ScalarValue(HyperValue::Int(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(|v| ScalarValue(HyperValue::Int(v)))
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &"an integer within i64 range"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        // NaN and infinities have no JSON encoding and would turn into null in artifacts.
        if !v.is_finite() {
            return Err(E::invalid_value(Unexpected::Float(v), &"a finite number"));
        }
        Ok(ScalarValue(HyperValue::Float(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ScalarValue(HyperValue::Str(v.to_string())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ScalarValue(HyperValue::Str(v)))
    }
}

impl<'de> Deserialize<'de> for ScalarValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

struct SetVisitor;

impl<'de> Visitor<'de> for SetVisitor {
    type Value = HyperparameterSet;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of hyperparameter names to scalar values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut values = BTreeMap::new();
        while let Some(key) = map.next_key::<String>()? {
            if values.contains_key(&key) {
                return Err(de::Error::custom(format!("duplicate hyperparameter `{key}`")));
            }
            let ScalarValue(value) = map.next_value()?;
            values.insert(key, value);
        }
        Ok(HyperparameterSet { values, source: PathBuf::new() })
    }
}

impl<'de> Deserialize<'de> for HyperparameterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SetVisitor)
    }
}

/// Read and parse the hyperparameter file at `path`.
pub fn load_hyperparameters(path: &Path) -> JobResult<HyperparameterSet> {
    let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => JobError::config(path, "file not found"),
        _ => JobError::config(path, format!("failed to read: {e}")),
    })?;

    let format = ConfigFormat::from_path(path);
    let mut set = HyperparameterSet::parse(&raw, format).map_err(|msg| JobError::config(path, msg))?;
    set.source = path.to_path_buf();

    debug!(path = %path.display(), ?format, count = set.len(), "loaded hyperparameters");
    Ok(set)
}
