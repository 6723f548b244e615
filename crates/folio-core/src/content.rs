//! Content model: content types, records and request identifiers.

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::config::ConfigError;
use crate::error::ContentError;

/// Positive numeric identifier of a content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ContentId(NonZeroU64);

impl ContentId {
    /// Returns a `ContentId` for `id`, or `None` when `id` is zero.
    #[must_use]
    pub fn new(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(Self)
    }

    /// Returns the raw id.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// URL-safe record identifier: lowercase ASCII letters, digits, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Validates `value` as a slug.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let valid = !value.is_empty()
            && value
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
        valid.then(|| Self(value.to_owned()))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A record reference taken from a request path: numeric id or slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// Matches `[1-9][0-9]*`.
    Id(ContentId),
    /// Anything else matching the slug alphabet, including `0` and `007`.
    Slug(Slug),
}

impl FromStr for Identifier {
    type Err = ContentError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let numeric = input.starts_with(|c: char| matches!(c, '1'..='9'))
            && input.bytes().all(|b| b.is_ascii_digit());
        if numeric {
            // Ids too large for u64 can never exist; they fall through to the
            // slug path and resolve to NotFound there.
            if let Some(id) = input.parse().ok().and_then(ContentId::new) {
                return Ok(Self::Id(id));
            }
        }

        Slug::parse(input)
            .map(Self::Slug)
            .ok_or_else(|| ContentError::InvalidIdentifier(input.to_owned()))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => id.fmt(f),
            Self::Slug(slug) => slug.fmt(f),
        }
    }
}

/// A content type definition ("definition" of a record).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentType {
    /// Human-readable name, e.g. `Pages`.
    pub name: String,
    /// Plural slug used for listings, e.g. `pages`.
    pub slug: String,
    /// Singular slug, used as the context key when rendering a record.
    pub singular_slug: String,
    /// Allowed field names, in declaration order.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Per-type record template override.
    #[serde(default)]
    pub record_template: Option<String>,
    /// Per-type listing template override.
    #[serde(default)]
    pub listing_template: Option<String>,
}

impl ContentType {
    /// Returns true if records of this type may carry a field called `name`.
    #[must_use]
    pub fn allows_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    /// Returns true if `key` names this type by plural or singular slug.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        self.slug == key || self.singular_slug == key
    }
}

/// The read-only registry of content types, loaded once at start-up.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    types: Vec<Arc<ContentType>>,
}

impl ContentTypes {
    /// Builds a registry from definitions, rejecting duplicate slugs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if two types share a plural or singular slug.
    pub fn new(types: Vec<ContentType>) -> Result<Self, ConfigError> {
        let mut registry = Self::default();
        for content_type in types {
            if registry.get(&content_type.slug).is_some()
                || registry.get(&content_type.singular_slug).is_some()
            {
                return Err(ConfigError::Invalid(format!(
                    "duplicate content type slug: {}",
                    content_type.slug
                )));
            }
            registry.types.push(Arc::new(content_type));
        }
        Ok(registry)
    }

    /// Parses a YAML mapping of `key: definition`. A definition without a
    /// `slug` takes its key as the plural slug.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed YAML and
    /// `ConfigError::Invalid` for duplicate slugs.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let raw: serde_yaml::Mapping = serde_yaml::from_str(source)?;
        let mut types = Vec::with_capacity(raw.len());
        for (key, mut definition) in raw {
            let key = key
                .as_str()
                .ok_or_else(|| ConfigError::Invalid("content type keys must be strings".into()))?
                .to_owned();
            if let Some(mapping) = definition.as_mapping_mut() {
                let slug_key = serde_yaml::Value::from("slug");
                if !mapping.contains_key(&slug_key) {
                    mapping.insert(slug_key, serde_yaml::Value::from(key.clone()));
                }
            }
            let content_type: ContentType = serde_yaml::from_value(definition)
                .map_err(|e| ConfigError::Invalid(format!("content type {key}: {e}")))?;
            types.push(content_type);
        }
        Self::new(types)
    }

    /// Reads and parses a content types file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`ContentTypes::from_yaml_str`].
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }

    /// Looks up a type by plural or singular slug.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<ContentType>> {
        self.types.iter().find(|t| t.matches(key))
    }

    /// Iterates over all types in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ContentType>> {
        self.types.iter()
    }
}

/// A single named field value of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name, one of the type's allowed fields.
    pub name: String,
    /// Field value.
    pub value: serde_json::Value,
}

impl Field {
    /// Creates a field.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An immutable stored content item.
#[derive(Debug, Clone)]
pub struct ContentRecord {
    id: ContentId,
    slug: Slug,
    content_type: Arc<ContentType>,
    fields: Vec<Field>,
    published_at: DateTime<Utc>,
}

impl ContentRecord {
    /// Creates a record, checking every field against the type definition.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Infrastructure` when a field is not declared
    /// by `content_type`; stored data and configuration disagree.
    pub fn new(
        id: ContentId,
        slug: Slug,
        content_type: Arc<ContentType>,
        fields: Vec<Field>,
        published_at: DateTime<Utc>,
    ) -> Result<Self, ContentError> {
        if let Some(field) = fields.iter().find(|f| !content_type.allows_field(&f.name)) {
            return Err(ContentError::Infrastructure(format!(
                "field {} is not defined on content type {}",
                field.name, content_type.name
            )));
        }
        Ok(Self {
            id,
            slug,
            content_type,
            fields,
            published_at,
        })
    }

    /// Returns the record id.
    #[must_use]
    pub fn id(&self) -> ContentId {
        self.id
    }

    /// Returns the record slug.
    #[must_use]
    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Returns the record's type definition.
    #[must_use]
    pub fn content_type(&self) -> &Arc<ContentType> {
        &self.content_type
    }

    /// Returns the fields in stored order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the value of field `name`, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Returns the publication timestamp.
    #[must_use]
    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
}

struct FieldMap<'a>(&'a [Field]);

impl Serialize for FieldMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for field in self.0 {
            map.serialize_entry(&field.name, &field.value)?;
        }
        map.end()
    }
}

impl Serialize for ContentRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("slug", &self.slug)?;
        map.serialize_entry("content_type", &self.content_type.singular_slug)?;
        map.serialize_entry("published_at", &self.published_at)?;
        map.serialize_entry("fields", &FieldMap(&self.fields))?;
        map.end()
    }
}
