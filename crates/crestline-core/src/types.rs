use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// The catalog locales carried by entity records.
///
/// `En` is the pivot locale: all classification and intent logic runs on
/// English text, and replies are translated back to the detected locale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    En,
    Ar,
    De,
    Fr,
    Zh,
}

impl Locale {
    /// All locales in canonical order (pivot first).
    pub const ALL: [Locale; 5] = [Locale::En, Locale::Ar, Locale::De, Locale::Fr, Locale::Zh];

    /// The ISO-639-1 code for this locale.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
            Locale::De => "de",
            Locale::Fr => "fr",
            Locale::Zh => "zh",
        }
    }

    /// Parse an ISO-639-1 code into a catalog locale, if supported.
    pub fn from_code(code: &str) -> Option<Locale> {
        match code {
            "en" => Some(Locale::En),
            "ar" => Some(Locale::Ar),
            "de" => Some(Locale::De),
            "fr" => Some(Locale::Fr),
            "zh" => Some(Locale::Zh),
            _ => None,
        }
    }
}

/// The kinds of catalog entities the concierge can talk about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Product,
    Project,
    Developer,
    User,
}

impl EntityKind {
    /// Kinds that participate in keyword intent detection.
    pub const CATALOG: [EntityKind; 3] =
        [EntityKind::Product, EntityKind::Project, EntityKind::Developer];

    /// The path segment used when building deep links.
    pub fn link_path(&self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Project => "project",
            EntityKind::Developer => "developer",
            EntityKind::User => "user",
        }
    }

    /// Human-readable singular label.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Project => "project",
            EntityKind::Developer => "developer",
            EntityKind::User => "user",
        }
    }
}

/// A named text field an entity can be looked up by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextField {
    /// The display name in a specific locale.
    Name(Locale),
    /// The account email (users only).
    Email,
}

impl EntityKind {
    /// The fields fuzzy resolution matches against for this kind.
    pub fn search_fields(&self) -> Vec<TextField> {
        match self {
            EntityKind::User => vec![TextField::Name(Locale::En), TextField::Email],
            _ => Locale::ALL.iter().map(|l| TextField::Name(*l)).collect(),
        }
    }
}

// =============================================================================
// Records
// =============================================================================

/// A display name carried in all catalog locales.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocaleText {
    pub en: Option<String>,
    pub ar: Option<String>,
    pub de: Option<String>,
    pub fr: Option<String>,
    pub zh: Option<String>,
}

impl LocaleText {
    /// A value present only in the pivot locale.
    pub fn english(text: impl Into<String>) -> Self {
        Self {
            en: Some(text.into()),
            ..Self::default()
        }
    }

    /// The value for a specific locale, if present.
    pub fn get(&self, locale: Locale) -> Option<&str> {
        let slot = match locale {
            Locale::En => &self.en,
            Locale::Ar => &self.ar,
            Locale::De => &self.de,
            Locale::Fr => &self.fr,
            Locale::Zh => &self.zh,
        };
        slot.as_deref()
    }

    /// The first non-empty value in canonical locale order.
    pub fn primary(&self) -> Option<&str> {
        Locale::ALL
            .iter()
            .filter_map(|l| self.get(*l))
            .find(|s| !s.is_empty())
    }

    /// All present values in canonical locale order.
    pub fn values(&self) -> Vec<&str> {
        Locale::ALL.iter().filter_map(|l| self.get(*l)).collect()
    }
}

/// Image reference as stored by the blob-storage collaborator.
///
/// Candidate URLs are tried in declaration order when resolving the
/// display image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub file_path: Option<String>,
    pub url: Option<String>,
    pub secure_url: Option<String>,
}

impl ImageRef {
    /// The best available URL, in `file_path` > `url` > `secure_url` order.
    pub fn best(&self) -> Option<&str> {
        self.file_path
            .as_deref()
            .or(self.url.as_deref())
            .or(self.secure_url.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// A catalog record as it arrives from the external document store.
///
/// One shape covers all kinds; per-kind fields are optional and absent
/// for kinds they do not apply to. The chat core never mutates records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: Option<String>,
    pub name: LocaleText,
    pub description: Option<String>,
    pub image: Option<ImageRef>,
    /// Legacy avatar URL fallback (developers).
    pub photo: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub price: Option<String>,
    pub beds: Option<u32>,
    pub baths: Option<u32>,
    pub area: Option<String>,
    pub status: Option<String>,
    pub item_type: Option<String>,
    pub location: Option<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl EntityRecord {
    /// The value of a named text field, if present.
    pub fn field(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::Name(locale) => self.name.get(locale),
            TextField::Email => self.email.as_deref(),
        }
    }
}

/// One section of curated company information.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompanySection {
    pub title: String,
    pub tags: Vec<String>,
    /// Pivot-language body text.
    pub content: String,
}

// =============================================================================
// Projections
// =============================================================================

/// The flattened, UI-ready projection of a catalog record.
///
/// `name` and `image` are always populated (defaults apply when the
/// source record omits them); `url` is `None` only when the record has
/// no identifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEntity {
    pub id: Option<String>,
    pub name: String,
    pub image: String,
    pub url: Option<String>,
    pub description: String,
}

/// A structured deep link into the catalog UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityLink {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub label: String,
    pub url: String,
}

// =============================================================================
// Conversation
// =============================================================================

/// The speaker of a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One turn of caller-supplied conversation history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub message: String,
}

// =============================================================================
// Tests
// =============================================================================
