//! Project categories and the gallery's category filter value.
//!
//! The enumeration is closed. Ingestion also accepts the Spanish
//! identifiers the site stored before the ids were normalized
//! (`cocina`, `dormitorio`, `living`, `oficina`, `baño`).

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Filter id meaning "no category filter".
pub const FILTER_ALL: &str = "all";

/// Legacy id of the "all" filter.
const FILTER_ALL_LEGACY: &str = "todos";

/// Label shown on the "all categories" filter control.
pub const FILTER_ALL_LABEL: &str = "Todos";

/// One of the five kinds of furniture build shown in the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[serde(alias = "cocina")]
    Kitchen,
    #[serde(alias = "dormitorio")]
    Bedroom,
    #[serde(alias = "living")]
    LivingRoom,
    #[serde(alias = "oficina")]
    Office,
    #[serde(alias = "baño", alias = "bano")]
    Bathroom,
}

impl Category {
    /// Every category, in the order the filter controls are rendered.
    pub const ALL: [Category; 5] = [
        Category::Kitchen,
        Category::Bedroom,
        Category::LivingRoom,
        Category::Office,
        Category::Bathroom,
    ];

    /// Canonical wire id.
    pub fn id(self) -> &'static str {
        match self {
            Category::Kitchen => "kitchen",
            Category::Bedroom => "bedroom",
            Category::LivingRoom => "living-room",
            Category::Office => "office",
            Category::Bathroom => "bathroom",
        }
    }

    /// Human-readable label used on filter buttons and badges.
    pub fn label(self) -> &'static str {
        match self {
            Category::Kitchen => "Cocinas",
            Category::Bedroom => "Dormitorios",
            Category::LivingRoom => "Living",
            Category::Office => "Oficinas",
            Category::Bathroom => "Baños",
        }
    }

    /// Position of this category in [`Category::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Parse a canonical id or a legacy Spanish id.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "kitchen" | "cocina" => Some(Category::Kitchen),
            "bedroom" | "dormitorio" => Some(Category::Bedroom),
            "living-room" | "living" => Some(Category::LivingRoom),
            "office" | "oficina" => Some(Category::Office),
            "bathroom" | "baño" | "bano" => Some(Category::Bathroom),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The active category filter of a gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parse `"all"` or a category id. Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case(FILTER_ALL) || value.eq_ignore_ascii_case(FILTER_ALL_LEGACY) {
            return Some(CategoryFilter::All);
        }
        Category::parse(value).map(CategoryFilter::Only)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryFilter::All => FILTER_ALL,
            CategoryFilter::Only(category) => category.id(),
        }
    }

    /// Whether a project of `category` passes this filter.
    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(active) => active == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
