//! Category records shown on the wheel, and the result of landing on one

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{WheelError, WheelResult};

/// Maximum characters of a category name drawn on its segment
pub const LABEL_MAX_CHARS: usize = 12;

fn default_icon() -> String {
    "star".into()
}

/// One wheel segment's category
///
/// Accepts both the admin backend shape (`title`, `image`) and the
/// frontend shape (`name`, `imageUrl`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// CSS color of the segment fill
    #[serde(default)]
    pub color: String,
    #[serde(default, alias = "image")]
    pub image_url: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a category with only identity, name and color
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            color: color.into(),
            image_url: String::new(),
            icon: default_icon(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Name as drawn on the wheel (truncated on char boundaries)
    pub fn label(&self) -> &str {
        match self.name.char_indices().nth(LABEL_MAX_CHARS) {
            Some((byte_idx, _)) => &self.name[..byte_idx],
            None => &self.name,
        }
    }

    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }
}

/// Ordered list of categories; order defines segment index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryList {
    categories: Vec<Category>,
}

/// Envelope returned by the public spinner endpoint
#[derive(Debug, Deserialize)]
struct SpinnerCategoriesResponse {
    categories: Vec<Category>,
}

impl CategoryList {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Parse either a bare JSON array or a `{ "categories": [...] }` envelope
    pub fn from_json(json: &str) -> WheelResult<Self> {
        match serde_json::from_str::<Vec<Category>>(json) {
            Ok(categories) => Ok(Self::new(categories)),
            Err(_) => {
                let envelope: SpinnerCategoriesResponse = serde_json::from_str(json)?;
                Ok(Self::new(envelope.categories))
            }
        }
    }

    /// Placeholder categories `Segment 1..=count` with a rotating palette
    pub fn placeholder(count: usize) -> Self {
        const PALETTE: [&str; 6] = [
            "#ff6b6b", "#4ecdc4", "#45b7d1", "#f7b731", "#5f27cd", "#00d2d3",
        ];
        let categories = (0..count)
            .map(|i| {
                Category::new(
                    format!("segment-{}", i + 1),
                    format!("Segment {}", i + 1),
                    PALETTE[i % PALETTE.len()],
                )
            })
            .collect();
        Self::new(categories)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, index: usize) -> WheelResult<&Category> {
        self.categories.get(index).ok_or(WheelError::IndexOutOfRange {
            index,
            len: self.categories.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }
}

/// What the player won on one spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub category_id: String,
    pub category_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_color: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Spin number within the session (1-based)
    pub spins: u32,
}

impl GameResult {
    pub fn from_category(category: &Category, spins: u32) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            category_id: category.id.clone(),
            category_name: category.name.clone(),
            category_image: non_empty(&category.image_url),
            category_color: non_empty(&category.color),
            timestamp: Utc::now(),
            spins,
        }
    }
}
