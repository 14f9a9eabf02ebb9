use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog item as exchanged with clients and stored in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub text: String,
    pub brand: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(rename = "buttonLink")]
    pub button_link: String,
}

impl Item {
    /// Everything except the identifier.
    pub fn fields(&self) -> ItemFields {
        ItemFields {
            title: self.title.clone(),
            text: self.text.clone(),
            brand: self.brand.clone(),
            images: self.images.clone(),
            button_link: self.button_link.clone(),
        }
    }
}

/// The mutable field set of an item; the identifier is never part of an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub title: String,
    pub text: String,
    pub brand: String,
    pub images: Vec<String>,
    pub button_link: String,
}

impl ItemFields {
    pub fn with_id(self, id: impl Into<String>) -> Item {
        Item {
            id: Some(id.into()),
            title: self.title,
            text: self.text,
            brand: self.brand,
            images: self.images,
            button_link: self.button_link,
        }
    }
}

/// Row shape of the `items` table.
#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
    pub id: String,
    pub title: String,
    pub text: String,
    pub brand: String,
    pub images: Vec<String>,
    pub button_link: String,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: Some(row.id),
            title: row.title,
            text: row.text,
            brand: row.brand,
            images: row.images,
            button_link: row.button_link,
        }
    }
}
