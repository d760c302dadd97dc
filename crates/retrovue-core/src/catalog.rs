//! Video catalog
//!
//! The catalog is read-only. [`StaticCatalog`] flattens the dataset JSON
//! (categories with their contents) into normalized [`Video`]s while keeping
//! catalog order, which the autoplay successor lookup depends on.

use crate::{types::*, Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// Read-only access to the video catalog
pub trait CatalogProvider {
    /// All videos, flattened in catalog order
    fn list_all(&self) -> &[Video];

    /// Videos grouped by category, in catalog order
    fn grouped(&self) -> &[CategoryGroup];

    /// Look up a video by id
    fn find(&self, id: &str) -> Option<&Video> {
        self.list_all().iter().find(|v| v.id == id)
    }

    /// Same category, excluding the video itself, order preserved
    fn related_to(&self, video: &Video) -> Vec<Video> {
        self.list_all()
            .iter()
            .filter(|v| v.same_category(video) && v.id != video.id)
            .cloned()
            .collect()
    }

    /// Cyclic successor within the video's category.
    /// None if the category has one member or the video is not in the catalog.
    fn next_in_category(&self, video: &Video) -> Option<Video> {
        let members: Vec<&Video> = self
            .list_all()
            .iter()
            .filter(|v| v.same_category(video))
            .collect();

        if members.len() <= 1 {
            return None;
        }

        let index = members.iter().position(|v| v.id == video.id)?;
        Some(members[(index + 1) % members.len()].clone())
    }
}

// Dataset shape

#[derive(Debug, Deserialize)]
struct RawDataset {
    categories: Vec<RawCategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct RawCategoryEntry {
    category: RawCategory,
    contents: Vec<RawContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCategory {
    slug: String,
    name: String,
    #[serde(default)]
    icon_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContent {
    title: String,
    media_url: String,
    #[serde(default)]
    #[allow(dead_code)]
    media_type: String,
    thumbnail_url: String,
    slug: String,
    #[serde(default)]
    duration: Option<String>,
}

/// In-memory catalog built from the dataset
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    videos: Vec<Video>,
    groups: Vec<CategoryGroup>,
    index: HashMap<String, usize>,
}

impl StaticCatalog {
    /// Build a catalog from category groups. Video ids must be unique.
    pub fn from_groups(groups: Vec<CategoryGroup>) -> Result<Self> {
        let mut videos = Vec::new();
        let mut index = HashMap::new();

        for group in &groups {
            for video in &group.videos {
                if index.insert(video.id.clone(), videos.len()).is_some() {
                    return Err(Error::DuplicateVideo(video.id.clone()));
                }
                videos.push(video.clone());
            }
        }

        info!(
            categories = groups.len(),
            videos = videos.len(),
            "Catalog loaded"
        );

        Ok(Self { videos, groups, index })
    }

    /// Parse the dataset JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawDataset = serde_json::from_str(json)?;

        let groups = raw
            .categories
            .into_iter()
            .map(|entry| {
                let category = entry.category;
                let videos = entry
                    .contents
                    .into_iter()
                    .map(|content| normalize(&category, content))
                    .collect::<Result<Vec<_>>>()?;

                debug!(category = %category.slug, videos = videos.len(), "Category parsed");

                Ok(CategoryGroup {
                    name: category.name,
                    slug: category.slug,
                    icon_url: category.icon_url,
                    videos,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_groups(groups)
    }

    /// Load the dataset from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Look up a video by id, failing if it is absent
    pub fn get(&self, id: &str) -> Result<&Video> {
        self.find(id).ok_or_else(|| Error::UnknownVideo(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}

impl CatalogProvider for StaticCatalog {
    fn list_all(&self) -> &[Video] {
        &self.videos
    }

    fn grouped(&self) -> &[CategoryGroup] {
        &self.groups
    }

    fn find(&self, id: &str) -> Option<&Video> {
        self.index.get(id).map(|&i| &self.videos[i])
    }
}

fn normalize(category: &RawCategory, content: RawContent) -> Result<Video> {
    let media_url = Url::parse(&content.media_url).map_err(|source| Error::InvalidMediaUrl {
        slug: content.slug.clone(),
        source,
    })?;

    Ok(Video {
        id: content.slug.clone(),
        title: content.title,
        category: category.name.clone(),
        category_slug: category.slug.clone(),
        thumbnail_url: content.thumbnail_url,
        media_id: content.slug,
        media_url,
        duration: content.duration.unwrap_or_default(),
    })
}
