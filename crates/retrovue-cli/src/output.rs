//! Output formatting for CLI

use retrovue_core::Video;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
pub enum OutputFormat {
    Text,
    Json,
    Table,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "table" => OutputFormat::Table,
            _ => OutputFormat::Text,
        }
    }
}

/// One table row per video
#[derive(Tabled, Serialize)]
pub struct VideoRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub duration: String,
}

impl From<&Video> for VideoRow {
    fn from(video: &Video) -> Self {
        Self {
            id: video.id.clone(),
            title: video.title.clone(),
            category: video.category.clone(),
            duration: if video.duration.is_empty() {
                "-".to_string()
            } else {
                video.duration.clone()
            },
        }
    }
}

/// Render a list of videos in the selected format
pub fn format_videos<'a>(videos: impl IntoIterator<Item = &'a Video>, format: &str) -> String {
    let rows: Vec<VideoRow> = videos.into_iter().map(VideoRow::from).collect();
    match OutputFormat::from(format) {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
        }
        OutputFormat::Table => Table::new(&rows).to_string(),
        OutputFormat::Text => rows
            .iter()
            .map(|r| format!("  {:<20} {:<32} {:>6}", r.id, r.title, r.duration))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
