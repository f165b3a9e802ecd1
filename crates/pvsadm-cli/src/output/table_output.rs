//! Table formatting for CLI output

use chrono::{DateTime, Local, Utc};
use pvsadm_sdk::types::{Image, ImageReference};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct ImageRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Storage")]
    storage: String,
    #[tabled(rename = "Created")]
    created: String,
}

/// Format a timestamp in local time as YY-MM-DD HH:MM:SS
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%y-%m-%d %H:%M:%S")
        .to_string()
}

fn image_rows(images: &[ImageReference]) -> Vec<ImageRow> {
    images
        .iter()
        .map(|image| ImageRow {
            id: image.image_id.clone(),
            name: image.name.clone(),
            state: image.state.clone(),
            storage: image.storage_type.clone().unwrap_or_else(|| "-".to_string()),
            created: format_timestamp(&image.creation_date),
        })
        .collect()
}

/// Render images as a table
pub fn render_images(images: &[ImageReference]) -> String {
    let mut table = Table::new(image_rows(images));
    table.with(Style::modern());
    table.to_string()
}

/// Display images in table format
pub fn display_images(images: &[ImageReference]) {
    println!("{}", render_images(images));
}

/// Display a single image, as returned by an import
pub fn display_image(image: &Image) {
    let row = ImageRow {
        id: image.image_id.clone(),
        name: image.name.clone(),
        state: image.state.clone(),
        storage: image.storage_type.clone().unwrap_or_else(|| "-".to_string()),
        created: image
            .creation_date
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_else(|| "-".to_string()),
    };

    let mut table = Table::new([row]);
    table.with(Style::modern());
    println!("{table}");
}
