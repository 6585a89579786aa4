//! Format listings, breadcrumbs and mutation results as text or JSON.

use crate::api::model::{FileItem, FolderContents, Health, UploadedFile};
use crate::error::ApiError;
use crate::navigation::{NavigationItem, NavigationTracker};
use crate::session::DownloadOutcome;
use chrono::{DateTime, NaiveDateTime};
use comfy_table::presets::{UTF8_BORDERS_ONLY, UTF8_FULL};
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

const BREADCRUMB_SEPARATOR: &str = " › ";

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// `Root › Photos › 2024`
pub fn format_breadcrumb(items: &[NavigationItem]) -> String {
    items
        .iter()
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>()
        .join(BREADCRUMB_SEPARATOR)
}

/// Human-readable size in binary units, at most two decimals: `0 Bytes`, `1.5 KB`, `2 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// Coarse label for a content type.
pub fn file_kind(content_type: &str) -> &'static str {
    if content_type.starts_with("image/") {
        "Image"
    } else if content_type.starts_with("video/") {
        "Video"
    } else if content_type.starts_with("audio/") {
        "Audio"
    } else if content_type.contains("pdf") {
        "PDF"
    } else if content_type.contains("text") {
        "Text"
    } else if content_type.contains("zip") || content_type.contains("rar") {
        "Archive"
    } else {
        "File"
    }
}

/// Server timestamps are RFC 3339, sometimes without an offset. Unparseable values pass through.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return ts.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

fn file_row(file: &FileItem) -> Vec<String> {
    vec![
        file.name.clone(),
        file_kind(&file.content_type).to_string(),
        format_file_size(file.size),
        file.created_at
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_default(),
        file.id.to_string(),
    ]
}

/// Listing as tables: subfolders first, then files.
pub fn format_listing_text(breadcrumb: &[NavigationItem], contents: &FolderContents) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format_breadcrumb(breadcrumb))
    ));

    if contents.subfolders.is_empty() && contents.files.is_empty() {
        out.push_str("This folder is empty\n");
        return out;
    }

    if !contents.subfolders.is_empty() {
        out.push_str(&format!("{}\n", format_section_heading("Folders")));
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Name", "ID"]);
        for folder in &contents.subfolders {
            table.add_row(vec![folder.name.clone(), folder.id.to_string()]);
        }
        out.push_str(&format!("{}\n\n", table));
    }

    if !contents.files.is_empty() {
        out.push_str(&format!("{}\n", format_section_heading("Files")));
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Name", "Kind", "Size", "Created", "ID"]);
        for file in &contents.files {
            table.add_row(file_row(file));
        }
        out.push_str(&format!("{}\n", table));
    }
    out
}

/// Listing as a JSON document with the breadcrumb trail alongside it.
pub fn format_listing_json(
    breadcrumb: &[NavigationItem],
    contents: &FolderContents,
) -> Result<String, ApiError> {
    let value = json!({
        "breadcrumb": breadcrumb,
        "folder": contents.folder,
        "subfolders": contents.subfolders,
        "files": contents.files,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Current view of a tracker, filtered the same way the browser shows it.
pub fn format_tracker_view(tracker: &NavigationTracker) -> String {
    let breadcrumb = tracker.view_breadcrumbs();
    let mut contents = match tracker.listing() {
        Some(listing) => listing.clone(),
        None => return format!("{}\n\nLoading...\n", format_breadcrumb(&breadcrumb)),
    };
    contents.subfolders = tracker.subfolders().into_iter().cloned().collect();
    format_listing_text(&breadcrumb, &contents)
}

pub fn format_uploaded_text(files: &[UploadedFile]) -> String {
    let mut out = format!("Uploaded {} file(s)\n", files.len());
    if files.is_empty() {
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Size", "ID"]);
    for file in files {
        table.add_row(vec![
            file.name.clone(),
            format_file_size(file.size),
            file.id.clone(),
        ]);
    }
    out.push_str(&format!("{}", table));
    out
}

/// One line per requested file, saved or failed.
pub fn format_downloads_text(outcomes: &[DownloadOutcome]) -> String {
    let saved = outcomes.iter().filter(|o| o.result.is_ok()).count();
    let mut out = format!("Downloaded {} of {} file(s)\n", saved, outcomes.len());
    for outcome in outcomes {
        match &outcome.result {
            Ok(path) => out.push_str(&format!(
                "  Saved file {} to {}\n",
                outcome.file_id,
                path.display()
            )),
            Err(e) => out.push_str(&format!("  Failed file {}: {}\n", outcome.file_id, e)),
        }
    }
    out
}

pub fn format_health_text(base_url: &str, health: &Health, banner: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", format_section_heading("Server")));
    out.push_str(&format!("  URL: {}\n", base_url));
    out.push_str(&format!("  Status: {}\n", health.status));
    if let Some(banner) = banner.map(str::trim).filter(|b| !b.is_empty()) {
        out.push_str(&format!("  Banner: {}\n", banner));
    }
    out
}

pub fn format_health_json(base_url: &str, health: &Health) -> Result<String, ApiError> {
    let value = json!({
        "base_url": base_url,
        "status": health.status,
        "ok": health.is_ok(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}
