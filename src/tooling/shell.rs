//! Interactive folder browser.

use crate::error::ApiError;
use crate::session::ExplorerSession;
use crate::tooling::format::{
    format_breadcrumb, format_downloads_text, format_file_size, format_tracker_view,
};
use crate::types::{FileId, FolderId};
use dialoguer::{Input, MultiSelect, Select};
use std::path::PathBuf;
use tokio::runtime::Runtime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Open(FolderId, String),
    Up,
    Jump,
    Root,
    NewFolder,
    Upload,
    Download,
    Refresh,
    Quit,
}

/// Menu entries for the session's current view.
pub fn menu_actions(session: &ExplorerSession) -> Vec<(String, MenuAction)> {
    let tracker = session.tracker();
    let mut actions: Vec<(String, MenuAction)> = tracker
        .subfolders()
        .into_iter()
        .map(|f| {
            (
                format!("Open {}/", f.name),
                MenuAction::Open(f.id, f.name.clone()),
            )
        })
        .collect();
    if tracker.can_navigate_back() {
        actions.push(("Up".to_string(), MenuAction::Up));
        actions.push(("Go to breadcrumb...".to_string(), MenuAction::Jump));
    } else if tracker.is_detached() {
        actions.push(("Go to Root".to_string(), MenuAction::Root));
    }
    actions.push(("New folder".to_string(), MenuAction::NewFolder));
    actions.push(("Upload".to_string(), MenuAction::Upload));
    if !tracker.files().is_empty() {
        actions.push(("Download".to_string(), MenuAction::Download));
    }
    actions.push(("Refresh".to_string(), MenuAction::Refresh));
    actions.push(("Quit".to_string(), MenuAction::Quit));
    actions
}

fn input_error(e: dialoguer::Error) -> ApiError {
    ApiError::ConfigError(format!("Failed to get user input: {}", e))
}

/// Run the browse loop until the user quits. Failed operations are reported and the
/// loop continues.
pub fn run_browser(runtime: &Runtime, session: &mut ExplorerSession) -> Result<String, ApiError> {
    loop {
        if let Err(e) = runtime.block_on(session.refresh()) {
            eprintln!("Error: {}", e);
        }
        println!("{}", format_tracker_view(session.tracker()));

        let actions = menu_actions(session);
        let labels: Vec<&str> = actions.iter().map(|(label, _)| label.as_str()).collect();
        let selection = Select::new()
            .with_prompt("Choose an action")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(input_error)?;

        match actions[selection].1.clone() {
            MenuAction::Open(id, name) => session.descend(id, &name),
            MenuAction::Up => {
                session.ascend();
            }
            MenuAction::Root => session.reset(),
            MenuAction::Jump => {
                let names: Vec<String> = session
                    .tracker()
                    .breadcrumbs()
                    .iter()
                    .map(|item| item.name.clone())
                    .collect();
                let index = Select::new()
                    .with_prompt("Go to")
                    .items(&names)
                    .default(names.len().saturating_sub(1))
                    .interact()
                    .map_err(input_error)?;
                session.jump_to_index(index);
            }
            MenuAction::NewFolder => {
                let name: String = Input::new()
                    .with_prompt("Folder name")
                    .interact_text()
                    .map_err(input_error)?;
                match runtime.block_on(session.create_folder(&name)) {
                    Ok(created) => println!("Created folder {} (id {})", created.name, created.id),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            MenuAction::Upload => {
                let raw: String = Input::new()
                    .with_prompt("File paths (comma separated)")
                    .interact_text()
                    .map_err(input_error)?;
                let paths: Vec<PathBuf> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(PathBuf::from)
                    .collect();
                match runtime.block_on(session.upload_paths(&paths)) {
                    Ok(uploaded) => println!("Uploaded {} file(s)", uploaded.len()),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            MenuAction::Download => {
                let files: Vec<(FileId, String)> = session
                    .tracker()
                    .files()
                    .iter()
                    .map(|f| (f.id, format!("{} ({})", f.name, format_file_size(f.size))))
                    .collect();
                let labels: Vec<&str> = files.iter().map(|(_, label)| label.as_str()).collect();
                let picked = MultiSelect::new()
                    .with_prompt("Files to download (space to select)")
                    .items(&labels)
                    .interact()
                    .map_err(input_error)?;
                if picked.is_empty() {
                    continue;
                }
                let dest: String = Input::new()
                    .with_prompt("Save to")
                    .default(".".to_string())
                    .interact_text()
                    .map_err(input_error)?;
                let dest = PathBuf::from(dest);
                let ids: Vec<FileId> = picked.iter().map(|&i| files[i].0).collect();
                match runtime.block_on(session.download_many(&ids, Some(&dest))) {
                    Ok(outcomes) => print!("{}", format_downloads_text(&outcomes)),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            MenuAction::Refresh => {
                if let Err(e) = runtime.block_on(session.reload()) {
                    eprintln!("Error: {}", e);
                }
            }
            MenuAction::Quit => break,
        }
    }
    Ok(format!(
        "Left browser at {}",
        format_breadcrumb(&session.tracker().view_breadcrumbs())
    ))
}
