use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};

use veil_core::Command;
use veil_core::ipc::WindowInfo;
use veil_core::state_file::{self, StateFile};
use veil_windows::Win32Desktop;

/// Prints the hidden set. Asks the daemon when it runs, otherwise reads
/// the saved state directly.
pub fn execute() {
    let windows = if veil_windows::ipc::is_daemon_running() {
        super::action::send(&Command::Hidden).windows
    } else {
        match from_disk() {
            Ok(windows) => windows,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    };

    if windows.is_empty() {
        println!("No hidden windows.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Id"),
            Cell::new("HWND"),
            Cell::new("Title"),
            Cell::new("Origin"),
            Cell::new("State"),
        ]);

    for info in &windows {
        table.add_row(vec![
            Cell::new(info.id.map(|id| id.to_string()).unwrap_or_default()),
            Cell::new(info.handle),
            Cell::new(&info.title),
            Cell::new(info.origin.map(|o| o.to_string()).unwrap_or_default()),
            Cell::new(info.state.map(|s| s.to_string()).unwrap_or_default()),
        ]);
    }

    println!("{table}");
    println!("\n{} hidden windows", windows.len());
}

fn from_disk() -> Result<Vec<WindowInfo>, Box<dyn std::error::Error>> {
    let path = state_file::hidden_path().ok_or("could not determine the local data directory")?;
    let records = StateFile::new(path).load()?.unwrap_or_default();
    Ok(records
        .iter()
        .map(|entry| WindowInfo::hidden(entry, entry.status(&Win32Desktop)))
        .collect())
}
