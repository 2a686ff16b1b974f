use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};

use veil_core::Desktop;
use veil_windows::Win32Desktop;

/// Prints every visible titled window, straight from the OS.
pub fn execute() {
    let windows = Win32Desktop.visible_windows();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new("HWND"), Cell::new("Title")]);

    for window in &windows {
        table.add_row(vec![
            Cell::new(window.handle),
            Cell::new(&window.title),
        ]);
    }

    println!("{table}");
    println!("\n{} windows found", windows.len());
}
