use veil_core::resume::{self, ResumeOutcome};
use veil_core::state_file::{self, StateFile};
use veil_core::{Engine, config};
use veil_windows::{Win32Desktop, identity};

/// Hides every window and saves them; the next run restores them.
pub fn execute() {
    let config = config::load();
    veil_core::log::init(&config.logging);
    let own_window = identity::claim_foreground(&config.self_title);

    let Some(path) = state_file::resume_path() else {
        eprintln!("Error: could not determine the local data directory.");
        std::process::exit(1);
    };

    let desktop = Win32Desktop;
    let engine = Engine::new(&desktop, &config.self_title).with_own_window(own_window);

    let report = match resume::run(&engine, &StateFile::new(path), &config.toggle.exclude) {
        Ok(ResumeOutcome::Hidden(report)) => {
            println!("{}", report.summary("hidden"));
            println!("Run 'veil resume' again to bring them back.");
            report
        }
        Ok(ResumeOutcome::Restored(report)) => {
            println!("{}", report.summary("restored"));
            if !report.is_clean() {
                println!("Failed windows were kept; run 'veil resume' again to retry.");
            }
            report
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    for failure in &report.failed {
        eprintln!("  {}: {}", failure.window, failure.error);
    }
}
