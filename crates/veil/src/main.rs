mod commands;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "veil",
    version,
    about = "Hide, restore and auto-hide desktop windows"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[cfg_attr(not(windows), allow(dead_code))]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Start the background daemon (hotkey, auto-hide scan)
    Start,
    /// Stop the daemon, restoring any bulk-hidden windows
    Stop,
    /// Show whether the daemon is running
    Status,
    /// Hide the visible window with this exact title
    Hide { title: String },
    /// Show a hidden window by exact title or by id
    Show(ShowTarget),
    /// Hide everything, or restore what the last toggle hid
    Toggle,
    /// Run one auto-hide scan now
    Scan,
    /// List visible windows
    List,
    /// List hidden windows and whether they still exist
    Hidden,
    /// Change the toggle hotkey, e.g. "ctrl+alt+j"
    Hotkey { combo: String },
    /// Hide all windows now and restore them on the next run
    Resume,
    /// Run the daemon (internal, not for direct use)
    #[command(hide = true)]
    Daemon {
        /// Raw handle of the terminal that ran `veil start`
        #[arg(long)]
        own_window: Option<usize>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
#[cfg_attr(not(windows), allow(dead_code))]
struct ShowTarget {
    /// Exact title of the hidden window
    title: Option<String>,
    /// Id from `veil hidden`
    #[arg(long)]
    id: Option<u64>,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::execute(),
        command => run(command),
    }
}

#[cfg(windows)]
fn run(command: Commands) {
    use veil_core::{Command, HiddenId};

    match command {
        Commands::Init => commands::init::execute(),
        Commands::Start => commands::start::execute(),
        Commands::Stop => commands::stop::execute(),
        Commands::Status => commands::status::execute(),
        Commands::Daemon { own_window } => commands::daemon::execute(own_window),
        Commands::Hide { title } => commands::action::execute(Command::Hide { title }),
        Commands::Show(ShowTarget { id: Some(id), .. }) => {
            commands::action::execute(Command::ShowId { id: HiddenId(id) })
        }
        Commands::Show(ShowTarget { title, .. }) => commands::action::execute(Command::Show {
            title: title.unwrap_or_default(),
        }),
        Commands::Toggle => commands::action::execute(Command::Toggle),
        Commands::Scan => commands::action::execute(Command::Scan),
        Commands::Hotkey { combo } => {
            commands::action::execute(Command::SetHotkey { hotkey: combo })
        }
        Commands::List => commands::list::execute(),
        Commands::Hidden => commands::hidden::execute(),
        Commands::Resume => commands::resume::execute(),
    }
}

#[cfg(not(windows))]
fn run(_command: Commands) {
    eprintln!("Error: this command is only supported on Windows.");
    std::process::exit(1);
}
