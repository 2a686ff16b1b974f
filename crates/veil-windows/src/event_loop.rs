use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use veil_core::config;
use veil_core::{Hotkey, HotkeyError, VeilError, WindowResult, log_error, log_info};
use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, MSG, PostThreadMessageW, TranslateMessage, WM_APP, WM_HOTKEY,
    WM_QUIT,
};

use crate::hotkey::HotkeyManager;

/// Posted to the pump thread when a rebind request is queued.
const WM_APP_REBIND: u32 = WM_APP + 1;

/// A request to change the toggle combination, answered by the pump.
struct RebindRequest {
    text: String,
    reply: Sender<Result<Hotkey, VeilError>>,
}

/// Starts the message-pump thread and binds `hotkey` on it.
///
/// Each press sends `()` through `toggle_tx`. A failed initial binding is
/// logged and the daemon keeps running without a hotkey; it can be bound
/// later with [`EventLoopHandle::rebind`].
pub fn start(
    toggle_tx: Sender<()>,
    hotkey: Hotkey,
    config_path: PathBuf,
) -> WindowResult<EventLoopHandle> {
    let (ready_tx, ready_rx) = mpsc::channel::<(u32, Option<Hotkey>)>();
    let (rebind_tx, rebind_rx) = mpsc::channel::<RebindRequest>();

    let handle = thread::spawn(move || {
        // SAFETY: GetCurrentThreadId has no preconditions.
        let thread_id = unsafe { GetCurrentThreadId() };

        let mut hotkeys = HotkeyManager::new(toggle_tx);
        let bound = match hotkeys.binding().rebind(hotkey.clone()) {
            Ok(()) => {
                log_info!("Toggle hotkey bound to {hotkey}");
                Some(hotkey)
            }
            Err(e) => {
                log_error!("{e}");
                eprintln!("Warning: {e}");
                None
            }
        };

        let _ = ready_tx.send((thread_id, bound));

        run_message_pump(&mut hotkeys, &rebind_rx, &config_path);

        // Unregistered on drop, on this thread as Win32 requires.
        drop(hotkeys);
    });

    let (thread_id, current) = ready_rx
        .recv()
        .map_err(|_| -> Box<dyn std::error::Error> {
            "event loop thread exited unexpectedly".into()
        })?;

    Ok(EventLoopHandle {
        thread_id,
        handle,
        rebind_tx,
        current,
    })
}

/// Handle for controlling the event loop from the daemon.
pub struct EventLoopHandle {
    thread_id: u32,
    handle: thread::JoinHandle<()>,
    rebind_tx: Sender<RebindRequest>,
    current: Option<Hotkey>,
}

impl EventLoopHandle {
    /// The combination currently bound, if any.
    pub fn current_hotkey(&self) -> Option<&Hotkey> {
        self.current.as_ref()
    }

    /// Rebinds the toggle to `text` and saves it to the config file.
    ///
    /// Blocks until the pump thread has answered. On failure the previous
    /// combination stays bound.
    pub fn rebind(&mut self, text: &str) -> Result<Hotkey, VeilError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        let request = RebindRequest {
            text: text.to_string(),
            reply: reply_tx,
        };
        let gone = || {
            VeilError::Hotkey(HotkeyError::RegistrationFailed(
                "hotkey thread is not running".into(),
            ))
        };

        self.rebind_tx.send(request).map_err(|_| gone())?;
        // SAFETY: posting to a thread id we own; the pump drains the
        // request channel when it sees the message.
        unsafe { PostThreadMessageW(self.thread_id, WM_APP_REBIND, WPARAM(0), LPARAM(0)) }
            .map_err(|_| gone())?;

        let hotkey = reply_rx.recv().map_err(|_| gone())??;
        self.current = Some(hotkey.clone());
        Ok(hotkey)
    }

    /// Signals the event loop to stop and waits for the thread to finish.
    pub fn stop(self) {
        // SAFETY: WM_QUIT makes GetMessageW return FALSE on the pump thread.
        unsafe {
            let _ = PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
        }
        let _ = self.handle.join();
    }
}

/// The Win32 message pump. Blocks until WM_QUIT is received.
fn run_message_pump(
    hotkeys: &mut HotkeyManager,
    rebind_rx: &Receiver<RebindRequest>,
    config_path: &Path,
) {
    let mut msg = MSG::default();

    while unsafe { GetMessageW(&mut msg, None, 0, 0).as_bool() } {
        match msg.message {
            WM_HOTKEY => hotkeys.dispatch(msg.wParam.0 as i32),
            WM_APP_REBIND => {
                for request in rebind_rx.try_iter() {
                    let result =
                        config::change_hotkey(hotkeys.binding(), config_path, &request.text);
                    match &result {
                        Ok(hotkey) => log_info!("Toggle hotkey rebound to {hotkey}"),
                        Err(e) => log_error!("Rebind to {:?} failed: {e}", request.text),
                    }
                    let _ = request.reply.send(result);
                }
            }
            _ => unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            },
        }
    }
}
