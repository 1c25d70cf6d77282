//! Panic hook for crash reporting

use backtrace::Backtrace;
use chrono::{DateTime, Local};
use std::panic::PanicHookInfo;

/// Initialize the panic hook for crash reporting
pub fn init_panic_hook() {
    std::panic::set_hook(Box::new(panic_handler));
    tracing::debug!("Panic hook initialized");
}

/// File name of the crash report written at `at`
pub fn crash_report_name(at: DateTime<Local>) -> String {
    format!("photo_gallery_crash_{}.txt", at.format("%Y%m%d_%H%M%S"))
}

fn payload_message(info: &PanicHookInfo) -> String {
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "<unknown>".to_string())
}

fn panic_handler(info: &PanicHookInfo) {
    let backtrace = Backtrace::new();
    let thread = std::thread::current();
    let thread_name = thread.name().unwrap_or("<unnamed>");
    let now = Local::now();
    let message = payload_message(info);

    let report = format!(
        "=== CRITICAL PANIC ===\n\
         Timestamp: {}\n\
         Thread: {}\n\
         Location: {:?}\n\
         Payload: {}\n\n\
         Stack Trace:\n{:?}",
        now.to_rfc3339(),
        thread_name,
        info.location(),
        message,
        backtrace
    );

    eprintln!("{}", report);
    tracing::error!("{}", report);

    let dump_path = std::env::temp_dir().join(crash_report_name(now));
    if let Err(e) = std::fs::write(&dump_path, &report) {
        eprintln!("Failed to write crash dump: {}", e);
    }

    #[cfg(windows)]
    show_error_dialog(&dump_path, &message);
}

#[cfg(windows)]
fn show_error_dialog(dump_path: &std::path::Path, message: &str) {
    use windows::core::HSTRING;
    use windows::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK};

    let msg = format!(
        "The gallery stopped unexpectedly.\n\n\
         Crash report: {}\n\n\
         Error: {}",
        dump_path.display(),
        message
    );

    unsafe {
        MessageBoxW(
            None,
            &HSTRING::from(msg),
            &HSTRING::from("Photo Gallery - Fatal Error"),
            MB_ICONERROR | MB_OK,
        );
    }
}
