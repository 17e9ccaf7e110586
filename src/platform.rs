//! Native window capability used by the focus monitor and the window mirror.
//!
//! Only Windows has an implementation; elsewhere `native()` returns `None`
//! and the monitor/mirror pair stays disabled.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Opaque OS handle of a top-level window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Minimized,
    Restored,
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Window management is not supported on this platform")]
    Unsupported,
    #[error("Window {0} no longer exists")]
    InvalidHandle(WindowHandle),
    #[error("Platform call failed: {0}")]
    Call(String),
}

pub trait WindowPlatform: Send + Sync {
    /// Window currently holding input focus, if any
    fn foreground_window(&self) -> Result<Option<WindowHandle>, PlatformError>;

    fn is_minimized(&self, window: WindowHandle) -> Result<bool, PlatformError>;

    fn set_visibility(
        &self,
        window: WindowHandle,
        visibility: Visibility,
    ) -> Result<(), PlatformError>;

    /// All top-level windows with exactly this title, in Z order
    fn find_windows(&self, title: &str) -> Result<Vec<WindowHandle>, PlatformError>;

    /// Id of the process that created the window
    fn owner_process(&self, window: WindowHandle) -> Result<u32, PlatformError>;
}

/// The window titled `title` that belongs to this process. Other programs
/// can show the same title (an Explorer window on a folder of that name).
pub fn find_own_window(
    platform: &dyn WindowPlatform,
    title: &str,
) -> Result<Option<WindowHandle>, PlatformError> {
    find_window_of_process(platform, title, std::process::id())
}

fn find_window_of_process(
    platform: &dyn WindowPlatform,
    title: &str,
    process_id: u32,
) -> Result<Option<WindowHandle>, PlatformError> {
    for window in platform.find_windows(title)? {
        match platform.owner_process(window) {
            Ok(owner) if owner == process_id => return Ok(Some(window)),
            Ok(_) => continue,
            // Closed between enumeration and lookup
            Err(PlatformError::InvalidHandle(_)) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

/// Platform implementation for the current target, if there is one
pub fn native() -> Option<Arc<dyn WindowPlatform>> {
    #[cfg(windows)]
    {
        Some(Arc::new(win32::Win32Platform))
    }

    #[cfg(not(windows))]
    {
        None
    }
}

#[cfg(windows)]
mod win32 {
    use super::{PlatformError, Visibility, WindowHandle, WindowPlatform};
    use windows::core::PCWSTR;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::WindowsAndMessaging::{
        FindWindowExW, GetForegroundWindow, GetWindowThreadProcessId, IsIconic, IsWindow,
        ShowWindow, SW_RESTORE, SW_SHOWMINNOACTIVE,
    };

    pub struct Win32Platform;

    fn checked(window: WindowHandle) -> Result<HWND, PlatformError> {
        let hwnd = HWND(window.0);
        // SAFETY: IsWindow accepts any handle value
        if unsafe { IsWindow(hwnd) }.as_bool() {
            Ok(hwnd)
        } else {
            Err(PlatformError::InvalidHandle(window))
        }
    }

    impl WindowPlatform for Win32Platform {
        fn foreground_window(&self) -> Result<Option<WindowHandle>, PlatformError> {
            let hwnd = unsafe { GetForegroundWindow() };
            if hwnd == HWND::default() {
                Ok(None)
            } else {
                Ok(Some(WindowHandle(hwnd.0)))
            }
        }

        fn is_minimized(&self, window: WindowHandle) -> Result<bool, PlatformError> {
            let hwnd = checked(window)?;
            Ok(unsafe { IsIconic(hwnd) }.as_bool())
        }

        fn set_visibility(
            &self,
            window: WindowHandle,
            visibility: Visibility,
        ) -> Result<(), PlatformError> {
            let hwnd = checked(window)?;
            let iconic = unsafe { IsIconic(hwnd) }.as_bool();
            // SW_RESTORE on a normal window un-maximizes and activates it
            let command = match visibility {
                Visibility::Minimized if !iconic => SW_SHOWMINNOACTIVE,
                Visibility::Restored if iconic => SW_RESTORE,
                _ => return Ok(()),
            };
            // Return value is the previous visibility, not an error code
            let _ = unsafe { ShowWindow(hwnd, command) };
            Ok(())
        }

        fn find_windows(&self, title: &str) -> Result<Vec<WindowHandle>, PlatformError> {
            let title: Vec<u16> = title.encode_utf16().chain(Some(0)).collect();
            let mut found = Vec::new();
            let mut after = HWND::default();
            loop {
                let hwnd = unsafe {
                    FindWindowExW(HWND::default(), after, None, PCWSTR(title.as_ptr()))
                };
                if hwnd == HWND::default() {
                    return Ok(found);
                }
                found.push(WindowHandle(hwnd.0));
                after = hwnd;
            }
        }

        fn owner_process(&self, window: WindowHandle) -> Result<u32, PlatformError> {
            let hwnd = checked(window)?;
            let mut process_id = 0u32;
            unsafe { GetWindowThreadProcessId(hwnd, Some(&mut process_id)) };
            if process_id == 0 {
                Err(PlatformError::InvalidHandle(window))
            } else {
                Ok(process_id)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted platform for monitor and mirror tests

    use super::*;
    use std::collections::{HashSet, VecDeque};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct FakePlatform {
        /// Foreground handles returned by successive polls; the last one repeats
        pub foreground: Mutex<VecDeque<Option<WindowHandle>>>,
        pub minimized: Mutex<HashSet<WindowHandle>>,
        pub calls: Mutex<Vec<(WindowHandle, Visibility)>>,
        pub fail_visibility: bool,
        /// Titled windows in Z order, with their owning process
        pub windows: Vec<(String, WindowHandle, u32)>,
    }

    impl FakePlatform {
        pub fn with_sequence(handles: &[isize]) -> Self {
            FakePlatform {
                foreground: Mutex::new(handles.iter().map(|h| Some(WindowHandle(*h))).collect()),
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<(WindowHandle, Visibility)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl WindowPlatform for FakePlatform {
        fn foreground_window(&self) -> Result<Option<WindowHandle>, PlatformError> {
            let mut queue = self.foreground.lock().unwrap();
            if queue.len() > 1 {
                Ok(queue.pop_front().flatten())
            } else {
                Ok(queue.front().copied().flatten())
            }
        }

        fn is_minimized(&self, window: WindowHandle) -> Result<bool, PlatformError> {
            Ok(self.minimized.lock().unwrap().contains(&window))
        }

        fn set_visibility(
            &self,
            window: WindowHandle,
            visibility: Visibility,
        ) -> Result<(), PlatformError> {
            if self.fail_visibility {
                return Err(PlatformError::Call("ShowWindow rejected".to_string()));
            }
            let mut minimized = self.minimized.lock().unwrap();
            match visibility {
                Visibility::Minimized => minimized.insert(window),
                Visibility::Restored => minimized.remove(&window),
            };
            self.calls.lock().unwrap().push((window, visibility));
            Ok(())
        }

        fn find_windows(&self, title: &str) -> Result<Vec<WindowHandle>, PlatformError> {
            Ok(self
                .windows
                .iter()
                .filter(|(t, _, _)| t == title)
                .map(|(_, handle, _)| *handle)
                .collect())
        }

        fn owner_process(&self, window: WindowHandle) -> Result<u32, PlatformError> {
            self.windows
                .iter()
                .find(|(_, handle, _)| *handle == window)
                .map(|(_, _, pid)| *pid)
                .ok_or(PlatformError::InvalidHandle(window))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakePlatform;
    use super::*;

    const TITLE: &str = "Sketch Practice";

    #[test]
    fn test_find_window_skips_other_processes() {
        let platform = FakePlatform {
            windows: vec![
                (TITLE.to_string(), WindowHandle(0x10), 900),
                ("Notes".to_string(), WindowHandle(0x20), 42),
                (TITLE.to_string(), WindowHandle(0x30), 42),
            ],
            ..Default::default()
        };

        assert_eq!(
            find_window_of_process(&platform, TITLE, 42).unwrap(),
            Some(WindowHandle(0x30))
        );
        assert_eq!(find_window_of_process(&platform, TITLE, 7).unwrap(), None);
    }

    #[test]
    fn test_find_own_window_uses_current_process() {
        let platform = FakePlatform {
            windows: vec![
                (TITLE.to_string(), WindowHandle(0x10), std::process::id().wrapping_add(1)),
                (TITLE.to_string(), WindowHandle(0x11), std::process::id()),
            ],
            ..Default::default()
        };
        assert_eq!(find_own_window(&platform, TITLE).unwrap(), Some(WindowHandle(0x11)));
    }
}
