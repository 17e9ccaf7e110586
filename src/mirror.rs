/// Window Mirror: applies the focused window's minimized/restored state to
/// the application window
use crate::monitor::FocusEvent;
use crate::platform::{Visibility, WindowHandle, WindowPlatform};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct WindowMirror {
    platform: Arc<dyn WindowPlatform>,
    target: WindowHandle,
}

impl WindowMirror {
    pub fn new(platform: Arc<dyn WindowPlatform>, target: WindowHandle) -> Self {
        WindowMirror { platform, target }
    }

    /// Apply one focus event. Platform errors are logged, never propagated.
    ///
    /// Returns the visibility command issued, if any. No command is issued
    /// when the target is already in the wanted state.
    pub fn apply(&self, event: FocusEvent) -> Option<Visibility> {
        if event.handle == self.target {
            return None;
        }

        match self.platform.is_minimized(self.target) {
            Ok(minimized) if minimized == event.minimized => return None,
            Ok(_) => {}
            Err(e) => {
                warn!("Error in handling window state change: {}", e);
                return None;
            }
        }

        let visibility = if event.minimized {
            Visibility::Minimized
        } else {
            Visibility::Restored
        };

        match self.platform.set_visibility(self.target, visibility) {
            Ok(()) => {
                debug!("[Mirror] {:?} window {} after focus moved to {}", visibility, self.target, event.handle);
                Some(visibility)
            }
            Err(e) => {
                warn!("Error in handling window state change: {}", e);
                None
            }
        }
    }
}
