//! Live pointer position from the operating system.
//!
//! Windows and macOS expose a global cursor query. Elsewhere (Wayland has
//! none) this returns `None` and the session falls back to the last
//! position the overlay saw.

use snapframe_platform_core::Point;

/// Global pointer position in virtual-desktop pixels.
pub fn cursor_position() -> Option<Point> {
    platform::cursor_position()
}

#[cfg(target_os = "windows")]
mod platform {
    use snapframe_platform_core::Point;
    use windows::Win32::Foundation::POINT;
    use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

    pub fn cursor_position() -> Option<Point> {
        let mut point = POINT::default();
        // SAFETY: GetCursorPos only writes into `point`.
        unsafe { GetCursorPos(&mut point) }.ok()?;
        Some(Point::new(f64::from(point.x), f64::from(point.y)))
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use std::ffi::c_void;

    use snapframe_platform_core::Point;

    #[repr(C)]
    struct CGPoint {
        x: f64,
        y: f64,
    }

    #[link(name = "CoreGraphics", kind = "framework")]
    extern "C" {
        fn CGEventCreate(source: *const c_void) -> *mut c_void;
        fn CGEventGetLocation(event: *const c_void) -> CGPoint;
    }

    #[link(name = "CoreFoundation", kind = "framework")]
    extern "C" {
        fn CFRelease(cf: *const c_void);
    }

    /// Quartz global coordinates: top-left origin, same space as monitor
    /// positions.
    pub fn cursor_position() -> Option<Point> {
        // SAFETY: a null source is allowed; the event is released once read.
        unsafe {
            let event = CGEventCreate(std::ptr::null());
            if event.is_null() {
                return None;
            }
            let location = CGEventGetLocation(event);
            CFRelease(event);
            Some(Point::new(location.x, location.y))
        }
    }
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
mod platform {
    use snapframe_platform_core::Point;

    pub fn cursor_position() -> Option<Point> {
        None
    }
}

#[cfg(all(test, not(any(target_os = "windows", target_os = "macos"))))]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_platform_reports_nothing() {
        assert_eq!(cursor_position(), None);
    }
}
