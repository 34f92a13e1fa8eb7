//! Monotonic time source.
//!
//! The domain core takes timestamps as plain `u32` milliseconds and handles
//! wraparound itself, so the only thing this adapter provides is a
//! monotonic millisecond counter: the ESP-IDF high-resolution timer on
//! target, `std::time::Instant` on the host.

#[cfg(not(target_os = "espidf"))]
use std::time::Instant;

pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: Instant,
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: Instant::now(),
        }
    }

    /// Milliseconds since boot, wrapping at `u32::MAX` (~49.7 days).
    pub fn uptime_ms(&self) -> u32 {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: esp_timer_get_time has no preconditions after boot.
            (unsafe { esp_idf_svc::sys::esp_timer_get_time() } / 1000) as u32
        }
        #[cfg(not(target_os = "espidf"))]
        {
            self.start.elapsed().as_millis() as u32
        }
    }
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}
