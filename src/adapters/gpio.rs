//! Pin channel adapters.
//!
//! Three [`PinChannel`] implementations, mirroring the channel kinds the
//! power switch needs (two digital outputs, one analog input, two digital
//! inputs):
//!
//! - [`GpioChannel`] — ESP-IDF GPIO/ADC line, the production adapter.
//! - [`DigitalInChannel`] / [`DigitalOutChannel`] — generic wrappers over
//!   `embedded-hal` 1.0 digital pins for non-ESP boards.
//! - [`SimChannel`] — host-side simulated line backed by a shared atomic,
//!   used by unit and integration tests (dual-target pattern: the real
//!   backends live behind `#[cfg(target_os = "espidf")]`).

use crate::app::ports::PinChannel;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys;

// ───────────────────────────────────────────────────────────────
// ESP-IDF GPIO / ADC channel
// ───────────────────────────────────────────────────────────────

/// One ESP32 line, configured at construction as digital in/out or
/// analog in (matching the direction flags of the port contract).
pub struct GpioChannel {
    pin: i32,
    output: bool,
    analog: bool,
    /// ADC1 channel index for analog inputs.
    adc_channel: u32,
}

impl GpioChannel {
    pub fn digital_output(pin: i32) -> Self {
        let ch = Self {
            pin,
            output: true,
            analog: false,
            adc_channel: 0,
        };
        ch.configure();
        ch
    }

    pub fn digital_input(pin: i32) -> Self {
        let ch = Self {
            pin,
            output: false,
            analog: false,
            adc_channel: 0,
        };
        ch.configure();
        ch
    }

    pub fn analog_input(pin: i32, adc_channel: u32) -> Self {
        let ch = Self {
            pin,
            output: false,
            analog: true,
            adc_channel,
        };
        ch.configure();
        ch
    }

    #[cfg(target_os = "espidf")]
    fn configure(&self) {
        if self.analog {
            // SAFETY: one-shot ADC1 configuration from the single main task.
            unsafe {
                sys::adc1_config_width(sys::adc_bits_width_t_ADC_WIDTH_BIT_10);
                sys::adc1_config_channel_atten(
                    self.adc_channel as sys::adc1_channel_t,
                    sys::adc_atten_t_ADC_ATTEN_DB_11,
                );
            }
        } else {
            let mode = if self.output {
                sys::gpio_mode_t_GPIO_MODE_OUTPUT
            } else {
                sys::gpio_mode_t_GPIO_MODE_INPUT
            };
            // SAFETY: pin configuration from the single main task.
            unsafe {
                sys::gpio_set_direction(self.pin, mode);
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn configure(&self) {
        log::debug!(
            "GpioChannel pin {} ({}) simulated on host",
            self.pin,
            if self.analog {
                "analog in"
            } else if self.output {
                "digital out"
            } else {
                "digital in"
            }
        );
    }
}

impl PinChannel for GpioChannel {
    #[cfg(target_os = "espidf")]
    fn read(&mut self, samples: u16) -> u16 {
        if self.analog {
            let samples = samples.max(1);
            let mut sum: u32 = 0;
            for _ in 0..samples {
                // SAFETY: ADC1 one-shot read, single-task access.
                sum += unsafe { sys::adc1_get_raw(self.adc_channel as sys::adc1_channel_t) } as u32;
            }
            (sum / u32::from(samples)) as u16
        } else {
            // SAFETY: plain register read.
            unsafe { sys::gpio_get_level(self.pin) as u16 }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn read(&mut self, _samples: u16) -> u16 {
        0
    }

    #[cfg(target_os = "espidf")]
    fn set(&mut self, high: bool) {
        if self.output {
            // SAFETY: plain register write.
            unsafe {
                sys::gpio_set_level(self.pin, u32::from(high));
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn set(&mut self, _high: bool) {}
}

// ───────────────────────────────────────────────────────────────
// Generic embedded-hal digital wrappers
// ───────────────────────────────────────────────────────────────

/// [`PinChannel`] over any `embedded-hal` input pin. Reads yield 0/1; the
/// sample count is ignored for digital lines. `set` is a no-op.
pub struct DigitalInChannel<P>(pub P);

impl<P: embedded_hal::digital::InputPin> PinChannel for DigitalInChannel<P> {
    fn read(&mut self, _samples: u16) -> u16 {
        match self.0.is_high() {
            Ok(high) => u16::from(high),
            Err(_) => {
                log::warn!("digital input read failed, reporting low");
                0
            }
        }
    }

    fn set(&mut self, _high: bool) {}
}

/// [`PinChannel`] over any `embedded-hal` output pin. Reads report the
/// last commanded level.
pub struct DigitalOutChannel<P> {
    pin: P,
    level: bool,
}

impl<P: embedded_hal::digital::OutputPin> DigitalOutChannel<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, level: false }
    }
}

impl<P: embedded_hal::digital::OutputPin> PinChannel for DigitalOutChannel<P> {
    fn read(&mut self, _samples: u16) -> u16 {
        u16::from(self.level)
    }

    fn set(&mut self, high: bool) {
        let result = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if result.is_err() {
            log::warn!("digital output write failed");
        } else {
            self.level = high;
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation channel
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use super::PinChannel;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU16, Ordering};

    /// Simulated line backed by a shared atomic raw value.
    ///
    /// Cloning yields another handle to the same line, so a test can keep
    /// one handle while the switch owns the other and inject readings at
    /// any point.
    #[derive(Clone)]
    pub struct SimChannel {
        value: Arc<AtomicU16>,
    }

    impl SimChannel {
        pub fn new(initial: u16) -> Self {
            Self {
                value: Arc::new(AtomicU16::new(initial)),
            }
        }

        /// Inject a raw value (sensor reading or switch position).
        pub fn set_raw(&self, raw: u16) {
            self.value.store(raw, Ordering::Relaxed);
        }

        /// Observe the current raw value (e.g. a driven output level).
        pub fn raw(&self) -> u16 {
            self.value.load(Ordering::Relaxed)
        }
    }

    impl PinChannel for SimChannel {
        fn read(&mut self, _samples: u16) -> u16 {
            self.value.load(Ordering::Relaxed)
        }

        fn set(&mut self, high: bool) {
            self.value.store(u16::from(high), Ordering::Relaxed);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub use sim::SimChannel;
