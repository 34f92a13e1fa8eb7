//! Configuration persistence.
//!
//! [`NvsAdapter`] implements [`ConfigPort`] over the ESP32's NVS flash
//! partition, storing the whole [`SystemConfig`] as one postcard blob. On
//! the host the same adapter runs over an in-memory map so the load/save
//! and validation paths are exercised by ordinary unit tests.
//!
//! Validation happens on both paths: a blob that deserializes but carries
//! out-of-range values is rejected, because a zeroed current threshold
//! would silently disable the graceful-shutdown safety check.

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

const CONFIG_NAMESPACE: &str = "timeswitch";
const CONFIG_KEY: &str = "syscfg";

/// Upper bound on the serialized config blob.
const MAX_BLOB_LEN: usize = 256;

#[cfg(target_os = "espidf")]
use core::cell::RefCell;
#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};

#[cfg(not(target_os = "espidf"))]
use std::{cell::RefCell, collections::HashMap};

/// NVS-backed (or in-memory, on the host) configuration store.
pub struct NvsAdapter {
    #[cfg(target_os = "espidf")]
    nvs: RefCell<EspNvs<NvsDefault>>,
    #[cfg(not(target_os = "espidf"))]
    store: RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new() -> anyhow::Result<Self> {
        let partition = EspDefaultNvsPartition::take()?;
        let nvs = EspNvs::new(partition, CONFIG_NAMESPACE, true)?;
        Ok(Self {
            nvs: RefCell::new(nvs),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            store: RefCell::new(HashMap::new()),
        })
    }

    fn read_blob(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            let nvs = self.nvs.borrow();
            let mut buf = [0u8; MAX_BLOB_LEN];
            match nvs.get_blob(CONFIG_KEY, &mut buf) {
                Ok(Some(data)) => Ok(Some(data.to_vec())),
                Ok(None) => Ok(None),
                Err(e) => {
                    warn!("NVS read failed: {e}");
                    Err(ConfigError::IoError)
                }
            }
        }
        #[cfg(not(target_os = "espidf"))]
        {
            Ok(self.store.borrow().get(CONFIG_KEY).cloned())
        }
    }

    fn write_blob(&self, blob: &[u8]) -> Result<(), ConfigError> {
        if blob.len() > MAX_BLOB_LEN {
            return Err(ConfigError::StorageFull);
        }
        #[cfg(target_os = "espidf")]
        {
            let mut nvs = self.nvs.borrow_mut();
            nvs.set_blob(CONFIG_KEY, blob).map_err(|e| {
                warn!("NVS write failed: {e}");
                ConfigError::IoError
            })
        }
        #[cfg(not(target_os = "espidf"))]
        {
            self.store
                .borrow_mut()
                .insert(CONFIG_KEY.to_string(), blob.to_vec());
            Ok(())
        }
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let Some(blob) = self.read_blob()? else {
            info!("no stored config, using defaults");
            return Ok(SystemConfig::default());
        };

        let config: SystemConfig = postcard::from_bytes(&blob).map_err(|e| {
            warn!("stored config failed to deserialize: {e}");
            ConfigError::Corrupted
        })?;
        validate_config(&config)?;
        Ok(config)
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let blob = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        self.write_blob(&blob)?;
        info!("config persisted ({} bytes)", blob.len());
        Ok(())
    }
}

/// Range checks applied to every loaded or saved configuration.
fn validate_config(config: &SystemConfig) -> Result<(), ConfigError> {
    let cal = &config.current_sense;
    if !(cal.supply_mv > 0.0 && cal.supply_mv <= 12_000.0) {
        return Err(ConfigError::ValidationFailed(
            "supply_mv out of range (0, 12000]",
        ));
    }
    if cal.adc_full_scale == 0 {
        return Err(ConfigError::ValidationFailed("adc_full_scale must be > 0"));
    }
    if !(cal.volts_per_amp > 0.0) {
        return Err(ConfigError::ValidationFailed("volts_per_amp must be > 0"));
    }
    if !(cal.threshold_ma > 0.0) {
        // A zero threshold makes any idle reading count as a live load.
        return Err(ConfigError::ValidationFailed("threshold_ma must be > 0"));
    }
    if cal.samples == 0 {
        return Err(ConfigError::ValidationFailed("samples must be > 0"));
    }
    if config.loop_interval_ms == 0 || config.loop_interval_ms > 10_000 {
        return Err(ConfigError::ValidationFailed(
            "loop_interval_ms out of range (0, 10000]",
        ));
    }
    Ok(())
}
