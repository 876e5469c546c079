//! Process-wide model cache.
//!
//! Loading an ASR model is expensive, so handles are constructed once per
//! [`ModelKind`] and live for the rest of the process; there is no
//! eviction. The cache is an explicit object handed to the pipeline rather
//! than module-level state, keyed by model kind, with the device picked at
//! construction time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, info};

use crate::runtime::{AsrModel, Device, ModelRuntime, RuntimeError};
use crate::ModelKind;

pub struct ModelCache {
    runtime: Arc<dyn ModelRuntime>,
    device: Device,
    loaded: Mutex<HashMap<ModelKind, Arc<dyn AsrModel>>>,
}

impl ModelCache {
    pub fn new(runtime: Arc<dyn ModelRuntime>, device: Device) -> Self {
        Self {
            runtime,
            device,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Return the handle for `kind`, loading it on first request.
    ///
    /// The lock is held across construction, so concurrent first requests
    /// for the same kind cannot duplicate the load. A failed load inserts
    /// nothing; the next request retries.
    pub fn get(&self, kind: ModelKind) -> Result<Arc<dyn AsrModel>, RuntimeError> {
        let mut loaded = match self.loaded.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = loaded.get(&kind) {
            debug!("model {kind} already loaded");
            return Ok(Arc::clone(handle));
        }

        info!("loading model {kind} on {}", self.device);
        let handle = self.runtime.load_asr(kind, self.device)?;
        loaded.insert(kind, Arc::clone(&handle));
        Ok(handle)
    }
}
