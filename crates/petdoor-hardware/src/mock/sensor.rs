//! Mock core temperature sensor.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Result, traits::TemperatureSensor};

/// Mock temperature sensor whose reading is set through a handle.
#[derive(Debug)]
pub struct MockTemperature {
    celsius: Arc<Mutex<f32>>,
}

impl MockTemperature {
    /// Create a sensor reporting `celsius`.
    pub fn new(celsius: f32) -> (Self, MockTemperatureHandle) {
        let celsius = Arc::new(Mutex::new(celsius));
        let sensor = Self {
            celsius: Arc::clone(&celsius),
        };
        (sensor, MockTemperatureHandle { celsius })
    }
}

impl TemperatureSensor for MockTemperature {
    fn read_celsius(&self) -> Result<f32> {
        Ok(*self.celsius.lock())
    }
}

/// Handle for changing the simulated temperature.
#[derive(Debug, Clone)]
pub struct MockTemperatureHandle {
    celsius: Arc<Mutex<f32>>,
}

impl MockTemperatureHandle {
    /// Set the reported temperature.
    pub fn set_celsius(&self, celsius: f32) {
        *self.celsius.lock() = celsius;
    }
}
