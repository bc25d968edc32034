//! Runtime-tunable parameters.
//!
//! The evaluator owns one parameter, FACTOR, a multiplier applied to every
//! computed result.  Its validity decides which value reads return:
//!
//! | Validity  | `get()` returns        |
//! |-----------|------------------------|
//! | `Valid`   | the stored value       |
//! | `Default` | the configured default |
//! | `Invalid` | aborts (contract bug)  |
//!
//! Persistence goes through [`StoragePort`] as a postcard-encoded record.

use core::fmt;
use core::str::FromStr;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::StoragePort;
use crate::error::{Error, StorageError, UnknownParam};

/// Parameters known to the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamId {
    Factor,
}

impl ParamId {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Factor => "FACTOR",
        }
    }

    /// Storage key inside the component's namespace.
    const fn key(self) -> &'static str {
        match self {
            Self::Factor => "factor",
        }
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamId {
    type Err = UnknownParam;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FACTOR" => Ok(Self::Factor),
            _ => Err(UnknownParam),
        }
    }
}

/// Validity reported alongside a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamValid {
    Valid,
    Default,
    Invalid,
}

#[derive(Serialize, Deserialize)]
struct StoredParam {
    value: f32,
}

/// FACTOR value plus validity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingParameter {
    value: f32,
    validity: ParamValid,
    default: f32,
}

impl ScalingParameter {
    /// Start out on the compiled-in default.
    pub fn new(default: f32) -> Self {
        Self {
            value: default,
            validity: ParamValid::Default,
            default,
        }
    }

    /// Replace value and validity.  No validation happens here; the owner
    /// checks validity when it next reads.
    pub fn set(&mut self, value: f32, validity: ParamValid) {
        self.value = value;
        self.validity = validity;
    }

    pub fn validity(&self) -> ParamValid {
        self.validity
    }

    /// Effective value.
    ///
    /// # Panics
    ///
    /// Reading an `Invalid` parameter means a producer broke the parameter
    /// contract; continuing would silently compute garbage.
    pub fn get(&self) -> f32 {
        match self.validity {
            ParamValid::Valid => self.value,
            ParamValid::Default => self.default,
            ParamValid::Invalid => {
                error!("FACTOR read while {:?}", self.validity);
                panic!("parameter FACTOR has validity {:?}", self.validity);
            }
        }
    }

    /// Load the stored value.
    ///
    /// A missing or undecodable record falls back to the default; a store
    /// that cannot be read at all leaves the parameter `Invalid`.
    pub fn load(&mut self, store: &dyn StoragePort, namespace: &str) -> ParamValid {
        let mut buf = [0u8; 16];
        match store.read(namespace, ParamId::Factor.key(), &mut buf) {
            Ok(len) => match postcard::from_bytes::<StoredParam>(&buf[..len]) {
                Ok(stored) => self.set(stored.value, ParamValid::Valid),
                Err(_) => {
                    warn!("FACTOR record corrupted, using default {}", self.default);
                    self.set(self.default, ParamValid::Default);
                }
            },
            Err(StorageError::NotFound) => self.set(self.default, ParamValid::Default),
            Err(e) => {
                warn!("FACTOR load failed: {}", e);
                self.set(self.default, ParamValid::Invalid);
            }
        }
        info!("FACTOR loaded: value={} validity={:?}", self.value, self.validity);
        self.validity
    }

    /// Persist the current value.  Only an explicitly set value is saved.
    pub fn save(&self, store: &mut dyn StoragePort, namespace: &str) -> Result<(), Error> {
        if self.validity != ParamValid::Valid {
            return Err(StorageError::NotFound.into());
        }
        let bytes = postcard::to_allocvec(&StoredParam { value: self.value })
            .map_err(|_| StorageError::IoError)?;
        store.write(namespace, ParamId::Factor.key(), &bytes)?;
        Ok(())
    }
}
