//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter        | Implements                  | Connects to            |
//! |----------------|-----------------------------|------------------------|
//! | `log_sink`     | EventSink, TelemetrySink    | `log` facade           |
//! | `memory_store` | StoragePort                 | in-memory map (host)   |

pub mod log_sink;
pub mod memory_store;
