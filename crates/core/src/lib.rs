//! `mlock-core` -- lock code lifecycle and responsiveness monitoring.
//!
//! Pure domain logic over device snapshots fetched elsewhere: display
//! ordering of managed lock codes, warnings when a lock's controller is slow
//! or silently failing to add codes, and device-level health signals.
//! Nothing here performs I/O; every time comparison goes through a
//! [`clock::Clock`].

pub mod clock;
pub mod config;
pub mod device;
pub mod device_health;
pub mod error;
pub mod humanize;
pub mod lifecycle;
pub mod lock_code;
pub mod responsiveness;
pub mod types;

pub use device::Device;
pub use error::CoreError;
pub use lifecycle::sort_lock_codes;
pub use lock_code::{LockCodeStatus, ManagedLockCode};
pub use responsiveness::{get_lock_responsiveness_warnings, ResponsivenessWarning};
