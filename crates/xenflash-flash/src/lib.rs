//! Device access for the xenflash CLI
//!
//! This crate turns a programmer string such as `internal` or
//! `dummy:genuine=no` into a [`DeviceHandle`]. The CLI only deals with
//! handles and the engines in `xenflash-core`, never with a concrete
//! backend.
//!
//! ```text
//!   CLI (bin/xenflash)
//!        │  programmer string
//!        ▼
//!   xenflash-flash ── open_device() ──► DeviceHandle (Box<dyn XeniumDevice>)
//!        │
//!        ├── xenflash-dummy     (in-memory emulator)
//!        └── xenflash-internal  (/dev/port + /dev/mem)
//! ```

mod handle;
mod registry;

pub use handle::DeviceHandle;
#[cfg(feature = "dummy")]
pub use registry::dummy_config;
pub use registry::{
    available_programmers, open_device, parse_programmer_params, programmer_names_short,
    ProgrammerParams,
};
pub use xenflash_core::programmer::ProgrammerInfo;
