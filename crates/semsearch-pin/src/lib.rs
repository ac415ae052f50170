//! Requirements pinning for the semsearch tools.
//!
//! Rewrites a `requirements.txt` style manifest so each declared package
//! is pinned (`name==version`) to the version installed in the local
//! Python environment. Packages that are not installed keep their
//! original line and are reported as unresolved.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod manifest;
pub mod pinner;
pub mod registry;

pub use error::{PinError, PinResult};
pub use manifest::{normalize_package_name, ManifestLine};
pub use pinner::{pin_manifest, update_requirements_file, LineOutcome, PinReport};
pub use registry::{canonical_name, InstalledPackages, SitePackages};
