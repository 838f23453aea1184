//! Translator dispatch layer.
//!
//! Decides which translators apply to a device from its vendor, hardware model and
//! software version, and plans the native input paths needed to produce a requested
//! set of canonical outputs.
//!
//! ```
//! use std::sync::Arc;
//! use telemetry_translator::{
//!     DeviceMetadata, Notification, OutputSuperset, Path, PlatformConstraint, Translate,
//!     TranslateError, Translator, TranslatorRegistry, VersionRange,
//! };
//!
//! let passthrough: Arc<dyn Translate> = Arc::new(
//!     |n: &Notification| -> Result<Option<Notification>, TranslateError> { Ok(Some(n.clone())) },
//! );
//! let mut registry = TranslatorRegistry::new();
//! registry
//!     .register(
//!         Translator::builder("lag-counters", passthrough)
//!             .output(
//!                 "openconfig:/interfaces/interface/state/counters/out-octets",
//!                 ["/interfaces/interface/state/counters/out-octets"],
//!             )
//!             .applies_to(
//!                 PlatformConstraint::vendor("Arista")
//!                     .with_software_version_range(VersionRange::new("4.34", "4.35")),
//!             )
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//!
//! let device = DeviceMetadata::new("arista", "DCS-7050", "4.34.2F");
//! let wanted: Path = "/interfaces/interface[name=PC1]/state/counters/out-octets".parse().unwrap();
//! let plan = registry
//!     .required_inputs(&OutputSuperset::from_paths("openconfig", [wanted]), &device)
//!     .unwrap();
//! assert_eq!(plan.input_paths.len(), 1);
//! ```

pub(crate) mod metadata;
pub(crate) mod registry;
pub(crate) mod translator;
pub(crate) mod version;
