//! I/O: appliance catalog tables and profile export.

/// Appliance catalog load/save (one CSV row per appliance).
pub mod catalog;
/// CSV export for generated load profiles.
pub mod export;
