// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Plain structs, enums and traits describing the data that flows
// through the pipeline. Nothing here touches the filesystem or
// the burn framework.

// Everything that can go wrong before training starts
pub mod error;

// Samples paired with class labels
pub mod sample;

// Split bounds, index ranges and the three resulting datasets
pub mod split;

// Normalized splits with one-hot targets
pub mod prepared;

// On-disk and in-tensor layout options
pub mod layout;

// Abstractions the data layer implements
pub mod traits;
