// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Output-side concerns shared by the use cases:
//
//   split_store.rs: Saving and loading prepared splits
//                    One safetensors file per split plus the
//                    run configuration as JSON, so a trainer can
//                    consume the data without re-running the
//                    loader.
//
//   report.rs     : Per-split class counts
//                    Logged and written to summary.csv.

/// Prepared split persistence
pub mod split_store;

/// Split summary CSV writer
pub mod report;
