// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// Orchestrates the data and infrastructure layers to accomplish
// one goal per use case. No array math and no printing here;
// printing is Layer 1, the math is Layer 4.

// The load → shuffle → split → preprocess function
pub mod pipeline;

// Run the pipeline and write the prepared splits
pub mod prepare_use_case;

// Report what the class folders contain
pub mod inspect_use_case;
