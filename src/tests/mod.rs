//! Binary-level tests exercising the full pipeline end to end.

mod pipeline_tests;
