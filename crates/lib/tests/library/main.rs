mod common;
mod pipeline_tests;
mod properties_tests;
