// Each test binary uses a different subset of the helpers
#![allow(dead_code)]

pub mod api_test_helper;
pub mod test_data_builder;
