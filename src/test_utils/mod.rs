#![allow(missing_docs)]

pub(crate) mod http;

pub(crate) use http::{get_test_server, get_test_state, response_json};
