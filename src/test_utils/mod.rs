#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod http;

pub(crate) use db::{must_create_budget, must_create_test_connection, must_create_user};
pub(crate) use http::{assert_content_type, assert_status_not_found, assert_status_ok};
