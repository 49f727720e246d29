//! Integration tests for tabstash

mod cli_test;
mod filename_test;
mod firefox_test;
mod helpers;
mod pipeline_test;
