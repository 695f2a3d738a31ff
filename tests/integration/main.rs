//! Integration tests for mover-watch

mod common;
mod e2e_test;
mod scheduler_test;
