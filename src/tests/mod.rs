//! Integration tests
//!
//! Drive the full router through tower, against the in-memory storage

mod helper;
mod trash;
