// Include the front-end validator tests
mod frontend;

// Include the generator tests
mod generator;

// Include the cache tests
mod cache;

// Integration tests - full pipeline runs
mod integration;

mod common;
