// ABOUTME: Shared pieces of the mediakey command line tool
// ABOUTME: Logging setup and plain-text rendering of parsed temp tokens

pub mod logging;
pub mod render;
