//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When test data changes (catalog IDs, names, cover bytes),
//! update only this file.

// ============================================================================
// Test Catalog IDs
// ============================================================================

/// Author ID for "Frank Herbert"
pub const AUTHOR_1_ID: &str = "author-1";

/// Author ID for "Isaac Asimov"
pub const AUTHOR_2_ID: &str = "author-2";

/// Author ID for "Ursula K. Le Guin", who has no books
pub const AUTHOR_3_ID: &str = "author-3";

/// Book ID for "Dune" by Frank Herbert
pub const BOOK_1_ID: &str = "book-1";

/// Book ID for "Foundation" by Isaac Asimov
pub const BOOK_2_ID: &str = "book-2";

// ============================================================================
// Test Catalog Names
// ============================================================================

pub const AUTHOR_1_NAME: &str = "Frank Herbert";

pub const AUTHOR_2_NAME: &str = "Isaac Asimov";

pub const AUTHOR_3_NAME: &str = "Ursula K. Le Guin";

/// Book 1 title, published 2000-06-01
pub const BOOK_1_TITLE: &str = "Dune";

pub const BOOK_1_PUBLISHED_ON: &str = "2000-06-01";

/// Book 2 title, published 1990-03-15
pub const BOOK_2_TITLE: &str = "Foundation";

pub const BOOK_2_PUBLISHED_ON: &str = "1990-03-15";

// ============================================================================
// Test Cover Data
// ============================================================================

/// PNG signature followed by a few payload bytes
pub const TEST_PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3, 4];

/// JPEG SOI marker followed by a few payload bytes
pub const TEST_JPEG_BYTES: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0, 0x10, b'J', b'F', b'I', b'F'];

/// BMP header start, a type the catalog does not accept
pub const TEST_BMP_BYTES: &[u8] = &[b'B', b'M', 0x3a, 0, 0, 0];

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Cover size limit used by test servers (bytes)
pub const TEST_MAX_COVER_SIZE_BYTES: u64 = 64 * 1024;
