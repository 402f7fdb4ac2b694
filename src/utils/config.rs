//! Constants shared across the crate: variable-table layout, recognized
//! trace formats, logging categories.

/// Trace-file extensions the format resolver accepts (lowercase, no dot).
/// Anything else is an unsupported format at source construction time.
pub const RECOGNIZED_EXTENSIONS: &[&str] = &["osi", "osc", "jsonl"];

// Variable-table capacities. References at or beyond these fail the
// whole batch accessor call.
pub const BOOLEAN_VAR_COUNT: usize = 2;
pub const INTEGER_VAR_COUNT: usize = 8;
pub const REAL_VAR_COUNT: usize = 2;
pub const STRING_VAR_COUNT: usize = 2;

// Fixed slot meanings within the variable table.

/// Boolean: a valid output is available after the last step
pub const BOOLEAN_VALID_IDX: usize = 0;

/// Integer: published buffer base address, low 32-bit word
pub const INTEGER_OUT_BASE_LO_IDX: usize = 0;
/// Integer: published buffer base address, high 32-bit word
pub const INTEGER_OUT_BASE_HI_IDX: usize = 1;
/// Integer: published buffer length in bytes
pub const INTEGER_OUT_SIZE_IDX: usize = 2;
/// Integer: object count carried by the last published message
pub const INTEGER_OBJECT_COUNT_IDX: usize = 3;

/// String: directory scanned for trace files
pub const STRING_TRACE_DIR_IDX: usize = 0;
/// String: trace file name override; empty means "scan the directory"
pub const STRING_TRACE_FILE_IDX: usize = 1;

/// Full default set of logging categories. `set_debug_logging` with an
/// empty category list restores this set.
pub const DEFAULT_LOG_CATEGORIES: &[&str] = &["api", "player", "trace"];

// Container format framing (`.osc`)
pub const CONTAINER_MAGIC: &[u8; 4] = b"OSCT";
pub const CONTAINER_VERSION: u8 = 1;
