//! Minimum slot sizes for well-known string parameters
//!
//! System software reads these parameters as fixed-size fields, so a newly
//! created entry reserves at least this many bytes even when the initial value
//! is shorter.

const RESERVED_LENGTHS: &[(&str, u32)] = &[
    ("APP_VER", 8),
    ("CATEGORY", 4),
    ("CONTENT_ID", 48),
    ("FORMAT", 4),
    ("INSTALL_DIR_SAVEDATA", 12),
    ("PUBTOOLINFO", 512),
    ("SAVE_DATA_TRANSFER_TITLE_ID_LIST", 60),
    ("SERVICE_ID_ADDCONT_ADD_1", 20),
    ("SERVICE_ID_ADDCONT_ADD_2", 20),
    ("SERVICE_ID_ADDCONT_ADD_3", 20),
    ("SERVICE_ID_ADDCONT_ADD_4", 20),
    ("SERVICE_ID_ADDCONT_ADD_5", 20),
    ("SERVICE_ID_ADDCONT_ADD_6", 20),
    ("SERVICE_ID_ADDCONT_ADD_7", 20),
    ("TITLE_ID", 12),
    ("VERSION", 8),
];

/// Minimum `max_length` for a new string entry named `key`, if it has one
pub fn reserved_length(key: &str) -> Option<u32> {
    RESERVED_LENGTHS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|&(_, length)| length)
}
