//! Constants used throughout the multistep crate

/// Delay applied to validators so messages don't flash while the user types.
pub const DEFAULT_VALIDATION_DEBOUNCE_MS: u64 = 250;

/// Text a terminal user enters to go back to the previous step.
pub const BACK_TOKEN: &str = "<";

/// Label of the extra item appended to choice lists when back is offered.
pub const BACK_ITEM_LABEL: &str = "< Back";

/// STDIN indicator for CLI arguments
pub const STDIN_INDICATOR: &str = "-";

/// Validation messages shared by the stock validators
pub mod validation {
    pub const PORT_MIN: u32 = 1;
    pub const PORT_MAX: u32 = 65535;
    pub const RFC1123_MAX_LEN: usize = 63;
    pub const IMAGE_TAG_MAX_LEN: usize = 127;
    pub const NOT_A_DIRECTORY: &str = "Input must be an existing directory";
    pub const EMPTY_PATH: &str = "Destination must be a valid file path";
}

/// Exit codes
pub mod exit_codes {
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
