// Error codes implementation
// Stable, machine-readable codes attached to errors surfaced to callers.

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const INPUT_TOO_LARGE: &str = "VALIDATION_1002";
    pub const INVALID_FORMAT: &str = "VALIDATION_1003";
}

pub mod analysis {
    pub const COLLABORATOR_UNAVAILABLE: &str = "ANALYSIS_5001";
    pub const INVALID_LEXICON: &str = "ANALYSIS_5002";
}

pub mod configuration {
    pub const INVALID_CONFIG: &str = "CONFIG_6001";
    pub const SOURCE_UNREADABLE: &str = "CONFIG_6002";
}
