// Error codes implementation
// Stable, machine-readable codes carried in every error response body.

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const MISSING_REQUIRED_FIELD: &str = "VALIDATION_1002";
    pub const INVALID_FORMAT: &str = "VALIDATION_1003";
}

pub mod encoding {
    pub const UNKNOWN_CATEGORY: &str = "ENCODING_2001";
}

pub mod inference {
    pub const MODEL_REJECTED_INPUT: &str = "INFERENCE_3001";
}

pub mod internal {
    pub const INTERNAL_ERROR: &str = "INTERNAL_9001";
}
