//! Stable string error codes.

/// Every codemark error exposes a stable, machine-readable code.
pub trait CodemarkErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const PARSE_DEPTH_EXCEEDED: &str = "PARSE_DEPTH_EXCEEDED";
pub const PARSE_SYNTAX_ERRORS: &str = "PARSE_SYNTAX_ERRORS";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONFIG_EMPTY_BACKDOOR: &str = "CONFIG_EMPTY_BACKDOOR";
pub const CONFIG_UNKNOWN_SPT: &str = "CONFIG_UNKNOWN_SPT";
pub const CONFIG_INVALID_MARK_RATE: &str = "CONFIG_INVALID_MARK_RATE";
pub const REWRITE_INTERFERENCE: &str = "REWRITE_INTERFERENCE";
pub const REWRITE_PRECONDITION: &str = "REWRITE_PRECONDITION";
pub const REWRITE_INVALID_OUTPUT: &str = "REWRITE_INVALID_OUTPUT";
pub const CORPUS_ERROR: &str = "CORPUS_ERROR";
pub const ASSEMBLY_BUCKET_MISMATCH: &str = "ASSEMBLY_BUCKET_MISMATCH";
pub const ASSEMBLY_RATE_MISMATCH: &str = "ASSEMBLY_RATE_MISMATCH";
