//! Stable identifiers for check categories and finding codes.
//!
//! `check_id` names a category. `code` is a short snake_case discriminator.
//! Best-practice ids are the catalog keys (`BP001`...).

// Checks
pub const CHECK_NAMING: &str = "naming";
pub const CHECK_COMPLIANCE: &str = "compliance";
pub const CHECK_BEST_PRACTICES: &str = "best-practices";
pub const CHECK_CONFLICTS: &str = "conflicts";

// Codes: naming
pub const CODE_PATTERN_MISMATCH: &str = "pattern_mismatch";
pub const CODE_INVALID_ENVIRONMENT: &str = "invalid_environment";
pub const CODE_INVALID_SCOPE: &str = "invalid_scope";
pub const CODE_INVALID_CONTROL: &str = "invalid_control";
pub const CODE_INVALID_NUMBER_FORMAT: &str = "invalid_number_format";
pub const CODE_NUMBER_OUT_OF_RANGE: &str = "number_out_of_range";

// Codes: compliance
pub const CODE_MISSING_REQUIRED_EXCLUSION: &str = "missing_required_exclusion";
pub const CODE_MISSING_MANDATORY_CONTROL: &str = "missing_mandatory_control";
pub const CODE_FORBIDDEN_STATE: &str = "forbidden_state";
pub const CODE_FORBIDDEN_CLIENT_APP_TYPE: &str = "forbidden_client_app_type";
pub const CODE_BELOW_MINIMUM_CONTROLS: &str = "below_minimum_controls";
pub const CODE_DISALLOWED_STATE: &str = "disallowed_state";

// Codes: conflicts
pub const CODE_OVERLAPPING_CONDITIONS: &str = "overlapping_conditions";
pub const CODE_REDUNDANT_POLICY: &str = "redundant_policy";
pub const CODE_COVERAGE_GAP: &str = "coverage_gap";

// Best-practice catalog keys
pub const BP_EXCLUDE_BREAK_GLASS: &str = "BP001";
pub const BP_BLOCK_LEGACY_AUTH: &str = "BP002";
pub const BP_REPORT_ONLY_FIRST: &str = "BP003";
pub const BP_ADMINS_REQUIRE_MFA: &str = "BP004";
pub const BP_ALL_USERS_NEED_EXCLUSION: &str = "BP005";
pub const BP_EXTERNALS_REQUIRE_DEVICE: &str = "BP006";
pub const BP_HIGH_RISK_SIGN_IN_FREQUENCY: &str = "BP007";

// Document-level
pub const CODE_MALFORMED_POLICY: &str = "malformed_policy";
pub const CODE_DUPLICATE_POLICY_NAME: &str = "duplicate_policy_name";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
