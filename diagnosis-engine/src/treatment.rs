pub const MILD: &str = "Mild";
pub const MODERATE: &str = "Moderate";

pub const REST_AND_FLUIDS: &str = "Rest and take fluids";
pub const MEDICATION_AND_REST: &str = "Medication and rest";
pub const HOSPITALIZATION: &str = "Hospitalization and medication";

/// Treatment plan for a severity label.
///
/// Only the exact labels "Mild" and "Moderate" get their own plan. Every other
/// label, including "Severe" and labels this service has never seen, falls
/// through to hospitalization.
pub fn resolve(severity: &str) -> &'static str {
    match severity {
        MILD => REST_AND_FLUIDS,
        MODERATE => MEDICATION_AND_REST,
        _ => HOSPITALIZATION,
    }
}
