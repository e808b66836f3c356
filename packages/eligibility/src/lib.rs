// ABOUTME: Stateless donation-eligibility rules
// ABOUTME: Single source for the 90-day gap used by lifecycle and dashboards

pub mod gap;
pub mod rules;

pub use gap::{
    days_until_eligible, eligibility_label, is_eligible_today, next_eligible_date,
    snapshot_eligibility, DONATION_GAP_DAYS,
};
pub use rules::{evaluate, evaluate_at, EligibilityForm, EligibilityReport};
