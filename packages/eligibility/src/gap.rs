// ABOUTME: Whole-blood donation gap arithmetic derived from last_donation
// ABOUTME: last_donation is the source of truth; every label is recomputed here

use chrono::{Duration, NaiveDate};
use hemobank_core::HealthLevel;

/// Minimum days between two whole-blood donations (ICMR/NBTC guideline).
pub const DONATION_GAP_DAYS: i64 = 90;

pub fn next_eligible_date(last_donation: NaiveDate) -> NaiveDate {
    last_donation + Duration::days(DONATION_GAP_DAYS)
}

/// Remaining wait, or 0 once the gap has elapsed.
pub fn days_until_eligible(last_donation: NaiveDate, today: NaiveDate) -> i64 {
    let since = (today - last_donation).num_days();
    (DONATION_GAP_DAYS - since).max(0)
}

pub fn is_eligible_today(last_donation: Option<NaiveDate>, today: NaiveDate) -> bool {
    match last_donation {
        Some(last) => days_until_eligible(last, today) == 0,
        None => true,
    }
}

/// Display string stored on the donor after a completed donation.
pub fn eligibility_label(next_eligible: NaiveDate) -> String {
    format!("Eligible from {}", next_eligible.format("%d/%m/%Y"))
}

/// Registration-time eligibility from the self-reported health snapshot.
/// No gap check applies here; that only happens on donation completion.
pub fn snapshot_eligibility(
    haemoglobin: HealthLevel,
    blood_sugar: HealthLevel,
    blood_pressure: HealthLevel,
) -> &'static str {
    if haemoglobin == HealthLevel::Normal
        && blood_sugar == HealthLevel::Normal
        && blood_pressure == HealthLevel::Normal
    {
        "Eligible!!"
    } else {
        "Not Eligible!"
    }
}
