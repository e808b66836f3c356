// ABOUTME: Pure rule evaluator for the public eligibility checker
// ABOUTME: Each exclusion is independent; nothing here touches persisted state

use chrono::{NaiveDate, Utc};
use hemobank_core::HealthLevel;
use serde::{Deserialize, Serialize};

use crate::gap::{days_until_eligible, DONATION_GAP_DAYS};

/// Self-reported answers from the standalone eligibility checker.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityForm {
    pub age: i64,
    /// Kilograms.
    pub weight: f64,
    #[serde(default)]
    pub last_donation: Option<NaiveDate>,
    pub haemoglobin: HealthLevel,
    pub blood_pressure: HealthLevel,
    /// Insulin-dependent diabetes.
    #[serde(default)]
    pub diabetes: bool,
    /// Malaria within the last 3 months.
    #[serde(default)]
    pub malaria: bool,
    #[serde(default)]
    pub hiv: bool,
    /// Pregnant or within 12 months of delivery.
    #[serde(default)]
    pub pregnant: bool,
    /// Tattoo or piercing within the last 12 months.
    #[serde(default)]
    pub recent_tattoo: bool,
    /// Major surgery within the last 6-12 months.
    #[serde(default)]
    pub recent_surgery: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityReport {
    pub eligible: bool,
    pub reasons: Vec<String>,
    pub tips: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_days: Option<i64>,
}

/// Evaluate against today's date.
pub fn evaluate(form: &EligibilityForm) -> EligibilityReport {
    evaluate_at(form, Utc::now().date_naive())
}

/// Evaluate against an explicit "today", keeping the rules deterministic.
pub fn evaluate_at(form: &EligibilityForm, today: NaiveDate) -> EligibilityReport {
    let mut reasons = Vec::new();

    if form.age < 18 {
        reasons.push("You must be at least 18 years old to donate blood (NBTC guideline).".into());
    }
    if form.age > 65 {
        reasons.push("Donors above 65 years are not eligible as per NBTC guidelines.".into());
    }
    if form.weight < 45.0 {
        reasons.push("Minimum weight required is 45 kg (ICMR standard).".into());
    }
    if form.haemoglobin == HealthLevel::Low {
        reasons.push(
            "Haemoglobin below 12.5 g/dL (women) / 13 g/dL (men) makes you ineligible.".into(),
        );
    }
    if form.blood_pressure == HealthLevel::High {
        reasons
            .push("Uncontrolled high blood pressure (>180/100 mmHg) disqualifies you.".into());
    }
    if form.blood_pressure == HealthLevel::Low {
        reasons.push("Very low blood pressure may be a temporary disqualification.".into());
    }
    if form.diabetes {
        reasons.push("Insulin-dependent diabetes disqualifies you from donating.".into());
    }
    if form.malaria {
        reasons.push("You must wait at least 3 months after recovering from malaria.".into());
    }
    if form.hiv {
        reasons.push("HIV positive individuals are permanently deferred from donating.".into());
    }
    if form.pregnant {
        reasons.push(
            "Pregnant women and those within 12 months of delivery cannot donate.".into(),
        );
    }
    if form.recent_tattoo {
        reasons.push("You must wait 12 months after a tattoo or piercing before donating.".into());
    }
    if form.recent_surgery {
        reasons.push("You must wait 6-12 months after major surgery before donating.".into());
    }

    let mut wait_days = None;
    if let Some(last) = form.last_donation {
        let remaining = days_until_eligible(last, today);
        if remaining > 0 {
            let since = (today - last).num_days();
            wait_days = Some(remaining);
            reasons.push(format!(
                "You last donated {} days ago. A {}-day gap is required for whole blood. Please wait {} more days.",
                since, DONATION_GAP_DAYS, remaining
            ));
        }
    }

    let eligible = reasons.is_empty();
    let tips = if eligible {
        vec![
            "Drink 500ml of water before donation.".into(),
            "Have a light meal 2-3 hours before going to the blood bank.".into(),
            "Avoid alcohol for 24 hours before and after donation.".into(),
            "After donation, rest for 15 minutes and have the provided refreshments.".into(),
        ]
    } else {
        Vec::new()
    };

    EligibilityReport {
        eligible,
        reasons,
        tips,
        wait_days,
    }
}
