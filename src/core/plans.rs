//! Static plan catalog and expiry computation.

use crate::domain::model::PlanId;
use crate::utils::error::PassError;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: PlanId,
    pub name: &'static str,
    pub duration: &'static str,
    pub duration_days: i64,
    /// Price in rupees.
    pub price: u32,
    pub original_price: Option<u32>,
    pub popular: bool,
    pub recommended: bool,
    pub features: &'static [&'static str],
}

impl Plan {
    pub fn savings(&self) -> Option<u32> {
        self.original_price
            .map(|original| original.saturating_sub(self.price))
    }

    /// Price per day of validity, rounded to the nearest rupee.
    pub fn per_day_cost(&self) -> u32 {
        let days = self.duration_days as u32;
        (self.price + days / 2) / days
    }
}

static CATALOG: [Plan; 4] = [
    Plan {
        id: PlanId::Monthly,
        name: "Monthly Pass",
        duration: "1 Month",
        duration_days: 30,
        price: 500,
        original_price: None,
        popular: false,
        recommended: false,
        features: &[
            "Unlimited bus rides for 30 days",
            "Valid on all city routes",
            "Digital QR pass",
            "Mobile app access",
            "Customer support",
        ],
    },
    Plan {
        id: PlanId::Quarterly,
        name: "Quarterly Pass",
        duration: "3 Months",
        duration_days: 90,
        price: 1350,
        original_price: Some(1500),
        popular: true,
        recommended: false,
        features: &[
            "Unlimited bus rides for 90 days",
            "Valid on all city routes",
            "Digital QR pass",
            "Mobile app access",
            "Priority customer support",
            "10% savings vs monthly",
        ],
    },
    Plan {
        id: PlanId::Semester,
        name: "Semester Pass",
        duration: "6 Months",
        duration_days: 180,
        price: 2400,
        original_price: Some(3000),
        popular: false,
        recommended: true,
        features: &[
            "Unlimited bus rides for 6 months",
            "Valid on all city routes",
            "Digital QR pass",
            "Mobile app access",
            "Premium customer support",
            "20% savings vs monthly",
            "Perfect for academic semester",
        ],
    },
    Plan {
        id: PlanId::Yearly,
        name: "Annual Pass",
        duration: "12 Months",
        duration_days: 365,
        price: 4200,
        original_price: Some(6000),
        popular: false,
        recommended: false,
        features: &[
            "Unlimited bus rides for 1 year",
            "Valid on all city routes",
            "Digital QR pass",
            "Mobile app access",
            "Premium customer support",
            "30% savings vs monthly",
            "Best value for regular commuters",
            "Free pass replacement",
        ],
    },
];

pub fn catalog() -> &'static [Plan] {
    &CATALOG
}

impl PlanId {
    pub fn plan(&self) -> &'static Plan {
        match self {
            PlanId::Monthly => &CATALOG[0],
            PlanId::Quarterly => &CATALOG[1],
            PlanId::Semester => &CATALOG[2],
            PlanId::Yearly => &CATALOG[3],
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::days(self.plan().duration_days)
    }

    /// Lenient lookup: anything unrecognised is treated as monthly.
    pub fn resolve(id: &str) -> PlanId {
        id.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown plan '{}', falling back to monthly", id);
            PlanId::Monthly
        })
    }
}

impl FromStr for PlanId {
    type Err = PassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PlanId::ALL
            .into_iter()
            .find(|plan| plan.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PassError::UnknownPlan {
                plan: s.to_string(),
            })
    }
}

/// Expiry of a pass bought at `now`. Unknown plan ids get the monthly duration.
pub fn compute_expiry(plan_id: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    now + PlanId::resolve(plan_id).duration()
}
