use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription tiers a student can buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Monthly,
    Quarterly,
    Semester,
    Yearly,
}

impl PlanId {
    pub const ALL: [PlanId; 4] = [
        PlanId::Monthly,
        PlanId::Quarterly,
        PlanId::Semester,
        PlanId::Yearly,
    ];

    /// Identifier used on the wire and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::Monthly => "monthly",
            PlanId::Quarterly => "quarterly",
            PlanId::Semester => "semester",
            PlanId::Yearly => "yearly",
        }
    }

    /// Name shown on the student's pass, e.g. "Semester".
    pub fn display_name(&self) -> &'static str {
        match self {
            PlanId::Monthly => "Monthly",
            PlanId::Quarterly => "Quarterly",
            PlanId::Semester => "Semester",
            PlanId::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub school: String,
    pub class_year: String,
    pub email: String,
    pub mobile: String,
    pub plan_type: Option<PlanId>,
    pub valid_till: Option<DateTime<Utc>>,
}

impl Student {
    pub fn has_pass(&self) -> bool {
        self.valid_till.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassStatus {
    Active,
    Expired,
    Inactive,
}

impl fmt::Display for PassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PassStatus::Active => "Active",
            PassStatus::Expired => "Expired",
            PassStatus::Inactive => "Inactive",
        };
        f.write_str(label)
    }
}

/// Outcome of a conductor scan, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub valid: bool,
    pub student_name: String,
    pub student_id: String,
    pub school: String,
    pub valid_till: String,
    pub scan_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    pub id: String,
    pub name: String,
    pub role: String,
    pub permissions: Vec<String>,
}

/// Snapshot of what the student dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassSummary {
    pub student_id: String,
    pub name: String,
    pub status: PassStatus,
    pub days_left: i64,
    pub plan: String,
    pub valid_till: String,
    pub payload: String,
}
