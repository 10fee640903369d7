use crate::config::DisplayConfig;
use crate::core::plans::compute_expiry;
use crate::core::validity::{days_remaining, pass_status};
use crate::domain::model::{PassStatus, PlanId, Student};
use crate::utils::error::{PassError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RosterStats {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    pub inactive: usize,
}

#[derive(Debug, Serialize)]
struct RosterRow<'a> {
    id: &'a str,
    name: &'a str,
    school: &'a str,
    plan: &'a str,
    valid_till: String,
    days_left: String,
    status: PassStatus,
}

/// Student list behind the admin dashboard.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: Vec<Student>,
}

fn mock_student(
    id: &str,
    name: &str,
    school: &str,
    email: &str,
    mobile: &str,
    pass: Option<(PlanId, DateTime<Utc>)>,
) -> Student {
    Student {
        id: id.to_string(),
        name: name.to_string(),
        school: school.to_string(),
        class_year: String::new(),
        email: email.to_string(),
        mobile: mobile.to_string(),
        plan_type: pass.map(|(plan, _)| plan),
        valid_till: pass.map(|(_, till)| till),
    }
}

impl Roster {
    pub fn new(students: Vec<Student>) -> Self {
        Self { students }
    }

    /// Demo data, with expiries relative to `now`.
    pub fn mock(now: DateTime<Utc>) -> Self {
        let days = |n: i64| now + Duration::days(n);
        Self::new(vec![
            mock_student(
                "STU2024001",
                "John Doe",
                "Delhi Public School",
                "john@example.com",
                "+91 9876543210",
                Some((PlanId::Monthly, days(15))),
            ),
            mock_student(
                "STU2024002",
                "Jane Smith",
                "Kendriya Vidyalaya",
                "jane@example.com",
                "+91 9876543211",
                Some((PlanId::Semester, days(120))),
            ),
            mock_student(
                "STU2024003",
                "Mike Johnson",
                "DAV Public School",
                "mike@example.com",
                "+91 9876543212",
                Some((PlanId::Monthly, days(-5))),
            ),
            mock_student(
                "STU2024004",
                "Sarah Wilson",
                "Modern School",
                "sarah@example.com",
                "+91 9876543213",
                None,
            ),
            mock_student(
                "STU2024005",
                "Alex Brown",
                "Ryan International",
                "alex@example.com",
                "+91 9876543214",
                Some((PlanId::Yearly, days(300))),
            ),
        ])
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn get(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Case-insensitive match on name, id or school, optionally narrowed to
    /// one status.
    pub fn filter(
        &self,
        search: &str,
        status: Option<PassStatus>,
        now: DateTime<Utc>,
    ) -> Vec<&Student> {
        let needle = search.trim().to_lowercase();
        self.students
            .iter()
            .filter(|s| {
                needle.is_empty()
                    || s.name.to_lowercase().contains(&needle)
                    || s.id.to_lowercase().contains(&needle)
                    || s.school.to_lowercase().contains(&needle)
            })
            .filter(|s| status.map_or(true, |wanted| pass_status(s.valid_till, now) == wanted))
            .collect()
    }

    pub fn stats(&self, now: DateTime<Utc>) -> RosterStats {
        self.students
            .iter()
            .fold(RosterStats::default(), |mut stats, s| {
                stats.total += 1;
                match pass_status(s.valid_till, now) {
                    PassStatus::Active => stats.active += 1,
                    PassStatus::Expired => stats.expired += 1,
                    PassStatus::Inactive => stats.inactive += 1,
                }
                stats
            })
    }

    /// Adds a plan's duration, counting from the current expiry when it is
    /// still in the future.
    pub fn extend(&mut self, id: &str, plan_id: &str, now: DateTime<Utc>) -> Result<&Student> {
        let student = self.get_mut(id)?;
        let start = student.valid_till.filter(|till| *till > now).unwrap_or(now);

        student.valid_till = Some(compute_expiry(plan_id, start));
        student.plan_type = Some(PlanId::resolve(plan_id));
        tracing::info!("Pass extended for {}", student.name);
        Ok(student)
    }

    pub fn revoke(&mut self, id: &str) -> Result<&Student> {
        let student = self.get_mut(id)?;
        student.valid_till = None;
        student.plan_type = None;
        tracing::info!("Pass revoked for {}", student.name);
        Ok(student)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Student> {
        self.students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| PassError::StudentNotFound { id: id.to_string() })
    }

    /// Writes `students` as CSV with derived status and days left.
    pub fn write_csv<'a, W: Write>(
        students: impl IntoIterator<Item = &'a Student>,
        writer: W,
        now: DateTime<Utc>,
        display: &DisplayConfig,
    ) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for s in students {
            csv_writer.serialize(RosterRow {
                id: &s.id,
                name: &s.name,
                school: &s.school,
                plan: s.plan_type.map_or("", |p| p.display_name()),
                valid_till: s
                    .valid_till
                    .map(|till| display.format_date(till))
                    .unwrap_or_default(),
                days_left: s
                    .valid_till
                    .map(|_| days_remaining(s.valid_till, now).to_string())
                    .unwrap_or_default(),
                status: pass_status(s.valid_till, now),
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
