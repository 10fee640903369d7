use crate::config::{AdminConfig, DisplayConfig};
use crate::core::plans::{compute_expiry, Plan};
use crate::core::scanner::PassPayload;
use crate::core::validity::{days_remaining, pass_status};
use crate::domain::model::{AdminProfile, PassSummary, PlanId, Student};
use crate::domain::ports::Clock;
use crate::utils::error::{PassError, Result};
use crate::utils::validation::{validate_email, validate_required_field, Validate};
use chrono::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Login,
    Dashboard,
    Plans,
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub student_id: String,
    pub email: String,
    pub school: String,
    pub class_year: String,
    pub mobile: String,
    pub password: String,
    pub confirm_password: String,
}

impl Validate for RegistrationForm {
    fn validate(&self) -> Result<()> {
        validate_required_field("name", &self.name)?;
        validate_required_field("studentId", &self.student_id)?;
        validate_required_field("password", &self.password)?;
        validate_email("email", &self.email)?;
        if self.password != self.confirm_password {
            return Err(PassError::validation("Passwords do not match"));
        }
        Ok(())
    }
}

/// Student-facing application state for one run.
pub struct Session<C: Clock> {
    clock: C,
    view: ViewMode,
    student: Option<Student>,
}

impl<C: Clock> Session<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            view: ViewMode::Login,
            student: None,
        }
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn student(&self) -> Option<&Student> {
        self.student.as_ref()
    }

    /// Mock login: any non-blank credentials sign in the demo student with a
    /// fresh monthly pass.
    pub fn login(&mut self, student_id: &str, password: &str) -> Result<&Student> {
        validate_required_field("studentId", student_id)?;
        validate_required_field("password", password)?;

        let now = self.clock.now();
        let student = Student {
            id: student_id.trim().to_string(),
            name: "John Doe".to_string(),
            school: "Delhi Public School".to_string(),
            class_year: "Grade 12".to_string(),
            email: "john@example.com".to_string(),
            mobile: "+91 9876543210".to_string(),
            plan_type: Some(PlanId::Monthly),
            valid_till: Some(now + Duration::days(30)),
        };
        tracing::info!("Welcome back, {}!", student.name);
        Ok(self.enter_dashboard(student))
    }

    pub fn register(&mut self, form: RegistrationForm) -> Result<&Student> {
        form.validate()?;

        let student = Student {
            id: form.student_id.trim().to_string(),
            name: form.name.trim().to_string(),
            school: form.school,
            class_year: form.class_year,
            email: form.email.trim().to_string(),
            mobile: form.mobile,
            plan_type: None,
            valid_till: None,
        };
        tracing::info!("Registered {}, no active pass yet", student.id);
        Ok(self.enter_dashboard(student))
    }

    fn enter_dashboard(&mut self, student: Student) -> &Student {
        self.view = ViewMode::Dashboard;
        self.student.insert(student)
    }

    pub fn show_plans(&mut self) -> Result<()> {
        self.require_student()?;
        self.view = ViewMode::Plans;
        Ok(())
    }

    pub fn back_to_dashboard(&mut self) -> Result<()> {
        self.require_student()?;
        self.view = ViewMode::Dashboard;
        Ok(())
    }

    /// Activates `plan_id` for the logged-in student starting now. Unknown
    /// ids buy the monthly plan.
    pub fn purchase(&mut self, plan_id: &str) -> Result<&'static Plan> {
        let now = self.clock.now();
        let student = self.student.as_mut().ok_or(PassError::NotLoggedIn)?;

        let plan = PlanId::resolve(plan_id);
        student.valid_till = Some(compute_expiry(plan_id, now));
        student.plan_type = Some(plan);
        self.view = ViewMode::Dashboard;

        tracing::info!(
            "🎉 {} purchased for {}, valid for {} days",
            plan.plan().name,
            student.id,
            plan.plan().duration_days
        );
        Ok(plan.plan())
    }

    pub fn logout(&mut self) {
        if let Some(student) = self.student.take() {
            tracing::info!("Logged out {}", student.id);
        }
        self.view = ViewMode::Login;
    }

    pub fn dashboard(&self, display: &DisplayConfig) -> Result<PassSummary> {
        let student = self.require_student()?;
        let now = self.clock.now();

        Ok(PassSummary {
            student_id: student.id.clone(),
            name: student.name.clone(),
            status: pass_status(student.valid_till, now),
            days_left: days_remaining(student.valid_till, now),
            plan: student
                .plan_type
                .map(|p| p.display_name().to_string())
                .unwrap_or_else(|| "No active plan".to_string()),
            valid_till: student
                .valid_till
                .map(|till| display.format_date(till))
                .unwrap_or_else(|| "N/A".to_string()),
            payload: PassPayload::for_student(student, now).encode()?,
        })
    }

    fn require_student(&self) -> Result<&Student> {
        self.student.as_ref().ok_or(PassError::NotLoggedIn)
    }
}

/// Checks mock admin credentials.
pub fn admin_login(username: &str, password: &str, config: &AdminConfig) -> Result<AdminProfile> {
    validate_required_field("username", username)?;
    validate_required_field("password", password)?;

    if username != config.username || password != config.password {
        tracing::warn!("Rejected admin login for '{}'", username);
        return Err(PassError::AuthenticationFailed {
            message: format!("bad credentials for '{}'", username),
        });
    }

    Ok(AdminProfile {
        id: "admin_001".to_string(),
        name: "System Administrator".to_string(),
        role: "Super Admin".to_string(),
        permissions: vec![
            "view_students".to_string(),
            "manage_passes".to_string(),
            "system_settings".to_string(),
        ],
    })
}
