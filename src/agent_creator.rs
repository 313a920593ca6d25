//! Agent Creator Module
//!
//! Lead-capture form for community "agents". Submission is simulated: the
//! form shows a processing notice for a fixed delay, then closes and shows a
//! success popup for another fixed delay. Nothing is sent anywhere.

use crate::config::AgentCreatorConfig;
use crate::metrics::metrics;
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};
use uuid::Uuid;

/// Shown while a submission is "processing"
pub const PROCESSING_NOTICE: &str = "Agent submission processed. Awaiting Helix's approval...";

/// Shown under the form
pub const REVIEW_NOTICE: &str = "All submitted agents undergo rigorous evaluation by Helix's core systems. \
     Approved agents will be deployed to enhance the Helix ecosystem on Pump.fun.";

pub const SUCCESS_TITLE: &str = "Agent Submission Received";

pub const SUCCESS_MESSAGE: &str = "Your agent has been queued for review. \
     If approved, it will be deployed to enhance the Helix ecosystem on Pump.fun.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specialization {
    Combat,
    Trading,
    Security,
    Research,
}

impl Specialization {
    pub const ALL: [Specialization; 4] = [
        Specialization::Combat,
        Specialization::Trading,
        Specialization::Security,
        Specialization::Research,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Specialization::Combat => "combat",
            Specialization::Trading => "trading",
            Specialization::Security => "security",
            Specialization::Research => "research",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Specialization::Combat => "Combat Systems",
            Specialization::Trading => "Trading Analytics",
            Specialization::Security => "Security Protocol",
            Specialization::Research => "Research & Development",
        }
    }
}

impl FromStr for Specialization {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Specialization::ALL
            .into_iter()
            .find(|v| v.key() == wanted)
            .ok_or_else(|| anyhow!("Unknown specialization '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    Quantum,
    Neural,
    Hybrid,
    Blockchain,
}

impl Architecture {
    pub const ALL: [Architecture; 4] = [
        Architecture::Quantum,
        Architecture::Neural,
        Architecture::Hybrid,
        Architecture::Blockchain,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Architecture::Quantum => "quantum",
            Architecture::Neural => "neural",
            Architecture::Hybrid => "hybrid",
            Architecture::Blockchain => "blockchain",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Architecture::Quantum => "Quantum Processing",
            Architecture::Neural => "Neural Network",
            Architecture::Hybrid => "Hybrid System",
            Architecture::Blockchain => "Blockchain-Enabled",
        }
    }
}

impl FromStr for Architecture {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Architecture::ALL
            .into_iter()
            .find(|v| v.key() == wanted)
            .ok_or_else(|| anyhow!("Unknown architecture '{}'", s))
    }
}

/// Form fields, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    AgentName,
    Purpose,
    Specialization,
    Architecture,
    EthicalStance,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::AgentName,
        FormField::Purpose,
        FormField::Specialization,
        FormField::Architecture,
        FormField::EthicalStance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::AgentName => "Agent Designation",
            FormField::Purpose => "Primary Directive",
            FormField::Specialization => "Specialization Protocol",
            FormField::Architecture => "Neural Architecture",
            FormField::EthicalStance => "Ethical Framework",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            FormField::AgentName => "Enter agent name...",
            FormField::Purpose => "Define agent's main purpose...",
            FormField::Specialization => "Select specialization...",
            FormField::Architecture => "Select architecture...",
            FormField::EthicalStance => "Define agent's ethical parameters...",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(FormField),

    #[error("Unknown {field} option '{value}'")]
    UnknownChoice { field: FormField, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreatorError {
    #[error("A submission is already being processed")]
    AlreadyProcessing,

    #[error(transparent)]
    Invalid(#[from] FormError),
}

/// Form contents as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentForm {
    pub agent_name: String,
    pub purpose: String,
    pub specialization: Option<Specialization>,
    pub architecture: Option<Architecture>,
    pub ethical_stance: String,
}

impl AgentForm {
    /// Set one field from raw input. Blank choices clear the field so
    /// validation reports it as missing.
    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), FormError> {
        let unknown = || FormError::UnknownChoice {
            field,
            value: value.trim().to_string(),
        };
        let blank = value.trim().is_empty();

        match field {
            FormField::AgentName => self.agent_name = value.to_string(),
            FormField::Purpose => self.purpose = value.to_string(),
            FormField::EthicalStance => self.ethical_stance = value.to_string(),
            FormField::Specialization if blank => self.specialization = None,
            FormField::Specialization => {
                self.specialization = Some(value.parse().map_err(|_| unknown())?);
            }
            FormField::Architecture if blank => self.architecture = None,
            FormField::Architecture => {
                self.architecture = Some(value.parse().map_err(|_| unknown())?);
            }
        }
        Ok(())
    }

    /// Every field is required; whitespace-only text counts as empty
    pub fn validate(&self) -> Result<AgentSubmission, FormError> {
        let text = |value: &str, field: FormField| -> Result<String, FormError> {
            let value = value.trim();
            if value.is_empty() {
                Err(FormError::MissingField(field))
            } else {
                Ok(value.to_string())
            }
        };

        let agent_name = text(&self.agent_name, FormField::AgentName)?;
        let purpose = text(&self.purpose, FormField::Purpose)?;
        let specialization = self
            .specialization
            .ok_or(FormError::MissingField(FormField::Specialization))?;
        let architecture = self
            .architecture
            .ok_or(FormError::MissingField(FormField::Architecture))?;
        let ethical_stance = text(&self.ethical_stance, FormField::EthicalStance)?;

        Ok(AgentSubmission {
            id: Uuid::new_v4(),
            agent_name,
            purpose,
            specialization,
            architecture,
            ethical_stance,
            submitted_at: Utc::now(),
        })
    }
}

/// A validated form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSubmission {
    pub id: Uuid,
    pub agent_name: String,
    pub purpose: String,
    pub specialization: Specialization,
    pub architecture: Architecture,
    pub ethical_stance: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatorTimings {
    pub processing: Duration,
    pub success_display: Duration,
}

impl Default for CreatorTimings {
    fn default() -> Self {
        Self {
            processing: Duration::from_secs(3),
            success_display: Duration::from_secs(5),
        }
    }
}

impl From<&AgentCreatorConfig> for CreatorTimings {
    fn from(config: &AgentCreatorConfig) -> Self {
        Self {
            processing: config.processing_delay(),
            success_display: config.success_display(),
        }
    }
}

/// Observable view state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatorState {
    /// Modal visible
    pub open: bool,
    /// Processing notice visible
    pub submitted: bool,
    /// Success popup visible
    pub show_success: bool,
    pub form: AgentForm,
    pub last_submission: Option<AgentSubmission>,
}

pub struct AgentCreator {
    timings: CreatorTimings,
    state_tx: Arc<watch::Sender<CreatorState>>,
    state_rx: watch::Receiver<CreatorState>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl AgentCreator {
    pub fn new(timings: CreatorTimings) -> Self {
        let (state_tx, state_rx) = watch::channel(CreatorState::default());
        Self {
            timings,
            state_tx: Arc::new(state_tx),
            state_rx,
            timer: Mutex::new(None),
        }
    }

    pub fn open(&self) {
        self.state_tx.send_modify(|s| s.open = true);
    }

    pub fn close(&self) {
        self.state_tx.send_modify(|s| s.open = false);
    }

    /// Set one field from raw input; a rejected value leaves the form as it was
    pub fn set_field(&self, field: FormField, value: &str) -> Result<(), FormError> {
        let mut result = Ok(());
        self.state_tx.send_if_modified(|s| {
            result = s.form.set_field(field, value);
            result.is_ok()
        });
        result
    }

    pub fn snapshot(&self) -> CreatorState {
        self.state_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CreatorState> {
        self.state_rx.clone()
    }

    /// Validate and start the simulated review. Must be called from within a
    /// tokio runtime.
    pub fn submit(&self) -> Result<AgentSubmission, CreatorError> {
        let mut outcome = Err(CreatorError::AlreadyProcessing);
        self.state_tx.send_if_modified(|s| {
            if s.submitted {
                return false;
            }
            outcome = s.form.validate().map_err(CreatorError::from);
            match &outcome {
                Ok(submission) => {
                    s.submitted = true;
                    s.last_submission = Some(submission.clone());
                    true
                }
                Err(_) => false,
            }
        });
        let submission = outcome?;

        metrics().agent_submissions.inc();
        info!(
            submission = %submission.id,
            agent = %submission.agent_name,
            specialization = submission.specialization.key(),
            architecture = submission.architecture.key(),
            "Agent submission accepted"
        );

        let task = tokio::spawn(run_review(Arc::clone(&self.state_tx), self.timings));
        if let Some(previous) = self.timer.lock().replace(task) {
            // Only the success popup of an earlier submission can still be pending
            previous.abort();
        }

        Ok(submission)
    }

    /// Render the modal and popup as terminal lines
    pub fn render(&self) -> Vec<String> {
        let state = self.snapshot();
        let mut lines = Vec::new();

        if state.open {
            lines.push("== Agent Creation Interface ==".to_string());
            if state.submitted {
                lines.push(PROCESSING_NOTICE.to_string());
            } else {
                let form = &state.form;
                let values = [
                    form.agent_name.clone(),
                    form.purpose.clone(),
                    form.specialization.map(|v| v.label().to_string()).unwrap_or_default(),
                    form.architecture.map(|v| v.label().to_string()).unwrap_or_default(),
                    form.ethical_stance.clone(),
                ];
                for (field, value) in FormField::ALL.iter().zip(values) {
                    let shown = if value.is_empty() {
                        field.placeholder().to_string()
                    } else {
                        value
                    };
                    lines.push(format!("{}: {}", field.label(), shown));
                }
                lines.push(format!("! {}", REVIEW_NOTICE));
            }
        }

        if state.show_success {
            lines.push(format!("[{}] {}", SUCCESS_TITLE, SUCCESS_MESSAGE));
        }

        lines
    }
}

impl Default for AgentCreator {
    fn default() -> Self {
        Self::new(CreatorTimings::default())
    }
}

impl Drop for AgentCreator {
    fn drop(&mut self) {
        if let Some(task) = self.timer.lock().take() {
            task.abort();
        }
    }
}

async fn run_review(state: Arc<watch::Sender<CreatorState>>, timings: CreatorTimings) {
    sleep(timings.processing).await;
    state.send_modify(|s| {
        s.submitted = false;
        s.open = false;
        s.show_success = true;
        s.form = AgentForm::default();
    });
    debug!("Agent submission review finished");

    sleep(timings.success_display).await;
    state.send_modify(|s| s.show_success = false);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> AgentForm {
        AgentForm {
            agent_name: "Sentinel".to_string(),
            purpose: "Watch liquidity".to_string(),
            specialization: Some(Specialization::Security),
            architecture: Some(Architecture::Hybrid),
            ethical_stance: "Do no harm".to_string(),
        }
    }

    fn fill(creator: &AgentCreator) {
        let inputs = ["Sentinel", "Watch liquidity", "security", "hybrid", "Do no harm"];
        for (field, value) in FormField::ALL.into_iter().zip(inputs) {
            creator.set_field(field, value).unwrap();
        }
    }

    #[test]
    fn test_validate_complete_form() {
        let submission = filled_form().validate().unwrap();
        assert_eq!(submission.agent_name, "Sentinel");
        assert_eq!(submission.specialization, Specialization::Security);
        assert_eq!(submission.architecture, Architecture::Hybrid);
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        assert_eq!(
            AgentForm::default().validate().unwrap_err(),
            FormError::MissingField(FormField::AgentName)
        );

        let mut form = filled_form();
        form.architecture = None;
        assert_eq!(
            form.validate().unwrap_err(),
            FormError::MissingField(FormField::Architecture)
        );

        let mut form = filled_form();
        form.ethical_stance = "   ".to_string();
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Ethical Framework is required"
        );
    }

    #[test]
    fn test_option_parsing() {
        assert_eq!("research".parse::<Specialization>().unwrap(), Specialization::Research);
        assert_eq!(Specialization::Research.label(), "Research & Development");
        assert_eq!("Blockchain".parse::<Architecture>().unwrap(), Architecture::Blockchain);
        assert!("laser".parse::<Architecture>().is_err());
    }

    #[test]
    fn test_set_field_rejects_unknown_choice() {
        let mut form = filled_form();
        let err = form.set_field(FormField::Specialization, " laser ").unwrap_err();
        assert_eq!(
            err,
            FormError::UnknownChoice {
                field: FormField::Specialization,
                value: "laser".to_string()
            }
        );
        assert_eq!(form.specialization, Some(Specialization::Security));

        form.set_field(FormField::Architecture, "quantum").unwrap();
        assert_eq!(form.architecture, Some(Architecture::Quantum));

        form.set_field(FormField::Architecture, "  ").unwrap();
        assert_eq!(form.architecture, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_creator_field_retry_after_bad_choice() {
        let creator = AgentCreator::default();
        let mut updates = creator.subscribe();

        assert!(creator.set_field(FormField::Architecture, "steam").is_err());
        assert!(!updates.has_changed().unwrap());
        assert_eq!(creator.snapshot().form.architecture, None);

        creator.set_field(FormField::Architecture, "neural").unwrap();
        assert!(updates.has_changed().unwrap());
        assert_eq!(creator.snapshot().form.architecture, Some(Architecture::Neural));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_lifecycle() {
        let creator = AgentCreator::default();
        creator.open();
        fill(&creator);

        let submission = creator.submit().unwrap();
        let state = creator.snapshot();
        assert!(state.open);
        assert!(state.submitted);
        assert_eq!(state.last_submission.as_ref().map(|s| s.id), Some(submission.id));
        assert!(creator.render().contains(&PROCESSING_NOTICE.to_string()));

        // Processing ends after 3s
        sleep(Duration::from_millis(3100)).await;
        let state = creator.snapshot();
        assert!(!state.open);
        assert!(!state.submitted);
        assert!(state.show_success);
        assert_eq!(state.form, AgentForm::default());

        // Popup hides 5s later
        sleep(Duration::from_secs(5)).await;
        let state = creator.snapshot();
        assert!(!state.show_success);
        assert!(creator.render().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_submission_changes_nothing() {
        let creator = AgentCreator::default();
        creator.open();
        creator.set_field(FormField::AgentName, "Half done").unwrap();

        let err = creator.submit().unwrap_err();
        assert_eq!(err, CreatorError::Invalid(FormError::MissingField(FormField::Purpose)));

        let state = creator.snapshot();
        assert!(state.open);
        assert!(!state.submitted);
        assert_eq!(state.form.agent_name, "Half done");
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_submit_rejected() {
        let creator = AgentCreator::default();
        fill(&creator);

        creator.submit().unwrap();
        assert_eq!(creator.submit().unwrap_err(), CreatorError::AlreadyProcessing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_form_placeholders() {
        let creator = AgentCreator::default();
        creator.open();

        let lines = creator.render();
        assert_eq!(lines[0], "== Agent Creation Interface ==");
        assert_eq!(lines[1], "Agent Designation: Enter agent name...");
        assert_eq!(lines[3], "Specialization Protocol: Select specialization...");
    }
}
