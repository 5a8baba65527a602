//! Dashboard view-state machine.
//!
//! welcome → patient | inquiry on success; clear → welcome from anywhere.
//! A failed call keeps the current view and payload and only sets a notice.

use uuid::Uuid;

use crate::dashboard::backend::BackendError;
use crate::decision::AnalysisReport;
use crate::inquiry::InquiryReport;

/// The one view currently on screen, with its cached payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DashboardState {
    #[default]
    Welcome,
    Patient(Box<AnalysisReport>),
    Inquiry(Box<InquiryReport>),
}

impl DashboardState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Patient(_) => "patient",
            Self::Inquiry(_) => "inquiry",
        }
    }
}

/// Single local user session.
#[derive(Debug)]
pub struct DashboardSession {
    pub state: DashboardState,
    notice: Option<String>,
    session_id: String,
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardSession {
    pub fn new() -> Self {
        Self {
            state: DashboardState::Welcome,
            notice: None,
            session_id: new_session_id(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn apply_analysis(&mut self, result: Result<AnalysisReport, BackendError>) {
        match result {
            Ok(report) => {
                tracing::debug!(
                    patient_id = %report.patient_summary.patient_id,
                    from = self.state.name(),
                    "Dashboard entering patient view"
                );
                self.state = DashboardState::Patient(Box::new(report));
            }
            Err(err) => self.fail(err),
        }
    }

    pub fn apply_inquiry(&mut self, result: Result<InquiryReport, BackendError>) {
        match result {
            Ok(report) => {
                tracing::debug!(
                    matches = report.total_count,
                    from = self.state.name(),
                    "Dashboard entering inquiry view"
                );
                self.state = DashboardState::Inquiry(Box::new(report));
            }
            Err(err) => self.fail(err),
        }
    }

    /// Back to welcome with a fresh session id.
    pub fn clear(&mut self) {
        self.state = DashboardState::Welcome;
        self.notice = None;
        self.session_id = new_session_id();
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Notices are shown once.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    fn fail(&mut self, err: BackendError) {
        tracing::warn!(error = %err, view = self.state.name(), "Dashboard request failed");
        self.notice = Some(err.notice());
    }
}

fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}
