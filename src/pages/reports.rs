//! Pending report queues and review decisions.

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::net::api::Method;
use crate::net::types::{Report, ReviewDecision};

use super::defects::lookup;
use super::{PageLoad, PageLoader};

pub const REPORT_STATUS_LABELS: [(&str, &str); 3] =
    [("pending", "Ожидает проверки"), ("approve", "Подтверждено"), ("reject", "Отклонено")];

#[must_use]
pub fn report_status_label(value: &str) -> &str {
    lookup(&REPORT_STATUS_LABELS, value)
}

#[derive(Debug, Clone, Default)]
pub struct ReportQueue {
    reports: Vec<Report>,
    /// `None` or empty shows every status.
    pub status_filter: Option<String>,
}

impl ReportQueue {
    #[must_use]
    pub fn new(reports: Vec<Report>) -> Self {
        Self { reports, status_filter: None }
    }

    #[must_use]
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    #[must_use]
    pub fn visible(&self) -> Vec<&Report> {
        let wanted = self.status_filter.as_deref().filter(|s| !s.is_empty());
        self.reports
            .iter()
            .filter(|report| wanted.is_none_or(|status| report.status == status))
            .collect()
    }

    /// Remove a report once it has been reviewed.
    pub fn apply_reviewed(&mut self, id: u64) -> Option<Report> {
        let index = self.reports.iter().position(|report| report.id == id)?;
        Some(self.reports.remove(index))
    }
}

/// Which role's review endpoint a decision goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reviewer {
    Engineer,
    Manager,
}

impl Reviewer {
    #[must_use]
    pub fn review_path(self, id: u64) -> String {
        match self {
            Self::Engineer => format!("/api/reports/approve/engineer/{id}"),
            Self::Manager => format!("/api/reports/approve/manager/{id}"),
        }
    }
}

#[derive(Serialize)]
struct ReviewBody {
    decision: ReviewDecision,
}

/// `POST /api/reports/approve/{reviewer}/{id}` with `{"decision": ...}`.
pub async fn review_report(
    loader: &PageLoader,
    reviewer: Reviewer,
    id: u64,
    decision: ReviewDecision,
    cancel: &CancellationToken,
) -> PageLoad<()> {
    let body = match serde_json::to_value(ReviewBody { decision }) {
        Ok(body) => body,
        Err(e) => return PageLoad::Failed(e.to_string()),
    };
    let load = loader.call(Method::Post, &reviewer.review_path(id), Some(body), cancel).await;
    if matches!(load, PageLoad::Ready(_)) {
        tracing::info!(id, ?decision, "report reviewed");
    }
    load.map(|_| ())
}

#[cfg(test)]
#[path = "reports_test.rs"]
mod tests;
