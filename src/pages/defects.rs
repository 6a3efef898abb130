//! Defect boards: filtering, optimistic list updates, and mutations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::net::api::Method;
use crate::net::types::{Defect, NewDefect};

use super::{PageLoad, PageLoader, decode};

pub const ADD_DEFECT_PATH: &str = "/api/defects/add";

pub const PRIORITY_LABELS: [(&str, &str); 4] =
    [("critical", "Критический"), ("high", "Высокий"), ("medium", "Средний"), ("low", "Низкий")];

pub const STATUS_LABELS: [(&str, &str); 4] =
    [("new", "Новый"), ("in_progress", "В работе"), ("resolved", "Решён"), ("closed", "Закрыт")];

/// Display label for a priority; unknown values show as-is.
#[must_use]
pub fn priority_label(value: &str) -> &str {
    lookup(&PRIORITY_LABELS, value)
}

/// Display label for a defect status; unknown values show as-is.
#[must_use]
pub fn status_label(value: &str) -> &str {
    lookup(&STATUS_LABELS, value)
}

pub(crate) fn lookup<'a>(table: &[(&str, &'static str)], value: &'a str) -> &'a str {
    table.iter().find(|(key, _)| *key == value).map_or(value, |&(_, label)| label)
}

// =============================================================================
// BOARD
// =============================================================================

/// Filter over priority and status; `None` matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefectFilter {
    pub priority: Option<String>,
    pub status: Option<String>,
}

impl DefectFilter {
    #[must_use]
    pub fn matches(&self, defect: &Defect) -> bool {
        field_matches(self.priority.as_deref(), &defect.priority) && field_matches(self.status.as_deref(), &defect.status)
    }
}

fn field_matches(wanted: Option<&str>, actual: &str) -> bool {
    wanted.is_none_or(|wanted| wanted.is_empty() || wanted == actual)
}

#[derive(Debug, Clone, Default)]
pub struct DefectBoard {
    defects: Vec<Defect>,
    pub filter: DefectFilter,
}

impl DefectBoard {
    #[must_use]
    pub fn new(defects: Vec<Defect>) -> Self {
        Self { defects, filter: DefectFilter::default() }
    }

    #[must_use]
    pub fn defects(&self) -> &[Defect] {
        &self.defects
    }

    /// Rows passing the current filter, in list order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Defect> {
        self.defects.iter().filter(|defect| self.filter.matches(defect)).collect()
    }

    /// Append a defect the server just created.
    pub fn apply_added(&mut self, defect: Defect) {
        self.defects.push(defect);
    }

    /// Merge server-returned fields into the row with `id`.
    ///
    /// Returns `false` when no row matches or the merged row no longer
    /// parses; the row is left unchanged in both cases.
    pub fn apply_edited(&mut self, id: u64, patch: &Value) -> bool {
        let Some(row) = self.defects.iter_mut().find(|defect| defect.id == id) else {
            return false;
        };
        match merge_defect(row, patch) {
            Ok(merged) => {
                *row = merged;
                true
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "edited defect did not merge");
                false
            }
        }
    }

    /// Drop a row, e.g. once an assignee has reported on it.
    pub fn remove(&mut self, id: u64) -> Option<Defect> {
        let index = self.defects.iter().position(|defect| defect.id == id)?;
        Some(self.defects.remove(index))
    }
}

fn merge_defect(row: &Defect, patch: &Value) -> Result<Defect, serde_json::Error> {
    let mut merged = serde_json::to_value(row)?;
    if let (Value::Object(target), Value::Object(fields)) = (&mut merged, patch) {
        for (key, value) in fields {
            let key = match key.as_str() {
                "projectId" => "project_id",
                "authorId" => "author_id",
                "createdAt" => "created_at",
                "updatedAt" => "updated_at",
                other => other,
            };
            target.insert(key.to_owned(), value.clone());
        }
    }
    serde_json::from_value(merged)
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Which role's edit endpoint a change goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Editor {
    Engineer,
    Manager,
}

impl Editor {
    #[must_use]
    pub fn edit_path(self, id: u64) -> String {
        match self {
            Self::Engineer => format!("/api/defects/edit/byengineer/{id}"),
            Self::Manager => format!("/api/defects/edit/bymanager/{id}"),
        }
    }
}

/// Fields a defect edit may change. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DefectEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

/// Mutation replies wrap the row as `{"defect": {...}}`.
#[derive(Deserialize)]
struct DefectEnvelope {
    defect: Value,
}

/// `POST /api/defects/add`; yields the created defect.
pub async fn add_defect(loader: &PageLoader, draft: &NewDefect, cancel: &CancellationToken) -> PageLoad<Defect> {
    let body = match serde_json::to_value(draft) {
        Ok(body) => body,
        Err(e) => return PageLoad::Failed(e.to_string()),
    };
    loader
        .call(Method::Post, ADD_DEFECT_PATH, Some(body), cancel)
        .await
        .and_then(decode::<DefectEnvelope>)
        .and_then(|envelope| decode(envelope.defect))
}

/// `PUT /api/defects/edit/by{engineer,manager}/{id}`; yields the changed
/// fields to feed [`DefectBoard::apply_edited`]. An empty reply yields `Null`.
pub async fn edit_defect(
    loader: &PageLoader,
    editor: Editor,
    id: u64,
    edit: &DefectEdit,
    cancel: &CancellationToken,
) -> PageLoad<Value> {
    let body = match serde_json::to_value(edit) {
        Ok(body) => body,
        Err(e) => return PageLoad::Failed(e.to_string()),
    };
    loader
        .call(Method::Put, &editor.edit_path(id), Some(body), cancel)
        .await
        .map(|reply| reply.get("defect").cloned().unwrap_or_default())
}

#[cfg(test)]
#[path = "defects_test.rs"]
mod tests;
