//! Sidebar navigation tabs and their per-role visibility.

use crate::routes::{PageId, Role, Route};
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Dashboard,
    Projects,
    DefectsEngineer,
    DefectsManager,
    AdminUsers,
    AdminProjects,
    ReportsAssignee,
    ReportsManager,
    ReportsEngineer,
}

impl Tab {
    /// Sidebar order.
    pub const ALL: [Self; 9] = [
        Self::Dashboard,
        Self::Projects,
        Self::DefectsEngineer,
        Self::DefectsManager,
        Self::AdminUsers,
        Self::AdminProjects,
        Self::ReportsAssignee,
        Self::ReportsManager,
        Self::ReportsEngineer,
    ];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Projects => "projects",
            Self::DefectsEngineer => "defects_engineer",
            Self::DefectsManager => "defects_manager",
            Self::AdminUsers => "admin_users",
            Self::AdminProjects => "admin_projects",
            Self::ReportsAssignee => "reports_assignee",
            Self::ReportsManager => "reports_manager",
            Self::ReportsEngineer => "reports_engineer",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Дашборд",
            Self::Projects => "Проект",
            Self::DefectsEngineer | Self::DefectsManager => "Дефекты",
            Self::AdminUsers => "Пользователи",
            Self::AdminProjects => "Проекты",
            Self::ReportsAssignee | Self::ReportsManager | Self::ReportsEngineer => "Отчёты",
        }
    }

    #[must_use]
    pub fn route(self) -> Route {
        match self {
            Self::Dashboard => Route::Home,
            Self::Projects => Route::Page(PageId::ManagerProjects),
            Self::DefectsEngineer => Route::Page(PageId::EngineerDefects),
            Self::DefectsManager => Route::Page(PageId::ManagerDefects),
            Self::AdminUsers => Route::Page(PageId::AdminUsers),
            Self::AdminProjects => Route::Page(PageId::AdminProjects),
            Self::ReportsAssignee => Route::Page(PageId::AssigneeReports),
            Self::ReportsManager => Route::Page(PageId::ManagerReports),
            Self::ReportsEngineer => Route::Page(PageId::EngineerReports),
        }
    }

    /// Highlighted when the current path is the tab's path or below it.
    #[must_use]
    pub fn is_active(self, current_path: &str) -> bool {
        let href = self.route().path();
        current_path == href || current_path.strip_prefix(href).is_some_and(|rest| rest.starts_with('/'))
    }

    fn visible_to(self, role: Role) -> bool {
        match role {
            Role::Admin => matches!(self, Self::AdminUsers | Self::AdminProjects),
            Role::Engineer => matches!(self, Self::DefectsEngineer | Self::ReportsEngineer),
            Role::Manager => {
                matches!(self, Self::Dashboard | Self::Projects | Self::DefectsManager | Self::ReportsManager)
            }
            Role::Director => self == Self::Dashboard,
            Role::Assignee => self == Self::ReportsAssignee,
        }
    }
}

/// Tabs shown for `role`. An absent or unknown role shows every tab; the
/// pages behind them still run their own guards.
#[must_use]
pub fn visible_tabs(role: Option<Role>) -> Vec<Tab> {
    Tab::ALL
        .into_iter()
        .filter(|tab| role.is_none_or(|role| tab.visible_to(role)))
        .collect()
}

/// Role used to pick sidebar tabs, read from the stored token.
#[must_use]
pub fn sidebar_role(store: &SessionStore) -> Option<Role> {
    match store.claims() {
        Ok(claims) => claims.role(),
        Err(e) => {
            tracing::debug!(error = %e, "sidebar has no decodable token");
            None
        }
    }
}

#[cfg(test)]
#[path = "nav_test.rs"]
mod tests;
