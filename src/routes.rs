//! Roles, client routes, and the navigation port.
//!
//! DESIGN
//! ======
//! Every role-gated page is a [`PageId`] carrying its path, its role
//! allow-list, and the endpoint that feeds it, so guards and loaders read one
//! table instead of repeating string literals per page.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// ROLE
// =============================================================================

/// Role claim values as issued by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Админ")]
    Admin,
    #[serde(rename = "Менеджер")]
    Manager,
    #[serde(rename = "Инженер")]
    Engineer,
    #[serde(rename = "Исполнитель")]
    Assignee,
    #[serde(rename = "Руководитель")]
    Director,
}

impl Role {
    pub const ALL: [Self; 5] = [Self::Admin, Self::Manager, Self::Engineer, Self::Assignee, Self::Director];

    /// Wire value of the role claim.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Админ",
            Self::Manager => "Менеджер",
            Self::Engineer => "Инженер",
            Self::Assignee => "Исполнитель",
            Self::Director => "Руководитель",
        }
    }

    /// Where a freshly logged-in user of this role lands.
    #[must_use]
    pub fn landing_route(self) -> Route {
        match self {
            Self::Admin => Route::Page(PageId::AdminUsers),
            Self::Engineer => Route::Page(PageId::EngineerDefects),
            Self::Assignee => Route::Page(PageId::AssigneeReports),
            Self::Manager | Self::Director => Route::Home,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

// =============================================================================
// PAGES
// =============================================================================

/// Role-gated dashboard pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    AdminUsers,
    AdminProjects,
    ManagerProjects,
    ManagerDefects,
    ManagerReports,
    EngineerDefects,
    AllDefects,
    EngineerReports,
    AssigneeReports,
}

impl PageId {
    pub const ALL: [Self; 9] = [
        Self::AdminUsers,
        Self::AdminProjects,
        Self::ManagerProjects,
        Self::ManagerDefects,
        Self::ManagerReports,
        Self::EngineerDefects,
        Self::AllDefects,
        Self::EngineerReports,
        Self::AssigneeReports,
    ];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::AdminUsers => "/admin/users",
            Self::AdminProjects => "/admin/projects",
            Self::ManagerProjects => "/projects/manager",
            Self::ManagerDefects => "/defects/manager",
            Self::ManagerReports => "/reports/manager",
            Self::EngineerDefects => "/defects/engineer",
            Self::AllDefects => "/defects",
            Self::EngineerReports => "/reports/engineer",
            Self::AssigneeReports => "/reports/assignee",
        }
    }

    /// Roles permitted to render this page.
    #[must_use]
    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Self::AdminUsers | Self::AdminProjects => &[Role::Admin],
            Self::ManagerProjects | Self::ManagerDefects | Self::ManagerReports => &[Role::Manager],
            Self::EngineerDefects | Self::AllDefects | Self::EngineerReports => &[Role::Engineer],
            Self::AssigneeReports => &[Role::Assignee],
        }
    }

    /// API endpoint whose JSON feeds the page.
    #[must_use]
    pub fn data_endpoint(self) -> &'static str {
        match self {
            Self::AdminUsers => "/api/admin/users",
            Self::AdminProjects => "/api/admin/projects",
            Self::ManagerProjects => "/api/projects/yours/manager",
            Self::ManagerDefects => "/api/defects/yours/manager",
            Self::ManagerReports => "/api/reports/yours/manager/pending",
            Self::EngineerDefects => "/api/defects/yours",
            Self::AllDefects => "/api/defects/all",
            Self::EngineerReports => "/api/reports/yours/engineer/pending",
            Self::AssigneeReports => "/api/defects/yours/assignee",
        }
    }

    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        Self::ALL.into_iter().find(|page| page.path() == path)
    }
}

// =============================================================================
// ROUTE
// =============================================================================

/// Client-side navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Home,
    Page(PageId),
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Home => "/",
            Self::Page(page) => page.path(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Presentation-layer navigation port.
pub trait Navigator {
    fn navigate(&self, route: Route);
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
