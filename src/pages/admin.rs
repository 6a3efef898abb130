//! Admin pages: user and project management plus the lookups their forms
//! need (roles, managers without a project).
//!
//! Mutations answer `PageLoad<()>`; the caller reloads the affected list,
//! since the server does not echo a full row back.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::net::api::Method;
use crate::net::types::{AdminProject, AdminUser, NewProject, NewUser, RoleRef};
use crate::routes::PageId;

use super::{PageLoad, PageLoader, decode};

pub const ROLES_PATH: &str = "/api/admin/roles";
pub const USERS_PATH: &str = "/api/admin/users";
pub const AVAILABLE_MANAGERS_PATH: &str = "/api/admin/available_managers";
pub const PROJECTS_PATH: &str = "/api/admin/projects";
pub const DELETE_USER_PATH: &str = "/api/admin/delete_user";
pub const DELETE_PROJECT_PATH: &str = "/api/admin/delete_project";

// =============================================================================
// USERS
// =============================================================================

/// Users page state: the user list, the role options, and the managers still
/// free to take a project.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<AdminUser>,
    roles: Vec<RoleRef>,
    managers: Vec<AdminUser>,
    /// Role name to show; `None` or empty shows everyone.
    pub role_filter: Option<String>,
}

impl UserDirectory {
    #[must_use]
    pub fn new(users: Vec<AdminUser>, roles: Vec<RoleRef>, managers: Vec<AdminUser>) -> Self {
        Self { users, roles, managers, role_filter: None }
    }

    #[must_use]
    pub fn users(&self) -> &[AdminUser] {
        &self.users
    }

    #[must_use]
    pub fn roles(&self) -> &[RoleRef] {
        &self.roles
    }

    #[must_use]
    pub fn managers(&self) -> &[AdminUser] {
        &self.managers
    }

    /// Role name for a user: the preloaded role, else a lookup by `role_id`.
    #[must_use]
    pub fn role_name<'a>(&'a self, user: &'a AdminUser) -> Option<&'a str> {
        if let Some(role) = &user.role {
            return Some(&role.name);
        }
        let id = user.role_id?;
        self.roles.iter().find(|role| role.id == id).map(|role| role.name.as_str())
    }

    #[must_use]
    pub fn visible(&self) -> Vec<&AdminUser> {
        let wanted = self.role_filter.as_deref().filter(|name| !name.is_empty());
        self.users
            .iter()
            .filter(|user| wanted.is_none_or(|name| self.role_name(user) == Some(name)))
            .collect()
    }

    /// Swap in a reloaded user list, keeping the filter.
    pub fn replace_users(&mut self, users: Vec<AdminUser>) {
        self.users = users;
    }

    /// Drop a deleted user from the list and from the free managers.
    pub fn apply_deleted(&mut self, id: u64) -> Option<AdminUser> {
        self.managers.retain(|manager| manager.id != id);
        let index = self.users.iter().position(|user| user.id == id)?;
        Some(self.users.remove(index))
    }
}

/// Load `/admin/users`: the guarded user list, then roles and free managers.
pub async fn load_user_directory(loader: &PageLoader, cancel: &CancellationToken) -> PageLoad<UserDirectory> {
    let users = match loader.load::<Vec<AdminUser>>(PageId::AdminUsers, cancel).await.into_ready() {
        Ok(users) => users,
        Err(state) => return state,
    };
    let roles = match fetch::<Vec<RoleRef>>(loader, ROLES_PATH, cancel).await.into_ready() {
        Ok(roles) => roles,
        Err(state) => return state,
    };
    fetch::<Vec<AdminUser>>(loader, AVAILABLE_MANAGERS_PATH, cancel)
        .await
        .map(|managers| UserDirectory::new(users, roles, managers))
}

/// `POST /api/admin/users`.
pub async fn add_user(loader: &PageLoader, user: &NewUser, cancel: &CancellationToken) -> PageLoad<()> {
    submit(loader, Method::Post, USERS_PATH, user, cancel).await
}

/// `DELETE /api/admin/delete_user`. The server refuses to delete a manager
/// who still owns a project; its message comes back as `Failed`.
pub async fn delete_user(loader: &PageLoader, id: u64, cancel: &CancellationToken) -> PageLoad<()> {
    submit(loader, Method::Delete, DELETE_USER_PATH, &ById { id }, cancel).await
}

// =============================================================================
// PROJECTS
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ProjectRegistry {
    projects: Vec<AdminProject>,
    managers: Vec<AdminUser>,
}

impl ProjectRegistry {
    #[must_use]
    pub fn new(projects: Vec<AdminProject>, managers: Vec<AdminUser>) -> Self {
        Self { projects, managers }
    }

    #[must_use]
    pub fn projects(&self) -> &[AdminProject] {
        &self.projects
    }

    /// Managers that can still be assigned to a new project.
    #[must_use]
    pub fn managers(&self) -> &[AdminUser] {
        &self.managers
    }

    /// Display name of a project's manager, or an empty string.
    #[must_use]
    pub fn manager_name(project: &AdminProject) -> String {
        project.manager.as_ref().map(AdminUser::full_name).unwrap_or_default()
    }

    pub fn replace_projects(&mut self, projects: Vec<AdminProject>) {
        self.projects = projects;
    }

    pub fn apply_deleted(&mut self, id: u64) -> Option<AdminProject> {
        let index = self.projects.iter().position(|project| project.id == id)?;
        Some(self.projects.remove(index))
    }
}

/// Load `/admin/projects`: the guarded project list, then free managers.
pub async fn load_project_registry(loader: &PageLoader, cancel: &CancellationToken) -> PageLoad<ProjectRegistry> {
    let projects = match loader.load::<Vec<AdminProject>>(PageId::AdminProjects, cancel).await.into_ready() {
        Ok(projects) => projects,
        Err(state) => return state,
    };
    fetch::<Vec<AdminUser>>(loader, AVAILABLE_MANAGERS_PATH, cancel)
        .await
        .map(|managers| ProjectRegistry::new(projects, managers))
}

/// `POST /api/admin/projects`.
pub async fn add_project(loader: &PageLoader, project: &NewProject, cancel: &CancellationToken) -> PageLoad<()> {
    submit(loader, Method::Post, PROJECTS_PATH, project, cancel).await
}

/// `DELETE /api/admin/delete_project`.
pub async fn delete_project(loader: &PageLoader, id: u64, cancel: &CancellationToken) -> PageLoad<()> {
    submit(loader, Method::Delete, DELETE_PROJECT_PATH, &ById { id }, cancel).await
}

// =============================================================================
// HELPERS
// =============================================================================

#[derive(Serialize)]
struct ById {
    id: u64,
}

async fn fetch<T: DeserializeOwned>(loader: &PageLoader, path: &str, cancel: &CancellationToken) -> PageLoad<T> {
    loader.call(Method::Get, path, None, cancel).await.and_then(decode)
}

async fn submit(
    loader: &PageLoader,
    method: Method,
    path: &str,
    body: &impl Serialize,
    cancel: &CancellationToken,
) -> PageLoad<()> {
    let body: Value = match serde_json::to_value(body) {
        Ok(body) => body,
        Err(e) => return PageLoad::Failed(e.to_string()),
    };
    loader.call(method, path, Some(body), cancel).await.map(|_| ())
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;
