use super::*;

// =============================================================================
// Role
// =============================================================================

#[test]
fn role_parses_every_wire_value() {
    for role in Role::ALL {
        assert_eq!(role.as_str().parse::<Role>(), Ok(role));
    }
}

#[test]
fn role_rejects_unknown_value() {
    assert_eq!("Гость".parse::<Role>(), Err(UnknownRole("Гость".into())));
}

#[test]
fn role_serde_uses_wire_value() {
    let json = serde_json::to_string(&Role::Manager).unwrap();
    assert_eq!(json, "\"Менеджер\"");
    let role: Role = serde_json::from_str("\"Исполнитель\"").unwrap();
    assert_eq!(role, Role::Assignee);
}

#[test]
fn landing_routes_follow_role() {
    assert_eq!(Role::Admin.landing_route().path(), "/admin/users");
    assert_eq!(Role::Engineer.landing_route().path(), "/defects/engineer");
    assert_eq!(Role::Assignee.landing_route().path(), "/reports/assignee");
    assert_eq!(Role::Manager.landing_route(), Route::Home);
    assert_eq!(Role::Director.landing_route(), Route::Home);
}

// =============================================================================
// PageId
// =============================================================================

#[test]
fn page_paths_round_trip() {
    for page in PageId::ALL {
        assert_eq!(PageId::from_path(page.path()), Some(page));
    }
}

#[test]
fn from_path_tolerates_trailing_slash() {
    assert_eq!(PageId::from_path("/defects/manager/"), Some(PageId::ManagerDefects));
    assert_eq!(PageId::from_path("/nowhere"), None);
}

#[test]
fn every_page_has_a_nonempty_allow_list() {
    for page in PageId::ALL {
        assert!(!page.allowed_roles().is_empty(), "{page:?}");
        assert!(page.data_endpoint().starts_with("/api/"), "{page:?}");
    }
}

#[test]
fn manager_defects_reads_manager_endpoint() {
    assert_eq!(PageId::ManagerDefects.allowed_roles(), &[Role::Manager]);
    assert_eq!(PageId::ManagerDefects.data_endpoint(), "/api/defects/yours/manager");
}

#[test]
fn route_display_is_path() {
    assert_eq!(Route::Login.to_string(), "/login");
    assert_eq!(Route::Home.to_string(), "/");
    assert_eq!(Route::Page(PageId::AllDefects).to_string(), "/defects");
}
