use super::*;
use crate::test_helpers::{RecordingNavigator, make_token, memory_session};

#[test]
fn allowed_role_renders() {
    let session = memory_session().with_access(&make_token(Some("Менеджер"), None));
    let mut guard = RoleGuard::for_page(PageId::ManagerDefects);

    assert_eq!(guard.result(), RoleGuardResult { loading: true, role: None });
    assert_eq!(guard.evaluate(&session.store), GuardDecision::Allowed(Role::Manager));
    assert_eq!(guard.result(), RoleGuardResult { loading: false, role: Some(Role::Manager) });
    assert!(guard.result().may_render());
}

#[test]
fn missing_token_redirects_to_login_and_stays_loading() {
    let session = memory_session();
    let mut guard = RoleGuard::new([Role::Admin]);

    assert_eq!(guard.evaluate(&session.store), GuardDecision::Redirect(Route::Login));
    assert!(guard.result().loading);
    assert!(!guard.result().may_render());
}

#[test]
fn undecodable_token_is_treated_as_absent() {
    let session = memory_session().with_access("garbage");
    let mut guard = RoleGuard::new([Role::Admin]);
    assert_eq!(guard.evaluate(&session.store), GuardDecision::Redirect(Route::Login));
}

#[test]
fn wrong_role_goes_home_not_login() {
    let session = memory_session().with_access(&make_token(Some("Инженер"), None));
    let mut guard = RoleGuard::new([Role::Manager]);

    assert_eq!(guard.evaluate(&session.store), GuardDecision::Redirect(Route::Home));
    assert_eq!(guard.result(), RoleGuardResult { loading: false, role: None });
    assert!(session.store.access_token().is_some());
}

#[test]
fn missing_or_unknown_role_claim_goes_home() {
    for token in [make_token(None, None), make_token(Some("Гость"), None)] {
        let session = memory_session().with_access(&token);
        let mut guard = RoleGuard::new([Role::Manager]);
        assert_eq!(guard.evaluate(&session.store), GuardDecision::Redirect(Route::Home));
    }
}

#[test]
fn redirect_navigates_exactly_once() {
    let session = memory_session().with_access(&make_token(Some("Инженер"), None));
    let nav = RecordingNavigator::default();
    let mut guard = RoleGuard::new([Role::Manager]);

    for _ in 0..3 {
        let result = guard.apply(&session.store, &nav);
        assert!(!result.may_render());
    }
    assert_eq!(nav.visited(), [Route::Home]);
}

#[test]
fn decision_is_cached_until_allow_list_changes() {
    let session = memory_session().with_access(&make_token(Some("Инженер"), None));
    let nav = RecordingNavigator::default();
    let mut guard = RoleGuard::new([Role::Manager]);
    guard.apply(&session.store, &nav);

    // Token changes do not matter until the allow-list does.
    session.store.set_access_token(&make_token(Some("Менеджер"), None));
    guard.set_allowed([Role::Manager]);
    assert_eq!(guard.apply(&session.store, &nav).role, None);

    guard.set_allowed([Role::Manager, Role::Director]);
    assert_eq!(guard.decision(), GuardDecision::Pending);
    assert_eq!(guard.apply(&session.store, &nav).role, Some(Role::Manager));
    assert_eq!(nav.visited(), [Route::Home]);
}

#[test]
fn every_page_admits_only_its_roles() {
    for page in PageId::ALL {
        for role in Role::ALL {
            let session = memory_session().with_access(&make_token(Some(role.as_str()), None));
            let decision = RoleGuard::for_page(page).evaluate(&session.store);
            if page.allowed_roles().contains(&role) {
                assert_eq!(decision, GuardDecision::Allowed(role), "{page:?} {role}");
            } else {
                assert_eq!(decision, GuardDecision::Redirect(Route::Home), "{page:?} {role}");
            }
        }
    }
}
