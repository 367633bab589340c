// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use classify_admin::models::Role;
use classify_admin::routes::{guard, menu_for, GuardDecision, MenuAction, Page, Route};
use classify_admin::session::Session;

fn session(role: Option<Role>) -> Session {
    Session {
        username: role.map(|r| format!("{r}-account")),
        role,
        loading: false,
    }
}

#[test]
fn test_disallowed_roles_are_sent_home() {
    for route in Route::ALL {
        let Some(allowed) = route.required_roles() else {
            continue;
        };
        for role in Role::ALL {
            let decision = guard(route, &session(Some(role)));
            if allowed.contains(&role) {
                assert!(
                    matches!(decision, GuardDecision::Render(_)),
                    "{role} should see {route}, got {decision:?}"
                );
            } else {
                assert_eq!(decision, GuardDecision::Redirect("/home"), "{role} on {route}");
            }
        }
    }
}

#[test]
fn test_no_session_goes_to_login() {
    for route in Route::ALL.into_iter().filter(|r| !r.is_public()) {
        assert_eq!(guard(route, &session(None)), GuardDecision::Redirect("/"));
    }
}

#[test]
fn test_resolving_session_is_pending_not_redirected() {
    let resolving = Session {
        username: None,
        role: None,
        loading: true,
    };
    assert_eq!(guard(Route::AdminUsers, &resolving), GuardDecision::Pending);
    assert_eq!(guard(Route::Login, &resolving), GuardDecision::Render(Page::Login));
}

#[test]
fn test_shared_paths_dispatch_on_role() {
    assert_eq!(
        guard(Route::Home, &session(Some(Role::Investigator))),
        GuardDecision::Render(Page::InvestigatorHome)
    );
    assert_eq!(
        guard(Route::Statistics, &session(Some(Role::User))),
        GuardDecision::Render(Page::UserStatistics)
    );
    assert_eq!(
        guard(Route::Statistics, &session(Some(Role::Admin))),
        GuardDecision::Redirect("/home")
    );
}

#[test]
fn test_every_menu_entry_passes_its_guard() {
    for role in Role::ALL {
        for entry in menu_for(role) {
            if let MenuAction::Navigate(route) = entry.action {
                assert!(
                    matches!(guard(route, &session(Some(role))), GuardDecision::Render(_)),
                    "{role} menu entry {} is not reachable",
                    entry.label
                );
            }
        }
    }
}
