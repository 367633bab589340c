// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route guard and role dispatch.

use super::{Route, HOME_PATH, LOGIN_PATH};
use crate::models::Role;
use crate::session::Session;

/// Concrete screen rendered for a route and role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Register,
    AdminHome,
    InvestigatorHome,
    UserHome,
    UserProfile,
    AdminProfile,
    InvestigatorProfile,
    UserStatistics,
    InvestigatorStatistics,
    UsersManagement,
    StudiesManagement,
    CategoriesManagement,
    QuestionsManagement,
    PostsManagement,
    GroupsManagement,
}

/// Outcome of guarding a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving; show a neutral placeholder.
    Pending,
    Redirect(&'static str),
    Render(Page),
}

impl GuardDecision {
    pub const PLACEHOLDER: &'static str = "A carregar...";
}

/// Decide what to show for `route` given the current session.
pub fn guard(route: Route, session: &Session) -> GuardDecision {
    let Some(required) = route.required_roles() else {
        return GuardDecision::Render(public_page(route));
    };

    if session.loading {
        return GuardDecision::Pending;
    }

    let Some(role) = session.role else {
        tracing::debug!(route = %route, "No session, redirecting to login");
        return GuardDecision::Redirect(LOGIN_PATH);
    };

    if !required.contains(&role) {
        tracing::debug!(route = %route, role = %role, "Role not allowed, redirecting home");
        return GuardDecision::Redirect(HOME_PATH);
    }

    match page_for(route, role) {
        Some(page) => GuardDecision::Render(page),
        None => GuardDecision::Redirect(HOME_PATH),
    }
}

fn public_page(route: Route) -> Page {
    match route {
        Route::Register => Page::Register,
        _ => Page::Login,
    }
}

/// Resolve the page a role sees on a route.
///
/// Shared paths dispatch on the role; single-role paths map to one page.
/// Returns `None` when the role has no page on the route.
pub fn page_for(route: Route, role: Role) -> Option<Page> {
    let page = match route {
        Route::Login => Page::Login,
        Route::Register => Page::Register,
        Route::Home => match role {
            Role::Admin => Page::AdminHome,
            Role::Investigator => Page::InvestigatorHome,
            Role::User => Page::UserHome,
        },
        Route::Profile => match role {
            Role::User => Page::UserProfile,
            Role::Admin => Page::AdminHome,
            Role::Investigator => Page::InvestigatorHome,
        },
        Route::Statistics => match role {
            Role::User => Page::UserStatistics,
            Role::Investigator => Page::InvestigatorStatistics,
            Role::Admin => return None,
        },
        Route::AdminUsers => Page::UsersManagement,
        Route::AdminProfile => Page::AdminProfile,
        Route::InvestigatorStudies => Page::StudiesManagement,
        Route::InvestigatorCategories => Page::CategoriesManagement,
        Route::InvestigatorQuestions => Page::QuestionsManagement,
        Route::InvestigatorPosts => Page::PostsManagement,
        Route::InvestigatorGroups => Page::GroupsManagement,
        Route::InvestigatorProfile => Page::InvestigatorProfile,
    };
    Some(page)
}
