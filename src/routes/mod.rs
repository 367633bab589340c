// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route table, role guard and navigation menu.

pub mod guard;
pub mod menu;

use crate::models::Role;
use std::fmt;

pub use guard::{guard, GuardDecision, Page};
pub use menu::{menu_for, MenuAction, MenuEntry};

pub const LOGIN_PATH: &str = "/";
pub const HOME_PATH: &str = "/home";

/// Every navigable destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Home,
    Profile,
    Statistics,
    AdminUsers,
    AdminProfile,
    InvestigatorStudies,
    InvestigatorCategories,
    InvestigatorQuestions,
    InvestigatorPosts,
    InvestigatorGroups,
    InvestigatorProfile,
}

const ALL_ROLES: &[Role] = &[Role::User, Role::Admin, Role::Investigator];
const ADMIN_ONLY: &[Role] = &[Role::Admin];
const INVESTIGATOR_ONLY: &[Role] = &[Role::Investigator];

impl Route {
    pub const ALL: [Route; 13] = [
        Route::Login,
        Route::Register,
        Route::Home,
        Route::Profile,
        Route::Statistics,
        Route::AdminUsers,
        Route::AdminProfile,
        Route::InvestigatorStudies,
        Route::InvestigatorCategories,
        Route::InvestigatorQuestions,
        Route::InvestigatorPosts,
        Route::InvestigatorGroups,
        Route::InvestigatorProfile,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => LOGIN_PATH,
            Route::Register => "/register",
            Route::Home => HOME_PATH,
            Route::Profile => "/profile",
            Route::Statistics => "/statistics",
            Route::AdminUsers => "/admin/users",
            Route::AdminProfile => "/admin/profile",
            Route::InvestigatorStudies => "/investigator/studies",
            Route::InvestigatorCategories => "/investigator/categories",
            Route::InvestigatorQuestions => "/investigator/questions",
            Route::InvestigatorPosts => "/investigator/posts",
            Route::InvestigatorGroups => "/investigator/groups",
            Route::InvestigatorProfile => "/investigator/profile",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        Route::ALL.into_iter().find(|r| r.path() == normalized)
    }

    /// Public routes need no session at all.
    pub fn is_public(self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }

    /// Roles allowed on this route; `None` for public routes.
    pub fn required_roles(self) -> Option<&'static [Role]> {
        match self {
            Route::Login | Route::Register => None,
            Route::Home | Route::Profile => Some(ALL_ROLES),
            Route::Statistics => Some(&[Role::User, Role::Investigator]),
            Route::AdminUsers | Route::AdminProfile => Some(ADMIN_ONLY),
            Route::InvestigatorStudies
            | Route::InvestigatorCategories
            | Route::InvestigatorQuestions
            | Route::InvestigatorPosts
            | Route::InvestigatorGroups
            | Route::InvestigatorProfile => Some(INVESTIGATOR_ONLY),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
