// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role-filtered navigation menu.

use super::Route;
use crate::error::Result;
use crate::models::Role;
use crate::session::SessionWriter;

/// What activating a menu entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Navigate(Route),
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub action: MenuAction,
}

const fn nav(label: &'static str, route: Route) -> MenuEntry {
    MenuEntry {
        label,
        action: MenuAction::Navigate(route),
    }
}

const HOME: MenuEntry = nav("Home", Route::Home);
const LOGOUT: MenuEntry = MenuEntry {
    label: "Sair",
    action: MenuAction::Logout,
};

/// Menu entries for a role, in display order. Home first, logout last.
pub fn menu_for(role: Role) -> Vec<MenuEntry> {
    let role_entries: &[MenuEntry] = match role {
        Role::Admin => &[
            nav("Users", Route::AdminUsers),
            nav("Profile", Route::AdminProfile),
        ],
        Role::Investigator => &[
            nav("Estudos", Route::InvestigatorStudies),
            nav("Categorias", Route::InvestigatorCategories),
            nav("Perguntas", Route::InvestigatorQuestions),
            nav("Posts", Route::InvestigatorPosts),
            nav("Grupos", Route::InvestigatorGroups),
            nav("Estatísticas", Route::Statistics),
            nav("Perfil", Route::InvestigatorProfile),
        ],
        Role::User => &[
            nav("Estatísticas", Route::Statistics),
            nav("Perfil", Route::Profile),
        ],
    };

    let mut entries = Vec::with_capacity(role_entries.len() + 2);
    entries.push(HOME);
    entries.extend_from_slice(role_entries);
    entries.push(LOGOUT);
    entries
}

/// Activate an entry. Logout tears the session down and lands on the login route.
pub fn activate(entry: &MenuEntry, writer: &SessionWriter) -> Result<Route> {
    match entry.action {
        MenuAction::Navigate(route) => Ok(route),
        MenuAction::Logout => {
            writer.logout()?;
            Ok(Route::Login)
        }
    }
}
