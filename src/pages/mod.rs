//! Screens of the client.
//!
//! The management pages are [`ManagedCollection`](crate::collection::ManagedCollection)
//! instances configured by a [`Resource`](crate::collection::Resource) impl;
//! posts and statistics have their own view models.

pub mod categories;
pub mod groups;
pub mod posts;
pub mod questions;
pub mod statistics;
pub mod studies;
pub mod users;

pub use categories::{CategoriesPage, CategoryForm};
pub use groups::{GroupForm, GroupsPage};
pub use posts::{ImportDraft, PostsPage};
pub use questions::{QuestionForm, QuestionsPage};
pub use statistics::StatisticsPage;
pub use studies::{StudiesPage, StudyForm};
pub use users::{UserForm, UsersPage};

use crate::error::Result;
use crate::models::Study;
use crate::services::ApiClient;
use crate::session::Actor;

/// Studies owned by the acting investigator (`GET /studies?username=`).
///
/// Used for study pickers and to scope posts and associations.
pub async fn own_studies(api: &ApiClient, actor: &Actor) -> Result<Vec<Study>> {
    api.get_json("/studies", &[("username", actor.username.as_str())])
        .await
}
