// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Command handlers: each one resolves its route through the guard, mounts
//! the page and drives it the way a user would.

use super::output::{render_bars, render_page, Tabular};
use super::{
    CategoryCommands, Commands, DeleteArgs, GroupCommands, PostCommands, QuestionCommands,
    StudyCommands, UserCommands,
};
use anyhow::{anyhow, bail, Context};
use chrono::{DateTime, Utc};
use classify_admin::collection::{ManagedCollection, Resource};
use classify_admin::error::AppError;
use classify_admin::models::{InputType, Role};
use classify_admin::pages::categories::{self, Categories};
use classify_admin::pages::groups::{self, Groups};
use classify_admin::pages::questions::Questions;
use classify_admin::pages::studies::Studies;
use classify_admin::pages::users::Users;
use classify_admin::pages::{
    CategoryForm, GroupForm, PostsPage, QuestionForm, StatisticsPage, StudyForm, UserForm,
};
use classify_admin::routes::{guard, menu, GuardDecision, Route, LOGIN_PATH};
use classify_admin::session::{self, Credentials, Registration, SessionWriter};
use classify_admin::time_utils::parse_input;
use classify_admin::AppState;
use std::io::{self, BufRead, Write};

const DELETE_PROMPT: &str = "Tem a certeza que pretende apagar?";
const REMOVE_ASSOCIATION_PROMPT: &str = "Tens a certeza que queres remover esta associação?";

pub async fn dispatch(
    command: Commands,
    state: &AppState,
    writer: &SessionWriter,
) -> anyhow::Result<()> {
    match command {
        Commands::Login { username, password } => {
            let session = writer
                .login(&state.api, &Credentials { username, password })
                .await?;
            if let Some(actor) = session.actor() {
                println!("Logged in as {} ({})", actor.username, actor.role);
            }
            Ok(())
        }
        Commands::Register {
            username,
            email,
            password,
        } => {
            let registration = Registration {
                username,
                email,
                password,
            };
            session::register(&state.api, &registration).await?;
            println!("Account {} created. Log in to continue.", registration.username);
            Ok(())
        }
        Commands::Logout => {
            let entry = menu::menu_for(state.session.require_actor()?.role)
                .into_iter()
                .find(|entry| entry.action == menu::MenuAction::Logout)
                .context("menu has no logout entry")?;
            let route = menu::activate(&entry, writer)?;
            println!("Logged out. Next: {}", route.path());
            Ok(())
        }
        Commands::Whoami => {
            match state.session.actor() {
                Some(actor) => println!("{} ({})", actor.username, actor.role),
                None => println!("Not logged in"),
            }
            Ok(())
        }
        Commands::Menu => {
            let actor = state.session.require_actor()?;
            for entry in menu::menu_for(actor.role) {
                match entry.action {
                    menu::MenuAction::Navigate(route) => {
                        println!("{:<14} {}", entry.label, route.path())
                    }
                    menu::MenuAction::Logout => println!("{:<14} (logout)", entry.label),
                }
            }
            Ok(())
        }
        Commands::Open { path } => {
            let route =
                Route::from_path(&path).ok_or_else(|| anyhow!("unknown route: {path}"))?;
            match guard(route, &state.session.current()) {
                GuardDecision::Pending => println!("{}", GuardDecision::PLACEHOLDER),
                GuardDecision::Redirect(to) => println!("redirect {to}"),
                GuardDecision::Render(page) => println!("render {page:?}"),
            }
            Ok(())
        }
        Commands::Users { action } => users(state, action).await,
        Commands::Studies { action } => studies(state, action).await,
        Commands::Categories { action } => categories_cmd(state, action).await,
        Commands::Questions { action } => questions(state, action).await,
        Commands::Posts { action } => posts(state, action).await,
        Commands::Groups { action } => groups_cmd(state, action).await,
        Commands::Stats { search, viewport } => stats(state, search, viewport).await,
    }
}

// ─── Entity commands ─────────────────────────────────────────────

async fn users(state: &AppState, action: UserCommands) -> anyhow::Result<()> {
    let route = Route::AdminUsers;
    match action {
        UserCommands::List(args) => list::<Users>(state, route, args.page).await,
        UserCommands::Create {
            username,
            email,
            password,
            role,
        } => {
            let form = UserForm {
                username,
                email,
                password,
                role: parse_role(&role)?,
                editing: false,
            };
            create::<Users>(state, route, form).await
        }
        UserCommands::Edit {
            id,
            username,
            email,
            password,
            role,
        } => {
            let role = role.as_deref().map(parse_role).transpose()?;
            edit::<Users>(state, route, id, |form| {
                patch(&mut form.username, username);
                patch(&mut form.email, email);
                patch(&mut form.password, password);
                patch(&mut form.role, role);
            })
            .await
        }
        UserCommands::Delete(DeleteArgs { id, yes }) => {
            delete::<Users>(state, route, id, yes, DELETE_PROMPT).await
        }
    }
}

async fn studies(state: &AppState, action: StudyCommands) -> anyhow::Result<()> {
    let route = Route::InvestigatorStudies;
    match action {
        StudyCommands::List(args) => list::<Studies>(state, route, args.page).await,
        StudyCommands::Create {
            name,
            obs,
            min_classifications,
            percent,
            finished_at,
        } => {
            let form = StudyForm {
                name,
                obs,
                min_classifications_per_post: min_classifications,
                validation_agreement_percent: percent,
                finished_at: parse_deadline(finished_at.as_deref())?,
            };
            create::<Studies>(state, route, form).await
        }
        StudyCommands::Edit {
            id,
            name,
            obs,
            min_classifications,
            percent,
            finished_at,
        } => {
            let finished_at = finished_at
                .as_deref()
                .map(|raw| parse_deadline(Some(raw)))
                .transpose()?;
            edit::<Studies>(state, route, id, |form| {
                patch(&mut form.name, name);
                patch(&mut form.obs, obs);
                if min_classifications.is_some() {
                    form.min_classifications_per_post = min_classifications;
                }
                if percent.is_some() {
                    form.validation_agreement_percent = percent;
                }
                patch(&mut form.finished_at, finished_at);
            })
            .await
        }
        StudyCommands::Delete(DeleteArgs { id, yes }) => {
            delete::<Studies>(state, route, id, yes, DELETE_PROMPT).await
        }
    }
}

async fn categories_cmd(state: &AppState, action: CategoryCommands) -> anyhow::Result<()> {
    let route = Route::InvestigatorCategories;
    match action {
        CategoryCommands::List(args) => list::<Categories>(state, route, args.page).await,
        CategoryCommands::Create {
            name,
            category_type,
            question,
        } => {
            let form = CategoryForm {
                name,
                category_type,
                question_id: question,
            };
            create::<Categories>(state, route, form).await
        }
        CategoryCommands::Edit {
            id,
            name,
            category_type,
            question,
        } => {
            edit::<Categories>(state, route, id, |form| {
                patch(&mut form.name, name);
                patch(&mut form.category_type, category_type);
                if question.is_some() {
                    form.question_id = question;
                }
            })
            .await
        }
        CategoryCommands::Delete(DeleteArgs { id, yes }) => {
            delete::<Categories>(state, route, id, yes, DELETE_PROMPT).await
        }
        CategoryCommands::Types => {
            authorize(state, route)?;
            let actor = state.session.require_actor()?;
            for suggestion in categories::type_suggestions(&state.api, &actor).await {
                println!("{suggestion}");
            }
            Ok(())
        }
        CategoryCommands::Questions => {
            authorize(state, route)?;
            let actor = state.session.require_actor()?;
            let questions = categories::question_choices(&state.api, &actor).await?;
            println!("{}", render_page(&questions, 1, 1));
            Ok(())
        }
    }
}

async fn questions(state: &AppState, action: QuestionCommands) -> anyhow::Result<()> {
    let route = Route::InvestigatorQuestions;
    match action {
        QuestionCommands::List(args) => list::<Questions>(state, route, args.page).await,
        QuestionCommands::Create {
            question,
            content,
            input_type,
            study,
        } => {
            let form = QuestionForm {
                question,
                content,
                input_type: parse_input_type(&input_type)?,
                study_id: study,
            };
            create::<Questions>(state, route, form).await
        }
        QuestionCommands::Edit {
            id,
            question,
            content,
            input_type,
            study,
        } => {
            let input_type = input_type.as_deref().map(parse_input_type).transpose()?;
            edit::<Questions>(state, route, id, |form| {
                patch(&mut form.question, question);
                patch(&mut form.content, content);
                patch(&mut form.input_type, input_type);
                if study.is_some() {
                    form.study_id = study;
                }
            })
            .await
        }
        QuestionCommands::Delete(DeleteArgs { id, yes }) => {
            delete::<Questions>(state, route, id, yes, DELETE_PROMPT).await
        }
    }
}

async fn posts(state: &AppState, action: PostCommands) -> anyhow::Result<()> {
    authorize(state, Route::InvestigatorPosts)?;
    let mut page = PostsPage::mount(state).await?;

    match action {
        PostCommands::List {
            search,
            study,
            page: args,
        } => {
            if let Some(message) = page.page_error() {
                bail!(message);
            }
            page.set_search(search);
            page.set_study_filter(study);
            let shown = page.set_page(args.page);
            println!(
                "{}",
                render_page(&page.page_items(), shown, page.total_pages())
            );
        }
        PostCommands::Import { file, study } => {
            let count = page.choose_file(&file).await.map_err(|e| notice(&page, e))?;
            println!("Read {count} posts from {}", file.display());

            page.select_study(study);
            let imported = page.import().await.map_err(|e| notice(&page, e))?;
            println!("Imported {imported} posts.");
        }
        PostCommands::Image { id, output } => {
            let path = page.export_image(id, &output).await?;
            println!("Saved {}", path.display());
        }
    }
    Ok(())
}

async fn groups_cmd(state: &AppState, action: GroupCommands) -> anyhow::Result<()> {
    let route = Route::InvestigatorGroups;
    match action {
        GroupCommands::List(args) => list::<Groups>(state, route, args.page).await,
        GroupCommands::Add { user, study } => {
            let form = GroupForm {
                user_id: user,
                study_id: study,
            };
            create::<Groups>(state, route, form).await
        }
        GroupCommands::Move { user, from, to } => {
            edit::<Groups>(state, route, (user, from), |form| form.study_id = to).await
        }
        GroupCommands::Remove { user, study, yes } => {
            delete::<Groups>(state, route, (user, study), yes, REMOVE_ASSOCIATION_PROMPT).await
        }
        GroupCommands::Candidates => {
            authorize(state, route)?;
            let users = groups::candidate_users(&state.api).await?;
            println!("{}", render_page(&users, 1, 1));
            Ok(())
        }
    }
}

async fn stats(state: &AppState, search: Option<String>, viewport: u32) -> anyhow::Result<()> {
    authorize(state, Route::Statistics)?;
    let mut page = StatisticsPage::mount(state).await?;
    if let Some(message) = page.page_error() {
        bail!(message);
    }

    if let Some(term) = search {
        if page.set_search(term).is_none() {
            println!("No user matches \"{}\"", page.search());
        }
    }
    println!("{}", render_bars(&page.bars(), page.highlighted()));
    if let Some(offset) = page.scroll_offset(viewport) {
        println!("scroll: {offset}px");
    }
    Ok(())
}

// ─── Managed collection drivers ──────────────────────────────────

/// Run the route guard for a command.
fn authorize(state: &AppState, route: Route) -> anyhow::Result<()> {
    match guard(route, &state.session.current()) {
        GuardDecision::Render(_) => Ok(()),
        GuardDecision::Redirect(LOGIN_PATH) => Err(AppError::Unauthenticated.into()),
        GuardDecision::Redirect(to) => Err(AppError::Forbidden(to).into()),
        GuardDecision::Pending => bail!(GuardDecision::PLACEHOLDER),
    }
}

async fn mounted<R: Resource>(
    state: &AppState,
    route: Route,
) -> anyhow::Result<ManagedCollection<R>> {
    authorize(state, route)?;
    let collection = ManagedCollection::<R>::mount(state).await?;
    if let Some(message) = collection.page_error() {
        bail!(message);
    }
    Ok(collection)
}

async fn list<R: Resource>(state: &AppState, route: Route, page: usize) -> anyhow::Result<()>
where
    R::Item: Tabular,
{
    let mut collection = mounted::<R>(state, route).await?;
    let shown = collection.set_page(page);
    println!(
        "{}",
        render_page(collection.page_items(), shown, collection.total_pages())
    );
    Ok(())
}

async fn create<R: Resource>(state: &AppState, route: Route, form: R::Form) -> anyhow::Result<()> {
    let mut collection = mounted::<R>(state, route).await?;
    collection.open_create()?;
    if let Some(open) = collection.form_mut() {
        *open = form;
    }
    submit(&mut collection).await
}

async fn edit<R: Resource>(
    state: &AppState,
    route: Route,
    key: R::Key,
    apply: impl FnOnce(&mut R::Form),
) -> anyhow::Result<()> {
    let mut collection = mounted::<R>(state, route).await?;
    collection.open_edit(&key)?;
    if let Some(open) = collection.form_mut() {
        apply(open);
    }
    submit(&mut collection).await
}

async fn submit<R: Resource>(collection: &mut ManagedCollection<R>) -> anyhow::Result<()> {
    match collection.submit().await {
        Ok(()) => {
            println!("Saved.");
            Ok(())
        }
        Err(e) => {
            let message = collection
                .modal_error()
                .or_else(|| collection.page_error())
                .unwrap_or_else(|| e.to_string());
            Err(anyhow!(message))
        }
    }
}

async fn delete<R: Resource>(
    state: &AppState,
    route: Route,
    key: R::Key,
    yes: bool,
    prompt: &str,
) -> anyhow::Result<()> {
    let mut collection = mounted::<R>(state, route).await?;
    collection.request_delete(&key)?;

    if !yes && !confirm(prompt)? {
        collection.cancel_delete();
        println!("Cancelled.");
        return Ok(());
    }

    match collection.confirm_delete().await {
        Ok(()) => {
            println!("Deleted.");
            Ok(())
        }
        Err(e) => {
            let message = collection.delete_error().unwrap_or_else(|| e.to_string());
            Err(anyhow!(message))
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

fn patch<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn parse_role(raw: &str) -> anyhow::Result<Role> {
    raw.parse().map_err(|e| anyhow!("{e}"))
}

fn parse_input_type(raw: &str) -> anyhow::Result<InputType> {
    raw.parse().map_err(|e: String| anyhow!(e))
}

/// `None` or blank means no deadline.
fn parse_deadline(raw: Option<&str>) -> anyhow::Result<Option<DateTime<Utc>>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_input(raw)
            .map(Some)
            .ok_or_else(|| anyhow!("invalid date {raw:?}, expected RFC 3339 or YYYY-MM-DDTHH:MM")),
    }
}

fn notice(page: &PostsPage, error: AppError) -> anyhow::Error {
    anyhow!(page.notice().map_or_else(|| error.to_string(), str::to_string))
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [s/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    ))
}
