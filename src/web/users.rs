use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use maud::Markup;
use tracing::info;

use super::session::{AUTHENTICATED_USER_ID, REDIRECT_PATH_AFTER_LOGIN};
use super::PageContext;
use crate::error::AppResult;
use crate::forms::{UserLoginForm, UserSignupForm};
use crate::store::{StoreError, UserStore};
use crate::templates;

/// Where a fresh login lands when no protected page sent the user here.
const DEFAULT_LOGIN_REDIRECT: &str = "/snippet/create";

fn unprocessable(page: Markup) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
}

pub async fn signup(ctx: PageContext) -> AppResult<Markup> {
    Ok(templates::signup(
        &ctx.data().await?,
        &UserSignupForm::default(),
    ))
}

pub async fn signup_post(
    State(users): State<Arc<dyn UserStore>>,
    ctx: PageContext,
    form: Result<Form<UserSignupForm>, FormRejection>,
) -> AppResult<Response> {
    let Form(mut form) = form?;

    if !form.validate() {
        return Ok(unprocessable(templates::signup(&ctx.data().await?, &form)));
    }

    match users.insert(&form.name, &form.email, &form.password).await {
        Ok(()) => {}
        Err(StoreError::DuplicateEmail) => {
            form.validator
                .add_field_error("email", "Email address is already in use");
            return Ok(unprocessable(templates::signup(&ctx.data().await?, &form)));
        }
        Err(e) => return Err(e.into()),
    }
    info!(email = %form.email, "signed up new user");

    ctx.flash("Your signup was successful. Please log in.")
        .await?;
    Ok(Redirect::to("/user/login").into_response())
}

pub async fn login(ctx: PageContext) -> AppResult<Markup> {
    Ok(templates::login(
        &ctx.data().await?,
        &UserLoginForm::default(),
    ))
}

pub async fn login_post(
    State(users): State<Arc<dyn UserStore>>,
    ctx: PageContext,
    form: Result<Form<UserLoginForm>, FormRejection>,
) -> AppResult<Response> {
    let Form(mut form) = form?;

    if !form.validate() {
        return Ok(unprocessable(templates::login(&ctx.data().await?, &form)));
    }

    let id = match users.authenticate(&form.email, &form.password).await {
        Ok(id) => id,
        Err(StoreError::InvalidCredentials) => {
            form.validator
                .add_non_field_error("Email or password is incorrect");
            return Ok(unprocessable(templates::login(&ctx.data().await?, &form)));
        }
        Err(e) => return Err(e.into()),
    };

    // new id on every privilege change
    let session = ctx.session();
    session.cycle_id().await?;
    session.insert(AUTHENTICATED_USER_ID, id).await?;

    let target = session
        .remove::<String>(REDIRECT_PATH_AFTER_LOGIN)
        .await?
        .unwrap_or_else(|| DEFAULT_LOGIN_REDIRECT.to_owned());
    Ok(Redirect::to(&target).into_response())
}

pub async fn logout_post(ctx: PageContext) -> AppResult<Redirect> {
    let session = ctx.session();
    session.cycle_id().await?;
    session.remove::<i32>(AUTHENTICATED_USER_ID).await?;

    ctx.flash("You've been logged out successfully!").await?;
    Ok(Redirect::to("/"))
}

pub async fn account_view(
    State(users): State<Arc<dyn UserStore>>,
    ctx: PageContext,
) -> AppResult<Response> {
    let Some(id) = ctx.user_id() else {
        return Ok(Redirect::to("/user/login").into_response());
    };

    match users.get(id).await {
        Ok(user) => Ok(templates::account(&ctx.data().await?, &user).into_response()),
        Err(StoreError::NotFound) => Ok(Redirect::to("/user/login").into_response()),
        Err(e) => Err(e.into()),
    }
}
