use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use maud::Markup;
use tracing::info;

use super::PageContext;
use crate::error::{AppError, AppResult};
use crate::forms::SnippetCreateForm;
use crate::store::SnippetStore;
use crate::templates;

pub async fn view(
    State(snippets): State<Arc<dyn SnippetStore>>,
    ctx: PageContext,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = id
        .parse::<i32>()
        .ok()
        .filter(|id| *id >= 1)
        .ok_or(AppError::NotFound)?;

    let snippet = snippets.get(id).await?;
    Ok(templates::view(&ctx.data().await?, &snippet))
}

pub async fn create(ctx: PageContext) -> AppResult<Markup> {
    Ok(templates::create(
        &ctx.data().await?,
        &SnippetCreateForm::new(),
    ))
}

pub async fn create_post(
    State(snippets): State<Arc<dyn SnippetStore>>,
    ctx: PageContext,
    form: Result<Form<SnippetCreateForm>, FormRejection>,
) -> AppResult<Response> {
    let Form(mut form) = form?;

    if !form.validate() {
        let page = templates::create(&ctx.data().await?, &form);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    let id = snippets
        .insert(&form.title, &form.content, form.expires)
        .await?;
    info!(id, expires_in_days = form.expires, "created snippet");

    ctx.flash("Snippet successfully created!").await?;
    Ok(Redirect::to(&format!("/snippet/view/{id}")).into_response())
}
