//! Server-rendered pages.
//!
//! Every page shares [`base`] for the document shell and navigation, and takes
//! a [`TemplateData`] carrying the per-request bits (flash message, login
//! state, footer year). Markup is generated with maud, so all dynamic values
//! are escaped.

mod pages;

use chrono::{DateTime, TimeZone, Utc};
use maud::{html, Markup, DOCTYPE};

pub use pages::{about, account, create, home, login, signup, view};

use crate::validation::Validator;

#[derive(Debug, Clone, Default)]
pub struct TemplateData {
    pub current_year: i32,
    pub flash: Option<String>,
    pub is_authenticated: bool,
}

/// Format a timestamp as e.g. `17 Mar 2022 at 10:15`, always in UTC.
pub fn human_date<Tz: TimeZone>(t: &DateTime<Tz>) -> String {
    t.with_timezone(&Utc).format("%d %b %Y at %H:%M").to_string()
}

fn base(title: &str, data: &TemplateData, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) " - Snippetbox" }
                link rel="stylesheet" href="/static/css/main.css";
                link rel="stylesheet" href="https://fonts.googleapis.com/css?family=Ubuntu+Mono:400,700";
            }
            body {
                header {
                    h1 { a href="/" { "Snippetbox" } }
                }
                (nav(data))
                main {
                    @if let Some(flash) = &data.flash {
                        div class="flash" { (flash) }
                    }
                    (content)
                }
                footer {
                    "Powered by Rust in " (data.current_year)
                }
                script src="/static/js/main.js" type="text/javascript" {}
            }
        }
    }
}

fn nav(data: &TemplateData) -> Markup {
    html! {
        nav {
            div {
                a href="/" { "Home" }
                a href="/about" { "About" }
                @if data.is_authenticated {
                    a href="/snippet/create" { "Create snippet" }
                }
            }
            div {
                @if data.is_authenticated {
                    a href="/account/view" { "Account" }
                    form action="/user/logout" method="POST" {
                        button { "Logout" }
                    }
                } @else {
                    a href="/user/signup" { "Signup" }
                    a href="/user/login" { "Login" }
                }
            }
        }
    }
}

fn field_error(validator: &Validator, key: &str) -> Markup {
    html! {
        @if let Some(message) = validator.field_error(key) {
            label class="error" { (message) }
        }
    }
}

fn non_field_errors(validator: &Validator) -> Markup {
    html! {
        @for message in &validator.non_field_errors {
            div class="error" { (message) }
        }
    }
}
