use maud::{html, Markup};

use super::{base, field_error, human_date, non_field_errors, TemplateData};
use crate::forms::{SnippetCreateForm, UserLoginForm, UserSignupForm};
use crate::models::{Snippet, User};

pub fn home(data: &TemplateData, snippets: &[Snippet]) -> Markup {
    base(
        "Home",
        data,
        html! {
            h2 { "Latest Snippets" }
            @if snippets.is_empty() {
                p { "There's nothing to see here... yet!" }
            } @else {
                table {
                    tr {
                        th { "Title" }
                        th { "Created" }
                        th { "ID" }
                    }
                    @for snippet in snippets {
                        tr {
                            td { a href={ "/snippet/view/" (snippet.id) } { (snippet.title) } }
                            td { (human_date(&snippet.created)) }
                            td { "#" (snippet.id) }
                        }
                    }
                }
            }
        },
    )
}

pub fn view(data: &TemplateData, snippet: &Snippet) -> Markup {
    base(
        &format!("Snippet #{}", snippet.id),
        data,
        html! {
            div class="snippet" {
                div class="metadata" {
                    strong { (snippet.title) }
                    span { "#" (snippet.id) }
                }
                pre { code { (snippet.content) } }
                div class="metadata" {
                    time { "Created: " (human_date(&snippet.created)) }
                    time { "Expires: " (human_date(&snippet.expires)) }
                }
            }
        },
    )
}

pub fn create(data: &TemplateData, form: &SnippetCreateForm) -> Markup {
    let v = &form.validator;
    base(
        "Create a New Snippet",
        data,
        html! {
            form action="/snippet/create" method="POST" {
                div {
                    label { "Title:" }
                    (field_error(v, "title"))
                    input type="text" name="title" value=(form.title);
                }
                div {
                    label { "Content:" }
                    (field_error(v, "content"))
                    textarea name="content" { (form.content) }
                }
                div {
                    label { "Delete in:" }
                    (field_error(v, "expires"))
                    input type="radio" name="expires" value="365" checked[form.expires == 365];
                    " One Year "
                    input type="radio" name="expires" value="7" checked[form.expires == 7];
                    " One Week "
                    input type="radio" name="expires" value="1" checked[form.expires == 1];
                    " One Day"
                }
                div {
                    input type="submit" value="Publish snippet";
                }
            }
        },
    )
}

pub fn signup(data: &TemplateData, form: &UserSignupForm) -> Markup {
    let v = &form.validator;
    base(
        "Signup",
        data,
        html! {
            form action="/user/signup" method="POST" novalidate {
                div {
                    label { "Name:" }
                    (field_error(v, "name"))
                    input type="text" name="name" value=(form.name);
                }
                div {
                    label { "Email:" }
                    (field_error(v, "email"))
                    input type="email" name="email" value=(form.email);
                }
                div {
                    label { "Password:" }
                    (field_error(v, "password"))
                    input type="password" name="password";
                }
                div {
                    input type="submit" value="Signup";
                }
            }
        },
    )
}

pub fn login(data: &TemplateData, form: &UserLoginForm) -> Markup {
    let v = &form.validator;
    base(
        "Login",
        data,
        html! {
            form action="/user/login" method="POST" novalidate {
                (non_field_errors(v))
                div {
                    label { "Email:" }
                    (field_error(v, "email"))
                    input type="email" name="email" value=(form.email);
                }
                div {
                    label { "Password:" }
                    (field_error(v, "password"))
                    input type="password" name="password";
                }
                div {
                    input type="submit" value="Login";
                }
            }
        },
    )
}

pub fn about(data: &TemplateData) -> Markup {
    base(
        "About",
        data,
        html! {
            h2 { "About" }
            p {
                "Snippetbox is a place to paste and share snippets of text, "
                "like a pastebin that cleans up after itself. "
                "Every snippet expires after a day, a week or a year."
            }
        },
    )
}

pub fn account(data: &TemplateData, user: &User) -> Markup {
    base(
        "Your Account",
        data,
        html! {
            h2 { "Your Account" }
            table {
                tr {
                    th { "Name" }
                    td { (user.name) }
                }
                tr {
                    th { "Email" }
                    td { (user.email) }
                }
                tr {
                    th { "Joined" }
                    td { (human_date(&user.created)) }
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn snippet(id: i32, title: &str) -> Snippet {
        let created = Utc.with_ymd_and_hms(2022, 3, 17, 10, 15, 0).unwrap();
        Snippet {
            id,
            title: title.into(),
            content: "<script>alert(1)</script>".into(),
            created,
            expires: created + chrono::Duration::days(7),
        }
    }

    #[test]
    fn home_without_snippets() {
        let page = home(&TemplateData::default(), &[]).into_string();
        assert!(page.contains("There's nothing to see here... yet!"));
    }

    #[test]
    fn home_links_snippets() {
        let page = home(&TemplateData::default(), &[snippet(2, "Two"), snippet(1, "One")])
            .into_string();
        assert!(page.contains(r#"<a href="/snippet/view/2">Two</a>"#));
        assert!(page.find("/snippet/view/2") < page.find("/snippet/view/1"));
        assert!(page.contains("17 Mar 2022 at 10:15"));
    }

    #[test]
    fn view_escapes_content() {
        let page = view(&TemplateData::default(), &snippet(1, "One")).into_string();
        assert!(page.contains("<title>Snippet #1 - Snippetbox</title>"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(page.contains("Expires: 24 Mar 2022 at 10:15"));
    }

    #[test]
    fn create_preselects_expiry_and_shows_errors() {
        let mut form = SnippetCreateForm::new();
        let page = create(&TemplateData::default(), &form).into_string();
        assert!(page.contains(r#"<form action="/snippet/create" method="POST">"#));
        assert!(page.contains(r#"<input type="radio" name="expires" value="365" checked>"#));
        assert!(page.contains(r#"<input type="radio" name="expires" value="7">"#));

        form.title = String::new();
        form.validate();
        let page = create(&TemplateData::default(), &form).into_string();
        assert!(page.contains(r#"<label class="error">This field cannot be blank</label>"#));
    }

    #[test]
    fn signup_never_echoes_password() {
        let form = UserSignupForm {
            name: "Bob".into(),
            email: "bob@example.com".into(),
            password: "secret-password".into(),
            ..Default::default()
        };
        let page = signup(&TemplateData::default(), &form).into_string();
        assert!(page.contains(r#"<input type="text" name="name" value="Bob">"#));
        assert!(page.contains(r#"<input type="password" name="password">"#));
        assert!(!page.contains("secret-password"));
    }

    #[test]
    fn login_shows_non_field_errors() {
        let mut form = UserLoginForm::default();
        form.validator.add_non_field_error("Email or password is incorrect");
        let page = login(&TemplateData::default(), &form).into_string();
        assert!(page.contains(r#"<form action="/user/login" method="POST" novalidate>"#));
        assert!(page.contains(r#"<div class="error">Email or password is incorrect</div>"#));
    }
}
