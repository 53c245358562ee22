use maud::{DOCTYPE, Markup, html};

use crate::application::ports::user_repository::UserRow;

/// Shared chrome: navigation bar, one-shot flash messages, page content.
/// maud escapes every spliced value, so user-supplied text is safe here.
pub fn page(
    title: &str,
    current_user: Option<&UserRow>,
    flash: &[String],
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " · ripple" }
                link rel="stylesheet" href="/static/style.css";
            }
            body {
                nav .topbar {
                    a .brand href="/" { "ripple" }
                    div .nav-links {
                        @if let Some(user) = current_user {
                            a href="/" { "Home" }
                            a href="/explore" { "Explore" }
                            a href=(format!("/user/{}", user.username)) { "Profile" }
                            a href="/logout" { "Log out" }
                        } @else {
                            a href="/login" { "Log in" }
                            a href="/register" { "Register" }
                        }
                    }
                }
                @if !flash.is_empty() {
                    ul .flash {
                        @for message in flash {
                            li { (message) }
                        }
                    }
                }
                main { (content) }
            }
        }
    }
}

pub fn field_errors(messages: &[String]) -> Markup {
    html! {
        @if !messages.is_empty() {
            ul .field-errors {
                @for message in messages {
                    li { (message) }
                }
            }
        }
    }
}
