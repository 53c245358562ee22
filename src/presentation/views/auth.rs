use maud::{Markup, html};

use crate::presentation::http::forms::FormErrors;
use crate::presentation::views::layout;

pub fn login(flash: &[String], next: Option<&str>, username_value: &str) -> Markup {
    let action = match next {
        Some(n) if !n.is_empty() => format!("/login?next={}", urlencoding::encode(n)),
        _ => "/login".to_string(),
    };
    let content = html! {
        h1 { "Log in" }
        form method="post" action=(action) {
            label for="username" { "Username" }
            input #username type="text" name="username" value=(username_value) required;
            label for="password" { "Password" }
            input #password type="password" name="password" required;
            label .checkbox {
                input type="checkbox" name="remember";
                "Remember me"
            }
            button type="submit" { "Log in" }
        }
        p {
            "New here? " a href="/register" { "Register" }
        }
        p {
            "Forgot your password? "
            a href="/reset_password_request" { "Reset it" }
        }
    };
    layout::page("Log in", None, flash, content)
}

pub fn register(
    flash: &[String],
    username_value: &str,
    email_value: &str,
    errors: &FormErrors,
) -> Markup {
    let content = html! {
        h1 { "Register" }
        form method="post" action="/register" {
            label for="username" { "Username" }
            input #username type="text" name="username" value=(username_value) required;
            (layout::field_errors(errors.field("username")))
            label for="email" { "Email" }
            input #email type="text" name="email" value=(email_value) required;
            (layout::field_errors(errors.field("email")))
            label for="password" { "Password" }
            input #password type="password" name="password" required;
            (layout::field_errors(errors.field("password")))
            label for="password2" { "Repeat password" }
            input #password2 type="password" name="password2" required;
            (layout::field_errors(errors.field("password2")))
            button type="submit" { "Register" }
        }
        p {
            "Already have an account? " a href="/login" { "Log in" }
        }
    };
    layout::page("Register", None, flash, content)
}
