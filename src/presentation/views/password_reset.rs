use maud::{Markup, html};

use crate::presentation::http::forms::FormErrors;
use crate::presentation::views::layout;

pub fn request_reset(flash: &[String], email_value: &str, errors: &FormErrors) -> Markup {
    let content = html! {
        h1 { "Reset your password" }
        form method="post" action="/reset_password_request" {
            label for="email" { "Email" }
            input #email type="text" name="email" value=(email_value) required;
            (layout::field_errors(errors.field("email")))
            button type="submit" { "Request reset" }
        }
    };
    layout::page("Reset password", None, flash, content)
}

pub fn reset_password(flash: &[String], token: &str, errors: &FormErrors) -> Markup {
    let content = html! {
        h1 { "Choose a new password" }
        form method="post" action=(format!("/reset_password/{token}")) {
            label for="password" { "New password" }
            input #password type="password" name="password" required;
            (layout::field_errors(errors.field("password")))
            label for="password2" { "Repeat password" }
            input #password2 type="password" name="password2" required;
            (layout::field_errors(errors.field("password2")))
            button type="submit" { "Reset password" }
        }
    };
    layout::page("Reset password", None, flash, content)
}
