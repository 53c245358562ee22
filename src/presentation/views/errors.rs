use maud::{Markup, html};

use crate::application::ports::user_repository::UserRow;
use crate::presentation::views::layout;

pub fn not_found(current_user: Option<&UserRow>) -> Markup {
    let content = html! {
        h1 { "Not found" }
        p { "The page you were looking for does not exist." }
        p { a href="/" { "Back" } }
    };
    layout::page("Not found", current_user, &[], content)
}
