use maud::{Markup, html};

use crate::application::use_cases::profile::get_profile::ProfileView;
use crate::application::ports::user_repository::UserRow;
use crate::presentation::http::forms::FormErrors;
use crate::presentation::views::{feed, layout};

pub fn user_profile(viewer: &UserRow, flash: &[String], view: &ProfileView) -> Markup {
    let user = &view.user;
    let base_path = format!("/user/{}", user.username);
    let content = html! {
        section .profile-header {
            h1 { (user.username) }
            @if !user.about_me.is_empty() {
                p .about { (user.about_me) }
            }
            p .meta {
                "Last seen " (user.last_seen.format("%b %-d, %Y %H:%M")) " · "
                (view.counts.followers) " followers · "
                (view.counts.following) " following"
            }
            @if view.is_self {
                a .button href="/edit_profile" { "Edit profile" }
            } @else if view.viewer_follows {
                a .button href=(format!("/unfollow/{}", user.username)) { "Unfollow" }
            } @else {
                a .button href=(format!("/follow/{}", user.username)) { "Follow" }
            }
        }
        (feed::post_list(&view.posts.items))
        (feed::pager(&view.posts, &base_path))
    };
    layout::page(&user.username, Some(viewer), flash, content)
}

pub fn edit_profile(
    viewer: &UserRow,
    flash: &[String],
    username_value: &str,
    about_value: &str,
    errors: &FormErrors,
) -> Markup {
    let content = html! {
        h1 { "Edit profile" }
        form method="post" action="/edit_profile" {
            label for="username" { "Username" }
            input #username type="text" name="username" value=(username_value) required;
            (layout::field_errors(errors.field("username")))
            label for="about_me" { "About me" }
            textarea #about_me name="about_me" rows="4" maxlength="140" { (about_value) }
            (layout::field_errors(errors.field("about_me")))
            button type="submit" { "Save" }
        }
    };
    layout::page("Edit profile", Some(viewer), flash, content)
}
