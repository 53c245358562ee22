use maud::{Markup, html};

use crate::application::pagination::Page;
use crate::application::ports::user_repository::UserRow;
use crate::domain::posts::post::Post;
use crate::presentation::http::forms::FormErrors;
use crate::presentation::views::layout;

pub fn home(
    user: &UserRow,
    flash: &[String],
    body_value: &str,
    errors: &FormErrors,
    posts: &Page<Post>,
) -> Markup {
    let content = html! {
        h1 { "Hi, " (user.username) "!" }
        form .compose method="post" action="/" {
            textarea name="body" rows="3" maxlength="280"
                placeholder="Say something" { (body_value) }
            (layout::field_errors(errors.field("body")))
            button type="submit" { "Post" }
        }
        (post_list(&posts.items))
        (pager(posts, "/"))
    };
    layout::page("Home", Some(user), flash, content)
}

pub fn explore(user: &UserRow, flash: &[String], posts: &Page<Post>) -> Markup {
    let content = html! {
        h1 { "Explore" }
        (post_list(&posts.items))
        (pager(posts, "/explore"))
    };
    layout::page("Explore", Some(user), flash, content)
}

pub fn post_list(posts: &[Post]) -> Markup {
    html! {
        @if posts.is_empty() {
            p .empty { "Nothing here yet." }
        } @else {
            ul .posts {
                @for post in posts {
                    li .post {
                        span .author {
                            a href=(format!("/user/{}", post.author_username)) {
                                (post.author_username)
                            }
                        }
                        span .when { (post.created_at.format("%b %-d, %Y %H:%M")) }
                        p .body { (post.body) }
                    }
                }
            }
        }
    }
}

/// Newer/older links appear only when the corresponding page exists.
pub fn pager<T>(page: &Page<T>, base_path: &str) -> Markup {
    html! {
        nav .pager {
            @if let Some(prev) = page.prev_page() {
                a .newer href=(format!("{base_path}?page={prev}")) { "Newer posts" }
            }
            @if let Some(next) = page.next_page() {
                a .older href=(format!("{base_path}?page={next}")) { "Older posts" }
            }
        }
    }
}
