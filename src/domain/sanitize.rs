//! Normalization of untrusted record fields before validation and storage

use chrono::Utc;

use super::post::PostInput;
use super::user::{UserInput, UserPatch};

/// Trim and HTML-escape nickname and email, drop any client ID and stamp
/// fresh timestamps. The password is left untouched.
pub fn sanitize_user_fields(user: &mut UserInput) {
    let now = Utc::now();

    user.id = None;
    user.nickname = clean(&user.nickname);
    user.email = clean(&user.email);
    user.created_at = now;
    user.updated_at = now;
}

/// Same cleaning as [`sanitize_user_fields`] for the fields a patch carries
pub fn sanitize_user_patch(patch: &mut UserPatch) {
    if let Some(nickname) = patch.nickname.as_mut() {
        *nickname = clean(nickname);
    }
    if let Some(email) = patch.email.as_mut() {
        *email = clean(email);
    }
}

/// Trim and HTML-escape title and content, drop any client ID or embedded
/// author and stamp fresh timestamps.
pub fn sanitize_post_fields(post: &mut PostInput) {
    let now = Utc::now();

    post.id = None;
    post.title = clean(&post.title);
    post.content = clean(&post.content);
    post.author = None;
    post.created_at = now;
    post.updated_at = now;
}

fn clean(value: &str) -> String {
    escape_html(value.trim())
}

/// Escape the five characters significant in HTML markup
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&#39;"),
            '"' => escaped.push_str("&#34;"),
            other => escaped.push(other),
        }
    }

    escaped
}
