//! Builders for domain entities used across tests.
//!
//! Every builder fills the fields a test does not care about with fixed
//! values, so assertions only mention what matters.

use chrono::{DateTime, Utc};

use crate::domain::{
    Comment, Entity, Fullname, Message, ModAction, ModActionType, Post, Subreddit, User,
};

/// Subreddit every post, comment and mod action lives in unless rebuilt.
pub const SUBREDDIT: &str = "rust";

/// A link post in [`SUBREDDIT`].
pub fn post(id: &str, author: &str, domain: &str) -> Entity {
    Entity::Post(raw_post(id, author, domain))
}

/// The [`Post`] behind [`post`].
pub fn raw_post(id: &str, author: &str, domain: &str) -> Post {
    Post {
        name: Fullname::from_parts("t3", id),
        title: format!("post {id}"),
        author: author.to_string(),
        subreddit: SUBREDDIT.to_string(),
        domain: domain.to_string(),
        url: format!("https://{domain}/{id}"),
        selftext: String::new(),
        is_self: false,
        score: 1,
        num_comments: 0,
        link_flair_text: None,
        link_flair_css_class: None,
        distinguished: None,
        created: DateTime::<Utc>::default(),
    }
}

/// `n` posts named `p0..p{n-1}`, all by `author` on `example.com`.
pub fn posts(n: usize, author: &str) -> Vec<Entity> {
    (0..n)
        .map(|i| post(&format!("p{i}"), author, "example.com"))
        .collect()
}

/// A top-level comment in [`SUBREDDIT`].
pub fn comment(id: &str, author: &str) -> Entity {
    Entity::Comment(raw_comment(id, author))
}

/// The [`Comment`] behind [`comment`].
pub fn raw_comment(id: &str, author: &str) -> Comment {
    Comment {
        name: Fullname::from_parts("t1", id),
        author: author.to_string(),
        subreddit: SUBREDDIT.to_string(),
        body: format!("comment {id}"),
        link_id: Fullname::from_parts("t3", "parent"),
        parent_id: Fullname::from_parts("t3", "parent"),
        score: 1,
        distinguished: None,
        created: DateTime::<Utc>::default(),
    }
}

/// A private message with no subreddit.
pub fn message(id: &str, author: &str, unread: bool) -> Entity {
    Entity::Message(Message {
        name: Fullname::from_parts("t4", id),
        author: author.to_string(),
        dest: "modbot".to_string(),
        subreddit: None,
        subject: format!("subject {id}"),
        body: format!("body {id}"),
        unread,
        was_comment: false,
        created: DateTime::<Utc>::default(),
    })
}

/// A mod-log entry in [`SUBREDDIT`].
pub fn mod_action(id: &str, moderator: &str, action: ModActionType) -> Entity {
    Entity::ModAction(ModAction {
        id: format!("ModAction_{id}"),
        action,
        moderator: moderator.to_string(),
        subreddit: SUBREDDIT.to_string(),
        target_author: None,
        target_fullname: None,
        details: None,
        description: None,
        created: DateTime::<Utc>::default(),
    })
}

/// A user entity.
pub fn user(name: &str) -> Entity {
    Entity::User(raw_user(name))
}

/// The [`User`] behind [`user`].
pub fn raw_user(name: &str) -> User {
    User {
        name: name.to_string(),
        fullname: Fullname::from_parts("t2", name),
        link_karma: 0,
        comment_karma: 0,
        is_mod: false,
        created: DateTime::<Utc>::default(),
    }
}

/// A subreddit with a fullname derived from its name.
pub fn subreddit(name: &str) -> Subreddit {
    Subreddit {
        name: Fullname::from_parts("t5", name),
        display_name: name.to_string(),
        title: format!("r/{name}"),
        subscribers: 0,
        over18: false,
    }
}
