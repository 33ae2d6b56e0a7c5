//! Content entities returned by the remote API.
//!
//! [`Entity`] is a closed set of variants. Code that needs to treat a post
//! differently from a comment matches on the variant instead of probing the
//! runtime type, so a new kind cannot slip through unhandled.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::action::ModActionType;
use super::id::Fullname;

/// Kind tag for an [`Entity`], mirroring the remote API's type prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Comment,
    User,
    Post,
    Message,
    Subreddit,
    ModAction,
}

impl EntityKind {
    /// Fullname prefix used by the remote API.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Comment => "t1",
            Self::User => "t2",
            Self::Post => "t3",
            Self::Message => "t4",
            Self::Subreddit => "t5",
            Self::ModAction => "modaction",
        }
    }

    /// Map a remote `kind` field to a kind.
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "t1" => Some(Self::Comment),
            "t2" => Some(Self::User),
            "t3" => Some(Self::Post),
            "t4" => Some(Self::Message),
            "t5" => Some(Self::Subreddit),
            "modaction" => Some(Self::ModAction),
            _ => None,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::User => "user",
            Self::Post => "post",
            Self::Message => "message",
            Self::Subreddit => "subreddit",
            Self::ModAction => "moderation action",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a post or comment is distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Distinguish {
    None,
    Moderator,
    Admin,
    Special,
}

impl Distinguish {
    /// Value sent to the remote API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "no",
            Self::Moderator => "yes",
            Self::Admin => "admin",
            Self::Special => "special",
        }
    }
}

/// A link or self post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub name: Fullname,
    pub title: String,
    pub author: String,
    pub subreddit: String,
    pub domain: String,
    pub url: String,
    pub selftext: String,
    pub is_self: bool,
    pub score: i64,
    pub num_comments: u64,
    pub link_flair_text: Option<String>,
    pub link_flair_css_class: Option<String>,
    pub distinguished: Option<String>,
    pub created: DateTime<Utc>,
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub name: Fullname,
    pub author: String,
    pub subreddit: String,
    pub body: String,
    pub link_id: Fullname,
    pub parent_id: Fullname,
    pub score: i64,
    pub distinguished: Option<String>,
    pub created: DateTime<Utc>,
}

/// A private message or modmail message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub name: Fullname,
    pub author: String,
    pub dest: String,
    pub subreddit: Option<String>,
    pub subject: String,
    pub body: String,
    pub unread: bool,
    pub was_comment: bool,
    pub created: DateTime<Utc>,
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub name: String,
    pub fullname: Fullname,
    pub link_karma: i64,
    pub comment_karma: i64,
    pub is_mod: bool,
    pub created: DateTime<Utc>,
}

/// A subreddit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subreddit {
    pub name: Fullname,
    pub display_name: String,
    pub title: String,
    pub subscribers: u64,
    pub over18: bool,
}

/// One entry in a subreddit's moderation log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModAction {
    pub id: String,
    pub action: ModActionType,
    pub moderator: String,
    pub subreddit: String,
    pub target_author: Option<String>,
    pub target_fullname: Option<Fullname>,
    pub details: Option<String>,
    pub description: Option<String>,
    pub created: DateTime<Utc>,
}

/// Any object the remote API hands back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Entity {
    Post(Post),
    Comment(Comment),
    Message(Message),
    User(User),
    Subreddit(Subreddit),
    ModAction(ModAction),
}

impl Entity {
    /// Kind tag of this entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Post(_) => EntityKind::Post,
            Self::Comment(_) => EntityKind::Comment,
            Self::Message(_) => EntityKind::Message,
            Self::User(_) => EntityKind::User,
            Self::Subreddit(_) => EntityKind::Subreddit,
            Self::ModAction(_) => EntityKind::ModAction,
        }
    }

    /// Stable name, unique within the entity's kind.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Post(p) => p.name.as_str(),
            Self::Comment(c) => c.name.as_str(),
            Self::Message(m) => m.name.as_str(),
            Self::User(u) => u.fullname.as_str(),
            Self::Subreddit(s) => s.name.as_str(),
            Self::ModAction(a) => &a.id,
        }
    }

    /// Author of a post, comment or message.
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        match self {
            Self::Post(p) => Some(&p.author),
            Self::Comment(c) => Some(&c.author),
            Self::Message(m) => Some(&m.author),
            Self::User(_) | Self::Subreddit(_) | Self::ModAction(_) => None,
        }
    }

    /// Subreddit the entity lives in, when it has one.
    #[must_use]
    pub fn subreddit(&self) -> Option<&str> {
        match self {
            Self::Post(p) => Some(&p.subreddit),
            Self::Comment(c) => Some(&c.subreddit),
            Self::Message(m) => m.subreddit.as_deref(),
            Self::ModAction(a) => Some(&a.subreddit),
            Self::Subreddit(s) => Some(&s.display_name),
            Self::User(_) => None,
        }
    }

    /// Short one-line summary for display.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Post(p) => format!("{} [{}] {} (u/{})", p.name, p.domain, p.title, p.author),
            Self::Comment(c) => format!("{} u/{}: {}", c.name, c.author, first_line(&c.body)),
            Self::Message(m) => format!("{} from u/{}: {}", m.name, m.author, m.subject),
            Self::User(u) => format!(
                "u/{} ({} link / {} comment karma)",
                u.name, u.link_karma, u.comment_karma
            ),
            Self::Subreddit(s) => format!("r/{} ({} subscribers)", s.display_name, s.subscribers),
            Self::ModAction(a) => format!(
                "{} {} by u/{} on {}",
                a.created.format("%Y-%m-%d %H:%M"),
                a.action,
                a.moderator,
                a.target_fullname
                    .as_ref()
                    .map_or("-", Fullname::as_str)
            ),
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
