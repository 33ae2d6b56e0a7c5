//! Reddit wire types.
//!
//! Everything the API returns is a `Thing` (`{"kind": "t3", "data": {...}}`)
//! or a `Listing` of things. Data payloads are decoded per kind and mapped
//! into domain entities.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::{
    Comment, Entity, EntityKind, Fullname, Message, ModAction, ModActionType, Post, Subreddit,
    User,
};
use crate::error::RemoteError;

/// A typed wrapper around one object.
#[derive(Debug, Deserialize)]
pub struct Thing {
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Thing {
    /// Decode into an entity according to `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Decode`] for unknown kinds or payloads that do
    /// not match their kind.
    pub fn into_entity(self) -> Result<Entity, RemoteError> {
        let kind = EntityKind::from_prefix(&self.kind)
            .ok_or_else(|| RemoteError::Decode(format!("unknown thing kind {}", self.kind)))?;
        Ok(match kind {
            EntityKind::Post => Entity::Post(decode::<PostData>(self.data)?.into()),
            EntityKind::Comment => Entity::Comment(decode::<CommentData>(self.data)?.into()),
            EntityKind::Message => Entity::Message(decode::<MessageData>(self.data)?.into()),
            EntityKind::User => Entity::User(decode::<UserData>(self.data)?.into()),
            EntityKind::Subreddit => Entity::Subreddit(decode::<SubredditData>(self.data)?.into()),
            EntityKind::ModAction => Entity::ModAction(decode::<ModActionData>(self.data)?.into()),
        })
    }
}

fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, RemoteError> {
    serde_json::from_value(value).map_err(|e| RemoteError::Decode(e.to_string()))
}

/// `{"kind": "Listing", "data": {"children": [...], "after": ...}}`
#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
    pub after: Option<String>,
}

fn timestamp(secs: f64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs as i64, 0).single().unwrap_or_default()
}

#[derive(Debug, Deserialize)]
pub struct PostData {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub is_self: bool,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: u64,
    pub link_flair_text: Option<String>,
    pub link_flair_css_class: Option<String>,
    pub distinguished: Option<String>,
    #[serde(default)]
    pub created_utc: f64,
}

impl From<PostData> for Post {
    fn from(d: PostData) -> Self {
        Self {
            name: Fullname::new(d.name),
            title: d.title,
            author: d.author,
            subreddit: d.subreddit,
            domain: d.domain,
            url: d.url,
            selftext: d.selftext,
            is_self: d.is_self,
            score: d.score,
            num_comments: d.num_comments,
            link_flair_text: d.link_flair_text,
            link_flair_css_class: d.link_flair_css_class,
            distinguished: d.distinguished,
            created: timestamp(d.created_utc),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentData {
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub link_id: String,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub score: i64,
    pub distinguished: Option<String>,
    #[serde(default)]
    pub created_utc: f64,
}

impl From<CommentData> for Comment {
    fn from(d: CommentData) -> Self {
        Self {
            name: Fullname::new(d.name),
            author: d.author,
            subreddit: d.subreddit,
            body: d.body,
            link_id: Fullname::new(d.link_id),
            parent_id: Fullname::new(d.parent_id),
            score: d.score,
            distinguished: d.distinguished,
            created: timestamp(d.created_utc),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageData {
    pub name: String,
    /// Null for system messages.
    pub author: Option<String>,
    #[serde(default)]
    pub dest: String,
    pub subreddit: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub was_comment: bool,
    #[serde(default)]
    pub created_utc: f64,
}

impl From<MessageData> for Message {
    fn from(d: MessageData) -> Self {
        Self {
            name: Fullname::new(d.name),
            author: d.author.unwrap_or_default(),
            dest: d.dest,
            subreddit: d.subreddit,
            subject: d.subject,
            body: d.body,
            unread: d.new,
            was_comment: d.was_comment,
            created: timestamp(d.created_utc),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserData {
    pub name: String,
    /// Base36 id without the `t2_` prefix.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub link_karma: i64,
    #[serde(default)]
    pub comment_karma: i64,
    #[serde(default)]
    pub is_mod: bool,
    #[serde(default)]
    pub created_utc: f64,
}

impl From<UserData> for User {
    fn from(d: UserData) -> Self {
        Self {
            fullname: Fullname::from_parts(EntityKind::User.prefix(), &d.id),
            name: d.name,
            link_karma: d.link_karma,
            comment_karma: d.comment_karma,
            is_mod: d.is_mod,
            created: timestamp(d.created_utc),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubredditData {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub title: String,
    pub subscribers: Option<u64>,
    #[serde(default)]
    pub over18: bool,
}

impl From<SubredditData> for Subreddit {
    fn from(d: SubredditData) -> Self {
        Self {
            name: Fullname::new(d.name),
            display_name: d.display_name,
            title: d.title,
            subscribers: d.subscribers.unwrap_or_default(),
            over18: d.over18,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ModActionData {
    pub id: String,
    pub action: String,
    #[serde(rename = "mod")]
    pub moderator: String,
    #[serde(default)]
    pub subreddit: String,
    pub target_author: Option<String>,
    pub target_fullname: Option<String>,
    pub details: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub created_utc: f64,
}

impl From<ModActionData> for ModAction {
    fn from(d: ModActionData) -> Self {
        Self {
            id: d.id,
            action: ModActionType::from_wire(&d.action),
            moderator: d.moderator,
            subreddit: d.subreddit,
            target_author: d.target_author.filter(|a| !a.is_empty()),
            target_fullname: d.target_fullname.filter(|f| !f.is_empty()).map(Fullname::new),
            details: d.details,
            description: d.description,
            created: timestamp(d.created_utc),
        }
    }
}

/// `{"json": {"errors": [...], "data": {...}}}` returned by `api_type=json` calls.
#[derive(Debug, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub json: ApiJson,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiJson {
    /// Each error is `[code, message, field]`.
    #[serde(default)]
    pub errors: Vec<Vec<serde_json::Value>>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl ApiJson {
    /// Fail if the API reported any errors.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Api`] with the messages joined.
    pub fn check(&self) -> Result<(), RemoteError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let message = self
            .errors
            .iter()
            .map(|err| {
                err.iter()
                    .filter_map(serde_json::Value::as_str)
                    .take(2)
                    .collect::<Vec<_>>()
                    .join(": ")
            })
            .collect::<Vec<_>>()
            .join("; ");
        Err(RemoteError::Api(message))
    }
}

/// `POST /api/comment` data.
#[derive(Debug, Deserialize)]
pub struct ThingsData {
    #[serde(default)]
    pub things: Vec<Thing>,
}

/// `POST /api/submit` data.
#[derive(Debug, Deserialize)]
pub struct SubmitData {
    pub name: String,
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: u64,
    pub error: Option<String>,
}
