//! Reddit OAuth API client.
//!
//! Every call carries a bearer token obtained with the password grant and
//! `raw_json=1`, so text fields arrive unescaped. Failures are mapped to
//! [`RemoteError`] and never retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::auth::{request_token, TokenCache};
use super::dto::{ApiJson, ApiResponse, Listing, SubmitData, Thing, ThingsData, UserData};
use super::settings::{Credentials, RedditConfig};
use crate::domain::error::DomainError;
use crate::domain::{
    Comment, Distinguish, Entity, EntityKind, Fullname, KindFilter, ListingKind, ListingQuery,
    ModActionType, Post, Subreddit, SubredditName, User, Username,
};
use crate::error::{Error, RemoteError, Result};
use crate::port::{BanRequest, ContentClient, NewPost, Page, PostBody};

/// Characters of an error body kept in a [`RemoteError::Status`] message.
const MAX_ERROR_BODY: usize = 200;

/// HTTP client for the Reddit OAuth API.
pub struct RedditClient {
    http: HttpClient,
    api_url: String,
    auth_url: String,
    credentials: Credentials,
    tokens: TokenCache,
}

impl RedditClient {
    #[must_use]
    pub fn from_config(config: &RedditConfig, credentials: Credentials) -> Self {
        let http = HttpClient::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.http.timeout_ms))
            .connect_timeout(Duration::from_millis(config.http.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            auth_url: config.auth_url.clone(),
            credentials,
            tokens: TokenCache::default(),
        }
    }

    async fn token(&self) -> Result<String> {
        if let Some(token) = self.tokens.current() {
            return Ok(token);
        }
        let (token, expires_in) =
            request_token(&self.http, &self.auth_url, &self.credentials).await?;
        self.tokens.store(token.clone(), expires_in);
        Ok(token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let request = self
            .http
            .get(&url)
            .bearer_auth(self.token().await?)
            .query(&[("raw_json", "1")])
            .query(query);
        self.send(request).await
    }

    async fn post_form(&self, path: &str, form: &[(&str, String)]) -> Result<ApiJson> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let mut body: Vec<(&str, String)> = vec![("api_type", "json".into())];
        body.extend(form.iter().cloned());
        let request = self
            .http
            .post(&url)
            .bearer_auth(self.token().await?)
            .query(&[("raw_json", "1")])
            .form(&body);
        let response: ApiResponse = self.send(request).await?;
        response.json.check()?;
        Ok(response.json)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.tokens.clear();
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message,
            }
            .into());
        }
        // Mutation endpoints answer `{}` for success, which decodes into defaults.
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn about(&self, path: &str, kind: &'static str, name: &str) -> Result<Entity> {
        match self.get::<Thing>(path, &[]).await {
            Ok(thing) => Ok(thing.into_entity()?),
            Err(Error::Remote(RemoteError::Status { status: 404, .. })) => {
                Err(RemoteError::NotFound {
                    kind,
                    name: name.to_string(),
                }
                .into())
            }
            Err(e) => Err(e),
        }
    }

    async fn info(&self, name: &Fullname) -> Result<Option<Entity>> {
        let listing: Listing = self
            .get("/api/info", &[("id", name.as_str().to_string())])
            .await?;
        listing
            .data
            .children
            .into_iter()
            .next()
            .map(Thing::into_entity)
            .transpose()
            .map_err(Into::into)
    }
}

fn unexpected(expected: &str, got: &Entity) -> Error {
    RemoteError::Decode(format!("expected {expected}, got {}", got.kind())).into()
}

/// Decode a page's children, skipping kinds that are not entities
/// (such as `more` placeholders).
fn decode_children(children: Vec<Thing>) -> Result<Vec<Entity>> {
    let mut items = Vec::with_capacity(children.len());
    for thing in children {
        if EntityKind::from_prefix(&thing.kind).is_none() {
            debug!(kind = %thing.kind, "Skipping listing child of unknown kind");
            continue;
        }
        items.push(thing.into_entity()?);
    }
    Ok(items)
}

/// Path and extra parameters for one listing query.
fn listing_request(query: &ListingQuery) -> Result<(String, Vec<(&'static str, String)>)> {
    let scoped = |suffix: &str| -> Result<String> {
        let sub = query
            .subreddit
            .as_ref()
            .ok_or_else(|| DomainError::MissingSubreddit {
                listing: query.listing.to_string(),
            })?;
        Ok(format!("/r/{sub}{suffix}"))
    };

    let mut params = Vec::new();
    let path = match query.listing {
        ListingKind::ModQueue => {
            match query.only {
                KindFilter::Posts => params.push(("only", "links".to_string())),
                KindFilter::Comments => params.push(("only", "comments".to_string())),
                KindFilter::All => {}
            }
            scoped("/about/modqueue")?
        }
        ListingKind::Unmoderated => scoped("/about/unmoderated")?,
        ListingKind::ModLog => {
            if let Some(action) = query.action.filter(|a| *a != ModActionType::Other) {
                params.push(("type", action.as_str().to_string()));
            }
            if !query.moderators.is_empty() {
                params.push(("mod", query.moderators.join(",")));
            }
            scoped("/about/log")?
        }
        ListingKind::Posts(sort) => scoped(&format!("/{}", sort.as_str()))?,
        ListingKind::Inbox => "/message/inbox".to_string(),
        ListingKind::Unread => "/message/unread".to_string(),
        ListingKind::Modmail => "/message/moderator".to_string(),
    };
    Ok((path, params))
}

#[async_trait]
impl ContentClient for RedditClient {
    async fn me(&self) -> Result<User> {
        let data: UserData = self.get("/api/v1/me", &[]).await?;
        Ok(data.into())
    }

    async fn subreddit(&self, name: &SubredditName) -> Result<Subreddit> {
        match self
            .about(&format!("/r/{name}/about"), "subreddit", name.as_str())
            .await?
        {
            Entity::Subreddit(sub) => Ok(sub),
            other => Err(unexpected("subreddit", &other)),
        }
    }

    async fn user(&self, name: &Username) -> Result<User> {
        match self
            .about(&format!("/user/{name}/about"), "user", name.as_str())
            .await?
        {
            Entity::User(user) => Ok(user),
            other => Err(unexpected("user", &other)),
        }
    }

    async fn post(&self, name: &Fullname) -> Result<Post> {
        match self.info(name).await? {
            Some(Entity::Post(post)) => Ok(post),
            Some(_) | None => Err(RemoteError::NotFound {
                kind: "post",
                name: name.to_string(),
            }
            .into()),
        }
    }

    async fn comment(&self, name: &Fullname) -> Result<Comment> {
        match self.info(name).await? {
            Some(Entity::Comment(comment)) => Ok(comment),
            Some(_) | None => Err(RemoteError::NotFound {
                kind: "comment",
                name: name.to_string(),
            }
            .into()),
        }
    }

    async fn page(
        &self,
        query: &ListingQuery,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page> {
        let (path, mut params) = listing_request(query)?;
        params.push(("limit", limit.to_string()));
        if let Some(after) = cursor {
            params.push(("after", after.to_string()));
        }

        let listing: Listing = self.get(&path, &params).await?;
        Ok(Page {
            items: decode_children(listing.data.children)?,
            after: listing.data.after,
        })
    }

    async fn approve(&self, target: &Fullname) -> Result<()> {
        self.post_form("/api/approve", &[("id", target.to_string())])
            .await?;
        Ok(())
    }

    async fn remove(&self, target: &Fullname, spam: bool) -> Result<()> {
        self.post_form(
            "/api/remove",
            &[("id", target.to_string()), ("spam", spam.to_string())],
        )
        .await?;
        Ok(())
    }

    async fn distinguish(&self, target: &Fullname, how: Distinguish) -> Result<()> {
        self.post_form(
            "/api/distinguish",
            &[("id", target.to_string()), ("how", how.as_str().to_string())],
        )
        .await?;
        Ok(())
    }

    async fn set_flair(
        &self,
        subreddit: &SubredditName,
        post: &Fullname,
        text: &str,
        css_class: &str,
    ) -> Result<()> {
        self.post_form(
            &format!("/r/{subreddit}/api/flair"),
            &[
                ("link", post.to_string()),
                ("text", text.to_string()),
                ("css_class", css_class.to_string()),
            ],
        )
        .await?;
        Ok(())
    }

    async fn ban(&self, subreddit: &SubredditName, request: &BanRequest) -> Result<()> {
        let mut form = vec![
            ("name", request.user.to_string()),
            ("type", "banned".to_string()),
            ("note", request.note.clone()),
        ];
        if let Some(reason) = &request.reason {
            form.push(("ban_reason", reason.clone()));
        }
        if let Some(days) = request.duration_days {
            form.push(("duration", days.to_string()));
        }
        if let Some(message) = &request.message {
            form.push(("ban_message", message.clone()));
        }
        self.post_form(&format!("/r/{subreddit}/api/friend"), &form)
            .await?;
        Ok(())
    }

    async fn unban(&self, subreddit: &SubredditName, user: &Username) -> Result<()> {
        self.post_form(
            &format!("/r/{subreddit}/api/unfriend"),
            &[("name", user.to_string()), ("type", "banned".to_string())],
        )
        .await?;
        Ok(())
    }

    async fn reply(&self, parent: &Fullname, text: &str) -> Result<Comment> {
        let json = self
            .post_form(
                "/api/comment",
                &[("thing_id", parent.to_string()), ("text", text.to_string())],
            )
            .await?;
        let data: ThingsData = serde_json::from_value(json.data.unwrap_or_default())
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        match data.things.into_iter().next().map(Thing::into_entity).transpose()? {
            Some(Entity::Comment(comment)) => Ok(comment),
            _ => Err(RemoteError::Decode("reply returned no comment".into()).into()),
        }
    }

    async fn edit(&self, target: &Fullname, text: &str) -> Result<()> {
        self.post_form(
            "/api/editusertext",
            &[("thing_id", target.to_string()), ("text", text.to_string())],
        )
        .await?;
        Ok(())
    }

    async fn submit(&self, post: &NewPost) -> Result<Fullname> {
        let mut form = vec![
            ("sr", post.subreddit.to_string()),
            ("title", post.title.clone()),
        ];
        match &post.body {
            PostBody::Link(url) => {
                form.push(("kind", "link".to_string()));
                form.push(("url", url.clone()));
            }
            PostBody::Text(text) => {
                form.push(("kind", "self".to_string()));
                form.push(("text", text.clone()));
            }
        }
        let json = self.post_form("/api/submit", &form).await?;
        let data: SubmitData = serde_json::from_value(json.data.unwrap_or_default())
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        info!(subreddit = %post.subreddit, name = %data.name, "Submitted");
        Ok(Fullname::new(data.name))
    }

    async fn compose(&self, to: &Username, subject: &str, body: &str) -> Result<()> {
        self.post_form(
            "/api/compose",
            &[
                ("to", to.to_string()),
                ("subject", subject.to_string()),
                ("text", body.to_string()),
            ],
        )
        .await?;
        Ok(())
    }

    fn client_name(&self) -> &'static str {
        "reddit"
    }
}
