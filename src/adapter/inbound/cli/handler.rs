//! Dispatch of parsed shell verbs onto the session.

use tracing::debug;

use super::command::{moderation_action, ShellCommand};
use super::output;
use crate::application::Session;
use crate::domain::error::DomainError;
use crate::domain::{Entity, Fullname};
use crate::error::Result;
use crate::infrastructure::config::SessionConfig;
use crate::port::{BanRequest, NewPost, PostBody};

/// Whether the shell keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Runs shell verbs against one session.
pub struct Handler {
    session: Session,
    defaults: SessionConfig,
}

impl Handler {
    #[must_use]
    pub fn new(session: Session, defaults: SessionConfig) -> Self {
        Self { session, defaults }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Execute one verb and render its result.
    ///
    /// # Errors
    ///
    /// Returns whatever the session call failed with; the caller prints it
    /// and keeps the shell alive.
    pub async fn execute(&self, command: ShellCommand) -> Result<Flow> {
        debug!(?command, "Executing shell command");

        if let Some((request, as_job)) = command.listing_request(&self.defaults)? {
            if as_job {
                let name = request.listing.as_str();
                let id = self.session.submit_listing(request);
                output::job_submitted(id, name);
            } else {
                let items = self.session.listing(&request).await?;
                output::entities(&items);
            }
            return Ok(Flow::Continue);
        }

        if let Some((targets, action)) = moderation_action(&command) {
            let moderation = self.session.moderation();
            for target in targets {
                let name = Fullname::new(target);
                match moderation.invoke(&name, &action).await {
                    Ok(_) => output::success(&format!("{} {name}", action.verb())),
                    Err(e) => output::error(&e.to_string()),
                }
            }
            return Ok(Flow::Continue);
        }

        match command {
            ShellCommand::Whoami => output::entity(&Entity::User(self.session.me().clone())),
            ShellCommand::Subreddit { name } => {
                let sub = self.session.subreddit(&name).await?;
                output::entity(&Entity::Subreddit(sub));
            }
            ShellCommand::User { name } => {
                let user = self.session.user(&name).await?;
                output::entity(&Entity::User(user));
            }
            ShellCommand::Post { names, as_job } => {
                let names: Vec<Fullname> = names.into_iter().map(Fullname::new).collect();
                if as_job {
                    let id = self.session.submit_post_lookup(names);
                    output::job_submitted(id, "post");
                } else {
                    for name in &names {
                        let post = self.session.post(name).await?;
                        output::entity(&Entity::Post(post));
                    }
                }
            }
            ShellCommand::Comment { name } => {
                let comment = self.session.comment(&Fullname::new(name)).await?;
                output::entity(&Entity::Comment(comment));
            }
            ShellCommand::Ban {
                subreddit,
                user,
                days,
                note,
                reason,
                message,
            } => {
                let request = BanRequest {
                    user,
                    note,
                    reason,
                    duration_days: days,
                    message,
                };
                self.session.moderation().ban(&subreddit, &request).await?;
                let length =
                    days.map_or_else(|| "permanently".to_string(), |d| format!("for {d}d"));
                output::success(&format!("banned u/{} from r/{subreddit} {length}", request.user));
            }
            ShellCommand::Unban { subreddit, user } => {
                self.session.moderation().unban(&subreddit, &user).await?;
                output::success(&format!("unbanned u/{user} from r/{subreddit}"));
            }
            ShellCommand::Reply { parent, text } => {
                let comment = self
                    .session
                    .content()
                    .reply(&Fullname::new(parent), &text)
                    .await?;
                output::entity(&Entity::Comment(comment));
            }
            ShellCommand::Edit { target, text } => {
                let edited = self
                    .session
                    .content()
                    .edit(&Fullname::new(target), &text)
                    .await?;
                output::entity(&edited);
            }
            ShellCommand::Submit {
                subreddit,
                title,
                url,
                text,
            } => {
                let body = match (url, text) {
                    (Some(url), _) => PostBody::Link(url),
                    (None, Some(text)) => PostBody::Text(text),
                    (None, None) => {
                        return Err(DomainError::EmptyName {
                            field: "url or text",
                        }
                        .into())
                    }
                };
                let post = NewPost {
                    subreddit,
                    title,
                    body,
                };
                let name = self.session.content().submit(&post).await?;
                output::success(&format!("submitted {name}"));
            }
            ShellCommand::Message { to, subject, body } => {
                self.session.content().compose(&to, &subject, &body).await?;
                output::success(&format!("message sent to u/{to}"));
            }
            ShellCommand::Jobs => output::jobs(&self.session.jobs()),
            ShellCommand::Job { id } => output::job(&self.session.poll(id)?, true),
            ShellCommand::Receive { id } => output::drain(id, &self.session.receive(id)?),
            ShellCommand::Wait { id } => output::job(&self.session.wait(id).await?, true),
            ShellCommand::StopJob { id } => {
                let state = self.session.stop_job(id)?;
                output::success(&format!("job {id} {state}"));
            }
            ShellCommand::RemoveJob { id } => {
                let removed = self.session.remove_job(id)?;
                output::success(&format!("removed job {id} ({})", removed.command));
            }
            ShellCommand::Exit => return Ok(Flow::Exit),
            ShellCommand::Modqueue(_)
            | ShellCommand::Unmoderated(_)
            | ShellCommand::Modlog(_)
            | ShellCommand::Posts(_)
            | ShellCommand::Messages(_)
            | ShellCommand::Approve { .. }
            | ShellCommand::Remove { .. }
            | ShellCommand::Distinguish { .. }
            | ShellCommand::Flair { .. }
            | ShellCommand::Unflair { .. } => {}
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapter::inbound::cli::command::ShellLine;
    use crate::domain::{JobId, JobState, ListingKind};
    use crate::error::{Error, JobError};
    use crate::testkit::client::ScriptedClient;
    use crate::testkit::domain::{posts, raw_post};
    use clap::Parser;

    async fn handler(client: Arc<ScriptedClient>) -> Handler {
        let session = Session::start(client, 100).await.unwrap();
        Handler::new(session, SessionConfig::default())
    }

    fn parse(words: &[&str]) -> ShellCommand {
        ShellLine::try_parse_from(words).unwrap().command
    }

    #[tokio::test]
    async fn listing_as_job_registers_job() {
        let client =
            Arc::new(ScriptedClient::new().with_listing(ListingKind::ModQueue, posts(3, "alice")));
        let handler = handler(client).await;

        let flow = handler
            .execute(parse(&["modqueue", "rust", "--as-job"]))
            .await
            .unwrap();
        assert_eq!(flow, Flow::Continue);

        let snap = handler.session().wait(JobId::new(1)).await.unwrap();
        assert_eq!(snap.state, JobState::Completed);
        assert_eq!(snap.output.len(), 3);
    }

    #[tokio::test]
    async fn moderation_verbs_reach_client_per_target() {
        let client = Arc::new(
            ScriptedClient::new()
                .with_post(raw_post("p1", "alice", "example.com"))
                .with_post(raw_post("p2", "bob", "example.com")),
        );
        let handler = handler(client.clone()).await;

        handler
            .execute(parse(&["approve", "t3_p1", "t3_missing", "t3_p2"]))
            .await
            .unwrap();
        assert_eq!(client.actions(), vec!["approve t3_p1", "approve t3_p2"]);
    }

    #[tokio::test]
    async fn unknown_job_is_an_error() {
        let handler = handler(Arc::new(ScriptedClient::new())).await;
        let err = handler.execute(parse(&["job", "9"])).await.unwrap_err();
        assert!(matches!(err, Error::Job(JobError::NotFound(_))));
    }

    #[tokio::test]
    async fn ban_builds_request() {
        let client = Arc::new(ScriptedClient::new());
        let handler = handler(client.clone()).await;
        handler
            .execute(parse(&["ban", "rust", "u/troll", "--days", "3"]))
            .await
            .unwrap();
        assert_eq!(client.actions(), vec!["ban r/rust u/troll 3d"]);
    }

    #[tokio::test]
    async fn exit_stops_the_loop() {
        let handler = handler(Arc::new(ScriptedClient::new())).await;
        assert_eq!(handler.execute(parse(&["exit"])).await.unwrap(), Flow::Exit);
    }
}
