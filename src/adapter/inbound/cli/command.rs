//! Command-line interface definitions.
//!
//! [`Cli`] is the process entry point. [`ShellLine`] is the grammar of one
//! line typed at the interactive prompt; it is parsed with clap as well, so
//! every verb gets `--help` for free.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::application::moderation::ModerationAction;
use crate::domain::{
    Distinguish, FilterSpec, JobId, KindFilter, Limit, ListingKind, ListingRequest,
    ModActionType, PostSort, SubredditName, Username,
};
use crate::domain::error::DomainError;
use crate::infrastructure::config::SessionConfig;

/// Interactive moderation shell for Reddit
#[derive(Parser, Debug)]
#[command(name = "modsh")]
#[command(version, about)]
pub struct Cli {
    /// Path to the configuration file [default: modsh.toml if present]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level subcommands. Without one, the shell starts.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive shell (default)
    Shell,
    /// Validate the configuration file and exit
    CheckConfig,
}

/// One line typed at the `modsh>` prompt.
#[derive(Parser, Debug)]
#[command(name = "modsh", no_binary_name = true)]
#[command(disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

/// Verbs understood by the shell.
#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    /// Show the logged-in account
    Whoami,
    /// Show a subreddit
    Subreddit { name: SubredditName },
    /// Show a user
    User { name: Username },
    /// Look up posts by fullname
    Post {
        #[arg(required = true)]
        names: Vec<String>,
        /// Run the lookup in the background
        #[arg(long)]
        as_job: bool,
    },
    /// Look up a comment by fullname
    Comment { name: String },
    /// List the moderation queue
    Modqueue(SubredditListingArgs),
    /// List unmoderated posts
    Unmoderated(SubredditListingArgs),
    /// List the moderation log
    Modlog(ModlogArgs),
    /// List a subreddit's posts
    Posts(PostsArgs),
    /// List private messages
    Messages(MessagesArgs),
    /// Approve posts or comments
    Approve {
        #[arg(required = true)]
        targets: Vec<String>,
    },
    /// Remove posts or comments
    Remove {
        #[arg(required = true)]
        targets: Vec<String>,
        /// Also mark as spam
        #[arg(long)]
        spam: bool,
    },
    /// Distinguish a post or comment
    Distinguish {
        target: String,
        #[arg(value_enum, default_value_t = DistinguishArg::Yes)]
        how: DistinguishArg,
    },
    /// Set a post's flair
    Flair {
        target: String,
        text: String,
        /// CSS class for the flair
        #[arg(long)]
        css: Option<String>,
    },
    /// Clear a post's flair
    Unflair { target: String },
    /// Ban a user from a subreddit
    Ban {
        subreddit: SubredditName,
        user: Username,
        /// Ban length in days; permanent when omitted
        #[arg(long)]
        days: Option<u32>,
        /// Private note for other moderators
        #[arg(long, default_value = "")]
        note: String,
        /// Rule the user broke
        #[arg(long)]
        reason: Option<String>,
        /// Message sent to the user
        #[arg(long)]
        message: Option<String>,
    },
    /// Lift a ban
    Unban {
        subreddit: SubredditName,
        user: Username,
    },
    /// Reply to a post, comment or message
    Reply { parent: String, text: String },
    /// Replace the text of a self post or comment
    Edit { target: String, text: String },
    /// Submit a link or self post
    Submit {
        subreddit: SubredditName,
        title: String,
        /// Link target
        #[arg(long, conflicts_with = "text", required_unless_present = "text")]
        url: Option<String>,
        /// Self post body
        #[arg(long)]
        text: Option<String>,
    },
    /// Send a private message
    Message {
        to: Username,
        subject: String,
        body: String,
    },
    /// List background jobs
    Jobs,
    /// Show a job and everything it has produced
    Job { id: JobId },
    /// Print what a job produced since the last receive
    Receive { id: JobId },
    /// Wait for a job to finish, then show it
    Wait { id: JobId },
    /// Ask a job to stop
    StopJob { id: JobId },
    /// Forget a finished job
    RemoveJob { id: JobId },
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

/// Options shared by every listing verb.
#[derive(Args, Debug, Clone, Default)]
pub struct ListingArgs {
    /// Maximum items to fetch; negative means unlimited
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,
    /// Keep only items by these authors
    #[arg(long = "author", value_delimiter = ',')]
    pub authors: Vec<String>,
    /// Keep only items from these subreddits
    #[arg(long = "from", value_delimiter = ',')]
    pub subreddits: Vec<String>,
    /// Keep only posts linking to this domain
    #[arg(long)]
    pub domain: Option<String>,
    /// Keep only posts or only comments
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,
    /// Run the listing in the background
    #[arg(long)]
    pub as_job: bool,
}

impl ListingArgs {
    /// The client-side filter described by these options.
    #[must_use]
    pub fn filter(&self) -> FilterSpec {
        let mut filter = FilterSpec::default();
        if !self.authors.is_empty() {
            filter = filter.with_authors(self.authors.iter().cloned());
        }
        if !self.subreddits.is_empty() {
            filter = filter.with_subreddits(self.subreddits.iter().cloned());
        }
        if let Some(domain) = &self.domain {
            filter = filter.with_domain(domain.clone());
        }
        if let Some(kind) = self.kind {
            filter = filter.with_kind(kind.into());
        }
        filter
    }

    fn limit(&self, listing: ListingKind, defaults: &SessionConfig) -> Limit {
        self.limit
            .map_or_else(|| defaults.limit_for(listing), Limit::from_raw)
    }
}

#[derive(Args, Debug, Clone)]
pub struct SubredditListingArgs {
    pub subreddit: SubredditName,
    #[command(flatten)]
    pub listing: ListingArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ModlogArgs {
    pub subreddit: SubredditName,
    /// Keep only actions by these moderators
    #[arg(long = "moderator", value_delimiter = ',')]
    pub moderators: Vec<String>,
    /// Keep only this action type (e.g. removelink, banuser)
    #[arg(long)]
    pub action: Option<ModActionType>,
    #[command(flatten)]
    pub listing: ListingArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PostsArgs {
    pub subreddit: SubredditName,
    /// Sort order: hot, new, rising, controversial, top
    #[arg(long, default_value = "hot")]
    pub sort: PostSort,
    #[command(flatten)]
    pub listing: ListingArgs,
}

#[derive(Args, Debug, Clone)]
pub struct MessagesArgs {
    /// Which mailbox to read
    #[arg(value_enum, default_value_t = MailboxArg::Inbox)]
    pub mailbox: MailboxArg,
    /// Keep only unread messages
    #[arg(long)]
    pub unread: bool,
    #[command(flatten)]
    pub listing: ListingArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Posts,
    Comments,
}

impl From<KindArg> for KindFilter {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Posts => Self::Posts,
            KindArg::Comments => Self::Comments,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MailboxArg {
    Inbox,
    Unread,
    Modmail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DistinguishArg {
    /// Remove the distinction
    No,
    /// Distinguish as moderator
    Yes,
    Admin,
    Special,
}

impl From<DistinguishArg> for Distinguish {
    fn from(how: DistinguishArg) -> Self {
        match how {
            DistinguishArg::No => Self::None,
            DistinguishArg::Yes => Self::Moderator,
            DistinguishArg::Admin => Self::Admin,
            DistinguishArg::Special => Self::Special,
        }
    }
}

impl ShellCommand {
    /// Build the listing request for a listing verb, or `None` for other verbs.
    ///
    /// Returns the request and whether it should run as a job.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingSubreddit`] if a subreddit-scoped listing
    /// ends up without one.
    pub fn listing_request(
        &self,
        defaults: &SessionConfig,
    ) -> Result<Option<(ListingRequest, bool)>, DomainError> {
        let (listing, subreddit, args, filter) = match self {
            Self::Modqueue(a) => (
                ListingKind::ModQueue,
                Some(a.subreddit.clone()),
                &a.listing,
                a.listing.filter(),
            ),
            Self::Unmoderated(a) => (
                ListingKind::Unmoderated,
                Some(a.subreddit.clone()),
                &a.listing,
                a.listing.filter(),
            ),
            Self::Modlog(a) => {
                let mut filter = a.listing.filter();
                if !a.moderators.is_empty() {
                    filter = filter.with_moderators(a.moderators.iter().cloned());
                }
                if let Some(action) = a.action {
                    filter = filter.with_action(action);
                }
                (ListingKind::ModLog, Some(a.subreddit.clone()), &a.listing, filter)
            }
            Self::Posts(a) => (
                ListingKind::Posts(a.sort),
                Some(a.subreddit.clone()),
                &a.listing,
                a.listing.filter(),
            ),
            Self::Messages(a) => {
                let listing = match a.mailbox {
                    MailboxArg::Inbox => ListingKind::Inbox,
                    MailboxArg::Unread => ListingKind::Unread,
                    MailboxArg::Modmail => ListingKind::Modmail,
                };
                let mut filter = a.listing.filter();
                if a.unread {
                    filter = filter.unread();
                }
                (listing, None, &a.listing, filter)
            }
            _ => return Ok(None),
        };
        let limit = args.limit(listing, defaults);
        let request = ListingRequest::new(listing, subreddit, filter, limit)?;
        Ok(Some((request, args.as_job)))
    }
}

/// Map the one-shot moderation verbs onto their action.
#[must_use]
pub fn moderation_action(command: &ShellCommand) -> Option<(Vec<String>, ModerationAction)> {
    let mapped = match command {
        ShellCommand::Approve { targets } => (targets.clone(), ModerationAction::Approve),
        ShellCommand::Remove { targets, spam } => {
            (targets.clone(), ModerationAction::Remove { spam: *spam })
        }
        ShellCommand::Distinguish { target, how } => (
            vec![target.clone()],
            ModerationAction::Distinguish((*how).into()),
        ),
        ShellCommand::Flair { target, text, css } => (
            vec![target.clone()],
            ModerationAction::Flair {
                text: text.clone(),
                css_class: css.clone().unwrap_or_default(),
            },
        ),
        ShellCommand::Unflair { target } => (vec![target.clone()], ModerationAction::Unflair),
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn line(words: &[&str]) -> ShellCommand {
        ShellLine::try_parse_from(words).unwrap().command
    }

    #[test]
    fn cli_definitions_are_consistent() {
        Cli::command().debug_assert();
        ShellLine::command().debug_assert();
    }

    #[test]
    fn cli_defaults_to_shell() {
        let cli = Cli::try_parse_from(["modsh"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli =
            Cli::try_parse_from(["modsh", "check-config", "--config", "x.toml", "-vv", "--json"])
                .unwrap();
        assert!(matches!(cli.command, Some(Commands::CheckConfig)));
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
    }

    #[test]
    fn negative_limit_means_unlimited() {
        let command = line(&["modqueue", "r/rust", "--limit", "-1"]);
        let (request, as_job) = command
            .listing_request(&SessionConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(request.limit, Limit::Unlimited);
        assert_eq!(request.subreddit.unwrap().as_str(), "rust");
        assert!(!as_job);
    }

    #[test]
    fn missing_limit_uses_listing_default() {
        let command = line(&["modlog", "rust", "--as-job"]);
        let (request, as_job) = command
            .listing_request(&SessionConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(request.listing, ListingKind::ModLog);
        assert_eq!(request.limit, Limit::AtMost(1000));
        assert!(as_job);
    }

    #[test]
    fn modlog_filters_reach_request() {
        let command = line(&[
            "modlog",
            "rust",
            "--moderator",
            "mod_a,mod_b",
            "--action",
            "removelink",
        ]);
        let (request, _) = command
            .listing_request(&SessionConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(request.filter.action, Some(ModActionType::RemoveLink));
        assert_eq!(request.filter.moderators.as_ref().map(|m| m.len()), Some(2));
    }

    #[test]
    fn messages_default_to_inbox() {
        let command = line(&["messages", "--unread"]);
        let (request, _) = command
            .listing_request(&SessionConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(request.listing, ListingKind::Inbox);
        assert!(request.filter.unread_only);
        assert!(request.subreddit.is_none());
    }

    #[test]
    fn posts_parse_sort() {
        let command = line(&["posts", "rust", "--sort", "new", "--author", "alice"]);
        let (request, _) = command
            .listing_request(&SessionConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(request.listing, ListingKind::Posts(PostSort::New));
        assert!(request.filter.authors.is_some());
    }

    #[test]
    fn non_listing_verbs_have_no_request() {
        let command = line(&["jobs"]);
        assert!(command
            .listing_request(&SessionConfig::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn moderation_verbs_map_to_actions() {
        let (targets, action) =
            moderation_action(&line(&["remove", "t3_a", "t1_b", "--spam"])).unwrap();
        assert_eq!(targets, vec!["t3_a", "t1_b"]);
        assert_eq!(action, ModerationAction::Remove { spam: true });

        let (_, action) = moderation_action(&line(&["distinguish", "t1_b"])).unwrap();
        assert_eq!(action, ModerationAction::Distinguish(Distinguish::Moderator));

        assert!(moderation_action(&line(&["whoami"])).is_none());
    }

    #[test]
    fn submit_needs_url_or_text() {
        assert!(ShellLine::try_parse_from(["submit", "rust", "title"]).is_err());
        assert!(
            ShellLine::try_parse_from(["submit", "rust", "title", "--url", "https://x.y"]).is_ok()
        );
        assert!(ShellLine::try_parse_from([
            "submit", "rust", "title", "--url", "https://x.y", "--text", "b"
        ])
        .is_err());
    }

    #[test]
    fn job_verbs_parse_ids() {
        assert!(matches!(
            line(&["stop-job", "3"]),
            ShellCommand::StopJob { id } if id == JobId::new(3)
        ));
        assert!(ShellLine::try_parse_from(["wait", "x"]).is_err());
        assert!(matches!(line(&["quit"]), ShellCommand::Exit));
    }
}
