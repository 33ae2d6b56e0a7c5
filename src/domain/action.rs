//! Moderation log action types.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::DomainError;

macro_rules! mod_action_types {
    ($($variant:ident => $wire:literal),+ $(,)?) => {
        /// Action recorded in a subreddit's moderation log.
        ///
        /// Wire names follow the remote API's `type` query parameter.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum ModActionType {
            $($variant,)+
            /// An action this client does not know about.
            Other,
        }

        impl ModActionType {
            /// Every known action type, in declaration order.
            pub const ALL: &'static [ModActionType] = &[$(ModActionType::$variant,)+];

            /// Wire name used by the remote API.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other => "other",
                }
            }

            /// Lenient mapping used when decoding remote payloads.
            #[must_use]
            pub fn from_wire(value: &str) -> Self {
                match value {
                    $($wire => Self::$variant,)+
                    _ => Self::Other,
                }
            }
        }
    };
}

mod_action_types! {
    BanUser => "banuser",
    UnbanUser => "unbanuser",
    RemoveLink => "removelink",
    ApproveLink => "approvelink",
    RemoveComment => "removecomment",
    ApproveComment => "approvecomment",
    SpamLink => "spamlink",
    SpamComment => "spamcomment",
    AddModerator => "addmoderator",
    RemoveModerator => "removemoderator",
    InviteModerator => "invitemoderator",
    AcceptModeratorInvite => "acceptmoderatorinvite",
    AddContributor => "addcontributor",
    RemoveContributor => "removecontributor",
    EditSettings => "editsettings",
    EditFlair => "editflair",
    Distinguish => "distinguish",
    MarkNsfw => "marknsfw",
    WikiBanned => "wikibanned",
    WikiContributor => "wikicontributor",
    WikiUnbanned => "wikiunbanned",
    WikiPageListed => "wikipagelisted",
    RemoveWikiContributor => "removewikicontributor",
    WikiRevise => "wikirevise",
    WikiPermLevel => "wikipermlevel",
    IgnoreReports => "ignorereports",
    UnignoreReports => "unignorereports",
    SetPermissions => "setpermissions",
    SetSuggestedSort => "setsuggestedsort",
    Sticky => "sticky",
    Unsticky => "unsticky",
    SetContestMode => "setcontestmode",
    UnsetContestMode => "unsetcontestmode",
    Lock => "lock",
    Unlock => "unlock",
    MuteUser => "muteuser",
    UnmuteUser => "unmuteuser",
    CreateRule => "createrule",
    EditRule => "editrule",
    DeleteRule => "deleterule",
    Spoiler => "spoiler",
    Unspoiler => "unspoiler",
}

impl fmt::Display for ModActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModActionType {
    type Err = DomainError;

    /// Strict parse for user input; accepts any casing and ignores `-`/`_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| DomainError::UnknownValue {
                field: "moderation action",
                value: s.to_string(),
            })
    }
}
