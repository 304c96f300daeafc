//! The operation catalogue.
//!
//! [`OperationKind`] names every operation both facades expose and carries
//! the metadata each facade needs to publish it (description, parameters).
//! [`OperationKind::parse`] turns transport-neutral [`Params`] into a typed
//! [`Invocation`]; all caller-input validation happens there, before any
//! credential lookup or platform call.

use crate::error::GatewayError;
use crate::filters::{
    GeoDescriptor, NoteRange, NoteTime, NoteType, PosDistance, ProxyDescriptor, SearchFilters,
    SortType,
};
use crate::links::ResourceLink;
use crate::params::Params;
use crate::platform::{PlatformCall, UserPageQuery};
use std::fmt;

/// JSON type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Free text.
    Text,
    /// Integer (a number or numeric string).
    Integer,
    /// JSON object (or a string containing one).
    Object,
}

impl ParamType {
    /// JSON Schema type name.
    #[must_use]
    pub const fn schema_type(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Integer => "integer",
            Self::Object => "object",
        }
    }
}

/// One declared parameter of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name, identical on both transports.
    pub name: &'static str,
    /// Expected type.
    pub ty: ParamType,
    /// Whether callers must supply it.
    pub required: bool,
    /// Default for optional integers.
    pub default: Option<i64>,
    /// Human-readable description.
    pub description: &'static str,
}

impl ParamSpec {
    const fn text(name: &'static str, required: bool, description: &'static str) -> Self {
        Self {
            name,
            ty: ParamType::Text,
            required,
            default: None,
            description,
        }
    }

    const fn integer(name: &'static str, default: i64, description: &'static str) -> Self {
        Self {
            name,
            ty: ParamType::Integer,
            required: false,
            default: Some(default),
            description,
        }
    }

    const fn object(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            ty: ParamType::Object,
            required: false,
            default: None,
            description,
        }
    }
}

const PROXIES: ParamSpec = ParamSpec::object(
    "proxies",
    "Proxy settings as a JSON object, forwarded to the platform client",
);
const CURSOR: ParamSpec = ParamSpec::text("cursor", false, "Page cursor; empty for the first page");
const USER_ID: ParamSpec = ParamSpec::text("user_id", true, "User id");
const USER_URL: ParamSpec = ParamSpec::text(
    "user_url",
    true,
    "Profile URL including xsec_token and xsec_source",
);
const XSEC_TOKEN: ParamSpec = ParamSpec::text("xsec_token", false, "Access token");
const XSEC_TOKEN_REQUIRED: ParamSpec = ParamSpec::text("xsec_token", true, "Access token");
const XSEC_SOURCE: ParamSpec = ParamSpec::text("xsec_source", false, "Access source");
const NOTE_ID: ParamSpec = ParamSpec::text("note_id", true, "Note id");
const NOTE_URL: ParamSpec = ParamSpec::text("url", true, "Note URL including xsec_token");
const QUERY: ParamSpec = ParamSpec::text("query", true, "Search keywords");
const PAGE: ParamSpec = ParamSpec::integer("page", 1, "1-based page number");
const NUM: ParamSpec = ParamSpec::integer("num", 10, "Number of items to collect (at least 1)");
const CATEGORY: ParamSpec = ParamSpec::text("category", false, "Homefeed channel id");
const SORT_TYPE: ParamSpec = ParamSpec::integer(
    SortType::FIELD,
    0,
    "0 general, 1 latest, 2 most liked, 3 most commented, 4 most collected",
);
const NOTE_TYPE: ParamSpec = ParamSpec::integer(NoteType::FIELD, 0, "0 any, 1 video, 2 image");
const NOTE_TIME: ParamSpec = ParamSpec::integer(
    NoteTime::FIELD,
    0,
    "0 any, 1 within a day, 2 within a week, 3 within half a year",
);
const NOTE_RANGE: ParamSpec = ParamSpec::integer(
    NoteRange::FIELD,
    0,
    "0 any, 1 seen, 2 unseen, 3 followed",
);
const POS_DISTANCE: ParamSpec =
    ParamSpec::integer(PosDistance::FIELD, 0, "0 any, 1 same city, 2 nearby");
const GEO: ParamSpec = ParamSpec::object("geo", "Location as {\"latitude\": .., \"longitude\": ..}");

const CURSOR_SCORE: ParamSpec =
    ParamSpec::text("cursor_score", false, "Cursor from the previous page");
const REFRESH_TYPE: ParamSpec =
    ParamSpec::integer("refresh_type", 1, "1 for a fresh feed, 3 to continue");
const NOTE_INDEX: ParamSpec = ParamSpec::integer("note_index", 0, "Items already received");
const IMG_URL: ParamSpec = ParamSpec::text("img_url", true, "Image URL as found in a note");
const WORD: ParamSpec = ParamSpec::text("word", true, "Partial keyword");
const COOKIES: ParamSpec = ParamSpec::text("cookies", true, "Raw cookie header value");

const ONLY_PROXIES: &[ParamSpec] = &[PROXIES];
const CURSOR_PAGE: &[ParamSpec] = &[CURSOR, PROXIES];
const USER_PAGE: &[ParamSpec] = &[USER_ID, CURSOR, XSEC_TOKEN, XSEC_SOURCE, PROXIES];
const USER_ALL: &[ParamSpec] = &[USER_URL, PROXIES];
const HOMEFEED_PAGE: &[ParamSpec] = &[CATEGORY, CURSOR_SCORE, REFRESH_TYPE, NOTE_INDEX, PROXIES];
const HOMEFEED_SOME: &[ParamSpec] = &[CATEGORY, NUM, PROXIES];
const USER_INFO: &[ParamSpec] = &[USER_ID, PROXIES];
const NOTE_BY_URL: &[ParamSpec] = &[NOTE_URL, PROXIES];
const NOTE_BY_ID: &[ParamSpec] = &[NOTE_ID, PROXIES];
const IMAGE: &[ParamSpec] = &[IMG_URL, PROXIES];
const KEYWORD: &[ParamSpec] = &[WORD, PROXIES];
const NOTE_SEARCH_PAGE: &[ParamSpec] = &[
    QUERY, PAGE, SORT_TYPE, NOTE_TYPE, NOTE_TIME, NOTE_RANGE, POS_DISTANCE, GEO, PROXIES,
];
const NOTE_SEARCH_SOME: &[ParamSpec] = &[
    QUERY, NUM, SORT_TYPE, NOTE_TYPE, NOTE_TIME, NOTE_RANGE, POS_DISTANCE, GEO, PROXIES,
];
const USER_SEARCH_PAGE: &[ParamSpec] = &[QUERY, PAGE, PROXIES];
const USER_SEARCH_SOME: &[ParamSpec] = &[QUERY, NUM, PROXIES];
const COMMENT_PAGE: &[ParamSpec] = &[NOTE_ID, CURSOR, XSEC_TOKEN_REQUIRED, PROXIES];
const COMMENT_ALL: &[ParamSpec] = &[NOTE_ID, XSEC_TOKEN_REQUIRED, PROXIES];
const SET_COOKIES: &[ParamSpec] = &[COOKIES];

/// Every operation in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Homefeed channels.
    GetHomefeedCategory,
    /// One homefeed page.
    GetHomefeedRecommend,
    /// N homefeed items.
    GetHomefeedRecommendByNum,
    /// A user's profile.
    GetUserInfo,
    /// Own profile.
    GetUserSelfInfo,
    /// Own profile, alternate endpoint.
    GetUserSelfInfo2,
    /// One page of a user's notes.
    GetUserNotes,
    /// All of a user's notes.
    GetUserAllNotes,
    /// One page of a user's likes.
    GetUserLikes,
    /// All of a user's likes.
    GetUserAllLikes,
    /// One page of a user's collects.
    GetUserCollects,
    /// All of a user's collects.
    GetUserAllCollects,
    /// Note detail.
    GetNoteInfo,
    /// Watermark-free note video.
    GetNoteNoWatermarkVideo,
    /// Watermark-free image.
    GetNoteNoWatermarkImage,
    /// Search suggestions.
    GetSearchKeyword,
    /// One page of note search.
    SearchNotes,
    /// N note search results.
    SearchSomeNotes,
    /// One page of user search.
    SearchUsers,
    /// N user search results.
    SearchSomeUsers,
    /// One page of first-level comments.
    GetNoteComments,
    /// All first-level comments.
    GetNoteAllComments,
    /// All comments including every reply.
    GetNoteAllComment,
    /// Unread counters.
    GetUnreadMessage,
    /// One page of mentions.
    GetMentions,
    /// All mentions.
    GetAllMentions,
    /// One page of like/collect notifications.
    GetLikes,
    /// All like/collect notifications.
    GetAllLikes,
    /// One page of new followers.
    GetConnections,
    /// All new followers.
    GetAllConnections,
    /// Replace the session credential.
    SetCookies,
    /// Credential presence.
    GetCookies,
}

impl OperationKind {
    /// The full catalogue, in publication order.
    pub const ALL: [Self; 32] = [
        Self::GetHomefeedCategory,
        Self::GetHomefeedRecommend,
        Self::GetHomefeedRecommendByNum,
        Self::GetUserInfo,
        Self::GetUserSelfInfo,
        Self::GetUserSelfInfo2,
        Self::GetUserNotes,
        Self::GetUserAllNotes,
        Self::GetUserLikes,
        Self::GetUserAllLikes,
        Self::GetUserCollects,
        Self::GetUserAllCollects,
        Self::GetNoteInfo,
        Self::GetNoteNoWatermarkVideo,
        Self::GetNoteNoWatermarkImage,
        Self::GetSearchKeyword,
        Self::SearchNotes,
        Self::SearchSomeNotes,
        Self::SearchUsers,
        Self::SearchSomeUsers,
        Self::GetNoteComments,
        Self::GetNoteAllComments,
        Self::GetNoteAllComment,
        Self::GetUnreadMessage,
        Self::GetMentions,
        Self::GetAllMentions,
        Self::GetLikes,
        Self::GetAllLikes,
        Self::GetConnections,
        Self::GetAllConnections,
        Self::SetCookies,
        Self::GetCookies,
    ];

    /// Canonical name; also the tool name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetHomefeedCategory => "get_homefeed_category",
            Self::GetHomefeedRecommend => "get_homefeed_recommend",
            Self::GetHomefeedRecommendByNum => "get_homefeed_recommend_by_num",
            Self::GetUserInfo => "get_user_info",
            Self::GetUserSelfInfo => "get_user_self_info",
            Self::GetUserSelfInfo2 => "get_user_self_info2",
            Self::GetUserNotes => "get_user_notes",
            Self::GetUserAllNotes => "get_user_all_notes",
            Self::GetUserLikes => "get_user_likes",
            Self::GetUserAllLikes => "get_user_all_likes",
            Self::GetUserCollects => "get_user_collects",
            Self::GetUserAllCollects => "get_user_all_collects",
            Self::GetNoteInfo => "get_note_info",
            Self::GetNoteNoWatermarkVideo => "get_note_no_watermark_video",
            Self::GetNoteNoWatermarkImage => "get_note_no_watermark_image",
            Self::GetSearchKeyword => "get_search_keyword",
            Self::SearchNotes => "search_notes",
            Self::SearchSomeNotes => "search_some_notes",
            Self::SearchUsers => "search_users",
            Self::SearchSomeUsers => "search_some_users",
            Self::GetNoteComments => "get_note_comments",
            Self::GetNoteAllComments => "get_note_all_comments",
            Self::GetNoteAllComment => "get_note_all_comment",
            Self::GetUnreadMessage => "get_unread_message",
            Self::GetMentions => "get_mentions",
            Self::GetAllMentions => "get_all_mentions",
            Self::GetLikes => "get_likes",
            Self::GetAllLikes => "get_all_likes",
            Self::GetConnections => "get_connections",
            Self::GetAllConnections => "get_all_connections",
            Self::SetCookies => "set_cookies",
            Self::GetCookies => "get_cookies",
        }
    }

    /// Look an operation up by canonical name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// One-line description for tool listings.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::GetHomefeedCategory => "List all homefeed channels",
            Self::GetHomefeedRecommend => "Fetch one page of homefeed recommendations",
            Self::GetHomefeedRecommendByNum => "Collect a given number of homefeed recommendations",
            Self::GetUserInfo => "Fetch a user's profile",
            Self::GetUserSelfInfo => "Fetch the session owner's profile",
            Self::GetUserSelfInfo2 => "Fetch the session owner's profile (alternate endpoint)",
            Self::GetUserNotes => "Fetch one page of a user's notes",
            Self::GetUserAllNotes => "Fetch every note posted by a user",
            Self::GetUserLikes => "Fetch one page of notes a user liked",
            Self::GetUserAllLikes => "Fetch every note a user liked",
            Self::GetUserCollects => "Fetch one page of notes a user collected",
            Self::GetUserAllCollects => "Fetch every note a user collected",
            Self::GetNoteInfo => "Fetch the detail of a note by URL",
            Self::GetNoteNoWatermarkVideo => "Resolve the watermark-free video of a note",
            Self::GetNoteNoWatermarkImage => "Resolve the watermark-free version of an image",
            Self::GetSearchKeyword => "Fetch search suggestions for a keyword",
            Self::SearchNotes => "Fetch one page of note search results",
            Self::SearchSomeNotes => "Collect a given number of note search results",
            Self::SearchUsers => "Fetch one page of user search results",
            Self::SearchSomeUsers => "Collect a given number of user search results",
            Self::GetNoteComments => "Fetch one page of a note's first-level comments",
            Self::GetNoteAllComments => "Fetch every first-level comment of a note",
            Self::GetNoteAllComment => "Fetch every comment of a note, including all replies",
            Self::GetUnreadMessage => "Fetch unread message counters",
            Self::GetMentions => "Fetch one page of comment and @ mentions",
            Self::GetAllMentions => "Fetch every comment and @ mention",
            Self::GetLikes => "Fetch one page of like and collect notifications",
            Self::GetAllLikes => "Fetch every like and collect notification",
            Self::GetConnections => "Fetch one page of new-follower notifications",
            Self::GetAllConnections => "Fetch every new-follower notification",
            Self::SetCookies => "Set the session cookies used for every platform call",
            Self::GetCookies => "Report whether session cookies are set, without revealing them",
        }
    }

    /// Declared parameters.
    #[must_use]
    pub const fn parameters(self) -> &'static [ParamSpec] {
        match self {
            Self::GetHomefeedCategory
            | Self::GetUserSelfInfo
            | Self::GetUserSelfInfo2
            | Self::GetUnreadMessage
            | Self::GetAllMentions
            | Self::GetAllLikes
            | Self::GetAllConnections => ONLY_PROXIES,
            Self::GetHomefeedRecommend => HOMEFEED_PAGE,
            Self::GetHomefeedRecommendByNum => HOMEFEED_SOME,
            Self::GetUserInfo => USER_INFO,
            Self::GetUserNotes | Self::GetUserLikes | Self::GetUserCollects => USER_PAGE,
            Self::GetUserAllNotes | Self::GetUserAllLikes | Self::GetUserAllCollects => USER_ALL,
            Self::GetNoteInfo | Self::GetNoteAllComment => NOTE_BY_URL,
            Self::GetNoteNoWatermarkVideo => NOTE_BY_ID,
            Self::GetNoteNoWatermarkImage => IMAGE,
            Self::GetSearchKeyword => KEYWORD,
            Self::SearchNotes => NOTE_SEARCH_PAGE,
            Self::SearchSomeNotes => NOTE_SEARCH_SOME,
            Self::SearchUsers => USER_SEARCH_PAGE,
            Self::SearchSomeUsers => USER_SEARCH_SOME,
            Self::GetNoteComments => COMMENT_PAGE,
            Self::GetNoteAllComments => COMMENT_ALL,
            Self::GetMentions | Self::GetLikes | Self::GetConnections => CURSOR_PAGE,
            Self::SetCookies => SET_COOKIES,
            Self::GetCookies => &[],
        }
    }

    /// Validate `params` into a typed invocation.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for any missing, malformed or
    /// out-of-range parameter.
    pub fn parse(self, params: &Params) -> Result<Invocation, GatewayError> {
        let operation = match self {
            Self::GetHomefeedCategory => Operation::Page(PlatformCall::HomefeedChannels),
            Self::GetHomefeedRecommend => Operation::Page(PlatformCall::HomefeedRecommend {
                category: params.text("category")?,
                cursor_score: params.text("cursor_score")?,
                refresh_type: params.positive("refresh_type", 1)?,
                note_index: params.non_negative("note_index", 0)?,
            }),
            Self::GetHomefeedRecommendByNum => Operation::HomefeedSome {
                category: params.text("category")?,
                num: params.positive("num", 10)?,
            },
            Self::GetUserInfo => Operation::Page(PlatformCall::UserInfo {
                user_id: params.required_text("user_id")?,
            }),
            Self::GetUserSelfInfo => Operation::Page(PlatformCall::SelfInfo),
            Self::GetUserSelfInfo2 => Operation::Page(PlatformCall::SelfInfoV2),
            Self::GetUserNotes => Operation::Page(UserCollection::Notes.call(user_page(params)?)),
            Self::GetUserLikes => Operation::Page(UserCollection::Likes.call(user_page(params)?)),
            Self::GetUserCollects => {
                Operation::Page(UserCollection::Collects.call(user_page(params)?))
            }
            Self::GetUserAllNotes => user_all(UserCollection::Notes, params)?,
            Self::GetUserAllLikes => user_all(UserCollection::Likes, params)?,
            Self::GetUserAllCollects => user_all(UserCollection::Collects, params)?,
            Self::GetNoteInfo => {
                let link = ResourceLink::parse("url", &params.required_text("url")?)?;
                Operation::Page(PlatformCall::NoteInfo {
                    note_id: link.id,
                    xsec_token: link.xsec_token,
                    xsec_source: link.xsec_source,
                })
            }
            Self::GetNoteNoWatermarkVideo => Operation::Page(PlatformCall::NoteVideo {
                note_id: params.required_text("note_id")?,
            }),
            Self::GetNoteNoWatermarkImage => Operation::Page(PlatformCall::NoteImage {
                img_url: params.required_text("img_url")?,
            }),
            Self::GetSearchKeyword => Operation::Page(PlatformCall::SearchKeyword {
                word: params.required_text("word")?,
            }),
            Self::SearchNotes => Operation::Page(PlatformCall::SearchNotes {
                query: params.required_text("query")?,
                page: params.positive("page", 1)?,
                filters: search_filters(params)?,
            }),
            Self::SearchSomeNotes => Operation::SearchSomeNotes {
                query: params.required_text("query")?,
                num: params.positive("num", 10)?,
                filters: search_filters(params)?,
            },
            Self::SearchUsers => Operation::Page(PlatformCall::SearchUsers {
                query: params.required_text("query")?,
                page: params.positive("page", 1)?,
            }),
            Self::SearchSomeUsers => Operation::SearchSomeUsers {
                query: params.required_text("query")?,
                num: params.positive("num", 10)?,
            },
            Self::GetNoteComments => Operation::Page(PlatformCall::NoteComments {
                note_id: params.required_text("note_id")?,
                cursor: params.text("cursor")?,
                xsec_token: params.required_text("xsec_token")?,
            }),
            Self::GetNoteAllComments => Operation::AllComments {
                note_id: params.required_text("note_id")?,
                xsec_token: params.required_text("xsec_token")?,
            },
            Self::GetNoteAllComment => Operation::AllCommentsNested {
                link: ResourceLink::parse("url", &params.required_text("url")?)?,
            },
            Self::GetUnreadMessage => Operation::Page(PlatformCall::UnreadMessages),
            Self::GetMentions => Operation::Page(MessageFeed::Mentions.call(params.text("cursor")?)),
            Self::GetLikes => {
                Operation::Page(MessageFeed::LikesAndCollects.call(params.text("cursor")?))
            }
            Self::GetConnections => {
                Operation::Page(MessageFeed::Connections.call(params.text("cursor")?))
            }
            Self::GetAllMentions => Operation::AllMessages(MessageFeed::Mentions),
            Self::GetAllLikes => Operation::AllMessages(MessageFeed::LikesAndCollects),
            Self::GetAllConnections => Operation::AllMessages(MessageFeed::Connections),
            Self::SetCookies => {
                return Ok(Invocation {
                    kind: self,
                    operation: Operation::SetCredential(params.raw_text("cookies")?),
                    proxy: None,
                });
            }
            Self::GetCookies => {
                return Ok(Invocation {
                    kind: self,
                    operation: Operation::CredentialStatus,
                    proxy: None,
                });
            }
        };

        Ok(Invocation {
            kind: self,
            operation,
            proxy: params.structured::<ProxyDescriptor>("proxies")?,
        })
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn user_page(params: &Params) -> Result<UserPageQuery, GatewayError> {
    Ok(UserPageQuery {
        user_id: params.required_text("user_id")?,
        cursor: params.text("cursor")?,
        xsec_token: params.text("xsec_token")?,
        xsec_source: params.text("xsec_source")?,
    })
}

fn user_all(collection: UserCollection, params: &Params) -> Result<Operation, GatewayError> {
    let link = ResourceLink::parse("user_url", &params.required_text("user_url")?)?;
    Ok(Operation::UserAll { collection, link })
}

fn search_filters(params: &Params) -> Result<SearchFilters, GatewayError> {
    Ok(SearchFilters {
        sort_type: SortType::from_wire(params.integer(SortType::FIELD, 0)?)?,
        note_type: NoteType::from_wire(params.integer(NoteType::FIELD, 0)?)?,
        note_time: NoteTime::from_wire(params.integer(NoteTime::FIELD, 0)?)?,
        note_range: NoteRange::from_wire(params.integer(NoteRange::FIELD, 0)?)?,
        pos_distance: PosDistance::from_wire(params.integer(PosDistance::FIELD, 0)?)?,
        geo: params
            .structured::<GeoDescriptor>("geo")?
            .map(GeoDescriptor::validate)
            .transpose()?,
    })
}

/// Which of a user's note lists to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCollection {
    /// Posted notes.
    Notes,
    /// Liked notes.
    Likes,
    /// Collected notes.
    Collects,
}

impl UserCollection {
    /// The page primitive for this collection.
    #[must_use]
    pub fn call(self, query: UserPageQuery) -> PlatformCall {
        match self {
            Self::Notes => PlatformCall::UserNotes(query),
            Self::Likes => PlatformCall::UserLikes(query),
            Self::Collects => PlatformCall::UserCollects(query),
        }
    }
}

/// Which notification feed to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFeed {
    /// Comment and @ mentions.
    Mentions,
    /// Like and collect notifications.
    LikesAndCollects,
    /// New followers.
    Connections,
}

impl MessageFeed {
    /// The page primitive for this feed.
    #[must_use]
    pub fn call(self, cursor: String) -> PlatformCall {
        match self {
            Self::Mentions => PlatformCall::Mentions { cursor },
            Self::LikesAndCollects => PlatformCall::LikesAndCollects { cursor },
            Self::Connections => PlatformCall::NewConnections { cursor },
        }
    }
}

/// A validated request.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Forward one primitive call and return its page.
    Page(PlatformCall),
    /// Collect `num` homefeed items.
    HomefeedSome {
        /// Channel id.
        category: String,
        /// Target count.
        num: u32,
    },
    /// Collect an entire user collection.
    UserAll {
        /// Which collection.
        collection: UserCollection,
        /// Parsed profile URL.
        link: ResourceLink,
    },
    /// Collect `num` note search results.
    SearchSomeNotes {
        /// Search query.
        query: String,
        /// Target count.
        num: u32,
        /// Result filters.
        filters: SearchFilters,
    },
    /// Collect `num` user search results.
    SearchSomeUsers {
        /// Search query.
        query: String,
        /// Target count.
        num: u32,
    },
    /// Collect every first-level comment.
    AllComments {
        /// Note id.
        note_id: String,
        /// Access token.
        xsec_token: String,
    },
    /// Collect every comment and every reply.
    AllCommentsNested {
        /// Parsed note URL.
        link: ResourceLink,
    },
    /// Collect an entire notification feed.
    AllMessages(MessageFeed),
    /// Replace the credential.
    SetCredential(String),
    /// Report credential presence.
    CredentialStatus,
}

impl Operation {
    /// Whether executing this operation needs the stored credential.
    #[must_use]
    pub const fn requires_credential(&self) -> bool {
        match self {
            Self::Page(call) => call.requires_credential(),
            Self::SetCredential(_) | Self::CredentialStatus => false,
            _ => true,
        }
    }
}

/// A parsed operation plus its transport-independent options.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Which catalogue entry this came from.
    pub kind: OperationKind,
    /// The validated operation.
    pub operation: Operation,
    /// Proxy hints, forwarded verbatim.
    pub proxy: Option<ProxyDescriptor>,
}
