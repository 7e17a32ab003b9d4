use std::fmt;

use crate::HarnessResult;
use crate::json::JsonPath;

pub const BOARDS: &str = "/boards/";
pub const LISTS: &str = "/lists/";
pub const CARDS: &str = "/cards/";
pub const ORGANIZATIONS: &str = "/organizations/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Board,
    List,
    Card,
    Organization,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Board => write!(f, "board"),
            ResourceKind::List => write!(f, "list"),
            ResourceKind::Card => write!(f, "card"),
            ResourceKind::Organization => write!(f, "organization"),
        }
    }
}

impl ResourceKind {
    pub fn collection_path(&self) -> &'static str {
        match self {
            ResourceKind::Board => BOARDS,
            ResourceKind::List => LISTS,
            ResourceKind::Card => CARDS,
            ResourceKind::Organization => ORGANIZATIONS,
        }
    }

    /// Lists and cards go away with the board that owns them.
    pub fn is_cascaded(&self) -> bool {
        matches!(self, ResourceKind::List | ResourceKind::Card)
    }
}

/// A resource created at the remote service by a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteResourceHandle {
    pub id: String,
    pub kind: ResourceKind,
    /// Owning board of a list or card, when known.
    pub board: Option<String>,
}

impl RemoteResourceHandle {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            board: None,
        }
    }

    /// Reads the `id` of a creation response, and `idBoard` for lists and
    /// cards.
    pub fn from_json(kind: ResourceKind, json: &JsonPath) -> HarnessResult<Self> {
        let mut handle = Self::new(kind, json.get_str("id")?);
        if kind.is_cascaded() {
            handle.board = json.get_str("idBoard").ok().map(str::to_string);
        }
        Ok(handle)
    }

    pub fn owned_by(mut self, board: &RemoteResourceHandle) -> Self {
        self.board = Some(board.id.clone());
        self
    }

    /// Same remote resource, whatever is known about its owner.
    pub fn same_resource(&self, other: &RemoteResourceHandle) -> bool {
        self.kind == other.kind && self.id == other.id
    }

    /// True for a list or card living on `board`.
    pub fn is_owned_by(&self, board: &RemoteResourceHandle) -> bool {
        board.kind == ResourceKind::Board
            && self.kind.is_cascaded()
            && self.board.as_deref() == Some(board.id.as_str())
    }

    pub fn path(&self) -> String {
        format!("{}{}", self.kind.collection_path(), self.id)
    }

    /// Path of a collection nested under this resource, e.g. a board's lists.
    pub fn nested(&self, collection: ResourceKind) -> String {
        format!("{}{}", self.path(), collection.collection_path())
    }
}

impl fmt::Display for RemoteResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}
