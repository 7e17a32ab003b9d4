//! In-memory records and the validation rules of the board service.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult, MODEL_NOT_FOUND, RESOURCE_NOT_FOUND};

/// Lists a board gets when created with `defaultLists=true`.
pub const DEFAULT_LISTS: [&str; 3] = ["To Do", "Doing", "Done"];

const POS_STEP: f64 = 16384.0;
const MIN_ORG_NAME_LEN: usize = 3;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub closed: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoardList {
    pub id: String,
    pub name: String,
    pub closed: bool,
    pub id_board: String,
    pub pos: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub closed: bool,
    pub id_board: String,
    pub id_list: String,
    pub pos: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub desc: String,
    pub website: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardCreate {
    pub name: Option<String>,
    pub desc: Option<String>,
    #[serde(default = "default_true")]
    pub default_lists: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardUpdate {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub closed: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListCreate {
    pub name: Option<String>,
}

/// `PUT /lists/:id/closed?value=…`
#[derive(Debug, Deserialize)]
pub struct ListClosed {
    pub value: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardCreate {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub id_list: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardUpdate {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub id_list: Option<String>,
    pub closed: Option<bool>,
}

/// Used for both creating and updating an organization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationInput {
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub desc: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Default)]
pub struct Store {
    seq: u64,
    boards: HashMap<String, Board>,
    lists: HashMap<String, BoardList>,
    cards: HashMap<String, Card>,
    organizations: HashMap<String, Organization>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records of every kind.
    pub fn resource_count(&self) -> usize {
        self.boards.len() + self.lists.len() + self.cards.len() + self.organizations.len()
    }

    /// 24 hex characters, timestamp first, like the service's object ids.
    fn next_id(&mut self) -> String {
        self.seq += 1;
        let secs = time::OffsetDateTime::now_utc().unix_timestamp() as u32;
        format!("{:08x}{:016x}", secs, self.seq)
    }

    // Boards

    pub fn create_board(&mut self, input: BoardCreate) -> ApiResult<Board> {
        let name = required(input.name, "name")?;

        let board = Board {
            id: self.next_id(),
            name,
            desc: input.desc.unwrap_or_default(),
            closed: false,
        };
        self.boards.insert(board.id.clone(), board.clone());

        if input.default_lists {
            for list_name in DEFAULT_LISTS {
                self.insert_list(&board.id, list_name.to_string());
            }
        }

        Ok(board)
    }

    pub fn get_board(&self, id: &str) -> ApiResult<Board> {
        self.boards
            .get(id)
            .cloned()
            .ok_or(ApiError::NotFound(RESOURCE_NOT_FOUND))
    }

    pub fn update_board(&mut self, id: &str, update: BoardUpdate) -> ApiResult<Board> {
        let board = self
            .boards
            .get_mut(id)
            .ok_or(ApiError::NotFound(RESOURCE_NOT_FOUND))?;

        if let Some(name) = update.name {
            board.name = required(Some(name), "name")?;
        }
        if let Some(desc) = update.desc {
            board.desc = desc;
        }
        if let Some(closed) = update.closed {
            board.closed = closed;
        }

        Ok(board.clone())
    }

    /// Removes the board together with its lists and cards.
    pub fn delete_board(&mut self, id: &str) -> ApiResult<()> {
        self.boards
            .remove(id)
            .ok_or(ApiError::NotFound(RESOURCE_NOT_FOUND))?;
        self.lists.retain(|_, list| list.id_board != id);
        self.cards.retain(|_, card| card.id_board != id);
        Ok(())
    }

    /// Open lists of the board, ordered by position.
    pub fn board_lists(&self, id: &str) -> ApiResult<Vec<BoardList>> {
        self.get_board(id)?;
        let mut lists: Vec<BoardList> = self
            .lists
            .values()
            .filter(|l| l.id_board == id && !l.closed)
            .cloned()
            .collect();
        lists.sort_by(|a, b| a.pos.total_cmp(&b.pos));
        Ok(lists)
    }

    pub fn board_cards(&self, id: &str) -> ApiResult<Vec<Card>> {
        self.get_board(id)?;
        Ok(self.sorted_cards(|c| c.id_board == id))
    }

    // Lists

    pub fn create_list(&mut self, board_id: &str, input: ListCreate) -> ApiResult<BoardList> {
        let name = required(input.name, "name")?;
        self.get_board(board_id)?;
        Ok(self.insert_list(board_id, name))
    }

    fn insert_list(&mut self, board_id: &str, name: String) -> BoardList {
        let pos = self
            .lists
            .values()
            .filter(|l| l.id_board == board_id)
            .map(|l| l.pos)
            .fold(0.0, f64::max)
            + POS_STEP;

        let list = BoardList {
            id: self.next_id(),
            name,
            closed: false,
            id_board: board_id.to_string(),
            pos,
        };
        self.lists.insert(list.id.clone(), list.clone());
        list
    }

    pub fn get_list(&self, id: &str) -> ApiResult<BoardList> {
        self.lists
            .get(id)
            .cloned()
            .ok_or(ApiError::NotFound(RESOURCE_NOT_FOUND))
    }

    /// Lists cannot be deleted, only archived. Archived lists drop out of
    /// their board's lists but keep their cards.
    pub fn set_list_closed(&mut self, id: &str, closed: bool) -> ApiResult<BoardList> {
        let list = self
            .lists
            .get_mut(id)
            .ok_or(ApiError::NotFound(RESOURCE_NOT_FOUND))?;
        list.closed = closed;
        Ok(list.clone())
    }

    pub fn list_cards(&self, id: &str) -> ApiResult<Vec<Card>> {
        self.get_list(id)?;
        Ok(self.sorted_cards(|c| c.id_list == id))
    }

    // Cards

    fn sorted_cards(&self, filter: impl Fn(&Card) -> bool) -> Vec<Card> {
        let mut cards: Vec<Card> = self
            .cards
            .values()
            .filter(|c| !c.closed && filter(c))
            .cloned()
            .collect();
        cards.sort_by(|a, b| a.pos.total_cmp(&b.pos));
        cards
    }

    fn next_card_pos(&self, list_id: &str) -> f64 {
        self.cards
            .values()
            .filter(|c| c.id_list == list_id)
            .map(|c| c.pos)
            .fold(0.0, f64::max)
            + POS_STEP
    }

    pub fn create_card(&mut self, input: CardCreate) -> ApiResult<Card> {
        let list = input
            .id_list
            .as_deref()
            .and_then(|id| self.lists.get(id))
            .cloned()
            .ok_or_else(|| ApiError::invalid_value("idList"))?;

        let card = Card {
            id: self.next_id(),
            name: input.name.unwrap_or_default(),
            desc: input.desc.unwrap_or_default(),
            closed: false,
            id_board: list.id_board.clone(),
            pos: self.next_card_pos(&list.id),
            id_list: list.id,
        };
        self.cards.insert(card.id.clone(), card.clone());
        Ok(card)
    }

    pub fn get_card(&self, id: &str) -> ApiResult<Card> {
        self.cards
            .get(id)
            .cloned()
            .ok_or(ApiError::NotFound(RESOURCE_NOT_FOUND))
    }

    /// Applies `update`; a new `idList` moves the card to the end of that list.
    pub fn update_card(&mut self, id: &str, update: CardUpdate) -> ApiResult<Card> {
        self.get_card(id)?;

        let target = match update.id_list.as_deref() {
            Some(list_id) => Some(
                self.lists
                    .get(list_id)
                    .cloned()
                    .ok_or_else(|| ApiError::invalid_value("idList"))?,
            ),
            None => None,
        };
        let pos = target.as_ref().map(|list| self.next_card_pos(&list.id));

        let card = self
            .cards
            .get_mut(id)
            .ok_or(ApiError::NotFound(RESOURCE_NOT_FOUND))?;

        if let Some(name) = update.name {
            card.name = name;
        }
        if let Some(desc) = update.desc {
            card.desc = desc;
        }
        if let Some(closed) = update.closed {
            card.closed = closed;
        }
        if let (Some(list), Some(pos)) = (target, pos)
            && list.id != card.id_list
        {
            card.id_board = list.id_board;
            card.id_list = list.id;
            card.pos = pos;
        }

        Ok(card.clone())
    }

    pub fn delete_card(&mut self, id: &str) -> ApiResult<()> {
        self.cards
            .remove(id)
            .map(|_| ())
            .ok_or(ApiError::NotFound(RESOURCE_NOT_FOUND))
    }

    // Organizations

    pub fn create_organization(&mut self, input: OrganizationInput) -> ApiResult<Organization> {
        let display_name = required(input.display_name, "displayName")?;

        let name = match input.name {
            Some(name) => {
                self.validate_org_name(&name, None)?;
                name
            }
            None => self.generated_org_name(&display_name),
        };

        let website = validate_website(input.website)?;

        let org = Organization {
            id: self.next_id(),
            name,
            display_name,
            desc: input.desc.unwrap_or_default(),
            website,
        };
        self.organizations.insert(org.id.clone(), org.clone());
        Ok(org)
    }

    /// Looks an organization up by id or by name.
    pub fn get_organization(&self, id_or_name: &str) -> ApiResult<Organization> {
        self.find_organization_id(id_or_name)
            .and_then(|id| self.organizations.get(&id))
            .cloned()
            .ok_or(ApiError::NotFound(MODEL_NOT_FOUND))
    }

    pub fn update_organization(
        &mut self,
        id_or_name: &str,
        input: OrganizationInput,
    ) -> ApiResult<Organization> {
        let id = self
            .find_organization_id(id_or_name)
            .ok_or(ApiError::NotFound(MODEL_NOT_FOUND))?;

        let display_name = input
            .display_name
            .map(|d| required(Some(d), "displayName"))
            .transpose()?;
        if let Some(name) = &input.name {
            self.validate_org_name(name, Some(id.as_str()))?;
        }
        let website = input
            .website
            .map(|w| validate_website(Some(w)))
            .transpose()?;

        let org = self
            .organizations
            .get_mut(&id)
            .ok_or(ApiError::NotFound(MODEL_NOT_FOUND))?;

        if let Some(display_name) = display_name {
            org.display_name = display_name;
        }
        if let Some(name) = input.name {
            org.name = name;
        }
        if let Some(desc) = input.desc {
            org.desc = desc;
        }
        if let Some(website) = website {
            org.website = website;
        }

        Ok(org.clone())
    }

    pub fn delete_organization(&mut self, id_or_name: &str) -> ApiResult<()> {
        let id = self
            .find_organization_id(id_or_name)
            .ok_or(ApiError::NotFound(MODEL_NOT_FOUND))?;
        self.organizations.remove(&id);
        Ok(())
    }

    fn find_organization_id(&self, id_or_name: &str) -> Option<String> {
        if self.organizations.contains_key(id_or_name) {
            return Some(id_or_name.to_string());
        }
        self.organizations
            .values()
            .find(|o| o.name == id_or_name)
            .map(|o| o.id.clone())
    }

    /// Names are at least three of `[a-z0-9_]` and unique among organizations.
    fn validate_org_name(&self, name: &str, except_id: Option<&str>) -> ApiResult<()> {
        let well_formed = name.len() >= MIN_ORG_NAME_LEN
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !well_formed {
            return Err(ApiError::BadRequest(
                "Name must be at least 3 characters long and contain only lowercase letters, numbers and underscores"
                    .to_string(),
            ));
        }

        let taken = self
            .organizations
            .values()
            .any(|o| o.name == name && Some(o.id.as_str()) != except_id);
        if taken {
            return Err(ApiError::BadRequest("Name is already taken".to_string()));
        }

        Ok(())
    }

    fn generated_org_name(&self, display_name: &str) -> String {
        let mut base: String = display_name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if base.len() < MIN_ORG_NAME_LEN {
            base.push_str("workspace");
        }

        let mut candidate = base.clone();
        let mut n = 1;
        while self.organizations.values().any(|o| o.name == candidate) {
            candidate = format!("{}{}", base, n);
            n += 1;
        }
        candidate
    }
}

fn required(value: Option<String>, param: &str) -> ApiResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::invalid_value(param)),
    }
}

/// Empty means "no website"; anything else needs an http(s) scheme.
fn validate_website(website: Option<String>) -> ApiResult<Option<String>> {
    match website {
        None => Ok(None),
        Some(w) if w.is_empty() => Ok(None),
        Some(w) if w.starts_with("http://") || w.starts_with("https://") => Ok(Some(w)),
        Some(_) => Err(ApiError::invalid_value("website")),
    }
}
