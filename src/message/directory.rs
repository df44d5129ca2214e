use super::ResolveError;
use crate::entity::CharacterRef;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub character_name: String,
    pub full_name: String,
}

impl Player {
    pub fn to_character(&self) -> CharacterRef {
        CharacterRef::new(&self.character_name, self.id, &self.full_name)
    }
}

/// Source of roster and variable data, queried once per message.
pub trait Directory {
    fn roster(&self, chat_id: i64) -> Vec<Player>;

    /// Variables of one player as `(name, value)` pairs.
    fn variables(&self, player_id: i64) -> Vec<(String, String)>;
}

/// A [`Directory`] backed by maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    rosters: HashMap<i64, Vec<Player>>,
    variables: HashMap<i64, Vec<(String, String)>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_player(&mut self, chat_id: i64, player: Player) {
        self.rosters.entry(chat_id).or_default().push(player);
    }

    pub fn set_variable(&mut self, player_id: i64, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let vars = self.variables.entry(player_id).or_default();
        match vars.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(slot) => slot.1 = value.into(),
            None => vars.push((name, value.into())),
        }
    }
}

impl Directory for MemoryDirectory {
    fn roster(&self, chat_id: i64) -> Vec<Player> {
        self.rosters.get(&chat_id).cloned().unwrap_or_default()
    }

    fn variables(&self, player_id: i64) -> Vec<(String, String)> {
        self.variables.get(&player_id).cloned().unwrap_or_default()
    }
}

/// Roster and speaker variables fetched once, before resolution starts.
#[derive(Debug, Clone)]
pub struct Snapshot {
    roster: Vec<Player>,
    speaker: Player,
    variables: HashMap<String, String>,
}

impl Snapshot {
    pub fn take<D: Directory + ?Sized>(
        directory: &D,
        chat_id: i64,
        user_id: i64,
    ) -> Result<Self, ResolveError> {
        let roster = directory.roster(chat_id);
        let speaker = roster
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned()
            .ok_or(ResolveError::PlayerNotFound { chat_id, user_id })?;
        let variables = directory.variables(speaker.id);
        tracing::trace!(chat_id, players = roster.len(), variables = variables.len(), "snapshot taken");
        Ok(Self::new(roster, speaker, variables))
    }

    pub fn new(roster: Vec<Player>, speaker: Player, variables: Vec<(String, String)>) -> Self {
        let variables = variables
            .into_iter()
            .map(|(name, value)| (name.to_uppercase(), value))
            .collect();
        Self {
            roster,
            speaker,
            variables,
        }
    }

    pub fn speaker(&self) -> &Player {
        &self.speaker
    }

    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    /// Usernames compare case-insensitively.
    pub fn by_username(&self, username: &str) -> Option<&Player> {
        self.roster.iter().find(|p| {
            p.username
                .as_deref()
                .map_or(false, |u| u.eq_ignore_ascii_case(username))
        })
    }

    pub fn by_user_id(&self, user_id: i64) -> Option<&Player> {
        self.roster.iter().find(|p| p.user_id == user_id)
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(&name.to_uppercase()).map(String::as_str)
    }

    pub(crate) fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }
}
