//! BattleLog - Structured record of everything said during a battle

use crate::types::{DamageType, EntityId};
use serde::{Deserialize, Serialize};
use strum::Display;

/// What produced a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    Attack,
    Item,
    Skill,
    Defend,
    /// A continuous effect firing
    Effect,
    Ai,
    Idle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleEntry {
    pub id: u64,
    pub text: String,
    pub source: Option<EntityId>,
    pub target: Option<EntityId>,
    pub action: ActionKind,
    pub damage_type: Option<DamageType>,
    /// Amount the action offered
    pub sent: f64,
    /// Amount the target actually lost
    pub received: f64,
    /// Whether the target went down
    pub fatal: bool,
}

impl BattleEntry {
    pub fn new(text: impl Into<String>, action: ActionKind) -> Self {
        BattleEntry {
            id: 0,
            text: text.into(),
            source: None,
            target: None,
            action,
            damage_type: None,
            sent: 0.0,
            received: 0.0,
            fatal: false,
        }
    }

    pub fn between(mut self, source: EntityId, target: Option<EntityId>) -> Self {
        self.source = Some(source);
        self.target = target;
        self
    }

    pub fn damage(mut self, damage_type: Option<DamageType>, sent: f64, received: f64) -> Self {
        self.damage_type = damage_type;
        self.sent = sent;
        self.received = received;
        self
    }

    pub fn fatal(mut self, fatal: bool) -> Self {
        self.fatal = fatal;
        self
    }
}

/// Ordered battle entries with per-log ids
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleLog {
    entries: Vec<BattleEntry>,
    next_id: u64,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, assigning its id
    pub fn add_entry(&mut self, mut entry: BattleEntry) -> u64 {
        entry.id = self.next_id;
        self.next_id += 1;
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    pub fn entry(&self, id: u64) -> Option<&BattleEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entries(&self) -> &[BattleEntry] {
        &self.entries
    }

    pub fn entries_by_source(&self, source: EntityId) -> Vec<&BattleEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.source == Some(source))
            .collect()
    }

    /// Source of the entry with the largest received damage
    pub fn highest_damage_dealer(&self) -> Option<EntityId> {
        self.entries
            .iter()
            .filter(|entry| entry.source.is_some() && entry.received > 0.0)
            .fold(None::<&BattleEntry>, |best, entry| match best {
                Some(best) if best.received >= entry.received => Some(best),
                _ => Some(entry),
            })
            .and_then(|entry| entry.source)
    }

    /// Entry texts in order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(source: u64, received: f64) -> BattleEntry {
        BattleEntry::new("hit", ActionKind::Attack)
            .between(EntityId(source), Some(EntityId(9)))
            .damage(Some(DamageType::Slashing), received, received)
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut log = BattleLog::new();
        assert_eq!(log.add_entry(hit(0, 1.0)), 0);
        assert_eq!(log.add_entry(hit(1, 2.0)), 1);
        assert_eq!(log.entry(1).unwrap().source, Some(EntityId(1)));
        assert!(log.entry(5).is_none());
    }

    #[test]
    fn test_entries_by_source() {
        let mut log = BattleLog::new();
        log.add_entry(hit(0, 1.0));
        log.add_entry(hit(1, 2.0));
        log.add_entry(hit(0, 3.0));
        assert_eq!(log.entries_by_source(EntityId(0)).len(), 2);
    }

    #[test]
    fn test_highest_damage_dealer() {
        let mut log = BattleLog::new();
        assert_eq!(log.highest_damage_dealer(), None);

        log.add_entry(hit(0, 4.0));
        log.add_entry(hit(1, 12.0));
        log.add_entry(hit(2, 12.0));
        log.add_entry(BattleEntry::new("Slime sits idly by.", ActionKind::Idle));
        // First of equal hits wins
        assert_eq!(log.highest_damage_dealer(), Some(EntityId(1)));
    }

    #[test]
    fn test_json_export() {
        let mut log = BattleLog::new();
        log.add_entry(hit(0, 4.0).fatal(true));
        let json = log.to_json().unwrap();
        let parsed: Vec<BattleEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0].action, ActionKind::Attack);
        assert!(parsed[0].fatal);
    }
}
