//! History ledger: append-only record of the state changes applied to one
//! object, and the merge used to build complete histories of subtrees.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::command::{Command, CommandType};
use crate::id::{CommandId, ContainerId, ObjectId, ObjectKind};
use crate::location::Location;
use crate::time::Timestamp;

/// Ledger-local index of an entry. Carries no meaning across ledgers.
pub type EntryIndex = u64;

/// Which attribute of an object a history entry changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangedField {
    Location,
    OccupationStatus,
    ContainerInventory,
}

impl std::fmt::Display for ChangedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Location => f.write_str("location"),
            Self::OccupationStatus => f.write_str("occupation_status"),
            Self::ContainerInventory => f.write_str("container_inventory"),
        }
    }
}

/// Value of a changed attribute before or after a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Location(Location),
    Occupied(bool),
    ContainerInventory(BTreeSet<ContainerId>),
}

/// Object whose ledger an entry came from, set once entries are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    pub id: ObjectId,
    pub kind: ObjectKind,
}

/// A single recorded state change.
///
/// The command fields are copied when the entry is appended, so later
/// changes to the command cannot leak into the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub command_id: CommandId,
    pub command_type: CommandType,
    pub target: ObjectId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub changed_field: ChangedField,
    pub old_value: FieldValue,
    pub new_value: FieldValue,
    pub source: Option<Source>,
}

impl HistoryEntry {
    fn sort_key(&self) -> (Timestamp, &'static str) {
        (
            self.end_time,
            self.source.map_or("", |source| source.kind.type_name()),
        )
    }
}

/// Append-only ledger of [`HistoryEntry`] records.
///
/// Entries keep the index they were appended under. Iteration follows the
/// ledger's materialization order, which [`sorted`](Self::sorted) rearranges
/// without touching indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<(EntryIndex, HistoryEntry)>,
    next_index: EntryIndex,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change caused by `command` and return the new entry's index.
    pub fn append(
        &mut self,
        command: &Command,
        changed_field: ChangedField,
        old_value: FieldValue,
        new_value: FieldValue,
    ) -> EntryIndex {
        let entry = HistoryEntry {
            command_id: command.id(),
            command_type: command.command_type(),
            target: command.target(),
            start_time: command.start_time(),
            end_time: command.end_time(),
            changed_field,
            old_value,
            new_value,
            source: None,
        };
        self.push(entry)
    }

    fn push(&mut self, entry: HistoryEntry) -> EntryIndex {
        let index = self.next_index;
        self.entries.push((index, entry));
        self.next_index += 1;
        index
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by its ledger-local index.
    #[must_use]
    pub fn get(&self, index: EntryIndex) -> Option<&HistoryEntry> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == index)
            .map(|(_, entry)| entry)
    }

    /// Iterate over `(index, entry)` pairs in materialization order.
    pub fn iter(&self) -> impl Iterator<Item = (EntryIndex, &HistoryEntry)> {
        self.entries.iter().map(|(index, entry)| (*index, entry))
    }

    /// Iterate over entries in materialization order.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().map(|(_, entry)| entry)
    }

    /// Ledger holding only the entries that ended strictly before `time`.
    #[must_use]
    pub fn entries_as_of(&self, time: Timestamp) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(_, entry)| entry.end_time < time)
                .cloned()
                .collect(),
            next_index: self.next_index,
        }
    }

    /// Ledger with entries ordered by `end_time`, then by the type name of
    /// their source. The sort is stable, so entries that compare equal keep
    /// their relative order.
    #[must_use]
    pub fn sorted(&self) -> Self {
        let mut entries = self.entries.clone();
        entries.sort_by(|(_, a), (_, b)| a.sort_key().cmp(&b.sort_key()));
        Self {
            entries,
            next_index: self.next_index,
        }
    }

    /// Copy of this ledger with `source` set on every entry that has none.
    #[must_use]
    pub fn tagged(&self, source: Source) -> Self {
        let mut tagged = self.clone();
        for (_, entry) in &mut tagged.entries {
            entry.source.get_or_insert(source);
        }
        tagged
    }

    /// Build the complete history of a composite object.
    ///
    /// Own entries are tagged with `source`; child ledgers are expected to be
    /// complete histories already tagged with their own sources. Entries get
    /// fresh sequential indices and the result is [`sorted`](Self::sorted).
    #[must_use]
    pub fn merge_aggregate<I>(&self, source: Source, children: I) -> Self
    where
        I: IntoIterator<Item = History>,
    {
        let mut merged = Self::new();
        for entry in self.tagged(source).entries.into_iter().map(|(_, e)| e) {
            merged.push(entry);
        }
        for child in children {
            for (_, entry) in child.entries {
                merged.push(entry);
            }
        }
        merged.sorted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::TransportCmd;
    use crate::id::{FacilityId, HoldingAreaId, RoomId};
    use crate::time::parse_timestamp;

    fn ts(text: &str) -> Timestamp {
        parse_timestamp(text).unwrap()
    }

    fn command(id: u64, end: &str) -> Command {
        TransportCmd::builder()
            .target(ContainerId::from_raw(10))
            .destination(Location::in_holding_area(
                FacilityId::from_raw(0),
                RoomId::from_raw(1),
                HoldingAreaId::from_raw(2),
            ))
            .span(ts("2024:01:01.00:00"), ts(end))
            .build(CommandId::from_raw(id))
            .unwrap()
            .into()
    }

    fn occupied(ledger: &mut History, cmd: &Command) -> EntryIndex {
        ledger.append(
            cmd,
            ChangedField::OccupationStatus,
            FieldValue::Occupied(false),
            FieldValue::Occupied(true),
        )
    }

    fn source(raw: u64, kind: ObjectKind) -> Source {
        Source {
            id: ObjectId::from_raw(raw),
            kind,
        }
    }

    fn end_times(ledger: &History) -> Vec<Timestamp> {
        ledger.entries().map(|entry| entry.end_time).collect()
    }

    #[test]
    fn should_assign_increasing_indices_on_append() {
        let mut ledger = History::new();
        let first = occupied(&mut ledger, &command(1, "2024:01:01.01:00"));
        let second = occupied(&mut ledger, &command(2, "2024:01:01.02:00"));
        assert_eq!((first, second), (0, 1));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn should_copy_command_fields_into_entry() {
        let mut ledger = History::new();
        let cmd = command(7, "2024:01:01.01:00");
        let index = occupied(&mut ledger, &cmd);

        let entry = ledger.get(index).unwrap();
        assert_eq!(entry.command_id, CommandId::from_raw(7));
        assert_eq!(entry.command_type, CommandType::Transport);
        assert_eq!(entry.target, ObjectId::from_raw(10));
        assert_eq!(entry.end_time, ts("2024:01:01.01:00"));
        assert!(entry.source.is_none());
    }

    #[test]
    fn should_order_entries_by_end_time_when_sorted() {
        let mut ledger = History::new();
        occupied(&mut ledger, &command(1, "2024:01:01.02:00"));
        occupied(&mut ledger, &command(2, "2024:01:01.01:00"));
        occupied(&mut ledger, &command(3, "2024:01:01.03:00"));

        let sorted = ledger.sorted();

        assert_eq!(
            end_times(&sorted),
            vec![
                ts("2024:01:01.01:00"),
                ts("2024:01:01.02:00"),
                ts("2024:01:01.03:00")
            ]
        );
        let indices: Vec<_> = sorted.iter().map(|(index, _)| index).collect();
        assert_eq!(indices, vec![1, 0, 2]);
    }

    #[test]
    fn should_break_end_time_ties_by_source_type_name() {
        let cmd = command(1, "2024:01:01.01:00");
        let mut room = History::new();
        occupied(&mut room, &cmd);
        let mut container = History::new();
        occupied(&mut container, &cmd);

        let mut combined = History::new();
        for child in [
            room.tagged(source(5, ObjectKind::Room)),
            container.tagged(source(9, ObjectKind::Container)),
        ] {
            for (_, entry) in child.entries {
                combined.push(entry);
            }
        }

        let kinds: Vec<_> = combined
            .sorted()
            .entries()
            .map(|entry| entry.source.unwrap().kind)
            .collect();
        assert_eq!(kinds, vec![ObjectKind::Container, ObjectKind::Room]);
    }

    #[test]
    fn should_keep_only_entries_ending_strictly_before_time() {
        let mut ledger = History::new();
        occupied(&mut ledger, &command(1, "2024:01:01.01:00"));
        occupied(&mut ledger, &command(2, "2024:01:01.02:00"));

        let filtered = ledger.entries_as_of(ts("2024:01:01.02:00"));

        assert_eq!(end_times(&filtered), vec![ts("2024:01:01.01:00")]);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn should_be_idempotent_when_filtering_twice() {
        let mut ledger = History::new();
        occupied(&mut ledger, &command(1, "2024:01:01.01:00"));
        occupied(&mut ledger, &command(2, "2024:01:01.03:00"));
        let cutoff = ts("2024:01:01.02:00");

        let once = ledger.entries_as_of(cutoff);
        let twice = once.entries_as_of(cutoff);

        assert_eq!(once, twice);
    }

    #[test]
    fn should_tag_own_entries_and_keep_child_sources_when_merging() {
        let mut own = History::new();
        occupied(&mut own, &command(1, "2024:01:01.02:00"));
        let mut child = History::new();
        occupied(&mut child, &command(2, "2024:01:01.01:00"));
        let child = child.tagged(source(9, ObjectKind::Container));

        let merged = own.merge_aggregate(source(3, ObjectKind::HoldingArea), [child]);

        let pairs: Vec<_> = merged
            .iter()
            .map(|(index, entry)| (index, entry.source.unwrap().id.as_raw()))
            .collect();
        assert_eq!(pairs, vec![(1, 9), (0, 3)]);
    }

    #[test]
    fn should_not_overwrite_existing_source_when_tagging() {
        let mut ledger = History::new();
        occupied(&mut ledger, &command(1, "2024:01:01.01:00"));
        let tagged = ledger
            .tagged(source(1, ObjectKind::Room))
            .tagged(source(2, ObjectKind::Facility));
        let entry = tagged.entries().next().unwrap();
        assert_eq!(entry.source.unwrap().kind, ObjectKind::Room);
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let mut ledger = History::new();
        occupied(&mut ledger, &command(1, "2024:01:01.01:00"));
        let json = serde_json::to_string(&ledger).unwrap();
        let parsed: History = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ledger);
    }
}
