//! Weekly bin collection scheduling: weekday selection, schedule rendering,
//! and derivation of discrete out/in calendar events.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{Client, ServiceId, ServiceRecord};

/// Weekday names indexed 0-6, starting on Sunday.
pub const WEEKDAYS: [&str; 7] = [
    "Domingo", "Segunda", "Terça", "Quarta", "Quinta", "Sexta", "Sábado",
];

/// Bin categories offered by the configuration UI. The data model itself
/// accepts any label, so the catalog can grow without a schema change.
pub const BIN_TYPES: [&str; 6] = [
    "Verde",
    "Amarela",
    "Azul",
    "Vidro",
    "Orgânico",
    "Indiferenciado",
];

/// Placeholder shown when a service points at a deleted client.
pub const MISSING_CLIENT: &str = "Cliente removido";

fn default_time_out() -> NaiveTime {
    NaiveTime::from_hms_opt(20, 0, 0).expect("20:00 is a valid time")
}

fn default_time_in() -> NaiveTime {
    NaiveTime::from_hms_opt(6, 0, 0).expect("06:00 is a valid time")
}

/// Serde adapter for "HH:MM" time-of-day strings used on the wire.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub(super) fn serialize<S: Serializer>(
        time: &NaiveTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let trimmed = raw.trim();
        NaiveTime::parse_from_str(trimmed, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
/// Errors raised while editing a weekday selection.
pub enum ScheduleError {
    /// Weekday index outside 0-6.
    #[error("Weekday index {0} is out of range (0-6)")]
    InvalidDay(i64),
    /// Category toggled on a day that is not selected.
    #[error("Weekday {0} is not selected")]
    DayNotSelected(u8),
    /// Day or category toggled while collection management is disabled.
    #[error("Collection management is disabled")]
    Disabled,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Subset of the seven weekdays, each carrying its chosen bin categories.
///
/// The key set of the category map is the selected-day set; a day mapped to an
/// empty list is selected but has no categories chosen yet. A disabled set is
/// always empty.
pub struct WeekdaySet {
    enabled: bool,
    types_by_day: BTreeMap<u8, Vec<String>>,
}

impl WeekdaySet {
    /// Create an empty, disabled set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether collection management is active.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Activate collection management, keeping any existing day state.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Hard reset: deactivate and drop every day and category.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.types_by_day.clear();
    }

    /// Select or deselect a weekday.
    ///
    /// Deselecting drops the day's categories for good; re-selecting starts
    /// from an empty category list.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Disabled`] while the set is disabled and
    /// [`ScheduleError::InvalidDay`] for an index outside 0-6.
    pub fn toggle_day(&mut self, day: u8) -> Result<(), ScheduleError> {
        if !self.enabled {
            return Err(ScheduleError::Disabled);
        }
        if day > 6 {
            return Err(ScheduleError::InvalidDay(i64::from(day)));
        }
        if self.types_by_day.remove(&day).is_none() {
            self.types_by_day.insert(day, Vec::new());
        }
        Ok(())
    }

    /// Flip membership of a bin category for a selected day.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Disabled`] while the set is disabled,
    /// [`ScheduleError::InvalidDay`] for an index outside 0-6, and
    /// [`ScheduleError::DayNotSelected`] when the day is not selected.
    pub fn toggle_category(&mut self, day: u8, label: &str) -> Result<(), ScheduleError> {
        if !self.enabled {
            return Err(ScheduleError::Disabled);
        }
        if day > 6 {
            return Err(ScheduleError::InvalidDay(i64::from(day)));
        }
        let Some(types) = self.types_by_day.get_mut(&day) else {
            return Err(ScheduleError::DayNotSelected(day));
        };
        if let Some(position) = types.iter().position(|existing| existing == label) {
            types.remove(position);
        } else {
            types.push(label.to_owned());
        }
        Ok(())
    }

    /// Selected weekdays in ascending index order.
    pub fn days(&self) -> impl Iterator<Item = u8> + '_ {
        self.types_by_day.keys().copied()
    }

    /// Number of selected weekdays.
    #[must_use]
    pub fn day_count(&self) -> usize {
        self.types_by_day.len()
    }

    /// Whether the given weekday is selected.
    #[must_use]
    pub fn is_selected(&self, day: u8) -> bool {
        self.types_by_day.contains_key(&day)
    }

    /// Categories chosen for a day; empty when the day is not selected.
    #[must_use]
    pub fn categories(&self, day: u8) -> &[String] {
        self.types_by_day
            .get(&day)
            .map_or(&[], |types| types.as_slice())
    }

    /// Selected days with their categories, in ascending weekday order.
    pub fn entries(&self) -> impl Iterator<Item = (u8, &[String])> + '_ {
        self.types_by_day
            .iter()
            .map(|(day, types)| (*day, types.as_slice()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Persisted bin collection configuration of a service row.
///
/// The stored shape is lenient: weekday lists may mix numbers and numeric
/// strings, category-map keys may be numbers or strings, and every field may
/// be missing or explicitly `null`. All of it is normalized on
/// deserialization; indices outside 0-6 are dropped when the normalized
/// [`WeekdaySet`] view is built.
pub struct BinsConfig {
    /// Whether bin collection management is active for the service.
    #[serde(default, deserialize_with = "null_to_default")]
    pub bins_enabled: bool,
    /// Stored count of selected days, kept consistent with the weekday list.
    #[serde(default, deserialize_with = "null_to_default")]
    pub bins_days: u8,
    /// Selected weekday indices as persisted (possibly unordered or invalid).
    #[serde(default, deserialize_with = "lenient_weekdays")]
    pub bins_weekdays: Vec<i64>,
    /// Legacy flat list carrying the first category of each selected day.
    #[serde(default, deserialize_with = "null_to_default")]
    pub bins_types: Vec<String>,
    /// Categories per weekday index.
    #[serde(default, deserialize_with = "lenient_types_map")]
    pub bins_types_map: BTreeMap<u8, Vec<String>>,
    /// Derived human-readable summary; recomputed, never authoritative.
    #[serde(default, deserialize_with = "null_to_default")]
    pub bins_schedule: String,
    /// Time bins go out to the street.
    #[serde(
        default = "default_time_out",
        serialize_with = "hhmm::serialize",
        deserialize_with = "lenient_time_out"
    )]
    pub bins_time_out: NaiveTime,
    /// Time bins come back in, on the day after [`BinsConfig::bins_time_out`].
    #[serde(
        default = "default_time_in",
        serialize_with = "hhmm::serialize",
        deserialize_with = "lenient_time_in"
    )]
    pub bins_time_in: NaiveTime,
}

impl Default for BinsConfig {
    fn default() -> Self {
        Self {
            bins_enabled: false,
            bins_days: 0,
            bins_weekdays: Vec::new(),
            bins_types: Vec::new(),
            bins_types_map: BTreeMap::new(),
            bins_schedule: String::new(),
            bins_time_out: default_time_out(),
            bins_time_in: default_time_in(),
        }
    }
}

impl BinsConfig {
    /// Normalized weekday view of the persisted fields.
    ///
    /// Out-of-range weekday indices are dropped silently so malformed stored
    /// rows cannot abort schedule rendering. A disabled configuration yields
    /// an empty, disabled set regardless of leftover day data.
    #[must_use]
    pub fn weekday_set(&self) -> WeekdaySet {
        if !self.bins_enabled {
            return WeekdaySet::default();
        }
        let types_by_day = self
            .bins_weekdays
            .iter()
            .filter_map(|raw| u8::try_from(*raw).ok().filter(|day| *day <= 6))
            .map(|day| {
                let types = self.bins_types_map.get(&day).cloned().unwrap_or_default();
                (day, types)
            })
            .collect();
        WeekdaySet {
            enabled: true,
            types_by_day,
        }
    }

    /// Rebuild the full persisted block from an edited weekday set.
    ///
    /// Replaces every derived field atomically, including the rendered
    /// schedule string and the legacy flat type list.
    #[must_use]
    pub fn from_set(set: &WeekdaySet, time_out: NaiveTime, time_in: NaiveTime) -> Self {
        let bins_types = set
            .entries()
            .map(|(_, types)| types.first().cloned().unwrap_or_default())
            .collect();
        Self {
            bins_enabled: set.is_enabled(),
            bins_days: u8::try_from(set.day_count()).unwrap_or(7),
            bins_weekdays: set.days().map(i64::from).collect(),
            bins_types,
            bins_types_map: set
                .entries()
                .map(|(day, types)| (day, types.to_vec()))
                .collect(),
            bins_schedule: render_schedule(set, time_out, time_in),
            bins_time_out: time_out,
            bins_time_in: time_in,
        }
    }

    /// Recompute the schedule summary from the current fields.
    #[must_use]
    pub fn rendered(&self) -> String {
        render_schedule(&self.weekday_set(), self.bins_time_out, self.bins_time_in)
    }
}

fn lenient_weekdays<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDay {
        Number(i64),
        Float(f64),
        Text(String),
    }

    let raw = Option::<Vec<RawDay>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| match value {
            RawDay::Number(day) => Some(day),
            #[expect(
                clippy::cast_possible_truncation,
                reason = "value is checked to be integral before the cast"
            )]
            RawDay::Float(day) => {
                let rounded = day.round();
                ((rounded - day).abs() < f64::EPSILON).then_some(rounded as i64)
            }
            RawDay::Text(text) => text.trim().parse().ok(),
        })
        .collect())
}

fn lenient_types_map<'de, D>(deserializer: D) -> Result<BTreeMap<u8, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Vec<String>>>::deserialize(deserializer)?
        .unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|(key, types)| {
            key.trim()
                .parse::<u8>()
                .ok()
                .filter(|day| *day <= 6)
                .map(|day| (day, types))
        })
        .collect())
}

fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_time<'de, D>(deserializer: D, fallback: NaiveTime) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(fallback);
    };
    let trimmed = raw.trim();
    Ok(NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .unwrap_or(fallback))
}

fn lenient_time_out<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_time(deserializer, default_time_out())
}

fn lenient_time_in<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_time(deserializer, default_time_in())
}

fn day_name(day: u8) -> &'static str {
    WEEKDAYS.get(usize::from(day % 7)).copied().unwrap_or("")
}

/// Render the human-readable multi-day schedule summary.
///
/// Days come out in ascending weekday order regardless of how they were
/// selected. Each segment shows the out time, the day's categories (or
/// "sem tipos"), and the return on the following day; Saturday wraps to
/// Sunday. An empty selection renders as the empty string.
#[must_use]
pub fn render_schedule(set: &WeekdaySet, time_out: NaiveTime, time_in: NaiveTime) -> String {
    let out = time_out.format("%H:%M").to_string();
    let back = time_in.format("%H:%M").to_string();

    let segments: Vec<String> = set
        .entries()
        .map(|(day, types)| {
            let name = day_name(day);
            let next = day_name((day + 1) % 7);
            if types.is_empty() {
                format!("{name} {out} (sem tipos) → {next} {back}")
            } else {
                format!("{name} {out} ({}) → {next} {back}", types.join(" + "))
            }
        })
        .collect();

    segments.join(" | ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Direction of a bin calendar event.
pub enum BinDirection {
    /// Bins go out to the street.
    Out,
    /// Bins come back in the following day.
    In,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Discrete calendar event derived from a service's bin configuration.
pub struct BinEvent {
    /// Deterministic identity derived from service, direction, and day.
    pub id: String,
    /// Owning service.
    pub service_id: ServiceId,
    /// Resolved client name, or the removed-client placeholder.
    pub client_name: String,
    /// Resolved client category, or "-".
    pub client_type: String,
    /// Out or in.
    #[serde(rename = "type")]
    pub direction: BinDirection,
    /// Weekday index the event happens on.
    pub day: u8,
    /// Time of day of the event.
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    /// Categories collected on this run.
    pub bin_types: Vec<String>,
    /// Display title, e.g. "Saida: Verde, Azul".
    pub title: String,
}

/// Derive the weekly bin calendar for a service roster.
///
/// Every service with collection enabled and at least one selected day
/// contributes an out event on the selected day and an in event on the next
/// day (Saturday wraps to Sunday). Selected days without categories are
/// reserved but inactive and contribute nothing. The client is resolved from
/// the embedded reference first, then by id against the supplied roster, and
/// finally falls back to the removed-client placeholder.
///
/// Generation is pure: identical inputs yield an identical event set.
#[must_use]
pub fn generate_bin_events(services: &[ServiceRecord], clients: &[Client]) -> Vec<BinEvent> {
    let mut events = Vec::new();

    for service in services {
        let set = service.bins.weekday_set();
        if !set.is_enabled() || set.day_count() == 0 {
            continue;
        }

        let (client_name, client_type) = resolve_client(service, clients);

        for (day, types) in set.entries() {
            if types.is_empty() {
                continue;
            }

            events.push(BinEvent {
                id: format!("{}-out-{day}", service.id),
                service_id: service.id.clone(),
                client_name: client_name.clone(),
                client_type: client_type.clone(),
                direction: BinDirection::Out,
                day,
                time: service.bins.bins_time_out,
                bin_types: types.to_vec(),
                title: format!("Saida: {}", types.join(", ")),
            });

            events.push(BinEvent {
                id: format!("{}-in-{day}", service.id),
                service_id: service.id.clone(),
                client_name: client_name.clone(),
                client_type: client_type.clone(),
                direction: BinDirection::In,
                day: (day + 1) % 7,
                time: service.bins.bins_time_in,
                bin_types: types.to_vec(),
                title: format!("Entrada: {}", types.join(", ")),
            });
        }
    }

    events
}

fn resolve_client(service: &ServiceRecord, clients: &[Client]) -> (String, String) {
    if let Some(reference) = &service.client {
        return (reference.name.clone(), reference.client_type.clone());
    }
    clients
        .iter()
        .find(|client| client.id == service.client_id)
        .map_or_else(
            || (MISSING_CLIENT.to_owned(), "-".to_owned()),
            |client| (client.name.clone(), client.client_type.clone()),
        )
}
