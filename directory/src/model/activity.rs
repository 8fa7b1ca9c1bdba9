use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::consts::consts::{ActivityName, Email};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    /// Ordered by signup time, earliest first
    pub participants: Vec<Email>,
}

impl Activity {
    pub fn new(
        description: &str,
        schedule: &str,
        max_participants: u32,
        participants: &[&str],
    ) -> Self {
        Activity {
            description: description.to_string(),
            schedule: schedule.to_string(),
            max_participants,
            participants: participants.iter().map(|p| Email::from(*p)).collect(),
        }
    }

    pub fn has_participant(&self, email: &Email) -> bool {
        self.participants.contains(email)
    }

    pub fn new_test() -> Self {
        Activity::new(
            "Test Activity",
            "Mondays, 1:00 PM - 2:00 PM",
            10,
            &["first@mergington.edu", "second@mergington.edu"],
        )
    }
}

/// Snapshot of the whole directory, keyed by activity name.
///
/// Serializes as a JSON object. Keys keep the order the activities were seeded in, which a
/// `HashMap` would lose, so the entries are held as a vector and streamed through `collect_map`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ActivityListing {
    entries: Vec<(ActivityName, Activity)>,
}

impl ActivityListing {
    pub fn new(entries: Vec<(ActivityName, Activity)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.entries
            .iter()
            .find(|(activity_name, _)| activity_name.as_str() == name)
            .map(|(_, activity)| activity)
    }

    pub fn names(&self) -> Vec<&ActivityName> {
        self.entries.iter().map(|(name, _)| name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for ActivityListing {
    type Item = (ActivityName, Activity);
    type IntoIter = std::vec::IntoIter<(ActivityName, Activity)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for ActivityListing {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.entries.iter().map(|(name, activity)| (name, activity)))
    }
}

struct ActivityListingVisitor;

impl<'de> Visitor<'de> for ActivityListingVisitor {
    type Value = ActivityListing;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of activity name to activity")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries: Vec<(ActivityName, Activity)> =
            Vec::with_capacity(access.size_hint().unwrap_or(0));

        while let Some((name, activity)) = access.next_entry::<ActivityName, Activity>()? {
            if entries.iter().any(|(existing, _)| existing == &name) {
                return Err(serde::de::Error::custom(format!(
                    "duplicate activity: {}",
                    name
                )));
            }

            entries.push((name, activity));
        }

        Ok(ActivityListing { entries })
    }
}

impl<'de> Deserialize<'de> for ActivityListing {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ActivityListingVisitor)
    }
}
