//! Insertion-ordered collection of venues keyed by name.

use std::collections::HashMap;

use crate::Venue;

/// Venues keyed by name, iterated in first-insertion order.
///
/// Inserting a venue whose name is already present replaces the stored value
/// in place (last write wins, no merge).
#[derive(Debug, Clone, Default)]
pub struct VenueMap {
    venues: Vec<Venue>,
    positions: HashMap<String, usize>,
}

impl VenueMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `venue`, returning the venue it replaced, if any.
    pub fn insert(&mut self, venue: Venue) -> Option<Venue> {
        if let Some(&idx) = self.positions.get(venue.name()) {
            return Some(std::mem::replace(&mut self.venues[idx], venue));
        }
        self.positions.insert(venue.name().to_owned(), self.venues.len());
        self.venues.push(venue);
        None
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Venue> {
        self.positions.get(name).map(|&idx| &self.venues[idx])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.venues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Venue> {
        self.venues.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.venues.iter().map(Venue::name)
    }
}

impl<'a> IntoIterator for &'a VenueMap {
    type Item = &'a Venue;
    type IntoIter = std::slice::Iter<'a, Venue>;

    fn into_iter(self) -> Self::IntoIter {
        self.venues.iter()
    }
}

impl IntoIterator for VenueMap {
    type Item = Venue;
    type IntoIter = std::vec::IntoIter<Venue>;

    fn into_iter(self) -> Self::IntoIter {
        self.venues.into_iter()
    }
}

impl FromIterator<Venue> for VenueMap {
    fn from_iter<I: IntoIterator<Item = Venue>>(iter: I) -> Self {
        let mut map = Self::new();
        for venue in iter {
            map.insert(venue);
        }
        map
    }
}
