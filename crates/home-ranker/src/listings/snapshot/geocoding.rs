use super::super::domain::Coordinates;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct CacheEntry {
    coords: [f64; 2],
}

/// Location text to coordinates, keyed case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct GeocodingCache {
    entries: HashMap<String, Coordinates>,
}

impl GeocodingCache {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, CacheEntry> = serde_json::from_reader(reader)?;
        let entries = raw
            .into_iter()
            .map(|(location, entry)| {
                let [lat, lng] = entry.coords;
                (location.to_lowercase(), Coordinates { lat, lng })
            })
            .collect();

        Ok(Self { entries })
    }

    /// Loads the cache, falling back to an empty table when the file is
    /// missing or malformed. Coordinates only feed map display.
    pub fn from_path_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "geocoding cache unavailable");
                return Self::default();
            }
        };

        match Self::from_reader(file) {
            Ok(cache) => cache,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "geocoding cache unreadable");
                Self::default()
            }
        }
    }

    pub fn lookup(&self, location: &str) -> Option<Coordinates> {
        self.entries.get(&location.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn lookup_ignores_location_case() {
        let cache = GeocodingCache::from_reader(Cursor::new(
            r#"{"1 main street, belfast": {"coords": [54.59, -5.93], "cached_at": "2026-02-19T10:00:00"}}"#,
        ))
        .expect("cache parses");

        let coords = cache.lookup("1 Main Street, Belfast").expect("cached");
        assert_eq!(coords, Coordinates { lat: 54.59, lng: -5.93 });
        assert!(cache.lookup("2 Main Street, Belfast").is_none());
    }

    #[test]
    fn missing_cache_file_yields_empty_table() {
        let cache = GeocodingCache::from_path_or_empty("./does-not-exist.json");
        assert!(cache.is_empty());
    }
}
