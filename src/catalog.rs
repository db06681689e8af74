//! The read-only title list the browser pages render.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

const SAMPLE_VIDEO_BASE: &str = "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub backdrop_url: String,
    pub genres: Vec<String>,
    pub rating: String,
    pub release_year: u16,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub trailer_url: Option<String>,
}

impl Content {
    pub fn genre_line(&self) -> String {
        self.genres.join(", ")
    }
}

struct Entry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    genres: &'static [&'static str],
    rating: &'static str,
    release_year: u16,
    featured: bool,
    video: Option<&'static str>,
    trailer: Option<&'static str>,
}

const ENTRIES: &[Entry] = &[
    Entry {
        id: "1",
        title: "Sintel",
        description: "A lonely young woman searches the frozen wastes for the baby dragon she once rescued, and finds more than she bargained for.",
        genres: &["Fantasy", "Adventure"],
        rating: "PG-13",
        release_year: 2010,
        featured: true,
        video: Some("Sintel.mp4"),
        trailer: Some("ForBiggerBlazes.mp4"),
    },
    Entry {
        id: "2",
        title: "Big Buck Bunny",
        description: "A giant, gentle rabbit is pushed one step too far by three bullying rodents and plans an elaborate revenge.",
        genres: &["Comedy", "Animation"],
        rating: "G",
        release_year: 2008,
        featured: false,
        video: Some("BigBuckBunny.mp4"),
        trailer: Some("ForBiggerFun.mp4"),
    },
    Entry {
        id: "3",
        title: "Elephants Dream",
        description: "Two strangers wander an endless mechanical world whose rooms rearrange themselves around the older man's obsessions.",
        genres: &["Sci-Fi", "Animation"],
        rating: "PG",
        release_year: 2006,
        featured: false,
        video: Some("ElephantsDream.mp4"),
        trailer: Some("ForBiggerEscapes.mp4"),
    },
    Entry {
        id: "4",
        title: "Tears of Steel",
        description: "In a future Amsterdam, a group of scientists stages a last stand against robots by restaging a painful breakup.",
        genres: &["Sci-Fi", "Action"],
        rating: "PG-13",
        release_year: 2012,
        featured: false,
        video: Some("TearsOfSteel.mp4"),
        trailer: Some("ForBiggerJoyrides.mp4"),
    },
    Entry {
        id: "5",
        title: "Subaru Outback: On Street and Dirt",
        description: "A road film that trades the highway for gravel trails and mountain passes.",
        genres: &["Documentary", "Adventure"],
        rating: "G",
        release_year: 2015,
        featured: false,
        video: Some("SubaruOutbackOnStreetAndDirt.mp4"),
        trailer: None,
    },
    Entry {
        id: "6",
        title: "We Are Going On Bullrun",
        description: "Drivers race exotic cars across the country in a rally where the journey matters more than the finish line.",
        genres: &["Documentary", "Action"],
        rating: "PG",
        release_year: 2014,
        featured: false,
        video: Some("WeAreGoingOnBullrun.mp4"),
        trailer: Some("ForBiggerMeltdowns.mp4"),
    },
];

fn sample_url(file: &str) -> String {
    format!("{SAMPLE_VIDEO_BASE}/{file}")
}

static CATALOG: Lazy<Vec<Content>> = Lazy::new(|| {
    ENTRIES
        .iter()
        .map(|entry| Content {
            id: entry.id.to_string(),
            title: entry.title.to_string(),
            description: entry.description.to_string(),
            thumbnail_url: format!("https://picsum.photos/seed/seikoyt-{}/400/600", entry.id),
            backdrop_url: format!("https://picsum.photos/seed/seikoyt-{}-wide/1920/1080", entry.id),
            genres: entry.genres.iter().map(|g| g.to_string()).collect(),
            rating: entry.rating.to_string(),
            release_year: entry.release_year,
            featured: entry.featured,
            video_url: entry.video.map(sample_url),
            trailer_url: entry.trailer.map(sample_url),
        })
        .collect()
});

pub fn all() -> &'static [Content] {
    CATALOG.as_slice()
}

/// First title flagged as featured, else the first title.
pub fn featured() -> &'static Content {
    featured_in(all())
}

fn featured_in(contents: &[Content]) -> &Content {
    contents
        .iter()
        .find(|content| content.featured)
        .unwrap_or(&contents[0])
}

/// Distinct genres in first-seen order.
pub fn genres() -> Vec<String> {
    genres_in(all())
}

fn genres_in(contents: &[Content]) -> Vec<String> {
    let mut genres: Vec<String> = Vec::new();
    for genre in contents.iter().flat_map(|content| content.genres.iter()) {
        if !genres.contains(genre) {
            genres.push(genre.clone());
        }
    }
    genres
}

pub fn by_genre(genre: &str) -> Vec<Content> {
    all()
        .iter()
        .filter(|content| content.genres.iter().any(|g| g == genre))
        .cloned()
        .collect()
}

pub fn find(id: &str) -> Option<&'static Content> {
    all().iter().find(|content| content.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_and_list_is_not_empty() {
        assert!(!all().is_empty());
        let ids: HashSet<_> = all().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), all().len());
    }

    #[test]
    fn featured_prefers_flagged_title() {
        assert_eq!(featured().title, "Sintel");

        let mut unflagged: Vec<Content> = all().to_vec();
        unflagged.iter_mut().for_each(|c| c.featured = false);
        assert_eq!(featured_in(&unflagged).id, unflagged[0].id);
    }

    #[test]
    fn genres_are_distinct_in_first_seen_order() {
        let genres = genres();
        assert_eq!(&genres[..3], ["Fantasy", "Adventure", "Comedy"]);
        let unique: HashSet<_> = genres.iter().collect();
        assert_eq!(unique.len(), genres.len());
    }

    #[test]
    fn genre_rows_only_hold_matching_titles() {
        let documentaries = by_genre("Documentary");
        assert_eq!(documentaries.len(), 2);
        assert!(documentaries
            .iter()
            .all(|c| c.genres.contains(&"Documentary".to_string())));
        assert!(by_genre("Western").is_empty());
    }

    #[test]
    fn find_resolves_by_id() {
        assert_eq!(find("4").map(|c| c.title.as_str()), Some("Tears of Steel"));
        assert!(find("missing").is_none());
        assert!(find("5").unwrap().trailer_url.is_none());
    }
}
