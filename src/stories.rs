//! AR storytelling content, keyed by landmark.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::StoryError;

/// One chapter of an AR story.
#[derive(Debug, Clone, Serialize)]
pub struct Chapter {
    /// Order within the story, starting at 1.
    pub seq: u32,
    /// Chapter heading.
    pub heading: String,
    /// Narration text shown in the AR overlay.
    pub body: String,
}

/// Story content for one landmark.
#[derive(Debug, Clone, Serialize)]
pub struct Story {
    /// Landmark the story plays at.
    pub landmark_id: String,
    /// Story title.
    pub title: String,
    /// Ordered chapters.
    pub chapters: Vec<Chapter>,
}

/// Story listing row without chapter bodies.
#[derive(Debug, Clone, Serialize)]
pub struct StorySummary {
    /// Landmark the story plays at.
    pub landmark_id: String,
    /// Story title.
    pub title: String,
    /// Number of chapters.
    pub chapters: usize,
}

fn chapter(seq: u32, heading: &str, body: &str) -> Chapter {
    Chapter {
        seq,
        heading: heading.to_string(),
        body: body.to_string(),
    }
}

fn story(landmark_id: &str, title: &str, chapters: Vec<Chapter>) -> Story {
    Story {
        landmark_id: landmark_id.to_string(),
        title: title.to_string(),
        chapters,
    }
}

static STORIES: Lazy<Vec<Story>> = Lazy::new(|| {
    vec![
        story(
            "tha-phae-gate",
            "The Eastern Gate",
            vec![
                chapter(
                    1,
                    "Bricks of 1296",
                    "When King Mangrai founded Chiang Mai, this gate faced the rising sun \
                     and the river traders who came with it.",
                ),
                chapter(
                    2,
                    "The moat",
                    "The moat you see was both defense and water supply. Stand on the bridge \
                     and look along the wall line to trace the old city square.",
                ),
            ],
        ),
        story(
            "wat-phra-singh",
            "The Lion Buddha",
            vec![
                chapter(
                    1,
                    "A travelling image",
                    "The Phra Singh image is said to have come from Sri Lanka by way of \
                     Ayutthaya and Kamphaeng Phet before resting here in 1367.",
                ),
                chapter(
                    2,
                    "Lai Kham chapel",
                    "The murals inside the Lai Kham chapel show daily Lanna life: markets, \
                     tattoos, and the clothes people actually wore.",
                ),
                chapter(
                    3,
                    "Songkran",
                    "Every April the image is carried through the streets so the city can \
                     pour water over it, the oldest of Chiang Mai's rituals.",
                ),
            ],
        ),
        story(
            "wat-chedi-luang",
            "The Great Stupa",
            vec![
                chapter(
                    1,
                    "The tallest thing in the kingdom",
                    "Finished in the 15th century, the chedi stood over 80 meters until an \
                     earthquake brought a third of it down in 1545.",
                ),
                chapter(
                    2,
                    "The Emerald Buddha",
                    "For 80 years the eastern niche held the Emerald Buddha, now in Bangkok. \
                     A jade replica sits there today.",
                ),
            ],
        ),
        story(
            "warorot-market",
            "Kad Luang",
            vec![
                chapter(
                    1,
                    "The royal market",
                    "Warorot grew from a riverside landing into the city's central market \
                     under Princess Dara Rasmi's patronage.",
                ),
                chapter(
                    2,
                    "Follow the sai ua",
                    "The smell of northern sausage leads to the food floor, where recipes \
                     have stayed in the same families for generations.",
                ),
            ],
        ),
    ]
});

/// Summaries of every story, in fixture order.
pub fn story_summaries() -> Vec<StorySummary> {
    STORIES
        .iter()
        .map(|s| StorySummary {
            landmark_id: s.landmark_id.clone(),
            title: s.title.clone(),
            chapters: s.chapters.len(),
        })
        .collect()
}

/// Full story for a landmark.
pub fn story_for(landmark_id: &str) -> Result<&'static Story, StoryError> {
    STORIES
        .iter()
        .find(|s| s.landmark_id == landmark_id)
        .ok_or_else(|| StoryError::NotFound(landmark_id.to_string()))
}
