use std::{fs, io, path::PathBuf};

use thiserror::Error;

use crate::{
    consts::consts::ActivityName,
    model::activity::{Activity, ActivityListing},
};

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to read seed file [{path}]: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse seed file [{path}]: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Where the directory gets its activities from on startup
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Seed {
    /// The built-in Mergington High School activities
    #[default]
    Mergington,
    Empty,
    /// JSON file shaped like the `GET /activities` response
    File(PathBuf),
}

impl Seed {
    pub fn load(&self) -> Result<ActivityListing, SeedError> {
        match self {
            Seed::Mergington => Ok(mergington_activities()),
            Seed::Empty => Ok(ActivityListing::default()),
            Seed::File(path) => {
                let contents = fs::read_to_string(path).map_err(|source| SeedError::Read {
                    path: path.clone(),
                    source,
                })?;

                serde_json::from_str(&contents).map_err(|source| SeedError::Parse {
                    path: path.clone(),
                    source,
                })
            }
        }
    }
}

pub fn mergington_activities() -> ActivityListing {
    let entry = |name: &str, activity: Activity| (ActivityName::from(name), activity);

    ActivityListing::new(vec![
        entry(
            "Chess Club",
            Activity::new(
                "Learn strategies and compete in chess tournaments",
                "Fridays, 3:30 PM - 5:00 PM",
                12,
                &["michael@mergington.edu", "daniel@mergington.edu"],
            ),
        ),
        entry(
            "Programming Class",
            Activity::new(
                "Learn programming fundamentals and build software projects",
                "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
                20,
                &["emma@mergington.edu", "sophia@mergington.edu"],
            ),
        ),
        entry(
            "Gym Class",
            Activity::new(
                "Physical education and sports activities",
                "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
                30,
                &["john@mergington.edu", "olivia@mergington.edu"],
            ),
        ),
        entry(
            "Basketball Team",
            Activity::new(
                "Competitive basketball training and inter-school games",
                "Wednesdays, 4:00 PM - 6:00 PM",
                15,
                &["alex@mergington.edu"],
            ),
        ),
        entry(
            "Soccer Club",
            Activity::new(
                "Team practice and friendly matches against local schools",
                "Tuesdays and Saturdays, 10:00 AM - 12:00 PM",
                22,
                &["liam@mergington.edu", "noah@mergington.edu"],
            ),
        ),
        entry(
            "Art Club",
            Activity::new(
                "Explore painting, drawing, and mixed media",
                "Thursdays, 3:30 PM - 5:00 PM",
                18,
                &["ava@mergington.edu", "mia@mergington.edu"],
            ),
        ),
        entry(
            "Drama Club",
            Activity::new(
                "Acting, stagecraft, and school theatre productions",
                "Mondays and Wednesdays, 4:00 PM - 5:30 PM",
                25,
                &["isabella@mergington.edu", "lucas@mergington.edu"],
            ),
        ),
        entry(
            "Math Olympiad",
            Activity::new(
                "Problem solving practice for math competitions",
                "Tuesdays, 4:00 PM - 5:00 PM",
                16,
                &["ethan@mergington.edu", "amelia@mergington.edu"],
            ),
        ),
        entry(
            "Science Club",
            Activity::new(
                "Hands-on experiments and science fair preparation",
                "Fridays, 2:00 PM - 3:30 PM",
                20,
                &["harper@mergington.edu", "jack@mergington.edu"],
            ),
        ),
    ])
}
