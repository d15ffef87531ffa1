//! Demo data: a couple of users and buildings, a few tasks, and comments on them.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::building::NewBuilding;
use crate::models::comment::NewComment;
use crate::models::task::{NewTask, TaskStatus};
use crate::models::user::NewUser;
use crate::repository::Repository;
use crate::utils::errors::ServiceError;

const USERS: usize = 2;
const BUILDINGS: usize = 2;
const TASKS: usize = 3;
const COMMENTS: usize = 10;

const FIRST_NAMES: &[&str] = &["Amara", "Jonas", "Priya", "Mateo", "Ines", "Kofi", "Lena", "Ravi"];
const LAST_NAMES: &[&str] = &["Okafor", "Lindqvist", "Sharma", "Rossi", "Moreau", "Mensah", "Novak"];
const COMPANIES: &[&str] = &["Northwind", "Harbor & Stone", "Maple Ridge", "Bluefield", "Cedar Point", "Ironbridge"];
const STREETS: &[&str] = &["Elm Street", "Harbour Road", "Station Avenue", "Mill Lane", "Kings Parade"];
const CITIES: &[&str] = &["Springfield", "Riverton", "Lakeside", "Fairview"];
const WORDS: &[&str] = &[
    "boiler", "leak", "inspect", "replace", "lobby", "elevator", "filter", "door", "lock", "window",
    "roof", "drain", "paint", "wiring", "heater", "stairwell", "valve", "repair", "schedule", "tenant",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub buildings: usize,
    pub tasks: usize,
    pub comments: usize,
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, values: &'a [&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}

fn sentence<R: Rng + ?Sized>(rng: &mut R, words: usize) -> String {
    let mut text = (0..words).map(|_| pick(rng, WORDS)).collect::<Vec<_>>().join(" ");
    if let Some(first) = text.get(..1).map(str::to_uppercase) {
        text.replace_range(..1, &first);
    }
    text.push('.');
    text
}

fn paragraph<R: Rng + ?Sized>(rng: &mut R) -> String {
    let sentences = rng.gen_range(2..=4);
    (0..sentences)
        .map(|_| {
            let words = rng.gen_range(4..=9);
            sentence(rng, words)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inserts the demo rows through `repo`.
///
/// Tasks and comments reference rows created in the same run, so seeding an
/// empty store always succeeds.
pub async fn seed<R: Rng + Send>(repo: &dyn Repository, rng: &mut R) -> Result<SeedSummary, ServiceError> {
    let mut user_ids = Vec::with_capacity(USERS);
    for _ in 0..USERS {
        let first = pick(rng, FIRST_NAMES);
        let last = pick(rng, LAST_NAMES);
        let suffix: u32 = rng.gen_range(100..1000);
        let user = repo
            .create_user(NewUser {
                name: format!("{} {}", first, last),
                email: format!("{}.{}{}@example.com", first.to_lowercase(), last.to_lowercase(), suffix),
            })
            .await?;
        user_ids.push(user.id);
    }

    let mut building_ids = Vec::with_capacity(BUILDINGS);
    for _ in 0..BUILDINGS {
        let number: u32 = rng.gen_range(1..400);
        let building = repo
            .create_building(NewBuilding {
                name: format!("Building {}", pick(rng, COMPANIES)),
                address: format!("{} {}, {}", number, pick(rng, STREETS), pick(rng, CITIES)),
            })
            .await?;
        building_ids.push(building.id);
    }

    let mut task_ids = Vec::with_capacity(TASKS);
    for _ in 0..TASKS {
        let words = rng.gen_range(4..=8);
        let new_task = NewTask {
            title: format!("The task title is {}", sentence(rng, words)),
            description: format!("The task description is {}", paragraph(rng)),
            status: TaskStatus::ALL.choose(rng).copied().unwrap_or_default(),
            building_id: *building_ids.choose(rng).ok_or_else(empty_pool)?,
            assigned_to: Some(*user_ids.choose(rng).ok_or_else(empty_pool)?),
            created_by: *user_ids.choose(rng).ok_or_else(empty_pool)?,
        };
        task_ids.push(repo.create_task(new_task).await?.id);
    }

    for _ in 0..COMMENTS {
        let new_comment = NewComment {
            task_id: *task_ids.choose(rng).ok_or_else(empty_pool)?,
            user_id: *user_ids.choose(rng).ok_or_else(empty_pool)?,
            comment: format!("Comment: The current progress is {}", paragraph(rng)),
        };
        repo.create_comment(new_comment).await?;
    }

    let summary = SeedSummary {
        users: USERS,
        buildings: BUILDINGS,
        tasks: TASKS,
        comments: COMMENTS,
    };
    log::info!("🌱 Seeded {:?}", summary);
    Ok(summary)
}

fn empty_pool() -> ServiceError {
    ServiceError::InternalError("seed referenced an empty row set".to_string())
}
