//! Sample notes for local development.

use tracing::info;

use noted_core::{NewNote, Note, NoteRepository, Priority, Result};

/// The demo data set: one pinned welcome note, one archived note, and a
/// spread of categories and priorities.
pub fn sample_notes() -> Vec<NewNote> {
    vec![
        NewNote::new(
            "Welcome to noted",
            "This is your first note.\n\
             Things to try:\n\
             - create and edit notes\n\
             - search titles and content\n\
             - organize with categories and tags\n\
             - pin what matters, archive what doesn't",
        )
        .with_category("welcome")
        .with_tags(["getting-started", "api", "tutorial"])
        .with_priority(Priority::High)
        .pinned(true),
        NewNote::new(
            "Project Meeting Notes",
            "Weekly sync.\n\
             Topics: sprint planning, API progress, query performance.\n\
             Action items: finish authentication, expand the test suite, update the API docs.\n\
             Next meeting: Friday 14:00",
        )
        .with_category("work")
        .with_tags(["meeting", "planning", "project", "team"]),
        NewNote::new(
            "Shopping List",
            "Vegetables: tomatoes, lettuce, carrots\n\
             Pantry: rice, pasta, olive oil\n\
             Dairy: milk, cheese, yogurt",
        )
        .with_category("personal")
        .with_tags(["shopping", "groceries", "weekly"])
        .with_priority(Priority::Low),
        NewNote::new(
            "App Feature Ideas",
            "UX: dark mode, keyboard shortcuts, rich text editing.\n\
             Platform: offline sync, export to PDF, calendar integration.",
        )
        .with_category("creative")
        .with_tags(["brainstorming", "features", "ideas"]),
        NewNote::new(
            "Learning Resources",
            "Books: Clean Code, Designing Data-Intensive Applications.\n\
             Practice projects: todo API, blog platform, e-commerce backend.",
        )
        .with_category("education")
        .with_tags(["learning", "resources", "books"]),
        NewNote::new(
            "Fitness Tracker",
            "Goals this week: run 3x 5km, gym 2x, yoga 1x.\n\
             Monday: 5km in 25 minutes. Tuesday: upper body.",
        )
        .with_category("health")
        .with_tags(["fitness", "goals", "tracking"]),
        NewNote::new(
            "Code Review Checklist",
            "- functions are small and focused\n\
             - input is validated\n\
             - no N+1 queries\n\
             - edge cases are tested\n\
             - API docs are updated",
        )
        .with_category("work")
        .with_tags(["checklist", "code-review", "quality"])
        .with_priority(Priority::High),
        NewNote::new(
            "Movie Watchlist",
            "The Matrix, Mad Max: Fury Road, Parasite, Arrival, Blade Runner 2049",
        )
        .with_category("entertainment")
        .with_tags(["movies", "watchlist"])
        .with_priority(Priority::Low),
        NewNote::new(
            "Archive Test Note",
            "Archived notes are hidden from the default listing and from search, \
             but can still be listed with archived=true and restored.",
        )
        .with_category("test")
        .with_tags(["archived", "test"])
        .with_priority(Priority::Low)
        .archived(true),
    ]
}

/// Insert [`sample_notes`] through `repo`. Existing notes are left in place.
pub async fn seed_notes<R>(repo: &R) -> Result<Vec<Note>>
where
    R: NoteRepository + ?Sized,
{
    let mut created = Vec::new();
    for note in sample_notes() {
        created.push(repo.insert(note).await?);
    }

    let mut categories: Vec<&str> = created.iter().map(|n| n.category.as_str()).collect();
    categories.sort_unstable();
    categories.dedup();
    info!(
        subsystem = "db",
        component = "seed",
        op = "seed_notes",
        result_count = created.len(),
        categories = %categories.join(", "),
        "Inserted sample notes"
    );
    Ok(created)
}
