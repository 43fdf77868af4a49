use app_core::Result;
use tracing::info;

use crate::models::NewQuestion;
use crate::storage::TriviaStore;

const CATEGORIES: [&str; 6] = [
    "Science",
    "Art",
    "Geography",
    "History",
    "Entertainment",
    "Sports",
];

// (question, answer, category name, difficulty)
const QUESTIONS: &[(&str, &str, &str, i64)] = &[
    ("Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", "Maya Angelou", "History", 2),
    ("What boxer's original name is Cassius Clay?", "Muhammad Ali", "History", 1),
    ("Who invented Peanut Butter?", "George Washington Carver", "History", 2),
    ("Which dung beetle was worshipped by the ancient Egyptians?", "Scarab", "History", 4),
    ("What movie earned Tom Hanks his third straight Oscar nomination, in 1996?", "Apollo 13", "Entertainment", 4),
    ("What actor did author Anne Rice first denounce, then praise in the role of her beloved Lestat?", "Tom Cruise", "Entertainment", 4),
    ("What was the title of the 1990 fantasy directed by Tim Burton about a young man with multi-bladed appendages?", "Edward Scissorhands", "Entertainment", 3),
    ("Which is the only team to play in every soccer World Cup tournament?", "Brazil", "Sports", 3),
    ("Which country won the first ever soccer World Cup in 1930?", "Uruguay", "Sports", 4),
    ("What is the largest lake in Africa?", "Lake Victoria", "Geography", 2),
    ("In which royal palace would you find the Hall of Mirrors?", "The Palace of Versailles", "Geography", 3),
    ("The Taj Mahal is located in which Indian city?", "Agra", "Geography", 2),
    ("Which Dutch graphic artist, initials M C, was a creator of optical illusions?", "Escher", "Art", 1),
    ("La Giaconda is better known as what?", "Mona Lisa", "Art", 3),
    ("How many paintings did Van Gogh sell in his lifetime?", "One", "Art", 4),
    ("Which American artist was a pioneer of Abstract Expressionism, and a leading exponent of action painting?", "Jackson Pollock", "Art", 2),
    ("What is the heaviest organ in the human body?", "The Liver", "Science", 4),
    ("Who discovered penicillin?", "Alexander Fleming", "Science", 3),
    ("Hematology is a branch of medicine involving the study of what?", "Blood", "Science", 4),
];

/// Loads the standard categories and questions into an empty database.
///
/// Returns the number of questions inserted; zero when categories already exist.
pub async fn seed(store: &dyn TriviaStore) -> Result<usize> {
    if !store.categories().await?.is_empty() {
        info!("Categories already present, skipping seed");
        return Ok(0);
    }

    let mut ids = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        ids.push((name, store.create_category(name).await?));
    }

    let mut inserted = 0;
    for &(question, answer, category, difficulty) in QUESTIONS {
        let Some(&(_, category_id)) = ids.iter().find(|(name, _)| *name == category) else {
            continue;
        };
        store
            .create_question(&NewQuestion {
                question: question.to_string(),
                answer: answer.to_string(),
                category: category_id,
                difficulty,
            })
            .await?;
        inserted += 1;
    }

    info!("Seeded {} categories and {} questions", ids.len(), inserted);
    Ok(inserted)
}
