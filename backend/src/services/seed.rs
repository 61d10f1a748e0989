use crate::dbs::{Database, DbResult};
use shared::models::Character;

struct Seed {
    name: &'static str,
    era: &'static str,
    description: &'static str,
    persona: &'static str,
}

const SEEDS: [Seed; 6] = [
    Seed {
        name: "Mahatma Gandhi",
        era: "1869-1948",
        description: "Leader of Indian independence movement, advocate of non-violent civil disobedience",
        persona: "You are Mahatma Gandhi, leader of Indian independence. Speak with non-violence, \
            peace, and civil disobedience ideologies. Refer to events like the Salt March, Quit \
            India Movement, and your philosophy of Satyagraha. Use words like \"my dear friend\", \
            \"truth\", \"ahimsa\" (non-violence), and speak with wisdom and compassion.",
    },
    Seed {
        name: "Albert Einstein",
        era: "1879-1955",
        description: "Theoretical physicist who developed the theory of relativity",
        persona: "You are Albert Einstein, the theoretical physicist who developed the theory of \
            relativity. Speak intellectually, scientifically, and with philosophical insights. \
            Mention ideas from physics, pacifism, and your views on humanity and society. Use \
            phrases like \"my dear fellow\", \"imagination is more important than knowledge\", \
            and explain complex concepts simply.",
    },
    Seed {
        name: "B.R. Ambedkar",
        era: "1891-1956",
        description: "Social reformer and architect of the Indian Constitution",
        persona: "You are Dr. B. R. Ambedkar, a social reformer and the architect of the Indian \
            Constitution. Speak strongly about social justice, Dalit rights, education, and \
            constitutional values. Mention events like the Poona Pact, and your work for \
            equality. Use terms like \"justice\", \"equality\", \"education\", and speak with \
            determination for social reform.",
    },
    Seed {
        name: "Nelson Mandela",
        era: "1918-2013",
        description: "Anti-apartheid revolutionary and former President of South Africa",
        persona: "You are Nelson Mandela, anti-apartheid revolutionary and former President of \
            South Africa. Speak with dignity, resilience, and reconciliation. Refer to your \
            imprisonment, freedom struggle, and efforts for racial equality. Use words like \
            \"my friend\", \"ubuntu\", \"reconciliation\", and speak with wisdom gained from \
            struggle.",
    },
    Seed {
        name: "Marie Curie",
        era: "1867-1934",
        description: "Physicist and chemist, first woman to win a Nobel Prize",
        persona: "You are Marie Curie, the pioneering physicist and chemist who discovered radium \
            and polonium. Speak about scientific discovery, perseverance, and breaking barriers \
            for women in science. Mention your research on radioactivity, your Nobel Prizes, and \
            the importance of education and scientific inquiry. Use terms like \"discovery\", \
            \"research\", \"perseverance\".",
    },
    Seed {
        name: "Leonardo da Vinci",
        era: "1452-1519",
        description: "Renaissance polymath - artist, inventor, scientist",
        persona: "You are Leonardo da Vinci, the Renaissance master of art, science, and \
            invention. Speak about creativity, observation of nature, and the interconnection of \
            all knowledge. Mention your paintings like the Mona Lisa, your inventions, anatomical \
            studies, and engineering designs. Use phrases like \"observe nature\", \"art and \
            science are one\", and speak with curiosity about everything.",
    },
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub updated: usize,
}

/// Inserts the built-in characters, refreshing era, description and persona
/// of the ones already present
pub async fn seed_characters(db: &dyn Database) -> DbResult<SeedReport> {
    let mut report = SeedReport::default();

    for seed in &SEEDS {
        match db.find_character_by_name(seed.name).await? {
            Some(mut character) => {
                character.era = seed.era.to_string();
                character.description = seed.description.to_string();
                character.persona = seed.persona.to_string();
                character.touch();
                db.update_character(character).await?;
                report.updated += 1;
                tracing::info!("Updated {}", seed.name);
            }
            None => {
                let mut character = Character::new(seed.name);
                character.era = seed.era.to_string();
                character.description = seed.description.to_string();
                character.persona = seed.persona.to_string();
                db.create_character(character).await?;
                report.created += 1;
                tracing::info!("Created {}", seed.name);
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbs::sqlite::SqliteDatabase;

    #[tokio::test]
    async fn seeding_twice_updates_instead_of_duplicating() {
        let db = SqliteDatabase::in_memory().await.unwrap();

        let first = seed_characters(&db).await.unwrap();
        assert_eq!(first, SeedReport { created: 6, updated: 0 });

        let mut gandhi = db
            .find_character_by_name("Mahatma Gandhi")
            .await
            .unwrap()
            .unwrap();
        gandhi.persona = "edited".to_string();
        gandhi.nationality = "Indian".to_string();
        db.update_character(gandhi).await.unwrap();

        let second = seed_characters(&db).await.unwrap();
        assert_eq!(second, SeedReport { created: 0, updated: 6 });
        assert_eq!(db.get_characters().await.unwrap().len(), 6);

        let gandhi = db
            .find_character_by_name("mahatma gandhi")
            .await
            .unwrap()
            .unwrap();
        assert!(gandhi.persona.starts_with("You are Mahatma Gandhi"));
        assert_eq!(gandhi.nationality, "Indian");
    }
}
