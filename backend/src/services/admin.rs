use crate::dbs::{Database, DbError};
use crate::services::populate::{AutoPopulator, PopulationOutcome};
use shared::models::{
    BatchReport, Character, CreateCharacterRequest, CreatedCharacter, UpdateCharacterRequest,
};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Character name must not be empty.")]
    EmptyName,
    #[error(transparent)]
    Database(#[from] DbError),
}

/// Character management: creation with auto-population, edits and batch actions
pub struct CharacterAdmin {
    db: Arc<dyn Database>,
    populator: Arc<AutoPopulator>,
}

impl CharacterAdmin {
    pub fn new(db: Arc<dyn Database>, populator: Arc<AutoPopulator>) -> Self {
        Self { db, populator }
    }

    /// Stores a new character. One created without description or persona
    /// is auto-populated right away and saved again when that found anything.
    pub async fn create(
        &self,
        request: CreateCharacterRequest,
    ) -> Result<CreatedCharacter, AdminError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AdminError::EmptyName);
        }

        let mut character = Character::new(name);
        character.assign(&request.fields);
        character.persona = request.persona;
        self.db.create_character(character.clone()).await?;
        tracing::info!("Created character {}", character.name);

        if !character.description.is_empty() || !character.persona.is_empty() {
            return Ok(CreatedCharacter {
                character,
                auto_populated: false,
            });
        }

        let outcome = self.populator.populate(&character).await;
        if !outcome.succeeded() {
            tracing::info!(
                "Could not auto-populate {}; it can be retried later",
                character.name
            );
            return Ok(CreatedCharacter {
                character,
                auto_populated: false,
            });
        }

        self.db.update_character(outcome.character.clone()).await?;
        Ok(CreatedCharacter {
            character: outcome.character,
            auto_populated: true,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<Character, AdminError> {
        Ok(self.db.get_character(id).await?)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateCharacterRequest,
    ) -> Result<Character, AdminError> {
        let mut character = self.db.get_character(id).await?;

        if let Some(name) = request.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AdminError::EmptyName);
            }
            character.name = name.to_string();
        }
        if let Some(persona) = request.persona {
            character.persona = persona;
        }
        character.assign(&request.fields);
        character.touch();

        self.db.update_character(character.clone()).await?;
        Ok(character)
    }

    /// Runs the full pipeline on each character in turn, saving every success
    pub async fn auto_populate(&self, ids: &[Uuid]) -> BatchReport {
        let mut report = BatchReport::default();
        for &id in ids {
            match self.populate_and_save(id).await {
                Ok(outcome) if outcome.succeeded() => report.success(),
                Ok(outcome) => report.failure(Some(format!(
                    "Could not auto-populate {}",
                    outcome.character.name
                ))),
                Err(e) => {
                    tracing::error!("Auto-population of {} failed: {}", id, e);
                    report.failure(Some(format!("{id}: {e}")));
                }
            }
        }
        report
    }

    async fn populate_and_save(&self, id: Uuid) -> Result<PopulationOutcome, DbError> {
        let character = self.db.get_character(id).await?;
        let outcome = self.populator.populate(&character).await;
        if outcome.succeeded() {
            self.db.update_character(outcome.character.clone()).await?;
        }
        Ok(outcome)
    }

    /// Regenerates only the persona, from each character's current fields
    pub async fn regenerate_persona(&self, ids: &[Uuid]) -> BatchReport {
        let mut report = BatchReport::default();
        for &id in ids {
            match self.regenerate_one(id).await {
                Ok(true) => report.success(),
                Ok(false) => report.failure(Some(format!("No persona generated for {id}"))),
                Err(e) => {
                    tracing::error!("Persona regeneration for {} failed: {}", id, e);
                    report.failure(Some(format!("{id}: {e}")));
                }
            }
        }
        report
    }

    async fn regenerate_one(&self, id: Uuid) -> Result<bool, DbError> {
        let mut character = self.db.get_character(id).await?;
        let persona = self
            .populator
            .persona()
            .generate(&character.name, &character.fields())
            .await;
        let Some(persona) = persona else {
            return Ok(false);
        };

        character.persona = persona;
        character.auto_generated = true;
        character.touch();
        self.db.update_character(character).await?;
        Ok(true)
    }

    pub async fn duplicate(&self, ids: &[Uuid]) -> BatchReport {
        let mut report = BatchReport::default();
        for &id in ids {
            let result = match self.db.get_character(id).await {
                Ok(character) => self.db.create_character(character.duplicate()).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => report.success(),
                Err(e) => {
                    tracing::error!("Duplicating {} failed: {}", id, e);
                    report.failure(Some(format!("{id}: {e}")));
                }
            }
        }
        report
    }

    /// Looks a character up by name, creating a blank one when missing, and
    /// runs the pipeline on it
    pub async fn populate_by_name(&self, name: &str) -> Result<PopulationOutcome, AdminError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AdminError::EmptyName);
        }

        let character = match self.db.find_character_by_name(name).await? {
            Some(character) => character,
            None => {
                let character = Character::new(name);
                self.db.create_character(character.clone()).await?;
                tracing::info!("Created character {}", name);
                character
            }
        };

        let outcome = self.populator.populate(&character).await;
        if outcome.succeeded() {
            self.db.update_character(outcome.character.clone()).await?;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbs::sqlite::SqliteDatabase;
    use crate::testing::{FakeEncyclopedia, FakeModel};
    use shared::models::CharacterFields;

    async fn admin(
        encyclopedia: FakeEncyclopedia,
        model: FakeModel,
    ) -> (CharacterAdmin, Arc<dyn Database>) {
        let db: Arc<dyn Database> = Arc::new(SqliteDatabase::in_memory().await.unwrap());
        let populator = Arc::new(AutoPopulator::new(Arc::new(encyclopedia), Arc::new(model)));
        (CharacterAdmin::new(db.clone(), populator), db)
    }

    fn einstein_biography() -> FakeEncyclopedia {
        FakeEncyclopedia::default().with(
            "Albert Einstein",
            CharacterFields {
                era: Some("1879-1955".to_string()),
                description: Some("Theoretical physicist.".to_string()),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn bare_character_is_auto_populated_on_create() {
        let (admin, db) = admin(einstein_biography(), FakeModel::failing()).await;

        let created = admin
            .create(CreateCharacterRequest {
                name: " Albert Einstein ".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(created.auto_populated);
        assert_eq!(created.character.name, "Albert Einstein");

        let stored = db.get_character(created.character.id).await.unwrap();
        assert_eq!(stored.era, "1879-1955");
        assert_eq!(stored.description, "Theoretical physicist.");
    }

    #[tokio::test]
    async fn described_character_is_stored_as_given() {
        let (admin, _) = admin(einstein_biography(), FakeModel::failing()).await;

        let created = admin
            .create(CreateCharacterRequest {
                name: "Albert Einstein".to_string(),
                persona: "You are Einstein.".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!created.auto_populated);
        assert_eq!(created.character.era, "");
    }

    #[tokio::test]
    async fn create_rejects_blank_and_duplicate_names() {
        let (admin, _) = admin(FakeEncyclopedia::default(), FakeModel::failing()).await;

        let err = admin
            .create(CreateCharacterRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::EmptyName));

        let request = CreateCharacterRequest {
            name: "Marie Curie".to_string(),
            persona: "You are Marie Curie.".to_string(),
            ..Default::default()
        };
        admin.create(request.clone()).await.unwrap();
        let err = admin
            .create(CreateCharacterRequest {
                name: "MARIE CURIE".to_string(),
                ..request
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Database(DbError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_can_clear_fields() {
        let (admin, _) = admin(FakeEncyclopedia::default(), FakeModel::failing()).await;
        let created = admin
            .create(CreateCharacterRequest {
                name: "Nelson Mandela".to_string(),
                persona: "You are Nelson Mandela.".to_string(),
                fields: CharacterFields {
                    era: Some("1918-2013".to_string()),
                    nationality: Some("South African".to_string()),
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        let updated = admin
            .update(
                created.character.id,
                UpdateCharacterRequest {
                    fields: CharacterFields {
                        era: Some(String::new()),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.era, "");
        assert_eq!(updated.nationality, "South African");
        assert_eq!(updated.persona, "You are Nelson Mandela.");
        assert_eq!(
            admin.get(created.character.id).await.unwrap().era,
            ""
        );
    }

    #[tokio::test]
    async fn batch_actions_count_missing_ids_as_failures() {
        let (admin, db) = admin(
            FakeEncyclopedia::default(),
            FakeModel::replying(["You are Marie Curie, physicist."]),
        )
        .await;
        let curie = Character::new("Marie Curie");
        db.create_character(curie.clone()).await.unwrap();

        let report = admin.regenerate_persona(&[Uuid::now_v7(), curie.id]).await;
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors.len(), 1);

        let stored = db.get_character(curie.id).await.unwrap();
        assert_eq!(stored.persona, "You are Marie Curie, physicist.");
        assert!(stored.auto_generated);
    }

    #[tokio::test]
    async fn auto_populate_batch_saves_only_successes() {
        let (admin, db) = admin(einstein_biography(), FakeModel::failing()).await;
        let einstein = Character::new("Albert Einstein");
        let nobody = Character::new("Nobody");
        db.create_character(einstein.clone()).await.unwrap();
        db.create_character(nobody.clone()).await.unwrap();

        let report = admin.auto_populate(&[einstein.id, nobody.id]).await;
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(db.get_character(einstein.id).await.unwrap().era, "1879-1955");
        let untouched = db.get_character(nobody.id).await.unwrap();
        assert!(untouched.fields().is_empty());
        assert!(!untouched.auto_generated);
    }

    #[tokio::test]
    async fn duplicate_adds_copies() {
        let (admin, db) = admin(FakeEncyclopedia::default(), FakeModel::failing()).await;
        let davinci = Character::new("Leonardo da Vinci");
        db.create_character(davinci.clone()).await.unwrap();

        let report = admin.duplicate(&[davinci.id]).await;
        assert_eq!(report, BatchReport {
            succeeded: 1,
            failed: 0,
            errors: vec![],
        });

        let names: Vec<String> = db
            .get_characters()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Leonardo da Vinci", "Leonardo da Vinci (Copy)"]);
    }

    #[tokio::test]
    async fn populate_by_name_creates_missing_characters() {
        let (admin, db) = admin(einstein_biography(), FakeModel::failing()).await;

        let outcome = admin.populate_by_name("Albert Einstein").await.unwrap();
        assert!(outcome.biography);

        let stored = db
            .find_character_by_name("albert einstein")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.era, "1879-1955");
    }
}
