use crate::{backend::PetBackend, error::StoreError, list::LoadStatus};
use pawpost_common::model::{
    Id,
    pet::{CreatePet, Pet, PetMarker, UpdatePet},
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct PetSnapshot {
    pub pets: Vec<Pet>,
    pub status: LoadStatus,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct PetState {
    /// Bumped by [`PetStore::clear`] so listings sent before it are dropped.
    generation: u64,
    snapshot: PetSnapshot,
}

/// The signed-in user's own pets.
#[derive(Debug)]
pub struct PetStore<B> {
    backend: B,
    state: Mutex<PetState>,
}

impl<B: PetBackend> PetStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(PetState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, PetState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> PetSnapshot {
        self.state().snapshot.clone()
    }

    pub async fn fetch_pets(&self) {
        let generation = {
            let mut state = self.state();
            state.snapshot.status = LoadStatus::Loading;
            state.snapshot.error = None;
            state.generation
        };

        let result = self.backend.my_pets().await;

        let mut state = self.state();
        if state.generation != generation {
            debug!("Dropping pets listed before the store was cleared");
            return;
        }
        match result {
            Ok(pets) => {
                state.snapshot.pets = pets;
                state.snapshot.status = LoadStatus::Loaded;
            }
            Err(err) => {
                let err = StoreError::Fetch(err);
                warn!(error = %err, "Pets could not be loaded");
                state.snapshot.status = LoadStatus::Errored;
                state.snapshot.error = Some(err.to_string());
            }
        }
    }

    pub async fn create_pet(&self, pet: &CreatePet) -> Result<Pet, StoreError> {
        match self.backend.create_pet(pet).await {
            Ok(pet) => {
                info!(pet = %pet.id, name = %pet.name, "Pet created");
                self.state().snapshot.pets.push(pet.clone());
                Ok(pet)
            }
            Err(err) => Err(self.record(StoreError::Mutation(err))),
        }
    }

    pub async fn update_pet(
        &self,
        id: &Id<PetMarker>,
        update: &UpdatePet,
    ) -> Result<Pet, StoreError> {
        match self.backend.update_pet(id, update).await {
            Ok(pet) => {
                info!(pet = %id, "Pet updated");
                let mut state = self.state();
                let known = state.snapshot.pets.iter_mut().find(|known| known.id == pet.id);
                if let Some(existing) = known {
                    *existing = pet.clone();
                }
                Ok(pet)
            }
            Err(err) => Err(self.record(StoreError::Mutation(err))),
        }
    }

    pub async fn delete_pet(&self, id: &Id<PetMarker>) -> Result<(), StoreError> {
        match self.backend.delete_pet(id).await {
            Ok(()) => {
                info!(pet = %id, "Pet deleted");
                self.state().snapshot.pets.retain(|pet| &pet.id != id);
                Ok(())
            }
            Err(err) => Err(self.record(StoreError::Mutation(err))),
        }
    }

    /// Forgets the pets, for instance on logout. Listings still in flight
    /// no longer land.
    pub fn clear(&self) {
        let mut state = self.state();
        state.generation += 1;
        state.snapshot = PetSnapshot::default();
    }

    fn record(&self, err: StoreError) -> StoreError {
        warn!(error = %err, "Pet operation failed");
        self.state().snapshot.error = Some(err.to_string());
        err
    }
}
