use crate::{
    client::{ApiClient, Result},
    wire::DataEnvelope,
};
use pawpost_common::model::{
    Id,
    pet::{CreatePet, Pet, PetMarker, UpdatePet},
    user::{UpdateUser, User, UserMarker},
};
use reqwest::Method;

impl ApiClient {
    pub async fn current_user(&self) -> Result<User> {
        Self::fetch_json(self.request(Method::GET, "/users/me")?).await
    }

    pub async fn user(&self, id: &Id<UserMarker>) -> Result<User> {
        Self::fetch_json(self.request(Method::GET, &format!("/users/{id}"))?).await
    }

    pub async fn update_current_user(&self, update: &UpdateUser) -> Result<User> {
        let request = self.request(Method::PUT, "/users/me")?.json(update);
        let envelope: DataEnvelope<User> = Self::fetch_json(request).await?;
        envelope.into_data("user")
    }

    pub async fn follow_user(&self, id: &Id<UserMarker>) -> Result<()> {
        Self::fetch_unit(self.request(Method::POST, &format!("/users/{id}/follow"))?).await
    }

    pub async fn unfollow_user(&self, id: &Id<UserMarker>) -> Result<()> {
        Self::fetch_unit(self.request(Method::POST, &format!("/users/{id}/unfollow"))?).await
    }

    pub async fn create_pet(&self, pet: &CreatePet) -> Result<Pet> {
        let request = self.request(Method::POST, "/pets")?.json(pet);
        let envelope: DataEnvelope<Pet> = Self::fetch_json(request).await?;
        envelope.into_data("pet")
    }

    pub async fn my_pets(&self) -> Result<Vec<Pet>> {
        Self::fetch_json(self.request(Method::GET, "/pets/my-pets")?).await
    }

    pub async fn pet(&self, id: &Id<PetMarker>) -> Result<Pet> {
        Self::fetch_json(self.request(Method::GET, &format!("/pets/{id}"))?).await
    }

    pub async fn update_pet(&self, id: &Id<PetMarker>, update: &UpdatePet) -> Result<Pet> {
        let request = self
            .request(Method::PUT, &format!("/pets/{id}"))?
            .json(update);
        Self::fetch_json(request).await
    }

    pub async fn delete_pet(&self, id: &Id<PetMarker>) -> Result<()> {
        Self::fetch_unit(self.request(Method::DELETE, &format!("/pets/{id}"))?).await
    }
}
