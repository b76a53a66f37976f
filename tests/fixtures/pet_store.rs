// Resource fixture - a pet store split across a superclass, a trait and its implementor
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Pet {
    pub id: u64,
    pub name: String,
    #[serde(rename = "petStatus")]
    pub status: Option<PetStatus>,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum PetStatus {
    Available,
    Pending,
    Sold,
}

#[derive(Debug, Deserialize)]
pub struct NewPet {
    pub name: String,
}

pub struct ApiError;

/// Operations shared by every resource
pub struct BaseResource;

impl BaseResource {
    #[get]
    #[path("/health")]
    #[operation(summary = "Health check")]
    pub fn health(&self) -> String {
        "ok".to_string()
    }

    #[get]
    #[operation(summary = "Inherited listing")]
    pub fn list(&self) -> Vec<Pet> {
        vec![]
    }
}

#[tags("pets")]
#[produces("application/json", "application/xml")]
pub trait PetApi {
    #[get]
    #[path("/{petId}")]
    #[operation(summary = "Find pet by ID", description = "Returns a single pet")]
    #[api_response(status = 200, description = "successful operation")]
    #[api_response(status = 404, description = "Pet not found")]
    fn find(&self, #[path_param("petId")] id: u64) -> Result<Pet, ApiError>;

    #[post]
    #[consumes("application/json")]
    fn create(&self, pet: NewPet) -> Pet;
}

#[path("/pets")]
#[extends(BaseResource)]
pub struct PetResource;

impl PetApi for PetResource {
    fn find(&self, id: u64) -> Result<Pet, ApiError> {
        todo!()
    }

    #[operation(operation_id = "addPet")]
    fn create(&self, pet: NewPet) -> Pet {
        todo!()
    }
}

impl PetResource {
    #[get]
    #[tags("listing")]
    #[operation(summary = "List pets")]
    pub fn list(
        &self,
        #[query_param] limit: Option<u32>,
        #[header_param("X-Request-Id")] request_id: String,
    ) -> Vec<Pet> {
        vec![]
    }

    #[get]
    #[path("/internal")]
    #[operation(hidden)]
    pub fn internal(&self) {}
}
