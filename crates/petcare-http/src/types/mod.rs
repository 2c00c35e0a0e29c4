pub mod auth;
pub mod envelope;
pub mod pet;
pub mod request;
pub mod response;

pub use auth::{AuthResponse, Credential, Credentials, MessageResponse, UserIdentity};
pub use envelope::{Body, Envelope, Failure};
pub use pet::{PetAction, PetId, PetRequest, PetResponse};
pub use request::ApiRequest;
pub use response::ApiResponse;
