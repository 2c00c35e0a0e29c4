pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::{ClientConfig, PetGateway};
pub use error::{ErrorKind, GatewayError, Result};
pub use traits::{PetNetwork, SessionHooks};
pub use types::{
    Credential, Credentials, PetAction, PetId, PetRequest, PetResponse, UserIdentity,
};
