use crate::controller::Intake;
use application::transfer::GetUserDto;
use kernel::prelude::entity::ExternalId;

#[derive(Debug)]
pub struct GetUserRequest {
    id: String,
}

impl GetUserRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

pub struct UserTransformer;

impl Intake<GetUserRequest> for UserTransformer {
    type To = GetUserDto;
    fn emit(&self, input: GetUserRequest) -> Self::To {
        GetUserDto {
            id: ExternalId::new(input.id),
        }
    }
}
