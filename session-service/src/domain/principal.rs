use uuid::Uuid;

/// The authenticated caller, attached to the request by the route guard.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub account_id: Uuid,
    pub email: String,
}
