//! `/auth/*` calls that need no permission.
//!
//! Login and logout live on [`SessionManager`](crate::session::SessionManager)
//! because they change the session.

use crate::{ApiClient, ClientError};
use stockroom_types::{ApiResponse, User};

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// The signed-in user as the server sees it.
    pub async fn profile(&self) -> Result<User, ClientError> {
        let resp: ApiResponse<User> = self.client.get("/auth/profile").await?;
        Ok(resp.data)
    }
}
