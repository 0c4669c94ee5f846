use crate::{ApiClient, ClientError};
use serde_json::Value;
use stockroom_auth::Permission;
use stockroom_types::{
    ActiveFilter, ApiResponse, NewUser, Paginated, QueryParams, Role, RoleInfo, User, UserQuery,
    UserStats, UserStatusUpdate, UserUpdate,
};

/// `/users` and `/roles`. Admin only.
pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &UserQuery) -> Result<Paginated<User>, ClientError> {
        self.client.authorize(Permission::UsersView)?;
        self.client.get_query("/users", &query.to_pairs()).await
    }

    pub async fn get(&self, id: i64) -> Result<User, ClientError> {
        self.client.authorize(Permission::UsersView)?;
        let resp: ApiResponse<User> = self.client.get(&format!("/users/{id}")).await?;
        Ok(resp.data)
    }

    /// Role records for the user form.
    pub async fn roles(&self) -> Result<Vec<RoleInfo>, ClientError> {
        self.client.authorize(Permission::UsersView)?;
        let resp: ApiResponse<Vec<RoleInfo>> = self.client.get("/roles").await?;
        Ok(resp.data)
    }

    pub async fn create(&self, user: &NewUser) -> Result<User, ClientError> {
        self.client.authorize(Permission::UsersCreate)?;
        let resp: ApiResponse<User> = self.client.post("/users", user).await?;
        Ok(resp.data)
    }

    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<User, ClientError> {
        self.client.authorize(Permission::UsersEdit)?;
        let resp: ApiResponse<User> = self.client.put(&format!("/users/{id}"), update).await?;
        Ok(resp.data)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.client.authorize(Permission::UsersDelete)?;
        let _: Value = self.client.delete(&format!("/users/{id}")).await?;
        Ok(())
    }

    /// Account counts by role and status; the six counts run concurrently.
    pub async fn stats(&self) -> Result<UserStats, ClientError> {
        self.client.authorize(Permission::UsersView)?;
        let by_role = |role: Role| vec![("role", role.as_str().to_string())];
        let by_status = |status: ActiveFilter| vec![("status", status.as_str().to_string())];
        let all: Vec<(&str, String)> = Vec::new();
        let (admins, managers, viewers) = (
            by_role(Role::Admin),
            by_role(Role::Manager),
            by_role(Role::Viewer),
        );
        let (active, inactive) = (
            by_status(ActiveFilter::Active),
            by_status(ActiveFilter::Inactive),
        );

        let (total, admin_count, manager_count, viewer_count, active_count, inactive_count) =
            tokio::try_join!(
                self.client.count("/users", &all),
                self.client.count("/users", &admins),
                self.client.count("/users", &managers),
                self.client.count("/users", &viewers),
                self.client.count("/users", &active),
                self.client.count("/users", &inactive),
            )?;

        Ok(UserStats {
            total,
            admin_count,
            manager_count,
            viewer_count,
            active_count,
            inactive_count,
        })
    }

    /// Activates or deactivates an account.
    pub async fn set_status(&self, id: i64, is_active: bool) -> Result<User, ClientError> {
        self.client.authorize(Permission::UsersStatusUpdate)?;
        let resp: ApiResponse<User> = self
            .client
            .patch(&format!("/users/{id}/status"), &UserStatusUpdate { is_active })
            .await?;
        Ok(resp.data)
    }
}

#[cfg(test)]
mod tests {
    use crate::api::testing::offline_client;
    use crate::ClientError;
    use stockroom_auth::AccessDenied;
    use stockroom_types::Role;

    #[tokio::test]
    async fn manager_cannot_touch_users() {
        let client = offline_client(Some(Role::Manager));
        for err in [
            client.users().roles().await.unwrap_err(),
            client.users().set_status(2, false).await.unwrap_err(),
            client.users().delete(2).await.unwrap_err(),
            client.users().stats().await.unwrap_err(),
        ] {
            assert!(matches!(
                err,
                ClientError::Denied(AccessDenied::MissingPermission { role: Role::Manager, .. })
            ));
        }
    }

    #[tokio::test]
    async fn admin_passes_the_gate() {
        let client = offline_client(Some(Role::Admin));
        let err = client.users().get(2).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
    }
}
