//! User and role administration endpoints.

use crate::api::ApiClient;
use crate::types::{Result, Role, RoleCreate, User, UserCreate, UserUpdate};

pub async fn list(client: &ApiClient) -> Result<Vec<User>> {
    client.get("/users").await
}

pub async fn get(client: &ApiClient, id: i64) -> Result<User> {
    client.get(&format!("/users/{}", id)).await
}

pub async fn create(client: &ApiClient, create: &UserCreate) -> Result<User> {
    client.post_json("/users", create).await
}

pub async fn update(client: &ApiClient, id: i64, update: &UserUpdate) -> Result<User> {
    client.put_json(&format!("/users/{}", id), update).await
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&format!("/users/{}", id)).await
}

// ============= Roles =============

pub async fn list_roles(client: &ApiClient) -> Result<Vec<Role>> {
    client.get("/roles").await
}

pub async fn get_role(client: &ApiClient, id: i64) -> Result<Role> {
    client.get(&format!("/roles/{}", id)).await
}

pub async fn create_role(client: &ApiClient, create: &RoleCreate) -> Result<Role> {
    client.post_json("/roles", create).await
}

pub async fn delete_role(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&format!("/roles/{}", id)).await
}
