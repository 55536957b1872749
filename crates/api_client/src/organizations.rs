use api_types::{
    Id,
    organization::{Member, Organization, OrganizationNew},
};

use crate::{Client, Result, segment};

impl Client {
    /// Organizations the current user belongs to. Not scoped by the
    /// organization header.
    pub async fn organizations_list(&self) -> Result<Vec<Organization>> {
        self.get("organizations").await
    }

    pub async fn organization_get(&self, id: &Id) -> Result<Organization> {
        self.get(&format!("organizations/{}", segment(id))).await
    }

    pub async fn organization_create(&self, payload: &OrganizationNew) -> Result<Organization> {
        self.create("organizations", payload).await
    }

    pub async fn organization_members(&self, id: &Id) -> Result<Vec<Member>> {
        self.get(&format!("organizations/{}/members", segment(id)))
            .await
    }
}
