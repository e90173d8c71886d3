use crate::{
    client::{ApiClient, Result},
    wire::{CategoriesEnvelope, DataEnvelope, ReportsEnvelope},
};
use pawpost_common::model::{
    Id,
    admin::{AdminStatistics, BlockUser, Report},
    category::{Category, CategoryMarker, CreateCategory, UpdateCategory},
    comment::CommentMarker,
    page::Page,
    post::PostMarker,
    search::{SearchQuery, SearchResults},
    user::UserMarker,
};
use reqwest::Method;
use serde::Serialize;

#[derive(Serialize)]
struct DeletionReason<'a> {
    reason: &'a str,
}

impl ApiClient {
    pub async fn categories(&self) -> Result<Vec<Category>> {
        let envelope: CategoriesEnvelope =
            Self::fetch_json(self.request(Method::GET, "/categories")?).await?;
        Ok(envelope.into())
    }

    pub async fn create_category(&self, category: &CreateCategory) -> Result<Category> {
        let request = self.request(Method::POST, "/categories")?.json(category);
        let envelope: DataEnvelope<Category> = Self::fetch_json(request).await?;
        envelope.into_data("category")
    }

    pub async fn update_category(
        &self,
        id: &Id<CategoryMarker>,
        update: &UpdateCategory,
    ) -> Result<Category> {
        let request = self
            .request(Method::PUT, &format!("/categories/{id}"))?
            .json(update);
        let envelope: DataEnvelope<Category> = Self::fetch_json(request).await?;
        envelope.into_data("category")
    }

    pub async fn delete_category(&self, id: &Id<CategoryMarker>) -> Result<()> {
        Self::fetch_unit(self.request(Method::DELETE, &format!("/categories/{id}"))?).await
    }

    pub async fn admin_statistics(&self) -> Result<AdminStatistics> {
        Self::fetch_json(self.request(Method::GET, "/admin/statistics")?).await
    }

    pub async fn reports(&self, page: u32, limit: u32) -> Result<Page<Report>> {
        let request = self
            .request(Method::GET, "/admin/reports")?
            .query(&[("page", page), ("limit", limit)]);
        let envelope: ReportsEnvelope = Self::fetch_json(request).await?;
        Ok(envelope.into())
    }

    pub async fn block_user(&self, id: &Id<UserMarker>, block: &BlockUser) -> Result<()> {
        let request = self
            .request(Method::PUT, &format!("/admin/users/{id}/block"))?
            .json(block);
        Self::fetch_unit(request).await
    }

    pub async fn delete_post_as_admin(&self, id: &Id<PostMarker>, reason: &str) -> Result<()> {
        let request = self
            .request(Method::DELETE, &format!("/admin/posts/{id}"))?
            .json(&DeletionReason { reason });
        Self::fetch_unit(request).await
    }

    pub async fn delete_comment_as_admin(&self, id: &Id<CommentMarker>) -> Result<()> {
        Self::fetch_unit(self.request(Method::DELETE, &format!("/admin/comments/{id}"))?).await
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults> {
        let page = query.page.max(1).to_string();
        let limit = if query.limit == 0 { 10 } else { query.limit }.to_string();

        let mut params = vec![
            ("q", query.query.as_str()),
            ("page", page.as_str()),
            ("limit", limit.as_str()),
        ];
        if let Some(kind) = query.kind {
            params.push(("type", kind.as_str()));
        }

        let request = self.request(Method::GET, "/search")?.query(&params);
        Self::fetch_json(request).await
    }
}
