use crate::{
    error::AppResult,
    models::{
        answer, category, post, user, Answer, AnswerModel, Category, CategoryModel, Post,
        PostModel, User, STATUS_ACTIVE,
    },
    services::follow::FollowService,
};
use sea_orm::{
    sea_query::{extension::postgres::PgExpr, Expr},
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;

/// Recognized post-feed filter options. `status` is always active-only;
/// soft-deleted rows never appear in a feed.
#[derive(Debug, Default)]
pub struct PostFilter {
    /// Case-insensitive substring match over title OR content.
    pub content: Option<String>,
    /// Exact category match.
    pub category: Option<i32>,
    /// Restrict to authors the viewer follows.
    pub following: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedAuthor {
    pub id: i32,
    pub name: String,
    pub is_followed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedCategory {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostFeedItem {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub multimedia: Option<post::Multimedia>,
    pub is_resolved: bool,
    pub views: i32,
    pub likes: i32,
    pub total_answers: i32,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub author: Option<FeedAuthor>,
    pub category: Option<FeedCategory>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnswerFeedItem {
    pub id: i32,
    pub content: String,
    pub qualification: f64,
    pub total_ratings: i32,
    pub status: String,
    pub post_id: Option<i32>,
    pub parent_answer_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
    pub author: Option<FeedAuthor>,
}

/// Assembles paginated, filtered listings of posts and answers, expanding
/// author/category references and annotating each author with the viewer's
/// follow state. Follow state is resolved per page, not globally, so a
/// request never scans the follower table beyond its own result window.
pub struct FeedService {
    db: DatabaseConnection,
    follows: FollowService,
}

impl FeedService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            follows: FollowService::new(db.clone()),
            db,
        }
    }

    /// The main post feed. Returns the page items and the pre-pagination
    /// total; an empty page is a successful result.
    pub async fn list_posts(
        &self,
        filter: &PostFilter,
        page: u64,
        limit: u64,
        viewer: Option<i32>,
    ) -> AppResult<(Vec<PostFeedItem>, u64)> {
        let mut cond = Condition::all().add(post::Column::Status.eq(STATUS_ACTIVE));

        if let Some(q) = filter.content.as_deref() {
            let pattern = format!("%{}%", q);
            cond = cond.add(
                Condition::any()
                    .add(Expr::col((post::Entity, post::Column::Title)).ilike(pattern.clone()))
                    .add(Expr::col((post::Entity, post::Column::Content)).ilike(pattern)),
            );
        }

        if let Some(category_id) = filter.category {
            cond = cond.add(post::Column::CategoryId.eq(category_id));
        }

        // Resolve the followee set before anything else: an empty set means
        // an empty page without ever querying posts.
        let mut restricted_to_followees = false;
        if filter.following {
            if let Some(viewer_id) = viewer {
                let followees = self.follows.followee_ids(viewer_id).await?;
                if followees.is_empty() {
                    return Ok((vec![], 0));
                }
                cond = cond.add(post::Column::AuthorId.is_in(followees));
                restricted_to_followees = true;
            }
        }

        let paginator = Post::find()
            .filter(cond)
            .order_by_desc(post::Column::CreatedAt)
            .paginate(&self.db, limit);

        let total = paginator.num_items().await?;
        let posts = paginator.fetch_page(page.saturating_sub(1)).await?;

        if posts.is_empty() {
            return Ok((vec![], total));
        }

        let author_ids: Vec<i32> = posts.iter().map(|p| p.author_id).collect();
        let followed = self
            .page_follow_state(viewer, restricted_to_followees, &author_ids)
            .await?;
        let authors = self.load_users(&author_ids).await?;
        let category_ids: Vec<i32> = posts.iter().map(|p| p.category_id).collect();
        let categories = self.load_categories(&category_ids).await?;

        let items = posts
            .into_iter()
            .map(|p| assemble_post(p, &authors, &categories, &followed))
            .collect();

        Ok((items, total))
    }

    /// Top-level answers of a post, best-rated first, newest breaking ties.
    pub async fn list_answers(
        &self,
        post_id: i32,
        page: u64,
        limit: u64,
        viewer: Option<i32>,
    ) -> AppResult<(Vec<AnswerFeedItem>, u64)> {
        let cond = Condition::all()
            .add(answer::Column::PostId.eq(post_id))
            .add(answer::Column::Status.eq(STATUS_ACTIVE));

        self.answer_page(cond, page, limit, viewer).await
    }

    /// Replies to an answer: the same ordering, fetched through the parent
    /// index.
    pub async fn list_replies(
        &self,
        parent_answer_id: i32,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<AnswerFeedItem>, u64)> {
        let cond = Condition::all()
            .add(answer::Column::ParentAnswerId.eq(parent_answer_id))
            .add(answer::Column::Status.eq(STATUS_ACTIVE));

        self.answer_page(cond, page, limit, None).await
    }

    /// A user's posts, newest first, without pagination.
    pub async fn list_posts_by_author(&self, author_id: i32) -> AppResult<Vec<PostFeedItem>> {
        let posts = Post::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .filter(post::Column::Status.eq(STATUS_ACTIVE))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await?;

        if posts.is_empty() {
            return Ok(vec![]);
        }

        let author_ids: Vec<i32> = posts.iter().map(|p| p.author_id).collect();
        let authors = self.load_users(&author_ids).await?;
        let category_ids: Vec<i32> = posts.iter().map(|p| p.category_id).collect();
        let categories = self.load_categories(&category_ids).await?;
        let followed = HashSet::new();

        Ok(posts
            .into_iter()
            .map(|p| assemble_post(p, &authors, &categories, &followed))
            .collect())
    }

    async fn answer_page(
        &self,
        cond: Condition,
        page: u64,
        limit: u64,
        viewer: Option<i32>,
    ) -> AppResult<(Vec<AnswerFeedItem>, u64)> {
        let paginator = Answer::find()
            .filter(cond)
            .order_by_desc(answer::Column::Qualification)
            .order_by_desc(answer::Column::CreatedAt)
            .paginate(&self.db, limit);

        let total = paginator.num_items().await?;
        let answers = paginator.fetch_page(page.saturating_sub(1)).await?;

        if answers.is_empty() {
            return Ok((vec![], total));
        }

        let author_ids: Vec<i32> = answers.iter().map(|a| a.author_id).collect();
        let followed = self.page_follow_state(viewer, false, &author_ids).await?;
        let authors = self.load_users(&author_ids).await?;

        let items = answers
            .into_iter()
            .map(|a| assemble_answer(a, &authors, &followed))
            .collect();

        Ok((items, total))
    }

    /// Which of the page's authors the viewer follows. Anonymous viewers
    /// follow no one; when the query was already restricted to followees,
    /// every author on the page is followed by construction.
    async fn page_follow_state(
        &self,
        viewer: Option<i32>,
        restricted_to_followees: bool,
        author_ids: &[i32],
    ) -> AppResult<HashSet<i32>> {
        match viewer {
            Some(_) if restricted_to_followees => Ok(author_ids.iter().copied().collect()),
            Some(viewer_id) => self.follows.followed_subset(viewer_id, author_ids).await,
            None => Ok(HashSet::new()),
        }
    }

    async fn load_users(&self, ids: &[i32]) -> AppResult<HashMap<i32, String>> {
        let unique: Vec<i32> = ids.iter().copied().collect::<HashSet<i32>>().into_iter().collect();
        let users = User::find()
            .filter(user::Column::Id.is_in(unique))
            .all(&self.db)
            .await?;
        Ok(users.into_iter().map(|u| (u.id, u.name)).collect())
    }

    async fn load_categories(&self, ids: &[i32]) -> AppResult<HashMap<i32, String>> {
        let unique: Vec<i32> = ids.iter().copied().collect::<HashSet<i32>>().into_iter().collect();
        let categories: Vec<CategoryModel> = Category::find()
            .filter(category::Column::Id.is_in(unique))
            .all(&self.db)
            .await?;
        Ok(categories.into_iter().map(|c| (c.id, c.name)).collect())
    }
}

fn assemble_post(
    p: PostModel,
    authors: &HashMap<i32, String>,
    categories: &HashMap<i32, String>,
    followed: &HashSet<i32>,
) -> PostFeedItem {
    let author = authors.get(&p.author_id).map(|name| FeedAuthor {
        id: p.author_id,
        name: name.clone(),
        is_followed: followed.contains(&p.author_id),
    });
    let category = categories.get(&p.category_id).map(|name| FeedCategory {
        id: p.category_id,
        name: name.clone(),
    });

    PostFeedItem {
        id: p.id,
        title: p.title,
        content: p.content,
        multimedia: p.multimedia,
        is_resolved: p.is_resolved,
        views: p.views,
        likes: p.likes,
        total_answers: p.total_answers,
        status: p.status,
        created_at: p.created_at.to_string(),
        updated_at: p.updated_at.to_string(),
        author,
        category,
    }
}

fn assemble_answer(
    a: AnswerModel,
    authors: &HashMap<i32, String>,
    followed: &HashSet<i32>,
) -> AnswerFeedItem {
    let author = authors.get(&a.author_id).map(|name| FeedAuthor {
        id: a.author_id,
        name: name.clone(),
        is_followed: followed.contains(&a.author_id),
    });

    AnswerFeedItem {
        id: a.id,
        content: a.content,
        qualification: a.qualification,
        total_ratings: a.total_ratings,
        status: a.status,
        post_id: a.post_id,
        parent_answer_id: a.parent_answer_id,
        created_at: a.created_at.to_string(),
        updated_at: a.updated_at.to_string(),
        author,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(id: i32, author_id: i32, category_id: i32) -> PostModel {
        PostModel {
            id,
            title: "How do lifetimes work?".to_string(),
            content: "Asking for a friend".to_string(),
            multimedia: None,
            author_id,
            category_id,
            is_resolved: false,
            views: 0,
            likes: 0,
            total_answers: 0,
            status: STATUS_ACTIVE.to_string(),
            created_at: chrono::NaiveDateTime::default(),
            updated_at: chrono::NaiveDateTime::default(),
        }
    }

    #[test]
    fn author_annotated_when_followed() {
        let authors = HashMap::from([(7, "alice".to_string())]);
        let categories = HashMap::from([(1, "Tech".to_string())]);
        let followed = HashSet::from([7]);

        let item = assemble_post(sample_post(1, 7, 1), &authors, &categories, &followed);
        let author = item.author.unwrap();
        assert!(author.is_followed);
        assert_eq!(author.name, "alice");
        assert_eq!(item.category.unwrap().name, "Tech");
    }

    #[test]
    fn anonymous_viewer_sees_unfollowed_authors() {
        let authors = HashMap::from([(7, "alice".to_string())]);
        let categories = HashMap::new();
        let followed = HashSet::new();

        let item = assemble_post(sample_post(1, 7, 1), &authors, &categories, &followed);
        assert!(!item.author.unwrap().is_followed);
        assert!(item.category.is_none());
    }

    #[test]
    fn missing_author_row_yields_no_author() {
        let item = assemble_post(
            sample_post(1, 7, 1),
            &HashMap::new(),
            &HashMap::new(),
            &HashSet::new(),
        );
        assert!(item.author.is_none());
    }
}
