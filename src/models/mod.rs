pub mod answer;
pub mod category;
pub mod post;
pub mod rating;
pub mod report;
pub mod user;
pub mod user_follower;

pub use answer::{Entity as Answer, Model as AnswerModel};
pub use category::{Entity as Category, Model as CategoryModel};
pub use post::{Entity as Post, Model as PostModel};
pub use rating::{Entity as Rating, Model as RatingModel};
pub use report::{Entity as Report, Model as ReportModel};
pub use user::{Entity as User, Model as UserModel};
pub use user_follower::Entity as UserFollower;

/// Lifecycle flag shared by users, categories, posts and answers. Inactive
/// rows stay addressable by id but are excluded from active listings.
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_INACTIVE: &str = "inactive";
