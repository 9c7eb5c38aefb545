//! SeaORM entity definitions

pub mod achievement;
pub mod achievement_reward;
pub mod badge;
pub mod category;
pub mod coupon;
pub mod order;
pub mod order_item;
pub mod product;
pub mod user;
pub mod user_achievement;
pub mod user_badge;
pub mod user_coupon;

pub use achievement::{Attribute, Condition, Target};
pub use badge::BadgeRarity;
pub use coupon::{CouponType, Rarity};
pub use product::ProductStatus;
pub use user::UserLevel;
pub use user_achievement::AchievementState;
