pub mod achievement;
pub mod badge;
pub mod catalog;
pub mod checkout;
pub mod gacha;
pub mod inventory;
pub mod order;
pub mod reward;
pub mod seed;
pub mod user;

pub use achievement::Achievement;
pub use badge::Badge;
pub use catalog::Catalog;
pub use checkout::Checkout;
pub use gacha::Gacha;
pub use inventory::Inventory;
pub use order::Order;
pub use reward::Reward;
pub use seed::Seed;
pub use user::User;
