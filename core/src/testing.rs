//! Destination fixtures shared by the unit tests.

use qrm_macros::Destination;

#[derive(Debug, Default, Clone, PartialEq, Destination)]
#[qrm(crate = "crate")]
pub(crate) struct Operation {
    #[qrm(primary_key)]
    pub id: i32,
    pub from: Account,
    pub to: Account,
    pub amount: i32,
}

#[derive(Debug, Default, Clone, PartialEq, Destination)]
#[qrm(crate = "crate")]
pub(crate) struct Account {
    #[qrm(primary_key)]
    pub id: i32,
    pub name: String,
    pub owner: Entity,
}

#[derive(Debug, Default, Clone, PartialEq, Destination)]
#[qrm(crate = "crate")]
pub(crate) struct Entity {
    #[qrm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Destination)]
#[qrm(crate = "crate")]
pub(crate) struct Author {
    #[qrm(primary_key)]
    pub id: i64,
    pub name: String,
    pub posts: Vec<Post>,
    pub profile: Option<Profile>,
}

#[derive(Debug, Default, Clone, PartialEq, Destination)]
#[qrm(crate = "crate")]
pub(crate) struct Post {
    #[qrm(primary_key)]
    pub id: i64,
    pub title: String,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Default, Clone, PartialEq, Destination)]
#[qrm(crate = "crate")]
pub(crate) struct Tag {
    #[qrm(primary_key)]
    pub id: i64,
    pub label: String,
}

/// Optional to-one without a primary key.
#[derive(Debug, Default, Clone, PartialEq, Destination)]
#[qrm(crate = "crate")]
pub(crate) struct Profile {
    pub bio: String,
}

/// Root without a primary key.
#[derive(Debug, Default, Clone, PartialEq, Destination)]
#[qrm(crate = "crate")]
pub(crate) struct Tagless {
    pub label: String,
    pub weight: Option<f64>,
}

/// Composite primary key.
#[derive(Debug, Default, Clone, PartialEq, Destination)]
#[qrm(crate = "crate")]
pub(crate) struct Line {
    #[qrm(primary_key)]
    pub order_id: i64,
    #[qrm(primary_key)]
    pub position: i32,
    pub qty: u32,
}
