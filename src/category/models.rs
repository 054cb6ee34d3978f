use crate::product::models::Product;
use crate::schema::categories;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Queryable, Selectable, Debug, PartialEq, Identifiable, Serialize, Clone)]
#[diesel(table_name=categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub description: String,
    pub is_hidden: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Validate)]
#[diesel(table_name = categories)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    pub image: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[serde(default)]
    pub is_hidden: bool,
}

#[derive(Deserialize, AsChangeset, Validate)]
#[diesel(table_name = categories)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    pub image: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub is_hidden: Option<bool>,
}

impl UpdateCategory {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.image.is_none()
            && self.description.is_none()
            && self.is_hidden.is_none()
    }
}

#[derive(Serialize)]
pub struct CollectionView {
    pub category: Category,
    pub products: Vec<Product>,
}
