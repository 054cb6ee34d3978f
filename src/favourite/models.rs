use crate::category::models::Category;
use crate::product::models::Product;
use crate::schema::favourites;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Serialize)]
#[diesel(table_name = favourites)]
#[diesel(belongs_to(Product))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Favourite {
    pub id: i32,
    pub user_id: Uuid,
    pub product_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = favourites)]
pub struct NewFavourite {
    pub user_id: Uuid,
    pub product_id: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddFavourite {
    pub product_id: i32,
}

#[derive(Debug, Serialize)]
pub struct FavouriteView {
    #[serde(flatten)]
    pub favourite: Favourite,
    pub product: Product,
    pub category: Category,
}
