use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vivac_points")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<i32>,
    pub access_difficulty: String,
    pub environment: Option<String>,
    pub privacity: Option<String>,
    pub terrain_type: Option<String>,
    /// JSON array of photo URLs
    pub photo_urls: Json,
    pub pet_friendly: bool,
    pub avg_rating: Option<f64>,
    pub review_count: i32,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
